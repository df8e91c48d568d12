use regex::Regex;
use std::sync::OnceLock;

/// A run of word characters, whitespace and periods.
const RUN_PATTERN: &str = r"[\w\s.]+";

fn run_regex() -> &'static Regex {
    static RUN: OnceLock<Regex> = OnceLock::new();
    RUN.get_or_init(|| Regex::new(RUN_PATTERN).expect("run pattern is a valid regex"))
}

/// Cleans raw OCR output into the value that gets stored.
///
/// Only the first run of word characters, whitespace and periods survives;
/// it ends at the first other character or at the end of input. Newlines and
/// surrounding whitespace are then stripped. Returns an empty string when
/// there is no run.
///
/// ```
/// use sens_copy::ocr::clean_string;
///
/// assert_eq!(
///     clean_string("Hi! This is a string with (a lot) of [punctuation] and $ymbols."),
///     "Hi"
/// );
/// ```
pub fn clean_string(raw: &str) -> String {
    run_regex()
        .find(raw)
        .map(|run| run.as_str().trim_matches('\n').trim().to_string())
        .unwrap_or_default()
}
