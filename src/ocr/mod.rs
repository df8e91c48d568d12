//! OCR capture of fixed screen regions.
//!
//! A region is captured through the input driver, optionally reduced to
//! white-on-dark text, recognized by Tesseract and cleaned into the string
//! that gets persisted.

pub mod clean;
pub mod engine;
pub mod preprocess;
pub mod reader;
pub mod setup;

pub use clean::clean_string;
pub use engine::{TesseractEngine, TextRecognizer};
pub use preprocess::isolate_white_text;
pub use reader::OcrReader;
pub use setup::ensure_tesseract;
