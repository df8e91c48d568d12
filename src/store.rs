//! Settings file: a JSON array of captured hero records.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// One hero's captured sensitivity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroRecord {
    pub name: String,
    /// Cleaned OCR text, typed back verbatim on replay
    pub sensitivity: String,
    /// Reference card image used to find the hero on the roster
    pub filepath: String,
}

/// Writes `records` to `path`, replacing any previous file.
pub fn save_records(path: &Path, records: &[HeroRecord]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }

    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).map_err(|e| Error::io(path, e))?;
    crate::log(&format!(
        "Saved {} records to {}",
        records.len(),
        path.display()
    ));
    Ok(())
}

pub fn load_records(path: &Path) -> Result<Vec<HeroRecord>> {
    let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let records: Vec<HeroRecord> = serde_json::from_str(&contents)?;
    crate::log(&format!(
        "Loaded {} records from {}",
        records.len(),
        path.display()
    ));
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn record(name: &str, sensitivity: &str) -> HeroRecord {
        HeroRecord {
            name: name.into(),
            sensitivity: sensitivity.into(),
            filepath: format!("heroes/{}.png", name),
        }
    }

    #[test]
    fn test_saved_file_uses_plain_keys() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        save_records(&path, &[record("Ana", "37.50")]).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                { "name": "Ana", "sensitivity": "37.50", "filepath": "heroes/Ana.png" }
            ])
        );
        assert_eq!(load_records(&path).unwrap(), vec![record("Ana", "37.50")]);
    }

    #[test]
    fn test_save_overwrites_and_creates_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.json");

        save_records(&path, &[record("Ana", "1"), record("Mei", "2")]).unwrap();
        save_records(&path, &[record("Mei", "3")]).unwrap();

        assert_eq!(load_records(&path).unwrap(), vec![record("Mei", "3")]);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let result = load_records(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(Error::Io { .. })));
    }

    #[test]
    fn test_malformed_file_is_json_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, r#"[{ "name": "Ana" }]"#).unwrap();
        assert!(matches!(load_records(&path), Err(Error::Json(_))));
    }
}
