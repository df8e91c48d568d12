//! Error taxonomy.
//!
//! Per-item misses (a hero card that cannot be found) are not errors; they
//! surface as `LocateOutcome::Missed` and the pipelines skip them. Everything
//! here is fatal to the current capture or replay run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings data: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("input synthesis failed: {0}")]
    Input(String),

    #[error("screen capture failed: {0}")]
    Capture(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    #[error("worker task failed: {0}")]
    Worker(String),

    #[error("stop requested")]
    Aborted,
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
