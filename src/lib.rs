//! Hero sensitivity copier.
//!
//! Reads per-hero mouse sensitivity from the game's settings screens by
//! locating hero cards on screen and running OCR over fixed regions, then
//! replays those values onto another account with synthetic input.

pub mod automation;
pub mod config;
pub mod driver;
pub mod error;
pub mod geometry;
pub mod locate;
pub mod motion;
pub mod ocr;
pub mod paths;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

use chrono::Local;
use std::fs::OpenOptions;
use std::io::Write;

pub use error::{Error, Result};

/// Prints a timestamped line and appends it to `logs/sens_copy.log`.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, msg);
    print!("{}", line);
    let log_path = paths::get_logs_dir().join("sens_copy.log");
    if let Ok(mut file) = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        let _ = file.write_all(line.as_bytes());
    }
}
