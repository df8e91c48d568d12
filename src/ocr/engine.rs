use image::DynamicImage;
use std::path::PathBuf;
use std::process::Command;
use tempfile::NamedTempFile;

use super::setup::TesseractPaths;
use crate::error::{Error, Result};

/// Converts a captured image into raw text.
pub trait TextRecognizer: Send + Sync {
    fn recognize(&self, img: &DynamicImage) -> Result<String>;
}

/// Runs the Tesseract CLI on each image and returns its stdout.
pub struct TesseractEngine {
    executable: PathBuf,
    tessdata: Option<PathBuf>,
    psm: u8,
}

impl TesseractEngine {
    pub fn new(paths: TesseractPaths, psm: u8) -> Self {
        Self {
            executable: paths.executable,
            tessdata: paths.tessdata,
            psm,
        }
    }

    fn command(&self, input: &std::path::Path) -> Command {
        let mut cmd = Command::new(&self.executable);
        cmd.arg(input).arg("stdout");
        if let Some(dir) = &self.tessdata {
            cmd.arg("--tessdata-dir").arg(dir);
        }
        cmd.arg("-l").arg("eng").arg("--psm").arg(self.psm.to_string());
        cmd
    }
}

impl TextRecognizer for TesseractEngine {
    fn recognize(&self, img: &DynamicImage) -> Result<String> {
        // Tesseract only reads images from disk
        let temp_input = NamedTempFile::with_suffix(".png")
            .map_err(|e| Error::io(std::env::temp_dir(), e))?;
        img.save(temp_input.path())?;

        let output = self
            .command(temp_input.path())
            .output()
            .map_err(|e| Error::io(&self.executable, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Ocr(format!("Tesseract failed: {}", stderr.trim())));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}
