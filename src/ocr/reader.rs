use image::DynamicImage;
use std::sync::Arc;

use super::clean::clean_string;
use super::engine::TextRecognizer;
use super::preprocess::isolate_white_text;
use crate::driver::InputDriver;
use crate::error::Result;
use crate::geometry::Rect;

/// Reads cleaned text from fixed screen regions.
pub struct OcrReader {
    driver: Arc<dyn InputDriver>,
    recognizer: Arc<dyn TextRecognizer>,
}

impl OcrReader {
    pub fn new(driver: Arc<dyn InputDriver>, recognizer: Arc<dyn TextRecognizer>) -> Self {
        Self { driver, recognizer }
    }

    /// Captures `area` and returns its cleaned text.
    ///
    /// With `preprocess`, only near-white text survives into the image handed
    /// to the recognizer.
    pub fn read_text(&self, area: &Rect, preprocess: bool) -> Result<String> {
        let captured = self.driver.screenshot(Some(*area))?;
        let img = if preprocess {
            DynamicImage::ImageLuma8(isolate_white_text(&captured))
        } else {
            DynamicImage::ImageRgba8(captured)
        };

        let raw = self.recognizer.recognize(&img)?;
        Ok(clean_string(&raw))
    }
}
