//! Driver for platforms without input synthesis support.

use image::RgbaImage;
use std::time::Duration;

use super::{InputDriver, Key};
use crate::error::{Error, Result};
use crate::geometry::{Point, Rect, ScreenSize};

pub struct StubDriver;

fn unsupported<T>(what: &str) -> Result<T> {
    Err(Error::Input(format!(
        "{} is not supported on {}",
        what,
        std::env::consts::OS
    )))
}

impl InputDriver for StubDriver {
    fn screen_size(&self) -> Result<ScreenSize> {
        unsupported("screen size query")
    }

    fn cursor_position(&self) -> Result<Point> {
        unsupported("cursor query")
    }

    fn set_cursor_position(&self, _p: Point) -> Result<()> {
        unsupported("cursor movement")
    }

    fn click(&self) -> Result<()> {
        unsupported("mouse click")
    }

    fn type_text(&self, _text: &str, _interval: Duration) -> Result<()> {
        unsupported("typing")
    }

    fn key_chord(&self, _keys: &[Key]) -> Result<()> {
        unsupported("key chord")
    }

    fn screenshot(&self, _region: Option<Rect>) -> Result<RgbaImage> {
        Err(Error::Capture(format!(
            "screen capture is not supported on {}",
            std::env::consts::OS
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stub_reports_input_errors() {
        let driver = StubDriver;
        assert!(matches!(driver.click(), Err(Error::Input(_))));
        assert!(matches!(
            driver.move_cursor(Point::new(1.0, 1.0), Duration::ZERO, crate::motion::Easing::Linear),
            Err(Error::Input(_))
        ));
        assert!(matches!(driver.screenshot(None), Err(Error::Capture(_))));
    }
}
