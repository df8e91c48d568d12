//! Input/display driver.
//!
//! Everything that touches the real cursor, keyboard or screen goes through
//! `InputDriver`. The Windows implementation uses SendInput and GDI; other
//! platforms get a stub that reports every call as unsupported.

pub mod stub;
#[cfg(target_os = "windows")]
pub mod windows;

use image::RgbaImage;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::Result;
use crate::geometry::{Point, Rect, ScreenSize};
use crate::motion::Easing;

/// Interval between cursor updates during a timed glide.
pub const TWEEN_STEP: Duration = Duration::from_millis(5);

/// Keys the pipelines press directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Control,
    Enter,
    Char(char),
}

/// Capability set the capture and replay pipelines depend on.
///
/// Implementations must be shareable across threads: during capture one
/// task reads the screen while another moves the cursor.
pub trait InputDriver: Send + Sync {
    /// Size of the primary display.
    fn screen_size(&self) -> Result<ScreenSize>;

    fn cursor_position(&self) -> Result<Point>;

    /// Jumps the cursor to `p` with no interpolation.
    fn set_cursor_position(&self, p: Point) -> Result<()>;

    /// Left click at the current cursor position.
    fn click(&self) -> Result<()>;

    /// Types `text` one character at a time, waiting `interval` after each.
    fn type_text(&self, text: &str, interval: Duration) -> Result<()>;

    /// Presses `keys` in order, then releases them in reverse order.
    fn key_chord(&self, keys: &[Key]) -> Result<()>;

    /// Captures `region` of the screen, or the whole screen for `None`.
    fn screenshot(&self, region: Option<Rect>) -> Result<RgbaImage>;

    /// Glides the cursor to `target` over `duration` following `easing`.
    fn move_cursor(&self, target: Point, duration: Duration, easing: Easing) -> Result<()> {
        let start = self.cursor_position()?;
        let steps = (duration.as_secs_f64() / TWEEN_STEP.as_secs_f64()).floor() as u32;
        let began = Instant::now();

        for step in 1..steps {
            let t = easing.apply(step as f64 / steps as f64);
            let p = Point::new(
                start.x + (target.x - start.x) * t,
                start.y + (target.y - start.y) * t,
            );
            self.set_cursor_position(p)?;
            let due = TWEEN_STEP * step;
            if let Some(wait) = due.checked_sub(began.elapsed()) {
                std::thread::sleep(wait);
            }
        }

        self.set_cursor_position(target)
    }
}

/// Creates the driver for the current OS.
pub fn create_driver() -> Arc<dyn InputDriver> {
    #[cfg(target_os = "windows")]
    {
        Arc::new(windows::WindowsDriver::new())
    }
    #[cfg(not(target_os = "windows"))]
    {
        crate::log("No input driver for this platform; using stub");
        Arc::new(stub::StubDriver)
    }
}
