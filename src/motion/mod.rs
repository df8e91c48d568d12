//! Cursor motion synthesis.
//!
//! - Curved path generation between two screen points
//! - Easing functions for timed cursor glides
//! - The screen controller that drives the cursor along those paths

pub mod controller;
pub mod curve;
pub mod easing;

pub use controller::ScreenController;
pub use curve::generate_curve;
pub use easing::Easing;
