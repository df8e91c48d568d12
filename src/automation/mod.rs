//! Capture and replay pipelines.
//!
//! Pieces:
//! - Roster navigation and screenshot
//! - Parallel hero card search with completion-order processing
//! - Overlapped OCR read and cursor return per hero
//! - Sequential replay of captured settings
//! - A stop signal checked between heroes

pub mod capture;
pub mod pool;
pub mod replay;
pub mod roster;
pub mod state;

pub use capture::{capture_all, capture_settings, list_hero_images};
pub use pool::WorkerPool;
pub use replay::{ReplaySummary, replay};
pub use roster::open_roster;
pub use state::{AutomationContext, StopSignal};
