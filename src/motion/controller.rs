//! Cursor and keyboard control on top of an `InputDriver`.
//!
//! With human movement on, every move first travels a generated curve,
//! touching only a random subset of its points with short randomized glides.
//! Every move then finishes with one precise eased glide onto the target.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::driver::{InputDriver, Key};
use crate::error::Result;
use crate::geometry::{Point, Rect, distance, random_point_in};
use crate::motion::curve::generate_curve;
use crate::motion::easing::Easing;

/// Screen distance covered per curve sample.
pub const PIXELS_PER_SAMPLE: f64 = 50.0;

/// Glide duration range for one hop along a curve (seconds).
const HOP_DURATION: (f64, f64) = (0.005, 0.05);

/// Glide duration range for the final precise move (seconds).
const FINAL_DURATION: (f64, f64) = (0.01, 0.02);

pub struct ScreenController {
    driver: Arc<dyn InputDriver>,
    human: bool,
    rng: Mutex<StdRng>,
}

impl ScreenController {
    pub fn new(driver: Arc<dyn InputDriver>, human: bool) -> Self {
        Self {
            driver,
            human,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Controller with a fixed RNG seed, for reproducible runs.
    pub fn with_seed(driver: Arc<dyn InputDriver>, human: bool, seed: u64) -> Self {
        Self {
            driver,
            human,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn driver(&self) -> &Arc<dyn InputDriver> {
        &self.driver
    }

    pub fn is_human(&self) -> bool {
        self.human
    }

    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        // A poisoned RNG is still a usable RNG
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut rng)
    }

    /// Moves the cursor to `target`.
    pub fn move_to(&self, target: Point) -> Result<()> {
        if self.human {
            let start = self.driver.cursor_position()?;
            let screen = self.driver.screen_size()?;
            let samples = (distance(start, target) / PIXELS_PER_SAMPLE).floor() as usize;
            let curve = self.with_rng(|rng| generate_curve(start, target, samples, screen, rng));
            self.move_along_curve(&curve)?;
        }

        let (duration, easing) = self.with_rng(|rng| {
            let secs = rng.gen_range(FINAL_DURATION.0..FINAL_DURATION.1);
            let easing = *Easing::FINAL_MOVE
                .choose(rng)
                .unwrap_or(&Easing::InOutQuad);
            (Duration::from_secs_f64(secs), easing)
        });
        self.driver.move_cursor(target, duration, easing)
    }

    /// Visits roughly every 1-in-{1,2,3} curve point, re-rolling the stride
    /// for each point.
    fn move_along_curve(&self, curve: &[Point]) -> Result<()> {
        for (i, p) in curve.iter().enumerate() {
            let hop = self.with_rng(|rng| {
                let stride = rng.gen_range(1..=3usize);
                (i % stride == 0)
                    .then(|| Duration::from_secs_f64(rng.gen_range(HOP_DURATION.0..HOP_DURATION.1)))
            });
            if let Some(duration) = hop {
                self.driver.move_cursor(*p, duration, Easing::Linear)?;
            }
        }
        Ok(())
    }

    pub fn click_at(&self, target: Point) -> Result<()> {
        self.move_to(target)?;
        self.driver.click()
    }

    /// Clicks a random whole-pixel point inside `area`.
    pub fn click_in_area(&self, area: &Rect) -> Result<()> {
        let target = self.with_rng(|rng| random_point_in(area, rng));
        self.click_at(target)
    }

    pub fn select_all(&self) -> Result<()> {
        self.driver.key_chord(&[Key::Control, Key::Char('a')])
    }

    pub fn press_enter(&self) -> Result<()> {
        self.driver.key_chord(&[Key::Enter])
    }

    pub fn type_text(&self, text: &str, interval: Duration) -> Result<()> {
        self.driver.type_text(text, interval)
    }

    /// Picks a random point inside `area` from this controller's RNG.
    pub fn random_point_in(&self, area: &Rect) -> Point {
        self.with_rng(|rng| random_point_in(area, rng))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ScreenSize;
    use crate::testing::{DriverEvent, FakeDriver};

    fn fake() -> Arc<FakeDriver> {
        Arc::new(FakeDriver::new(ScreenSize::new(2560, 1440)))
    }

    #[test]
    fn test_direct_move_is_single_glide() {
        let driver = fake();
        let ctrl = ScreenController::with_seed(driver.clone(), false, 1);

        ctrl.move_to(Point::new(800.0, 600.0)).unwrap();

        let moves = driver.moves();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].0, Point::new(800.0, 600.0));
        assert_ne!(moves[0].1, Easing::Linear);
        assert_eq!(driver.cursor(), Point::new(800.0, 600.0));
    }

    #[test]
    fn test_human_move_follows_curve_then_lands_exactly() {
        let driver = fake();
        driver.place_cursor(Point::new(100.0, 100.0));
        let ctrl = ScreenController::with_seed(driver.clone(), true, 42);

        let target = Point::new(2100.0, 1300.0);
        ctrl.move_to(target).unwrap();

        let moves = driver.moves();
        let samples = (distance(Point::new(100.0, 100.0), target) / PIXELS_PER_SAMPLE).floor();
        // Some hops, never more than the curve has points, plus the final glide
        assert!(moves.len() > 1);
        assert!(moves.len() as f64 <= samples + 1.0);

        let (last, easing) = moves[moves.len() - 1];
        assert_eq!(last, target);
        assert!(Easing::FINAL_MOVE.contains(&easing));
        assert!(moves[..moves.len() - 1].iter().all(|(_, e)| *e == Easing::Linear));
    }

    #[test]
    fn test_short_human_move_has_no_curve() {
        let driver = fake();
        driver.place_cursor(Point::new(100.0, 100.0));
        let ctrl = ScreenController::with_seed(driver.clone(), true, 5);

        ctrl.move_to(Point::new(120.0, 110.0)).unwrap();
        assert_eq!(driver.moves().len(), 1);
    }

    #[test]
    fn test_click_in_area_clicks_inside() {
        let driver = fake();
        let ctrl = ScreenController::with_seed(driver.clone(), false, 9);
        let area = Rect::new(2165.0, 625.0, 2490.0, 680.0);

        ctrl.click_in_area(&area).unwrap();

        let clicks = driver.clicks();
        assert_eq!(clicks.len(), 1);
        assert!(area.contains(clicks[0]));
    }

    #[test]
    fn test_keyboard_helpers() {
        let driver = fake();
        let ctrl = ScreenController::with_seed(driver.clone(), false, 0);

        ctrl.select_all().unwrap();
        ctrl.type_text("45.50", Duration::ZERO).unwrap();
        ctrl.press_enter().unwrap();

        let events = driver.events();
        assert_eq!(
            events,
            vec![
                DriverEvent::Chord(vec![Key::Control, Key::Char('a')]),
                DriverEvent::Typed("45.50".into()),
                DriverEvent::Chord(vec![Key::Enter]),
            ]
        );
    }
}
