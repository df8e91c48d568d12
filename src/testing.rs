//! In-memory stand-ins for the display, input devices and OCR engine.
//!
//! `FakeDriver` simulates just enough of the game UI for the pipelines:
//! clicking a hero card on the roster opens that hero, clicking the
//! sensitivity box starts editing it, Ctrl+A/typing/Enter rewrite the value,
//! and clicking "Change Hero" goes back to the roster. Every call is logged
//! as a `DriverEvent`.

use image::imageops;
use image::{DynamicImage, Rgba, RgbaImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use crate::config::{Config, Regions};
use crate::driver::{InputDriver, Key};
use crate::error::Result;
use crate::geometry::{Point, Rect, ScreenSize};
use crate::motion::Easing;
use crate::ocr::TextRecognizer;

#[derive(Clone, Debug, PartialEq)]
pub enum DriverEvent {
    Moved(Point),
    Clicked(Point),
    Chord(Vec<Key>),
    Typed(String),
    Captured(Option<Rect>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct FakeHero {
    /// Card position on the roster screen
    pub card: Rect,
    pub name: String,
    pub sensitivity: String,
}

impl FakeHero {
    pub fn new(card: Rect, name: &str, sensitivity: &str) -> Self {
        Self {
            card,
            name: name.to_string(),
            sensitivity: sensitivity.to_string(),
        }
    }
}

#[derive(Default)]
struct UiState {
    cursor: Point,
    events: Vec<DriverEvent>,
    moves: Vec<(Point, Easing)>,
    heroes: Vec<FakeHero>,
    /// Hero whose settings page is open
    selected: Option<usize>,
    /// Contents of the sensitivity box while it has focus
    editing: Option<String>,
}

pub struct FakeDriver {
    size: ScreenSize,
    screen: RgbaImage,
    regions: Option<Regions>,
    capture_delay: Duration,
    state: Mutex<UiState>,
}

/// Whole-pixel crop bounds of `area`, clamped to the screen.
fn crop_bounds(area: &Rect, size: ScreenSize) -> (u32, u32, u32, u32) {
    let (left, top, width, height) = area.left_top_width_height();
    let x = (left.round().max(0.0) as u32).min(size.width);
    let y = (top.round().max(0.0) as u32).min(size.height);
    let w = (width.round().max(0.0) as u32).min(size.width - x);
    let h = (height.round().max(0.0) as u32).min(size.height - y);
    (x, y, w, h)
}

impl FakeDriver {
    /// A blank screen with no UI behind it.
    pub fn new(size: ScreenSize) -> Self {
        Self {
            size,
            screen: RgbaImage::new(size.width, size.height),
            regions: None,
            capture_delay: Duration::ZERO,
            state: Mutex::new(UiState::default()),
        }
    }

    /// A roster screen of random texture with `heroes` laid out on it.
    pub fn game(size: ScreenSize, regions: Regions, heroes: Vec<FakeHero>, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let screen = RgbaImage::from_fn(size.width, size.height, |_, _| {
            Rgba([
                rng.gen_range(0..=255),
                rng.gen_range(0..=255),
                rng.gen_range(0..=255),
                255,
            ])
        });

        Self {
            size,
            screen,
            regions: Some(regions),
            capture_delay: Duration::ZERO,
            state: Mutex::new(UiState {
                heroes,
                ..UiState::default()
            }),
        }
    }

    /// Makes every region capture take at least `delay`.
    pub fn with_capture_delay(mut self, delay: Duration) -> Self {
        self.capture_delay = delay;
        self
    }

    fn state(&self) -> MutexGuard<'_, UiState> {
        self.state.lock().unwrap()
    }

    pub fn place_cursor(&self, p: Point) {
        self.state().cursor = p;
    }

    pub fn cursor(&self) -> Point {
        self.state().cursor
    }

    pub fn moves(&self) -> Vec<(Point, Easing)> {
        self.state().moves.clone()
    }

    pub fn clicks(&self) -> Vec<Point> {
        self.state()
            .events
            .iter()
            .filter_map(|e| match e {
                DriverEvent::Clicked(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn events(&self) -> Vec<DriverEvent> {
        self.state().events.clone()
    }

    pub fn heroes(&self) -> Vec<FakeHero> {
        self.state().heroes.clone()
    }

    pub fn selected(&self) -> Option<String> {
        let state = self.state();
        state.selected.map(|i| state.heroes[i].name.clone())
    }

    /// Writes the roster crop of hero `index` to `dir` as a reference card.
    pub fn save_card(&self, index: usize, dir: &Path) -> PathBuf {
        let hero = self.state().heroes[index].clone();
        let (x, y, w, h) = crop_bounds(&hero.card, self.size);
        let path = dir.join(format!("{}.png", hero.name));
        imageops::crop_imm(&self.screen, x, y, w, h)
            .to_image()
            .save(&path)
            .unwrap();
        path
    }

    /// Text an OCR engine would read from a capture of this size on the
    /// currently open settings page.
    fn text_for(&self, width: u32, height: u32) -> Option<String> {
        let regions = self.regions?;
        let state = self.state();
        let hero = &state.heroes[state.selected?];
        let dims = |r: &Rect| {
            let (_, _, w, h) = crop_bounds(r, self.size);
            (w, h)
        };

        if dims(&regions.sensitivity_box) == (width, height) {
            Some(hero.sensitivity.clone())
        } else if dims(&regions.hero_name) == (width, height) {
            Some(hero.name.clone())
        } else {
            None
        }
    }
}

impl InputDriver for FakeDriver {
    fn screen_size(&self) -> Result<ScreenSize> {
        Ok(self.size)
    }

    fn cursor_position(&self) -> Result<Point> {
        Ok(self.state().cursor)
    }

    fn set_cursor_position(&self, p: Point) -> Result<()> {
        self.state().cursor = p;
        Ok(())
    }

    fn move_cursor(&self, target: Point, _duration: Duration, easing: Easing) -> Result<()> {
        let mut state = self.state();
        state.cursor = target;
        state.moves.push((target, easing));
        state.events.push(DriverEvent::Moved(target));
        Ok(())
    }

    fn click(&self) -> Result<()> {
        let mut state = self.state();
        let p = state.cursor;
        state.events.push(DriverEvent::Clicked(p));

        let Some(regions) = self.regions else {
            return Ok(());
        };
        match state.selected {
            Some(i) => {
                if regions.change_hero.contains(p) {
                    state.selected = None;
                    state.editing = None;
                } else if regions.sensitivity_box.contains(p) {
                    state.editing = Some(state.heroes[i].sensitivity.clone());
                }
            }
            None => {
                state.selected = state.heroes.iter().position(|h| h.card.contains(p));
            }
        }
        Ok(())
    }

    fn type_text(&self, text: &str, _interval: Duration) -> Result<()> {
        let mut state = self.state();
        state.events.push(DriverEvent::Typed(text.to_string()));
        if let Some(buffer) = state.editing.as_mut() {
            buffer.push_str(text);
        }
        Ok(())
    }

    fn key_chord(&self, keys: &[Key]) -> Result<()> {
        let mut state = self.state();
        state.events.push(DriverEvent::Chord(keys.to_vec()));

        match keys {
            [Key::Control, Key::Char('a')] if state.editing.is_some() => {
                state.editing = Some(String::new());
            }
            [Key::Enter] => {
                if let (Some(value), Some(i)) = (state.editing.take(), state.selected) {
                    state.heroes[i].sensitivity = value;
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn screenshot(&self, region: Option<Rect>) -> Result<RgbaImage> {
        self.state().events.push(DriverEvent::Captured(region));
        if region.is_some() && !self.capture_delay.is_zero() {
            std::thread::sleep(self.capture_delay);
        }

        Ok(match region {
            None => self.screen.clone(),
            Some(area) => {
                let (x, y, w, h) = crop_bounds(&area, self.size);
                imageops::crop_imm(&self.screen, x, y, w, h).to_image()
            }
        })
    }
}

/// Reads whatever the fake UI shows in the captured region, with the kind of
/// trailing noise Tesseract emits.
pub struct FakeRecognizer {
    driver: Arc<FakeDriver>,
}

impl FakeRecognizer {
    pub fn new(driver: Arc<FakeDriver>) -> Self {
        Self { driver }
    }
}

impl TextRecognizer for FakeRecognizer {
    fn recognize(&self, img: &DynamicImage) -> Result<String> {
        Ok(self
            .driver
            .text_for(img.width(), img.height())
            .map(|text| format!("{}\n\x0c", text))
            .unwrap_or_default())
    }
}

/// Test display size: a quarter of the design resolution on each axis.
pub const SCREEN: ScreenSize = ScreenSize::new(640, 360);

/// Defaults with every delay removed.
pub fn fast_config() -> Config {
    Config {
        typing_interval_ms: 0,
        settle_delay_ms: 0,
        locate_workers: 3,
        ..Config::default()
    }
}

/// Three heroes on a row clear of every UI region at `SCREEN`.
pub fn sample_heroes() -> Vec<FakeHero> {
    vec![
        FakeHero::new(Rect::new(40.0, 220.0, 104.0, 268.0), "Ana", "37.50"),
        FakeHero::new(Rect::new(160.0, 220.0, 224.0, 268.0), "Soldier 76", "12.00"),
        FakeHero::new(Rect::new(280.0, 220.0, 344.0, 268.0), "Widowmaker", "8.25"),
    ]
}
