//! Configuration types for capture and replay.
//!
//! Loads settings from config.json at startup. Provides the fixed screen
//! regions of the settings UI, match/OCR thresholds, pool sizes and timing
//! parameters. Regions are given at the design resolution and scaled to the
//! actual display by `Config::regions_for`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::geometry::{Point, Rect, Scaler, ScreenSize};

/// Named regions of the game's settings UI, in screen pixels.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Regions {
    /// Sensitivity input box on a hero's settings page
    pub sensitivity_box: Rect,
    /// Hero name label on a hero's settings page
    pub hero_name: Rect,
    /// "Change Hero" button; also returns to the roster
    pub change_hero: Rect,
    /// "Options" entry in the escape menu
    pub options_button: Rect,
    /// "Controls" tab in the options screen
    pub controls_button: Rect,
    /// Point where the cursor highlights no hero card
    pub safe_edge: Point,
}

impl Default for Regions {
    fn default() -> Self {
        Self {
            sensitivity_box: Rect::new(1595.0, 280.0, 1695.0, 310.0),
            hero_name: Rect::new(2170.0, 555.0, 2485.0, 600.0),
            change_hero: Rect::new(2165.0, 625.0, 2490.0, 680.0),
            options_button: Rect::new(1170.0, 700.0, 1750.0, 765.0),
            controls_button: Rect::new(425.0, 85.0, 600.0, 125.0),
            safe_edge: Point::new(2350.0, 580.0),
        }
    }
}

impl Regions {
    fn scaled(&self, scaler: &Scaler) -> Self {
        Self {
            sensitivity_box: scaler.scale_rect(&self.sensitivity_box),
            hero_name: scaler.scale_rect(&self.hero_name),
            change_hero: scaler.scale_rect(&self.change_hero),
            options_button: scaler.scale_rect(&self.options_button),
            controls_button: scaler.scale_rect(&self.controls_button),
            safe_edge: scaler.scale_point(self.safe_edge),
        }
    }
}

/// Complete capture/replay configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Fixed UI regions at `design_resolution`
    #[serde(default)]
    pub regions: Regions,
    /// Resolution the regions were measured on
    #[serde(default = "default_design_resolution")]
    pub design_resolution: ScreenSize,
    /// Scale every region linearly to the actual display
    #[serde(default = "default_scale_regions")]
    pub scale_regions: bool,
    /// Minimum template-match score for a hero card (0.0-1.0)
    #[serde(default = "default_locate_confidence")]
    pub locate_confidence: f32,
    /// Shrink factor for the coarse card search (1 = full resolution only).
    /// Hits are always re-scored at full resolution before the threshold.
    #[serde(default = "default_match_downscale")]
    pub match_downscale: u32,
    /// Concurrent card searches during capture
    #[serde(default = "default_locate_workers")]
    pub locate_workers: usize,
    /// Concurrent tasks per hero during capture (OCR read + cursor return)
    #[serde(default = "default_overlap_workers")]
    pub overlap_workers: usize,
    /// Delay between typed characters during replay (milliseconds)
    #[serde(default = "default_typing_interval_ms")]
    pub typing_interval_ms: u64,
    /// Wait after opening the roster before the screenshot (milliseconds)
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Directory of hero reference card images
    #[serde(default)]
    pub heroes_dir: Option<PathBuf>,
    /// Tesseract page segmentation mode
    #[serde(default = "default_tesseract_psm")]
    pub tesseract_psm: u8,
}

fn default_design_resolution() -> ScreenSize {
    ScreenSize::new(2560, 1440)
}

fn default_scale_regions() -> bool {
    true
}

fn default_locate_confidence() -> f32 {
    0.6
}

fn default_match_downscale() -> u32 {
    2
}

fn default_locate_workers() -> usize {
    5
}

fn default_overlap_workers() -> usize {
    2
}

fn default_typing_interval_ms() -> u64 {
    250
}

fn default_settle_delay_ms() -> u64 {
    1000
}

fn default_tesseract_psm() -> u8 {
    7 // Single text line: both OCR regions hold one line
}

impl Default for Config {
    fn default() -> Self {
        Self {
            regions: Regions::default(),
            design_resolution: default_design_resolution(),
            scale_regions: default_scale_regions(),
            locate_confidence: default_locate_confidence(),
            match_downscale: default_match_downscale(),
            locate_workers: default_locate_workers(),
            overlap_workers: default_overlap_workers(),
            typing_interval_ms: default_typing_interval_ms(),
            settle_delay_ms: default_settle_delay_ms(),
            heroes_dir: None,
            tesseract_psm: default_tesseract_psm(),
        }
    }
}

impl Config {
    /// Regions mapped onto a display of the given size.
    pub fn regions_for(&self, actual: ScreenSize) -> Regions {
        if !self.scale_regions {
            return self.regions;
        }
        self.regions
            .scaled(&Scaler::new(self.design_resolution, actual))
    }

    pub fn heroes_dir(&self) -> PathBuf {
        self.heroes_dir
            .clone()
            .unwrap_or_else(crate::paths::get_heroes_dir)
    }
}

/// Loads configuration from `path` or returns defaults.
///
/// A missing or unparsable file is not fatal: the problem is logged and the
/// built-in defaults are used.
pub fn load_config(path: &Path) -> Config {
    crate::log(&format!("Looking for config at: {}", path.display()));

    if path.exists() {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    crate::log("Config loaded from config.json");
                    return config;
                }
                Err(e) => {
                    crate::log(&format!(
                        "Failed to parse config.json: {}. Using defaults.",
                        e
                    ));
                }
            },
            Err(e) => {
                crate::log(&format!(
                    "Failed to read config.json: {}. Using defaults.",
                    e
                ));
            }
        }
    } else {
        crate::log("config.json not found. Using default config.");
    }

    Config::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "locate_confidence": 0.8, "typing_interval_ms": 0 }"#).unwrap();

        let config = load_config(&path);
        assert_eq!(config.locate_confidence, 0.8);
        assert_eq!(config.typing_interval_ms, 0);
        assert_eq!(config.locate_workers, 5);
        assert_eq!(config.overlap_workers, 2);
        assert_eq!(config.regions, Regions::default());
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        let config = load_config(&path);
        assert_eq!(config.locate_confidence, 0.6);
    }

    #[test]
    fn test_missing_config_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.json"));
        assert_eq!(config.typing_interval_ms, 250);
        assert_eq!(config.design_resolution, ScreenSize::new(2560, 1440));
    }

    #[test]
    fn test_regions_scale_to_actual_display() {
        let config = Config::default();
        let regions = config.regions_for(ScreenSize::new(1280, 720));
        assert_eq!(regions.safe_edge, Point::new(1175.0, 290.0));
        assert_eq!(regions.controls_button, Rect::new(213.0, 43.0, 300.0, 63.0));
    }

    #[test]
    fn test_regions_unscaled_when_disabled() {
        let config = Config {
            scale_regions: false,
            ..Config::default()
        };
        assert_eq!(config.regions_for(ScreenSize::new(1280, 720)), config.regions);
    }
}
