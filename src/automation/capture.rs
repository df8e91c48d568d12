//! Hero capture pipeline.
//!
//! All reference cards are searched for on one roster screenshot in
//! parallel. Heroes are then visited in the order their searches finish:
//! click the card, read sensitivity and name while the cursor is already
//! travelling to "Change Hero", and only after both finish click back to the
//! roster and keep the record.

use image::RgbaImage;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::pool::WorkerPool;
use super::roster::open_roster;
use super::state::AutomationContext;
use crate::config::Regions;
use crate::error::{Error, Result};
use crate::locate::{LocateOutcome, locate_file};
use crate::ocr::OcrReader;
use crate::store::HeroRecord;

/// Every regular file in `dir`, sorted by path.
pub fn list_hero_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;

    let mut images = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        if path.is_file() {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Reads `(name, sensitivity)` from the open settings page.
///
/// The sensitivity box gets white-text isolation before OCR; the name label
/// reads fine as captured.
pub fn read_hero_data(reader: &OcrReader, regions: &Regions) -> Result<(String, String)> {
    let sensitivity = reader.read_text(&regions.sensitivity_box, true)?;
    let name = reader.read_text(&regions.hero_name, false)?;
    Ok((name, sensitivity))
}

/// Captures every hero whose card can be found on `roster`.
pub fn capture_all(
    ctx: &AutomationContext,
    reader: Arc<OcrReader>,
    roster: Arc<RgbaImage>,
    hero_images: Vec<PathBuf>,
) -> Result<Vec<HeroRecord>> {
    let total = hero_images.len();
    crate::log(&format!("Searching roster for {} hero cards", total));

    let locate_pool = WorkerPool::new("locate", ctx.config.locate_workers);
    let overlap_pool = WorkerPool::new("overlap", ctx.config.overlap_workers);

    let confidence = ctx.config.locate_confidence;
    let downscale = ctx.config.match_downscale;
    let searches = locate_pool.map_completed(hero_images, move |path: PathBuf| {
        // An unreadable card is a per-hero problem, not a pool failure
        let outcome = locate_file(&roster, &path, confidence, downscale);
        Ok((path, outcome))
    })?;

    let mut records = Vec::new();
    for search in searches {
        ctx.check_stop()?;
        let (path, outcome) = search?;

        let found = match outcome {
            Ok(LocateOutcome::Found(m)) => m,
            Ok(LocateOutcome::Missed { best_score }) => {
                crate::log(&format!(
                    "Skipping {}: not on roster (best score {})",
                    path.display(),
                    best_score.map_or("n/a".to_string(), |s| format!("{:.3}", s))
                ));
                continue;
            }
            Err(e) => {
                crate::log(&format!("Skipping {}: {}", path.display(), e));
                continue;
            }
        };

        ctx.controller.click_at(found.rect.center())?;
        let back = ctx.controller.random_point_in(&ctx.regions.change_hero);

        let read = {
            let reader = Arc::clone(&reader);
            let regions = ctx.regions;
            overlap_pool.submit(move || read_hero_data(&reader, &regions))?
        };
        let moved = {
            let controller = Arc::clone(&ctx.controller);
            overlap_pool.submit(move || controller.move_to(back))?
        };

        let read = read.wait();
        let moved = moved.wait();
        let (name, sensitivity) = read?;
        moved?;

        ctx.controller.click_at(back)?;
        crate::log(&format!(
            "Captured {}: sensitivity {} (score {:.3})",
            name, sensitivity, found.score
        ));
        records.push(HeroRecord {
            name,
            sensitivity,
            filepath: path.to_string_lossy().into_owned(),
        });
    }

    crate::log(&format!("Captured {}/{} heroes", records.len(), total));
    Ok(records)
}

/// Opens the roster and captures every hero with a card in `heroes_dir`.
pub fn capture_settings(
    ctx: &AutomationContext,
    reader: Arc<OcrReader>,
    heroes_dir: &Path,
) -> Result<Vec<HeroRecord>> {
    let hero_images = list_hero_images(heroes_dir)?;
    let roster = open_roster(ctx)?;
    capture_all(ctx, reader, roster, hero_images)
}
