//! Settings replay pipeline.

use std::path::Path;

use super::roster::open_roster;
use super::state::AutomationContext;
use crate::error::Result;
use crate::locate::{LocateOutcome, locate_file};
use crate::store::HeroRecord;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub applied: usize,
    pub skipped: usize,
}

/// Types each record's sensitivity into its hero's settings page.
///
/// Runs on the caller's thread, one hero at a time. Heroes whose card cannot
/// be found on the roster are skipped.
pub fn replay(ctx: &AutomationContext, records: &[HeroRecord]) -> Result<ReplaySummary> {
    let roster = open_roster(ctx)?;
    let regions = &ctx.regions;
    let mut summary = ReplaySummary::default();

    for record in records {
        ctx.check_stop()?;

        let card = Path::new(&record.filepath);
        let found = match locate_file(
            &roster,
            card,
            ctx.config.locate_confidence,
            ctx.config.match_downscale,
        ) {
            Ok(LocateOutcome::Found(m)) => m,
            Ok(LocateOutcome::Missed { .. }) => {
                crate::log(&format!("Skipping {}: not on roster", record.name));
                summary.skipped += 1;
                continue;
            }
            Err(e) => {
                crate::log(&format!("Skipping {}: {}", record.name, e));
                summary.skipped += 1;
                continue;
            }
        };

        ctx.controller.click_at(found.rect.center())?;
        ctx.controller.click_at(regions.sensitivity_box.center())?;
        ctx.controller.select_all()?;
        ctx.controller
            .type_text(&record.sensitivity, ctx.typing_interval())?;
        ctx.controller.press_enter()?;
        ctx.controller.click_in_area(&regions.change_hero)?;

        crate::log(&format!(
            "Applied {}: sensitivity {}",
            record.name, record.sensitivity
        ));
        summary.applied += 1;
    }

    crate::log(&format!(
        "Replay finished: {} applied, {} skipped",
        summary.applied, summary.skipped
    ));
    Ok(summary)
}
