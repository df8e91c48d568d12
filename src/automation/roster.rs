use image::RgbaImage;
use std::sync::Arc;

use super::state::AutomationContext;
use crate::error::Result;

/// Walks Options → Controls → Change Hero and screenshots the hero roster.
///
/// The cursor is parked on `safe_edge` first so no card is drawn
/// highlighted, then the UI gets `settle_delay_ms` to finish animating.
pub fn open_roster(ctx: &AutomationContext) -> Result<Arc<RgbaImage>> {
    let regions = &ctx.regions;

    crate::log("Opening hero roster");
    ctx.controller.click_in_area(&regions.options_button)?;
    ctx.controller.click_in_area(&regions.controls_button)?;
    ctx.controller.click_in_area(&regions.change_hero)?;
    ctx.controller.move_to(regions.safe_edge)?;

    std::thread::sleep(ctx.settle_delay());

    let roster = ctx.driver().screenshot(None)?;
    crate::log(&format!(
        "Roster captured ({}x{})",
        roster.width(),
        roster.height()
    ));
    Ok(Arc::new(roster))
}
