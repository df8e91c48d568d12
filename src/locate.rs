//! Template matching of hero cards against a roster screenshot.
//!
//! Scores are zero-mean normalized cross-correlation on luma, in [-1.0, 1.0].
//! Window sums over the roster come from integral images so only the
//! correlation term is computed per pixel; rows are scored in parallel.
//! Large rosters are searched coarse-to-fine: a shrunk pass proposes a
//! position and a small full-resolution window around it is scored for real.

use image::imageops::{self, FilterType};
use image::{GrayImage, RgbaImage};
use rayon::prelude::*;
use std::path::Path;

use crate::error::Result;
use crate::geometry::Rect;

/// Best placement of a needle inside a haystack.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Matched area in haystack pixels
    pub rect: Rect,
    pub score: f32,
}

/// Result of searching the roster for one hero card.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LocateOutcome {
    Found(Match),
    /// No placement reached the confidence threshold. `best_score` is `None`
    /// when no placement could be scored at all (needle larger than the
    /// roster, or a flat needle).
    Missed { best_score: Option<f32> },
}

impl LocateOutcome {
    pub fn found(&self) -> Option<&Match> {
        match self {
            LocateOutcome::Found(m) => Some(m),
            LocateOutcome::Missed { .. } => None,
        }
    }
}

/// Summed-area table with a zero row and column in front.
struct Integral {
    width: usize,
    sum: Vec<u64>,
    sum_sq: Vec<u64>,
}

impl Integral {
    fn new(img: &GrayImage) -> Self {
        let (w, h) = (img.width() as usize, img.height() as usize);
        let width = w + 1;
        let mut sum = vec![0u64; width * (h + 1)];
        let mut sum_sq = vec![0u64; width * (h + 1)];
        let raw = img.as_raw();

        for y in 0..h {
            let mut row = 0u64;
            let mut row_sq = 0u64;
            for x in 0..w {
                let v = raw[y * w + x] as u64;
                row += v;
                row_sq += v * v;
                sum[(y + 1) * width + x + 1] = sum[y * width + x + 1] + row;
                sum_sq[(y + 1) * width + x + 1] = sum_sq[y * width + x + 1] + row_sq;
            }
        }

        Self { width, sum, sum_sq }
    }

    /// Sum and sum of squares over `[x, x + w) × [y, y + h)`.
    fn window(&self, x: usize, y: usize, w: usize, h: usize) -> (f64, f64) {
        let at = |table: &[u64], cx: usize, cy: usize| table[cy * self.width + cx];
        let area = |table: &[u64]| {
            (at(table, x + w, y + h) + at(table, x, y)) as f64
                - (at(table, x + w, y) + at(table, x, y + h)) as f64
        };
        (area(&self.sum), area(&self.sum_sq))
    }
}

/// Finds the best-scoring placement of `needle` in `haystack`.
///
/// Returns `None` when the needle does not fit or has no contrast to
/// correlate against.
pub fn best_match(haystack: &GrayImage, needle: &GrayImage) -> Option<Match> {
    let (hw, hh) = (haystack.width() as usize, haystack.height() as usize);
    let (nw, nh) = (needle.width() as usize, needle.height() as usize);
    if nw == 0 || nh == 0 || nw > hw || nh > hh {
        return None;
    }

    let n = (nw * nh) as f64;
    let mean_t = needle.as_raw().iter().map(|&v| v as f64).sum::<f64>() / n;
    let centred: Vec<f64> = needle.as_raw().iter().map(|&v| v as f64 - mean_t).collect();
    let norm_t = centred.iter().map(|d| d * d).sum::<f64>().sqrt();
    if norm_t < 1e-9 {
        return None;
    }

    let integral = Integral::new(haystack);
    let hay = haystack.as_raw();

    let (score, x, y) = (0..=hh - nh)
        .into_par_iter()
        .map(|y| {
            let mut best = (f64::NEG_INFINITY, 0usize, y);
            for x in 0..=hw - nw {
                let (sum_c, sum_sq_c) = integral.window(x, y, nw, nh);
                let var_c = sum_sq_c - sum_c * sum_c / n;
                if var_c <= 1e-9 {
                    // Flat window: no correlation
                    if best.0 < 0.0 {
                        best = (0.0, x, y);
                    }
                    continue;
                }

                // The needle is zero-mean, so the window mean drops out
                let mut cross = 0.0;
                for ty in 0..nh {
                    let row = &hay[(y + ty) * hw + x..(y + ty) * hw + x + nw];
                    let tpl = &centred[ty * nw..(ty + 1) * nw];
                    cross += row
                        .iter()
                        .zip(tpl)
                        .map(|(&c, &t)| c as f64 * t)
                        .sum::<f64>();
                }

                let score = cross / (norm_t * var_c.sqrt());
                if score > best.0 {
                    best = (score, x, y);
                }
            }
            best
        })
        .reduce(
            || (f64::NEG_INFINITY, 0, 0),
            |a, b| if b.0 > a.0 { b } else { a },
        );

    if !score.is_finite() {
        return None;
    }

    Some(Match {
        rect: Rect::new(x as f64, y as f64, (x + nw) as f64, (y + nh) as f64),
        score: score.clamp(-1.0, 1.0) as f32,
    })
}

fn shrink(img: &GrayImage, factor: u32) -> GrayImage {
    imageops::resize(
        img,
        (img.width() / factor).max(1),
        (img.height() / factor).max(1),
        FilterType::Triangle,
    )
}

/// Coarse pixels of slack around a shrunk hit when re-scoring at full size.
const REFINE_MARGIN: u32 = 2;

/// Full-resolution area `(x, y, w, h)` to re-score around a coarse hit at
/// `(left, top)`: the needle footprint plus `margin` on every side, clamped
/// to the haystack. The needle must fit in the haystack.
fn refine_window(
    left: u32,
    top: u32,
    margin: u32,
    needle: (u32, u32),
    haystack: (u32, u32),
) -> (u32, u32, u32, u32) {
    let (nw, nh) = needle;
    let (hw, hh) = haystack;
    let x0 = left.saturating_sub(margin).min(hw - nw);
    let y0 = top.saturating_sub(margin).min(hh - nh);
    let x1 = (left + nw + margin).clamp(x0 + nw, hw);
    let y1 = (top + nh + margin).clamp(y0 + nh, hh);
    (x0, y0, x1 - x0, y1 - y0)
}

/// Searches `haystack` for `needle`, accepting only scores of at least
/// `confidence`.
///
/// With `downscale > 1` the search runs on both images shrunk by that factor
/// and only picks a candidate position. The candidate's neighbourhood is then
/// re-scored at full resolution, and that score is the one compared against
/// `confidence`.
pub fn locate(
    haystack: &RgbaImage,
    needle: &RgbaImage,
    confidence: f32,
    downscale: u32,
) -> LocateOutcome {
    let hay = imageops::grayscale(haystack);
    let tpl = imageops::grayscale(needle);

    let factor = downscale.max(1);
    let coarse = factor > 1
        && tpl.width() >= factor * 4
        && tpl.height() >= factor * 4
        && tpl.width() <= hay.width()
        && tpl.height() <= hay.height();

    let best = if coarse {
        best_match(&shrink(&hay, factor), &shrink(&tpl, factor)).and_then(|m| {
            let (x, y, w, h) = refine_window(
                m.rect.top_left.x as u32 * factor,
                m.rect.top_left.y as u32 * factor,
                REFINE_MARGIN * factor,
                tpl.dimensions(),
                hay.dimensions(),
            );
            let window = imageops::crop_imm(&hay, x, y, w, h).to_image();
            best_match(&window, &tpl).map(|fine| Match {
                rect: Rect::new(
                    fine.rect.top_left.x + x as f64,
                    fine.rect.top_left.y + y as f64,
                    fine.rect.bottom_right.x + x as f64,
                    fine.rect.bottom_right.y + y as f64,
                ),
                score: fine.score,
            })
        })
    } else {
        best_match(&hay, &tpl)
    };

    match best {
        Some(m) if m.score >= confidence => LocateOutcome::Found(m),
        Some(m) => LocateOutcome::Missed {
            best_score: Some(m.score),
        },
        None => LocateOutcome::Missed { best_score: None },
    }
}

/// Loads a reference card image and searches `haystack` for it.
pub fn locate_file(
    haystack: &RgbaImage,
    needle_path: &Path,
    confidence: f32,
    downscale: u32,
) -> Result<LocateOutcome> {
    let needle = image::open(needle_path)?.to_rgba8();
    Ok(locate(haystack, &needle, confidence, downscale))
}
