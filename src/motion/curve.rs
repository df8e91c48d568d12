//! Humanlike cursor paths.
//!
//! A path from A to C bends towards a random control point B inside the
//! bounding box of A and C. Two moving points slide along AB and BC in
//! lockstep; each emitted sample lies on the segment joining them, which
//! traces a quadratic-Bézier-like arc. All arithmetic happens in centred
//! cartesian space and samples are converted back to screen space.

use rand::Rng;

use crate::geometry::{Point, ScreenSize, cartesian_to_screen, screen_to_cartesian};

/// Offset applied to the second coordinate of a line whose two points share
/// an x (or y) value, so the slope never divides by zero.
pub const DEGENERATE_NUDGE: f64 = 1.0;

/// Slope and intercept `(a, b)` of the line through two points.
///
/// Equal x (or y) coordinates are nudged apart by `DEGENERATE_NUDGE`.
pub fn line_through(x1: f64, y1: f64, mut x2: f64, mut y2: f64) -> (f64, f64) {
    if x1 == x2 {
        x2 += DEGENERATE_NUDGE;
    }
    if y1 == y2 {
        y2 += DEGENERATE_NUDGE;
    }

    let a = (y1 - y2) / (x1 - x2);
    let b = y1 - a * x1;
    (a, b)
}

/// Picks the control point uniformly inside the box spanned by `a` and `c`.
fn control_point<R: Rng + ?Sized>(a: Point, c: Point, rng: &mut R) -> Point {
    let x = rng.gen_range(a.x.min(c.x)..=a.x.max(c.x));
    let y = rng.gen_range(a.y.min(c.y)..=a.y.max(c.y));
    Point::new(x, y)
}

/// Generates up to `sample_count` screen points from `start` towards `end`.
///
/// A step whose moving points share an x coordinate is skipped rather than
/// treated as an error. The moving points only advance on emitted steps, so
/// once that happens the remaining steps are skipped too and the curve comes
/// back shorter than requested.
pub fn generate_curve<R: Rng + ?Sized>(
    start: Point,
    end: Point,
    sample_count: usize,
    screen: ScreenSize,
    rng: &mut R,
) -> Vec<Point> {
    if sample_count == 0 {
        return Vec::new();
    }

    let a = screen_to_cartesian(start, screen);
    let c = screen_to_cartesian(end, screen);
    let b = control_point(a, c, rng);

    let (a1, b1) = line_through(a.x, a.y, b.x, b.y);
    let (a2, b2) = line_through(b.x, b.y, c.x, c.y);

    let n = sample_count as f64;
    let (mut x1, mut y1) = (a.x, a.y);
    let (mut x2, mut y2) = (b.x, b.y);
    let mut points = Vec::with_capacity(sample_count);

    for i in 0..sample_count {
        if x1 == x2 {
            continue;
        }
        let (slope, intercept) = line_through(x1, y1, x2, y2);
        let x = i as f64 * (x2 - x1) / n + x1;
        let y = slope * x + intercept;
        points.push(cartesian_to_screen(Point::new(x, y), screen));

        x1 += (b.x - a.x) / n;
        y1 = a1 * x1 + b1;
        x2 += (c.x - b.x) / n;
        y2 = a2 * x2 + b2;
    }

    points
}
