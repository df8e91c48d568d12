//! Screen geometry helpers.
//!
//! Screen space has its origin at the top-left of the primary display with y
//! growing downwards. Cartesian space is centred on the display with y
//! growing upwards; curve construction works there.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// A screen-space pixel coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Rounds to whole pixels, the unit every OS cursor call takes.
    pub fn to_pixel(self) -> (i32, i32) {
        (self.x.round() as i32, self.y.round() as i32)
    }
}

/// Dimensions of the primary display in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// A rectangle given by two corners.
///
/// Corner ordering is not enforced; `width`/`height` go negative when the
/// corners are swapped.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top_left: Point,
    pub bottom_right: Point,
}

impl Rect {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            top_left: Point::new(left, top),
            bottom_right: Point::new(right, bottom),
        }
    }

    pub fn width(&self) -> f64 {
        self.bottom_right.x - self.top_left.x
    }

    pub fn height(&self) -> f64 {
        self.bottom_right.y - self.top_left.y
    }

    /// Decomposes into `(left, top, width, height)`.
    pub fn left_top_width_height(&self) -> (f64, f64, f64, f64) {
        (self.top_left.x, self.top_left.y, self.width(), self.height())
    }

    /// Centre with floor-divided half extents, matching whole-pixel boxes.
    pub fn center(&self) -> Point {
        let (left, top, width, height) = self.left_top_width_height();
        Point::new(left + (width / 2.0).floor(), top + (height / 2.0).floor())
    }

    pub fn contains(&self, p: Point) -> bool {
        let (min_x, max_x) = ordered(self.top_left.x, self.bottom_right.x);
        let (min_y, max_y) = ordered(self.top_left.y, self.bottom_right.y);
        p.x >= min_x && p.x <= max_x && p.y >= min_y && p.y <= max_y
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b { (a, b) } else { (b, a) }
}

/// Converts a screen coordinate into centred cartesian space.
pub fn screen_to_cartesian(p: Point, screen: ScreenSize) -> Point {
    let half_w = screen.width as f64 / 2.0;
    let half_h = screen.height as f64 / 2.0;
    Point::new(p.x - half_w, -(p.y - half_h))
}

/// Converts a centred cartesian coordinate back into screen space.
pub fn cartesian_to_screen(p: Point, screen: ScreenSize) -> Point {
    let half_w = screen.width as f64 / 2.0;
    let half_h = screen.height as f64 / 2.0;
    Point::new(p.x + half_w, -p.y + half_h)
}

pub fn distance(a: Point, b: Point) -> f64 {
    ((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
}

/// Picks a whole-pixel point inside `area`, both corners inclusive.
pub fn random_point_in<R: Rng + ?Sized>(area: &Rect, rng: &mut R) -> Point {
    let (min_x, max_x) = ordered(area.top_left.x.round(), area.bottom_right.x.round());
    let (min_y, max_y) = ordered(area.top_left.y.round(), area.bottom_right.y.round());
    let x = rng.gen_range(min_x as i64..=max_x as i64);
    let y = rng.gen_range(min_y as i64..=max_y as i64);
    Point::new(x as f64, y as f64)
}

/// Linear mapping from the resolution the regions were tuned on to the
/// display actually in use.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Scaler {
    pub x_factor: f64,
    pub y_factor: f64,
}

impl Scaler {
    pub fn new(design: ScreenSize, actual: ScreenSize) -> Self {
        Self {
            x_factor: actual.width as f64 / design.width.max(1) as f64,
            y_factor: actual.height as f64 / design.height.max(1) as f64,
        }
    }

    pub fn scale_point(&self, p: Point) -> Point {
        Point::new((p.x * self.x_factor).round(), (p.y * self.y_factor).round())
    }

    pub fn scale_rect(&self, r: &Rect) -> Rect {
        Rect {
            top_left: self.scale_point(r.top_left),
            bottom_right: self.scale_point(r.bottom_right),
        }
    }
}
