//! Tween functions mapping linear progress `t` in `[0, 1]` to eased progress.

/// Easing curve for a timed cursor glide.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    InQuad,
    OutQuad,
    InOutQuad,
}

impl Easing {
    /// Curves the final precise move may take, picked at random per move.
    pub const FINAL_MOVE: [Easing; 3] = [Easing::InQuad, Easing::OutQuad, Easing::InOutQuad];

    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::InQuad => t * t,
            Easing::OutQuad => -t * (t - 2.0),
            Easing::InOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = t * 2.0 - 1.0;
                    -0.5 * (u * (u - 2.0) - 1.0)
                }
            }
        }
    }
}
