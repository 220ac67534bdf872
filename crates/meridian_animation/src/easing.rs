//! Easing functions
//!
//! An easing maps the linear time ratio of a transition to the progress
//! ratio handed to the interpolator. Every built-in curve is monotonic with
//! `apply(0) == 0` and `apply(1) == 1`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Easing curve applied to transition progress
#[derive(Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Easing {
    /// Identity
    #[default]
    Linear,
    /// Quadratic ease in
    EaseIn,
    /// Quadratic ease out
    EaseOut,
    /// Quadratic ease in-out
    EaseInOut,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    /// CSS-style cubic bezier with control points (x1, y1) and (x2, y2)
    ///
    /// `x1` and `x2` must lie in `[0, 1]`; `y1`/`y2` outside that range
    /// overshoot and break monotonicity.
    CubicBezier(f64, f64, f64, f64),
    /// Caller supplied curve
    #[serde(skip)]
    Custom(fn(f64) -> f64),
}

impl Easing {
    /// Map a time ratio to an eased progress ratio
    ///
    /// `t` is clamped to `[0, 1]` first.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match *self {
            Easing::Linear => t,
            Easing::EaseIn => t * t,
            Easing::EaseOut => t * (2.0 - t),
            Easing::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Easing::EaseInCubic => t * t * t,
            Easing::EaseOutCubic => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
            Easing::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = 2.0 * t - 2.0;
                    0.5 * u * u * u + 1.0
                }
            }
            Easing::CubicBezier(x1, y1, x2, y2) => cubic_bezier(x1, y1, x2, y2, t),
            Easing::Custom(f) => f(t),
        }
    }

    pub fn is_linear(&self) -> bool {
        matches!(self, Easing::Linear)
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Easing::Linear => f.write_str("Linear"),
            Easing::EaseIn => f.write_str("EaseIn"),
            Easing::EaseOut => f.write_str("EaseOut"),
            Easing::EaseInOut => f.write_str("EaseInOut"),
            Easing::EaseInCubic => f.write_str("EaseInCubic"),
            Easing::EaseOutCubic => f.write_str("EaseOutCubic"),
            Easing::EaseInOutCubic => f.write_str("EaseInOutCubic"),
            Easing::CubicBezier(x1, y1, x2, y2) => f
                .debug_tuple("CubicBezier")
                .field(x1)
                .field(y1)
                .field(x2)
                .field(y2)
                .finish(),
            Easing::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

// ============================================================================
// Cubic Bezier
// ============================================================================

const NEWTON_ITERATIONS: usize = 8;
const NEWTON_EPSILON: f64 = 1e-7;
const BISECTION_ITERATIONS: usize = 32;

fn bezier_component(a1: f64, a2: f64, s: f64) -> f64 {
    // B(s) for a curve from 0 to 1 with control values a1, a2
    let inv = 1.0 - s;
    3.0 * inv * inv * s * a1 + 3.0 * inv * s * s * a2 + s * s * s
}

fn bezier_slope(a1: f64, a2: f64, s: f64) -> f64 {
    let inv = 1.0 - s;
    3.0 * inv * inv * a1 + 6.0 * inv * s * (a2 - a1) + 3.0 * s * s * (1.0 - a2)
}

fn cubic_bezier(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    if t <= 0.0 {
        return 0.0;
    }
    if t >= 1.0 {
        return 1.0;
    }

    // Solve x(s) = t for the curve parameter s
    let mut s = t;
    for _ in 0..NEWTON_ITERATIONS {
        let err = bezier_component(x1, x2, s) - t;
        if err.abs() < NEWTON_EPSILON {
            return bezier_component(y1, y2, s);
        }
        let slope = bezier_slope(x1, x2, s);
        if slope.abs() < NEWTON_EPSILON {
            break;
        }
        s -= err / slope;
    }

    // Newton stalled on a flat segment, fall back to bisection
    let (mut lo, mut hi) = (0.0, 1.0);
    s = t;
    for _ in 0..BISECTION_ITERATIONS {
        let x = bezier_component(x1, x2, s);
        if (x - t).abs() < NEWTON_EPSILON {
            break;
        }
        if x < t {
            lo = s;
        } else {
            hi = s;
        }
        s = (lo + hi) * 0.5;
    }
    bezier_component(y1, y2, s)
}
