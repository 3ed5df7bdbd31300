//! Easing functions for transition timing.
//!
//! This module provides the named easing table (the classic Penner curves, see
//! <https://easings.net/>) and the [`Easing`] handle a transition stores:
//! either a named table entry or a user-supplied curve.
//!
//! Curves map linear progress `t` in `[0, 1]` to eased progress. Back and
//! elastic curves intentionally leave `[0, 1]` in between; nothing here clamps
//! or validates the output.
//!
//! # Usage
//!
//! ```
//! use glide_tween::easing::{Easing, EasingFunction};
//!
//! let quart = EasingFunction::EaseOutQuart;
//! let progress = quart.evaluate(0.5);
//! assert!(progress > 0.9);
//!
//! let named = Easing::named("easeInOutSine").unwrap();
//! let custom = Easing::custom(|t| t * t);
//! assert_eq!(custom.apply(0.5), 0.25);
//! assert_eq!(named.apply(0.0), 0.0);
//! ```

use std::f64::consts::PI;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TweenError;

/// Named easing curve from the built-in table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EasingFunction {
    Linear,
    EaseInSine,
    EaseOutSine,
    EaseInOutSine,
    EaseInQuad,
    EaseOutQuad,
    EaseInOutQuad,
    EaseInCubic,
    EaseOutCubic,
    EaseInOutCubic,
    EaseInQuart,
    EaseOutQuart,
    EaseInOutQuart,
    EaseInQuint,
    EaseOutQuint,
    EaseInOutQuint,
    EaseInExpo,
    EaseOutExpo,
    EaseInOutExpo,
    EaseInCirc,
    EaseOutCirc,
    EaseInOutCirc,
    /// Overshoots below 0 before accelerating.
    EaseInBack,
    /// Overshoots past 1 before settling.
    EaseOutBack,
    EaseInOutBack,
    EaseInBounce,
    EaseOutBounce,
    EaseInOutBounce,
    EaseInElastic,
    EaseOutElastic,
    EaseInOutElastic,
}

impl Default for EasingFunction {
    fn default() -> Self {
        Self::EaseOutQuart
    }
}

/// Overshoot amount used by the back curves.
const BACK_OVERSHOOT: f64 = 1.70158;

/// Period used by the elastic curves.
const ELASTIC_PERIOD: f64 = 0.4;

impl EasingFunction {
    /// Every entry of the table, in declaration order.
    pub const ALL: [EasingFunction; 31] = [
        Self::Linear,
        Self::EaseInSine,
        Self::EaseOutSine,
        Self::EaseInOutSine,
        Self::EaseInQuad,
        Self::EaseOutQuad,
        Self::EaseInOutQuad,
        Self::EaseInCubic,
        Self::EaseOutCubic,
        Self::EaseInOutCubic,
        Self::EaseInQuart,
        Self::EaseOutQuart,
        Self::EaseInOutQuart,
        Self::EaseInQuint,
        Self::EaseOutQuint,
        Self::EaseInOutQuint,
        Self::EaseInExpo,
        Self::EaseOutExpo,
        Self::EaseInOutExpo,
        Self::EaseInCirc,
        Self::EaseOutCirc,
        Self::EaseInOutCirc,
        Self::EaseInBack,
        Self::EaseOutBack,
        Self::EaseInOutBack,
        Self::EaseInBounce,
        Self::EaseOutBounce,
        Self::EaseInOutBounce,
        Self::EaseInElastic,
        Self::EaseOutElastic,
        Self::EaseInOutElastic,
    ];

    /// Table name of this curve (e.g. `"easeOutQuart"`).
    pub fn name(&self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::EaseInSine => "easeInSine",
            Self::EaseOutSine => "easeOutSine",
            Self::EaseInOutSine => "easeInOutSine",
            Self::EaseInQuad => "easeInQuad",
            Self::EaseOutQuad => "easeOutQuad",
            Self::EaseInOutQuad => "easeInOutQuad",
            Self::EaseInCubic => "easeInCubic",
            Self::EaseOutCubic => "easeOutCubic",
            Self::EaseInOutCubic => "easeInOutCubic",
            Self::EaseInQuart => "easeInQuart",
            Self::EaseOutQuart => "easeOutQuart",
            Self::EaseInOutQuart => "easeInOutQuart",
            Self::EaseInQuint => "easeInQuint",
            Self::EaseOutQuint => "easeOutQuint",
            Self::EaseInOutQuint => "easeInOutQuint",
            Self::EaseInExpo => "easeInExpo",
            Self::EaseOutExpo => "easeOutExpo",
            Self::EaseInOutExpo => "easeInOutExpo",
            Self::EaseInCirc => "easeInCirc",
            Self::EaseOutCirc => "easeOutCirc",
            Self::EaseInOutCirc => "easeInOutCirc",
            Self::EaseInBack => "easeInBack",
            Self::EaseOutBack => "easeOutBack",
            Self::EaseInOutBack => "easeInOutBack",
            Self::EaseInBounce => "easeInBounce",
            Self::EaseOutBounce => "easeOutBounce",
            Self::EaseInOutBounce => "easeInOutBounce",
            Self::EaseInElastic => "easeInElastic",
            Self::EaseOutElastic => "easeOutElastic",
            Self::EaseInOutElastic => "easeInOutElastic",
        }
    }

    /// Evaluate the easing function at the given progress.
    ///
    /// # Arguments
    /// * `t` - Progress value, nominally from 0.0 to 1.0 (not clamped)
    ///
    /// # Returns
    /// Eased progress value (may leave 0.0-1.0 for back and elastic curves)
    pub fn evaluate(&self, t: f64) -> f64 {
        match self {
            Self::Linear => t,
            Self::EaseInSine => 1.0 - (t * PI / 2.0).cos(),
            Self::EaseOutSine => (t * PI / 2.0).sin(),
            Self::EaseInOutSine => 0.5 * (1.0 - (PI * t).cos()),
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => t * (2.0 - t),
            Self::EaseInOutQuad => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t * t
                } else {
                    let t = t - 1.0;
                    -0.5 * (t * (t - 2.0) - 1.0)
                }
            }
            Self::EaseInCubic => t * t * t,
            Self::EaseOutCubic => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
            Self::EaseInOutCubic => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t * t * t
                } else {
                    let t = t - 2.0;
                    0.5 * (t * t * t + 2.0)
                }
            }
            Self::EaseInQuart => t.powi(4),
            Self::EaseOutQuart => 1.0 - (t - 1.0).powi(4),
            Self::EaseInOutQuart => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t.powi(4)
                } else {
                    -0.5 * ((t - 2.0).powi(4) - 2.0)
                }
            }
            Self::EaseInQuint => t.powi(5),
            Self::EaseOutQuint => (t - 1.0).powi(5) + 1.0,
            Self::EaseInOutQuint => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t.powi(5)
                } else {
                    0.5 * ((t - 2.0).powi(5) + 2.0)
                }
            }
            Self::EaseInExpo => {
                if t == 0.0 {
                    0.0
                } else {
                    1024f64.powf(t - 1.0)
                }
            }
            Self::EaseOutExpo => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2f64.powf(-10.0 * t)
                }
            }
            Self::EaseInOutExpo => {
                if t == 0.0 {
                    return 0.0;
                }
                if t == 1.0 {
                    return 1.0;
                }
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * 1024f64.powf(t - 1.0)
                } else {
                    0.5 * (2.0 - 2f64.powf(-10.0 * (t - 1.0)))
                }
            }
            Self::EaseInCirc => 1.0 - (1.0 - t * t).sqrt(),
            Self::EaseOutCirc => {
                let t = t - 1.0;
                (1.0 - t * t).sqrt()
            }
            Self::EaseInOutCirc => {
                let t = t * 2.0;
                if t < 1.0 {
                    -0.5 * ((1.0 - t * t).sqrt() - 1.0)
                } else {
                    let t = t - 2.0;
                    0.5 * ((1.0 - t * t).sqrt() + 1.0)
                }
            }
            Self::EaseInBack => {
                let s = BACK_OVERSHOOT;
                t * t * ((s + 1.0) * t - s)
            }
            Self::EaseOutBack => {
                let s = BACK_OVERSHOOT;
                let t = t - 1.0;
                t * t * ((s + 1.0) * t + s) + 1.0
            }
            Self::EaseInOutBack => {
                let s = BACK_OVERSHOOT * 1.525;
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * (t * t * ((s + 1.0) * t - s))
                } else {
                    let t = t - 2.0;
                    0.5 * (t * t * ((s + 1.0) * t + s) + 2.0)
                }
            }
            Self::EaseInBounce => 1.0 - bounce_out(1.0 - t),
            Self::EaseOutBounce => bounce_out(t),
            Self::EaseInOutBounce => {
                if t < 0.5 {
                    (1.0 - bounce_out(1.0 - t * 2.0)) * 0.5
                } else {
                    bounce_out(t * 2.0 - 1.0) * 0.5 + 0.5
                }
            }
            Self::EaseInElastic => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let t = t - 1.0;
                -(2f64.powf(10.0 * t) * elastic_wave(t))
            }
            Self::EaseOutElastic => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                2f64.powf(-10.0 * t) * elastic_wave(t) + 1.0
            }
            Self::EaseInOutElastic => {
                if t == 0.0 || t == 1.0 {
                    return t;
                }
                let t = t * 2.0 - 1.0;
                if t < 0.0 {
                    -0.5 * (2f64.powf(10.0 * t) * elastic_wave(t))
                } else {
                    2f64.powf(-10.0 * t) * elastic_wave(t) * 0.5 + 1.0
                }
            }
        }
    }
}

/// Piecewise parabolic bounce shared by the bounce curves.
fn bounce_out(t: f64) -> f64 {
    const N: f64 = 7.5625;
    const D: f64 = 2.75;

    if t < 1.0 / D {
        N * t * t
    } else if t < 2.0 / D {
        let t = t - 1.5 / D;
        N * t * t + 0.75
    } else if t < 2.5 / D {
        let t = t - 2.25 / D;
        N * t * t + 0.9375
    } else {
        let t = t - 2.625 / D;
        N * t * t + 0.984375
    }
}

/// Sine carrier of the elastic curves (amplitude 1, period [`ELASTIC_PERIOD`]).
#[inline]
fn elastic_wave(t: f64) -> f64 {
    let s = ELASTIC_PERIOD / 4.0;
    ((t - s) * (2.0 * PI) / ELASTIC_PERIOD).sin()
}

impl fmt::Display for EasingFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EasingFunction {
    type Err = TweenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|easing| easing.name() == s)
            .ok_or_else(|| TweenError::UnknownEasing(s.to_string()))
    }
}

/// Easing curve held by a transition.
///
/// Two easings are equal when they name the same table entry, or when they
/// share the same custom function allocation. Changing a transition's easing
/// to an equal one is a no-op.
#[derive(Clone)]
pub enum Easing {
    /// Built-in table entry.
    Named(EasingFunction),
    /// Caller-supplied curve.
    Custom(Rc<dyn Fn(f64) -> f64>),
}

impl Easing {
    /// Look up a table entry by name.
    pub fn named(name: &str) -> Result<Self, TweenError> {
        name.parse::<EasingFunction>().map(Self::Named)
    }

    /// Wrap a custom curve.
    pub fn custom(curve: impl Fn(f64) -> f64 + 'static) -> Self {
        Self::Custom(Rc::new(curve))
    }

    /// Evaluate the curve at `t`.
    #[inline]
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Self::Named(function) => function.evaluate(t),
            Self::Custom(curve) => curve(t),
        }
    }
}

impl Default for Easing {
    fn default() -> Self {
        Self::Named(EasingFunction::default())
    }
}

impl From<EasingFunction> for Easing {
    fn from(function: EasingFunction) -> Self {
        Self::Named(function)
    }
}

impl PartialEq for Easing {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Named(a), Self::Named(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Easing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(function) => write!(f, "Easing({})", function),
            Self::Custom(_) => f.write_str("Easing(custom)"),
        }
    }
}
