//! Scalar interpolation.

use crate::easing::Easing;
use crate::transition::Tween;

/// Blend `from` toward `to` by the eased fraction `v`.
///
/// The distance is always measured as a positive span and applied in the
/// direction of travel, so decreasing animations move downward by the same
/// eased amount an increasing one moves upward.
pub fn blend(from: f64, to: f64, v: f64) -> f64 {
    if from > to {
        from - v * (from - to)
    } else {
        from + v * (to - from)
    }
}

impl Tween for f64 {
    fn tween(from: &Self, to: &Self, t: f64, easing: &Easing) -> Self {
        if t >= 1.0 {
            return *to;
        }
        blend(*from, *to, easing.apply(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::easing::EasingFunction;

    const EPSILON: f64 = 0.0001;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn test_blend_both_directions() {
        assert!(approx_eq(blend(0.0, 100.0, 0.25), 25.0));
        assert!(approx_eq(blend(100.0, 0.0, 0.25), 75.0));
        assert!(approx_eq(blend(-10.0, 10.0, 0.5), 0.0));
        assert_eq!(blend(3.0, 3.0, 0.7), 3.0);
    }

    #[test]
    fn test_tween_arrives_exactly() {
        let easing = Easing::from(EasingFunction::EaseOutQuart);
        assert_eq!(f64::tween(&0.1, &0.3, 1.0, &easing), 0.3);
        assert_eq!(f64::tween(&0.1, &0.3, 1.7, &easing), 0.3);
    }

    #[test]
    fn test_tween_applies_easing() {
        let linear = Easing::from(EasingFunction::Linear);
        let quad = Easing::from(EasingFunction::EaseInQuad);
        assert!(approx_eq(f64::tween(&0.0, &100.0, 0.5, &linear), 50.0));
        assert!(approx_eq(f64::tween(&0.0, &100.0, 0.5, &quad), 25.0));
        assert!(approx_eq(f64::tween(&100.0, &0.0, 0.5, &quad), 75.0));
    }

    #[test]
    fn test_tween_overshoot_is_not_clamped() {
        let back = Easing::from(EasingFunction::EaseInBack);
        assert!(f64::tween(&0.0, &100.0, 0.2, &back) < 0.0);
    }
}
