//! Joystick motion vector
//!
//! The left hand's tracked joint is smoothed by a [`JointFilter`]; each
//! frame's smoothed movement is an impulse into a vector with momentum,
//! clamped to a maximum magnitude. When the hand leaves the frame the
//! vector relaxes geometrically instead of snapping to zero.

use crate::config::JoystickConfig;
use crate::landmarks::Point2D;
use crate::math::{clamp_magnitude, JointFilter, Vector2};

/// Momentum-carrying 2-D vector with bounded magnitude
///
/// A first-order IIR filter: `v = v * momentum + delta * sensitivity`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionVector {
    vector: Vector2,
}

impl MotionVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one frame of movement
    pub fn update(
        &mut self,
        delta: Vector2,
        sensitivity: f64,
        momentum: f64,
        max_magnitude: f64,
    ) -> Vector2 {
        self.vector = clamp_magnitude(self.vector * momentum + delta * sensitivity, max_magnitude);
        self.vector
    }

    /// Momentum-only step for frames without the source hand
    pub fn decay(&mut self, momentum: f64, max_magnitude: f64) -> Vector2 {
        self.vector = clamp_magnitude(self.vector * momentum, max_magnitude);
        self.vector
    }

    #[inline]
    pub fn value(&self) -> Vector2 {
        self.vector
    }

    #[inline]
    pub fn magnitude(&self) -> f64 {
        self.vector.norm()
    }

    pub fn reset(&mut self) {
        self.vector = Vector2::zeros();
    }
}

/// Process-lifetime joystick state: joint filter plus motion vector
#[derive(Debug, Clone, Default)]
pub struct JoystickState {
    filter: JointFilter,
    motion: MotionVector,
}

impl JoystickState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame
    ///
    /// `joint` is the tracked joint of the joystick hand, or `None` when the
    /// hand is absent. Absence resets the joint filter and decays the vector.
    pub fn update(&mut self, joint: Option<Point2D>, config: &JoystickConfig) -> Vector2 {
        match joint {
            Some(raw) => {
                let sample = self.filter.update(raw, config.smoothing, config.deadzone);
                self.motion.update(
                    sample.delta,
                    config.sensitivity,
                    config.momentum,
                    config.max_magnitude,
                )
            }
            None => {
                self.filter.reset();
                self.motion.decay(config.momentum, config.max_magnitude)
            }
        }
    }

    /// Current `(vx, vy)`
    #[inline]
    pub fn vector(&self) -> Vector2 {
        self.motion.value()
    }

    /// Last smoothed joint position, `None` while the hand is absent
    #[inline]
    pub fn previous_smoothed_position(&self) -> Option<Point2D> {
        self.filter.previous()
    }

    /// Forget the tracked joint position but keep the vector
    pub fn reset_filter(&mut self) {
        self.filter.reset();
    }

    pub fn reset(&mut self) {
        self.filter.reset();
        self.motion.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_impulse_and_momentum() {
        let mut mv = MotionVector::new();
        let v = mv.update(Vector2::new(0.01, 0.0), 1.5, 0.75, 0.04);
        assert_relative_eq!(v.x, 0.015, epsilon = 1e-12);
        let v = mv.update(Vector2::new(0.01, 0.0), 1.5, 0.75, 0.04);
        assert_relative_eq!(v.x, 0.015 * 0.75 + 0.015, epsilon = 1e-12);
    }

    #[test]
    fn test_geometric_decay() {
        let mut mv = MotionVector::new();
        mv.update(Vector2::new(0.01, -0.01), 1.5, 0.75, 0.04);
        let start = mv.magnitude();
        for n in 1..=8 {
            mv.decay(0.75, 0.04);
            assert_relative_eq!(mv.magnitude(), start * 0.75f64.powi(n), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_zero_impulse_decays_like_absence() {
        let mut a = MotionVector::new();
        let mut b = MotionVector::new();
        a.update(Vector2::new(0.02, 0.01), 1.5, 0.75, 0.04);
        b.update(Vector2::new(0.02, 0.01), 1.5, 0.75, 0.04);
        for _ in 0..5 {
            a.update(Vector2::zeros(), 1.5, 0.75, 0.04);
            b.decay(0.75, 0.04);
        }
        assert_relative_eq!(a.value(), b.value(), epsilon = 1e-15);
    }

    #[test]
    fn test_magnitude_never_exceeds_max() {
        let mut mv = MotionVector::new();
        let deltas = [
            Vector2::new(0.5, 0.5),
            Vector2::new(-0.3, 0.9),
            Vector2::new(0.0, -1.0),
            Vector2::new(0.02, 0.02),
            Vector2::new(1e3, -1e3),
        ];
        for d in deltas.iter().cycle().take(50) {
            let v = mv.update(*d, 1.5, 0.75, 0.04);
            assert!(v.norm() <= 0.04 + 1e-12, "magnitude {}", v.norm());
        }
    }

    #[test]
    fn test_clamp_preserves_direction() {
        let mut mv = MotionVector::new();
        let v = mv.update(Vector2::new(0.3, 0.4), 1.0, 0.0, 0.04);
        assert_relative_eq!(v.norm(), 0.04, epsilon = 1e-12);
        assert_relative_eq!(v.x / v.y, 0.75, epsilon = 1e-9);
    }

    #[test]
    fn test_state_absence_resets_filter() {
        let config = JoystickConfig::default();
        let mut js = JoystickState::new();
        js.update(Some(Point2D::new(0.5, 0.5)), &config);
        js.update(Some(Point2D::new(0.55, 0.5)), &config);
        assert!(js.previous_smoothed_position().is_some());
        let before = js.vector();
        assert!(before.x > 0.0);

        let after = js.update(None, &config);
        assert!(js.previous_smoothed_position().is_none());
        assert_relative_eq!(after.x, before.x * config.momentum, epsilon = 1e-12);

        // re-seeding after absence gives no impulse
        let v = js.update(Some(Point2D::new(0.9, 0.9)), &config);
        assert_relative_eq!(v.x, after.x * config.momentum, epsilon = 1e-12);
    }

    #[test]
    fn test_reset() {
        let config = JoystickConfig::default();
        let mut js = JoystickState::new();
        js.update(Some(Point2D::new(0.5, 0.5)), &config);
        js.update(Some(Point2D::new(0.6, 0.6)), &config);
        js.reset();
        assert_eq!(js.vector(), Vector2::zeros());
        assert!(js.previous_smoothed_position().is_none());
    }
}
