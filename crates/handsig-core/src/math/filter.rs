//! Smoothing filters for tracked joints
//!
//! Detector landmarks jitter by a few thousandths of the frame from one
//! frame to the next. These filters trade a little lag for a stable signal.

use serde::{Deserialize, Serialize};

use super::{apply_deadzone, Vector2};
use crate::landmarks::Point2D;

/// Trait for scalar digital filters
pub trait Filter: Send + Sync {
    /// Update the filter with a new value and return the filtered output
    fn update(&mut self, value: f64) -> f64;

    /// Reset the filter state
    fn reset(&mut self);

    /// Get the current filtered value without updating
    fn value(&self) -> f64;
}

/// First-order low-pass filter (exponential moving average)
///
/// The first sample passes through unchanged; afterwards
/// `value = alpha * sample + (1 - alpha) * value`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LowPassFilter {
    /// Weight of the newest sample (0-1). Lower = more smoothing.
    alpha: f64,
    /// Current filtered value
    value: f64,
    /// Whether the filter has seen a sample since the last reset
    initialized: bool,
}

impl LowPassFilter {
    /// Create a new low-pass filter with the given alpha coefficient
    ///
    /// # Panics
    /// Panics if alpha is not in range [0, 1]
    pub fn new(alpha: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&alpha),
            "Alpha must be between 0 and 1"
        );
        Self {
            alpha,
            value: 0.0,
            initialized: false,
        }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Set the alpha coefficient, clamped to [0, 1]
    pub fn set_alpha(&mut self, alpha: f64) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    /// Whether a sample has been seen since the last reset
    #[inline]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl Filter for LowPassFilter {
    fn update(&mut self, value: f64) -> f64 {
        if !self.initialized {
            self.value = value;
            self.initialized = true;
        } else {
            self.value = self.alpha * value + (1.0 - self.alpha) * self.value;
        }
        self.value
    }

    fn reset(&mut self) {
        self.value = 0.0;
        self.initialized = false;
    }

    fn value(&self) -> f64 {
        self.value
    }
}

impl Default for LowPassFilter {
    fn default() -> Self {
        Self::new(0.4)
    }
}

/// Output of one [`JointFilter`] step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointSample {
    /// Smoothed joint position
    pub smoothed: Point2D,
    /// Movement of the smoothed position since the last frame, after deadzone
    pub delta: Vector2,
}

/// Exponential smoothing plus jitter deadzone for one tracked joint
///
/// Holds only the previous smoothed position. It never decays on its own:
/// when the joint is not observed the caller must [`reset`](Self::reset) it,
/// and the next observation re-seeds it with a zero delta.
#[derive(Debug, Clone, Default)]
pub struct JointFilter {
    x: LowPassFilter,
    y: LowPassFilter,
}

impl JointFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Previous smoothed position, `None` until seeded
    pub fn previous(&self) -> Option<Point2D> {
        if self.x.is_initialized() && self.y.is_initialized() {
            Some(Point2D::new(self.x.value(), self.y.value()))
        } else {
            None
        }
    }

    /// Advance one frame
    ///
    /// `smoothing` is the carry-over factor α in [0, 1):
    /// `smoothed = previous * α + raw * (1 - α)`. Each axis of the delta
    /// whose magnitude is below `deadzone` is snapped to exactly zero.
    pub fn update(&mut self, raw: Point2D, smoothing: f64, deadzone: f64) -> JointSample {
        let weight = 1.0 - smoothing.clamp(0.0, 1.0);
        self.x.set_alpha(weight);
        self.y.set_alpha(weight);

        let previous = self.previous();
        let smoothed = Point2D::new(self.x.update(raw.x), self.y.update(raw.y));

        let delta = match previous {
            Some(prev) => apply_deadzone(smoothed.offset_from(&prev), deadzone),
            None => Vector2::zeros(),
        };

        JointSample { smoothed, delta }
    }

    /// Forget the tracked position
    pub fn reset(&mut self) {
        self.x.reset();
        self.y.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_low_pass_initialization() {
        let mut lpf = LowPassFilter::new(0.5);
        assert_relative_eq!(lpf.update(10.0), 10.0); // First value passes through
    }

    #[test]
    fn test_low_pass_smoothing() {
        let mut lpf = LowPassFilter::new(0.1);
        lpf.update(0.0);
        let val = lpf.update(10.0);
        assert!(val > 0.0 && val < 10.0);
    }

    #[test]
    fn test_filter_reset() {
        let mut lpf = LowPassFilter::new(0.5);
        lpf.update(10.0);
        lpf.update(10.0);
        lpf.reset();
        assert!(!lpf.is_initialized());
        assert_relative_eq!(lpf.value(), 0.0);
    }

    #[test]
    fn test_joint_filter_seeds_with_zero_delta() {
        let mut jf = JointFilter::new();
        assert!(jf.previous().is_none());

        let sample = jf.update(Point2D::new(0.3, 0.7), 0.6, 0.004);
        assert_eq!(sample.smoothed, Point2D::new(0.3, 0.7));
        assert_eq!(sample.delta, Vector2::zeros());
        assert_eq!(jf.previous(), Some(Point2D::new(0.3, 0.7)));
    }

    #[test]
    fn test_joint_filter_stationary_input() {
        let mut jf = JointFilter::new();
        let p = Point2D::new(0.42, 0.58);
        jf.update(p, 0.6, 0.004);
        for _ in 0..20 {
            let sample = jf.update(p, 0.6, 0.004);
            assert_eq!(sample.delta, Vector2::zeros());
        }
    }

    #[test]
    fn test_joint_filter_step_converges() {
        let alpha = 0.6;
        let mut jf = JointFilter::new();
        jf.update(Point2D::new(0.0, 0.0), alpha, 0.0);

        let target = 1.0;
        let mut gap = target;
        for n in 1..=10 {
            let sample = jf.update(Point2D::new(target, 0.0), alpha, 0.0);
            let new_gap = target - sample.smoothed.x;
            assert!(new_gap < gap, "not monotonic at frame {}", n);
            assert_relative_eq!(new_gap, alpha.powi(n), epsilon = 1e-9);
            assert_relative_eq!(sample.delta.x, gap - new_gap, epsilon = 1e-9);
            gap = new_gap;
        }
    }

    #[test]
    fn test_joint_filter_deadzone_per_axis() {
        let mut jf = JointFilter::new();
        jf.update(Point2D::new(0.5, 0.5), 0.6, 0.004);
        // x moves 0.02 raw -> 0.008 smoothed (kept); y moves 0.005 -> 0.002 (snapped)
        let sample = jf.update(Point2D::new(0.52, 0.505), 0.6, 0.004);
        assert_relative_eq!(sample.delta.x, 0.008, epsilon = 1e-9);
        assert_eq!(sample.delta.y, 0.0);
        // the smoothed position still advances on the snapped axis
        assert_relative_eq!(sample.smoothed.y, 0.502, epsilon = 1e-9);
    }

    #[test]
    fn test_joint_filter_reset() {
        let mut jf = JointFilter::new();
        jf.update(Point2D::new(0.1, 0.1), 0.6, 0.004);
        jf.reset();
        assert!(jf.previous().is_none());
        let sample = jf.update(Point2D::new(0.9, 0.9), 0.6, 0.004);
        assert_eq!(sample.delta, Vector2::zeros());
        assert_eq!(sample.smoothed, Point2D::new(0.9, 0.9));
    }
}
