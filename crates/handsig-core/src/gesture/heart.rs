//! Two-hand heart pose
//!
//! Index tips touch at the top, thumb tips touch at the bottom, both index
//! fingers curl inward. Stateless: every frame is judged on its own, so the
//! output can flicker near the thresholds.

use serde::{Deserialize, Serialize};

use crate::config::HeartConfig;
use crate::landmarks::{HandLandmarks, HandPair, LandmarkFrame};

/// Per-criterion breakdown of one heart check
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HeartReport {
    pub index_close: bool,
    pub thumbs_close: bool,
    pub left_curve_ok: bool,
    pub right_curve_ok: bool,
    pub thumbs_below: bool,
}

impl HeartReport {
    /// Evaluate every criterion for a left / right pair
    pub fn evaluate(left: &HandLandmarks, right: &HandLandmarks, config: &HeartConfig) -> Self {
        let drift = config.drift_allowance;

        let index_close = left.index_tip().distance(&right.index_tip()) < config.index_dist_max;
        let thumbs_close = left.thumb_tip().distance(&right.thumb_tip()) < config.thumb_dist_max;

        let thumb_mid_y = left.thumb_tip().midpoint(&right.thumb_tip()).y;
        let lowest_index_y = left
            .index_chain()
            .iter()
            .chain(right.index_chain().iter())
            .map(|p| p.y)
            .fold(f64::NEG_INFINITY, f64::max);

        Self {
            index_close,
            thumbs_close,
            left_curve_ok: curve_ok(left, drift),
            right_curve_ok: curve_ok(right, drift),
            thumbs_below: thumb_mid_y > lowest_index_y - drift,
        }
    }

    /// All criteria hold
    #[inline]
    pub fn is_active(&self) -> bool {
        self.index_close
            && self.thumbs_close
            && self.left_curve_ok
            && self.right_curve_ok
            && self.thumbs_below
    }
}

/// Index PIP above the tip, within the drift allowance
#[inline]
fn curve_ok(hand: &HandLandmarks, drift: f64) -> bool {
    hand.index_pip().y < hand.index_tip().y + drift
}

/// Heart check for an explicit pair
#[inline]
pub fn is_heart(left: &HandLandmarks, right: &HandLandmarks, config: &HeartConfig) -> bool {
    HeartReport::evaluate(left, right, config).is_active()
}

/// Heart check for a whole frame
///
/// Returns `None` when no pair of hands could be selected.
pub fn classify_frame(frame: &LandmarkFrame, config: &HeartConfig) -> Option<HeartReport> {
    HandPair::select(frame).map(|pair| HeartReport::evaluate(pair.left, pair.right, config))
}


#[cfg(test)]
mod tests {
    use super::fixtures::{heart_half, with_joint};
    use super::*;
    use crate::landmarks::{Hand, HandJoint, Handedness, Point2D};

    #[test]
    fn test_symmetric_heart() {
        let config = HeartConfig::default();
        let report = HeartReport::evaluate(&heart_half(-1.0), &heart_half(1.0), &config);
        assert!(report.index_close);
        assert!(report.thumbs_close);
        assert!(report.left_curve_ok);
        assert!(report.right_curve_ok);
        assert!(report.thumbs_below);
        assert!(report.is_active());
    }

    #[test]
    fn test_raised_thumb_breaks_heart() {
        let config = HeartConfig::default();
        let left = heart_half(-1.0);
        let right = heart_half(1.0);
        // lowest index-chain joint is the MCP at y = 0.52
        let raised = with_joint(&right, HandJoint::ThumbTip, Point2D::new(0.51, 0.30));
        let report = HeartReport::evaluate(&left, &raised, &config);
        assert!(!report.thumbs_below);
        assert!(!report.is_active());
    }

    #[test]
    fn test_thumbs_below_within_drift() {
        let config = HeartConfig::default();
        // both thumbs slightly above the lowest index joint but inside drift
        let left = with_joint(&heart_half(-1.0), HandJoint::ThumbTip, Point2D::new(0.49, 0.515));
        let right = with_joint(&heart_half(1.0), HandJoint::ThumbTip, Point2D::new(0.51, 0.515));
        assert!(HeartReport::evaluate(&left, &right, &config).thumbs_below);

        let left = with_joint(&left, HandJoint::ThumbTip, Point2D::new(0.49, 0.505));
        let right = with_joint(&right, HandJoint::ThumbTip, Point2D::new(0.51, 0.505));
        assert!(!HeartReport::evaluate(&left, &right, &config).thumbs_below);
    }

    #[test]
    fn test_index_apart() {
        let config = HeartConfig::default();
        let left = with_joint(&heart_half(-1.0), HandJoint::IndexTip, Point2D::new(0.40, 0.48));
        let report = HeartReport::evaluate(&left, &heart_half(1.0), &config);
        assert!(!report.index_close);
        assert!(!report.is_active());
    }

    #[test]
    fn test_straight_index_fails_curve() {
        let config = HeartConfig::default();
        // PIP well below the tip: finger pointing up, not curled
        let right = with_joint(&heart_half(1.0), HandJoint::IndexPip, Point2D::new(0.59, 0.50));
        let report = HeartReport::evaluate(&heart_half(-1.0), &right, &config);
        assert!(report.left_curve_ok);
        assert!(!report.right_curve_ok);
        assert!(!is_heart(&heart_half(-1.0), &right, &config));
    }

    #[test]
    fn test_classify_frame_needs_two_hands() {
        let config = HeartConfig::default();
        let frame: LandmarkFrame = vec![Hand::labeled(Handedness::Left, heart_half(-1.0))]
            .into_iter()
            .collect();
        assert!(classify_frame(&frame, &config).is_none());
    }

    #[test]
    fn test_classify_frame_positional() {
        let config = HeartConfig::default();
        let frame: LandmarkFrame = vec![
            Hand::unlabeled(heart_half(-1.0)),
            Hand::unlabeled(heart_half(1.0)),
        ]
        .into_iter()
        .collect();
        assert!(classify_frame(&frame, &config).unwrap().is_active());
    }
}
