//! Landmark frame model
//!
//! Typed view of one hand-detector output: points in normalized camera
//! space, the 21 hand joints, per-hand landmark sets and the per-frame
//! collection of detected hands.
//!
//! # Example
//!
//! ```
//! use handsig_core::landmarks::{Handedness, LandmarkFrame, Point2D, RawHand};
//!
//! let right = RawHand::new(Some("Right"), vec![Point2D::new(0.5, 0.5); 21]);
//! let frame = LandmarkFrame::from_detections(vec![right]);
//!
//! assert!(frame.first(Handedness::Right).is_some());
//! assert!(frame.first(Handedness::Left).is_none());
//! ```

mod frame;
mod hand;
mod point;
mod select;

pub use frame::{LandmarkFrame, RawHand};
pub use hand::{Hand, HandJoint, HandLandmarks, Handedness, JOINT_COUNT, REQUIRED_JOINTS};
pub use point::Point2D;
pub use select::{bow_hand, joystick_hand, HandPair, PairSource};
