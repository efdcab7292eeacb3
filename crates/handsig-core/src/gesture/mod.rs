//! Gesture interpretation
//!
//! Three independent signals, each with its own state (or none):
//!
//! - [`JoystickState`] - smoothed joint movement into a momentum vector
//! - [`BowState`] - pinch / charge / release state machine
//! - [`HeartReport`] - stateless two-hand pose check
//!
//! All state structs are plain values owned by the caller and advanced
//! once per frame, so several independent instances can run side by side.

mod bow;
mod heart;
mod joystick;

pub use bow::{BowPhase, BowState, PinchInput};
pub use heart::{classify_frame, is_heart, HeartReport};
pub use joystick::{JoystickState, MotionVector};

#[cfg(test)]
pub(crate) use heart::fixtures;
