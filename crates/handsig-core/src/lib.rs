//! handsig-core: real-time control signals from hand landmarks
//!
//! Turns a per-frame stream of 2-D hand landmarks (as produced by a
//! MediaPipe-style hand detector) into three independent control signals:
//!
//! - a smoothed, momentum-carrying joystick vector driven by the left hand,
//! - a pinch / charge / release "bow" gesture driven by the right hand,
//! - a two-hand "heart" pose event.
//!
//! # Modules
//!
//! - [`landmarks`] - Points, joints, hands and per-frame detector output
//! - [`math`] - Smoothing filters and small vector helpers
//! - [`gesture`] - Joystick engine, bow state machine, heart classifier
//! - [`control`] - Frame orchestrator and the threaded frame loop
//! - [`comm`] - Frame queue and line-oriented output writer
//! - [`config`] - Tunable thresholds
//!
//! # Architecture
//!
//! ```text
//! detector (camera)                      handsig-core
//! ┌──────────────┐                    ┌──────────────────┐
//! │  hand model  │──LandmarkFrame────►│ FrameOrchestrator│───SignalOutput──► app
//! └──────────────┘                    └──────────────────┘
//! ```
//!
//! Camera capture and the detector itself live outside this crate.
//! `process_frame` does not allocate, and all gesture timing is counted in
//! frames, not seconds.

#![warn(unused_must_use)]

pub mod comm;
pub mod config;
pub mod control;
pub mod gesture;
pub mod landmarks;
pub mod math;

// Re-exports for convenience
pub use comm::{frame_queue, FrameConsumer, FrameProducer, SignalWriter};
pub use config::{BowConfig, GestureConfig, HeartConfig, JoystickConfig};
pub use control::{FrameLoop, FrameLoopConfig, FrameLoopHandle, FrameOrchestrator, SignalOutput};
pub use gesture::{BowPhase, BowState, HeartReport, JoystickState};
pub use landmarks::{Hand, HandJoint, HandLandmarks, Handedness, LandmarkFrame, Point2D, RawHand};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Error types for handsig-core
///
/// The per-frame path never fails: missing hands and missing labels are
/// ordinary inputs. Errors come from malformed detector output, bad
/// configuration, I/O on the output stream and the frame queue.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors must be handled or explicitly ignored with let _ = ..."]
#[non_exhaustive]
pub enum Error {
    /// Detector output does not expose the joints the core reads.
    /// Handle by: dropping the hand for this frame.
    #[error("Invalid landmarks: {0}")]
    InvalidLandmarks(String),

    /// Invalid configuration parameter.
    /// Handle by: validating config before use, checking parameter ranges.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to encode or decode JSON.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Writing to the output stream failed.
    #[error("I/O error: {0}")]
    Io(String),

    /// Frame queue was closed (all producers or the consumer dropped).
    #[error("Channel closed")]
    ChannelClosed,

    /// Operation attempted in invalid state (e.g., the frame loop thread panicked).
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

/// Result type alias for handsig-core operations
pub type Result<T> = std::result::Result<T, Error>;
