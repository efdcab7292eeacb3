//! Per-frame orchestration of the three gesture signals
//!
//! The orchestrator owns all per-signal state and advances it in a fixed
//! order for every frame: bow, joystick, heart. Both the bow machine and the
//! joystick filter are frame-order sensitive, so frames must be fed in
//! capture order from a single thread.

use serde::{Deserialize, Serialize};

use crate::config::GestureConfig;
use crate::gesture::{classify_frame, BowPhase, BowState, HeartReport, JoystickState};
use crate::landmarks::{bow_hand, joystick_hand, LandmarkFrame};
use crate::Result;

/// Combined output for one frame
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalOutput {
    /// Joystick x component, in [-max_magnitude, max_magnitude]
    pub vx: f64,
    /// Joystick y component, in [-max_magnitude, max_magnitude]
    pub vy: f64,
    pub bow_phase: BowPhase,
    /// Charge while loading / charging, release strength while shot
    pub strength: f64,
    /// Heart pose held this frame
    pub heart_active: bool,
}

impl SignalOutput {
    #[inline]
    pub fn vector(&self) -> (f64, f64) {
        (self.vx, self.vy)
    }
}

/// Drives the joystick, bow and heart signals from landmark frames
///
/// # Example
/// ```
/// use handsig_core::control::FrameOrchestrator;
/// use handsig_core::gesture::BowPhase;
/// use handsig_core::landmarks::LandmarkFrame;
///
/// let mut orchestrator = FrameOrchestrator::default();
/// let output = orchestrator.process_frame(&LandmarkFrame::new());
///
/// assert_eq!(output.vector(), (0.0, 0.0));
/// assert_eq!(output.bow_phase, BowPhase::Idle);
/// assert!(!output.heart_active);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FrameOrchestrator {
    config: GestureConfig,
    bow: BowState,
    joystick: JoystickState,
    heart: Option<HeartReport>,
    frames_processed: u64,
}

impl FrameOrchestrator {
    /// Create an orchestrator at rest with a validated config
    pub fn new(config: GestureConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            ..Default::default()
        })
    }

    /// Process one frame
    pub fn process_frame(&mut self, frame: &LandmarkFrame) -> SignalOutput {
        // (a) bow: first Right-labeled hand, or no input
        let phase = self.bow.update_with_hand(bow_hand(frame), &self.config.bow);

        // (b) joystick: tracked joint of the first Left-labeled hand
        let joint = joystick_hand(frame).and_then(|hand| hand.get(self.config.joystick.joint));
        let vector = self.joystick.update(joint, &self.config.joystick);

        // (c) heart: labeled pair, else first two hands
        let heart = classify_frame(frame, &self.config.heart);
        let heart_active = heart.is_some_and(|r| r.is_active());
        let was_active = self.heart.is_some_and(|r| r.is_active());
        if heart_active != was_active {
            tracing::debug!(report = ?heart, "heart {}", if heart_active { "on" } else { "off" });
        }
        self.heart = heart;

        self.frames_processed += 1;

        let output = SignalOutput {
            vx: vector.x,
            vy: vector.y,
            bow_phase: phase,
            strength: self.bow.strength(),
            heart_active,
        };
        tracing::trace!(frame = self.frames_processed, ?output, "processed frame");
        output
    }

    /// Return every signal to its startup state
    pub fn reset(&mut self) {
        self.bow.reset();
        self.joystick.reset();
        self.heart = None;
        self.frames_processed = 0;
    }

    /// Replace the configuration; state is kept
    ///
    /// Switching the joystick joint re-seeds the joint filter so the jump
    /// between joints does not register as movement.
    pub fn set_config(&mut self, config: GestureConfig) -> Result<()> {
        config.validate()?;
        if config.joystick.joint != self.config.joystick.joint {
            self.joystick.reset_filter();
        }
        self.config = config;
        Ok(())
    }

    #[inline]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    #[inline]
    pub fn bow_state(&self) -> &BowState {
        &self.bow
    }

    #[inline]
    pub fn joystick(&self) -> &JoystickState {
        &self.joystick
    }

    /// Heart criteria from the last frame, `None` if no pair was found
    #[inline]
    pub fn last_heart_report(&self) -> Option<HeartReport> {
        self.heart
    }

    #[inline]
    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }
}
