//! Tunable gesture thresholds
//!
//! Defaults match the values the gestures were tuned with on a 320x240
//! webcam at roughly 30 fps. Frame-counted timings scale with frame rate.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::landmarks::HandJoint;
use crate::{Error, Result};

/// Pinch / charge / release thresholds for the bow hand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BowConfig {
    /// Index-tip to thumb-tip distance below which the hand is pinching
    pub pinch_threshold: f64,
    /// Horizontal pull distance giving full charge
    pub max_pull: f64,
    /// Consecutive pinch frames needed before a release can shoot
    pub min_pinch_frames: u32,
    /// Releases weaker than this go back to idle without shooting
    pub min_shot_strength: f64,
    /// Charge above which the phase reads `Charging` instead of `Loaded`
    pub charging_threshold: f64,
    /// Frames the `Shot` phase is reported after a release
    pub shot_timer_frames: u32,
}

impl Default for BowConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.05,
            max_pull: 0.30,
            min_pinch_frames: 5,
            min_shot_strength: 0.10,
            charging_threshold: 0.05,
            shot_timer_frames: 30,
        }
    }
}

impl BowConfig {
    pub fn with_pinch_threshold(mut self, threshold: f64) -> Self {
        self.pinch_threshold = threshold;
        self
    }

    pub fn with_max_pull(mut self, max_pull: f64) -> Self {
        self.max_pull = max_pull;
        self
    }

    pub fn with_min_pinch_frames(mut self, frames: u32) -> Self {
        self.min_pinch_frames = frames;
        self
    }

    pub fn with_min_shot_strength(mut self, strength: f64) -> Self {
        self.min_shot_strength = strength;
        self
    }

    pub fn with_shot_timer_frames(mut self, frames: u32) -> Self {
        self.shot_timer_frames = frames;
        self
    }

    pub fn validate(&self) -> Result<()> {
        positive("bow.pinch_threshold", self.pinch_threshold)?;
        positive("bow.max_pull", self.max_pull)?;
        unit_interval("bow.min_shot_strength", self.min_shot_strength)?;
        unit_interval("bow.charging_threshold", self.charging_threshold)?;
        Ok(())
    }
}

/// Joystick filter tuning for the left hand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoystickConfig {
    /// Joint whose movement drives the vector
    pub joint: HandJoint,
    /// Impulse added per unit of smoothed joint movement
    pub sensitivity: f64,
    /// Maximum vector magnitude
    pub max_magnitude: f64,
    /// Carry-over factor of the joint low-pass filter, in [0, 1)
    pub smoothing: f64,
    /// Per-axis movement below this is treated as jitter
    pub deadzone: f64,
    /// Fraction of the previous vector kept each frame, in [0, 1]
    pub momentum: f64,
}

impl Default for JoystickConfig {
    fn default() -> Self {
        Self {
            joint: HandJoint::IndexMcp,
            sensitivity: 1.5,
            max_magnitude: 0.04,
            smoothing: 0.6,
            deadzone: 0.004,
            momentum: 0.75,
        }
    }
}

impl JoystickConfig {
    pub fn with_joint(mut self, joint: HandJoint) -> Self {
        self.joint = joint;
        self
    }

    pub fn with_sensitivity(mut self, sensitivity: f64) -> Self {
        self.sensitivity = sensitivity;
        self
    }

    pub fn with_max_magnitude(mut self, max_magnitude: f64) -> Self {
        self.max_magnitude = max_magnitude;
        self
    }

    pub fn with_smoothing(mut self, smoothing: f64) -> Self {
        self.smoothing = smoothing;
        self
    }

    pub fn with_deadzone(mut self, deadzone: f64) -> Self {
        self.deadzone = deadzone;
        self
    }

    pub fn with_momentum(mut self, momentum: f64) -> Self {
        self.momentum = momentum;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !self.joint.is_required() {
            return Err(Error::Config(format!(
                "joystick.joint must be one of wrist..index_tip, got {}",
                self.joint
            )));
        }
        finite("joystick.sensitivity", self.sensitivity)?;
        positive("joystick.max_magnitude", self.max_magnitude)?;
        if !(0.0..1.0).contains(&self.smoothing) {
            return Err(Error::Config(format!(
                "joystick.smoothing must be in [0, 1), got {}",
                self.smoothing
            )));
        }
        non_negative("joystick.deadzone", self.deadzone)?;
        unit_interval("joystick.momentum", self.momentum)?;
        Ok(())
    }
}

/// Two-hand heart pose thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeartConfig {
    /// Maximum distance between the two index tips
    pub index_dist_max: f64,
    /// Maximum distance between the two thumb tips
    pub thumb_dist_max: f64,
    /// Vertical slack for the curl and thumbs-below checks
    pub drift_allowance: f64,
}

impl Default for HeartConfig {
    fn default() -> Self {
        Self {
            index_dist_max: 0.05,
            thumb_dist_max: 0.05,
            drift_allowance: 0.01,
        }
    }
}

impl HeartConfig {
    pub fn with_index_dist_max(mut self, dist: f64) -> Self {
        self.index_dist_max = dist;
        self
    }

    pub fn with_thumb_dist_max(mut self, dist: f64) -> Self {
        self.thumb_dist_max = dist;
        self
    }

    pub fn with_drift_allowance(mut self, drift: f64) -> Self {
        self.drift_allowance = drift;
        self
    }

    pub fn validate(&self) -> Result<()> {
        positive("heart.index_dist_max", self.index_dist_max)?;
        positive("heart.thumb_dist_max", self.thumb_dist_max)?;
        non_negative("heart.drift_allowance", self.drift_allowance)?;
        Ok(())
    }
}

/// Complete gesture configuration
///
/// # Example
/// ```
/// use handsig_core::config::{GestureConfig, JoystickConfig};
///
/// let config = GestureConfig::default()
///     .with_joystick(JoystickConfig::default().with_momentum(0.9));
/// assert!(config.validate().is_ok());
///
/// let json = config.to_json_string().unwrap();
/// let back = GestureConfig::from_json_str(&json).unwrap();
/// assert_eq!(back, config);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    pub bow: BowConfig,
    pub joystick: JoystickConfig,
    pub heart: HeartConfig,
}

impl GestureConfig {
    pub fn with_bow(mut self, bow: BowConfig) -> Self {
        self.bow = bow;
        self
    }

    pub fn with_joystick(mut self, joystick: JoystickConfig) -> Self {
        self.joystick = joystick;
        self
    }

    pub fn with_heart(mut self, heart: HeartConfig) -> Self {
        self.heart = heart;
        self
    }

    /// Check every parameter range
    pub fn validate(&self) -> Result<()> {
        self.bow.validate()?;
        self.joystick.validate()?;
        self.heart.validate()
    }

    /// Parse and validate a JSON config; missing fields take defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&content)?;
        tracing::debug!("loaded gesture config from {}", path.display());
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::Config(format!("{name} must be finite, got {value}")))
    }
}

fn positive(name: &str, value: f64) -> Result<()> {
    finite(name, value)?;
    if value > 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!("{name} must be > 0, got {value}")))
    }
}

fn non_negative(name: &str, value: f64) -> Result<()> {
    finite(name, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(Error::Config(format!("{name} must be >= 0, got {value}")))
    }
}

fn unit_interval(name: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::Config(format!("{name} must be in [0, 1], got {value}")))
    }
}
