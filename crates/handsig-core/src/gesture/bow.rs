//! Bow gesture: pinch, pull to charge, release to shoot
//!
//! Pinching index tip and thumb tip together loads the bow. Pulling the
//! pinched index tip to the right charges it, proportional to the
//! horizontal distance from where the pinch started. Releasing after a
//! long enough, strong enough pull shoots; anything else returns to idle.
//!
//! ```text
//!            pinch start            pull > charging
//!   Idle ─────────────────► Loaded ◄───────────────► Charging
//!    ▲                        │                          │
//!    │ release (weak/short)   │      release (strong)    │
//!    ├────────────────────────┴──────────┐  ┌────────────┘
//!    │                                   ▼  ▼
//!    └──────── countdown elapsed ─────── Shot
//! ```
//!
//! All timing is counted in frames.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::BowConfig;
use crate::landmarks::{HandLandmarks, Point2D};

/// Discrete bow phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BowPhase {
    #[default]
    Idle,
    /// Pinch recognized, not yet pulling
    Loaded,
    /// Actively pulling
    Charging,
    /// Released with enough charge; reported for a fixed number of frames
    Shot,
}

impl BowPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loaded => "loaded",
            Self::Charging => "charging",
            Self::Shot => "shot",
        }
    }
}

impl fmt::Display for BowPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-frame input from the bow hand
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchInput {
    pub index_tip: Point2D,
    pub thumb_tip: Point2D,
}

impl PinchInput {
    pub fn from_landmarks(hand: &HandLandmarks) -> Self {
        Self {
            index_tip: hand.index_tip(),
            thumb_tip: hand.thumb_tip(),
        }
    }

    #[inline]
    pub fn pinch_distance(&self) -> f64 {
        self.index_tip.distance(&self.thumb_tip)
    }
}

/// Charge-release state machine
///
/// One instance lives for the whole session. Losing the bow hand does not
/// reset it: a missing hand simply reads as "not pinching", so the release
/// and shot-timeout logic keep running against the previous frame's state.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BowState {
    phase: BowPhase,
    is_pinching_prev: bool,
    consecutive_pinch_frames: u32,
    pull_start_x: Option<f64>,
    charge_strength: f64,
    last_shot_strength: f64,
    shot_countdown: u32,
}

impl BowState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one frame
    ///
    /// `input` is `None` when no bow hand was elected this frame.
    pub fn update(&mut self, input: Option<PinchInput>, config: &BowConfig) -> BowPhase {
        let previous_phase = self.phase;
        let is_pinching = input
            .map(|p| p.pinch_distance() < config.pinch_threshold)
            .unwrap_or(false);
        let index_x = input.map(|p| p.index_tip.x);

        // pinch start
        if let (true, false, Some(x)) = (is_pinching, self.is_pinching_prev, index_x) {
            self.phase = BowPhase::Loaded;
            self.pull_start_x = Some(x);
            self.charge_strength = 0.0;
            self.shot_countdown = 0;
        }

        // charge while held
        if let (true, Some(x), Some(start)) = (is_pinching, index_x, self.pull_start_x) {
            let pull = (x - start).max(0.0);
            self.charge_strength = (pull / config.max_pull).clamp(0.0, 1.0);
            self.phase = if self.charge_strength > config.charging_threshold {
                BowPhase::Charging
            } else {
                BowPhase::Loaded
            };
        }

        // release
        if !is_pinching && self.is_pinching_prev {
            if self.consecutive_pinch_frames >= config.min_pinch_frames
                && self.charge_strength >= config.min_shot_strength
            {
                self.phase = BowPhase::Shot;
                self.last_shot_strength = self.charge_strength;
                self.shot_countdown = config.shot_timer_frames;
                tracing::info!(
                    strength = self.last_shot_strength,
                    pinch_frames = self.consecutive_pinch_frames,
                    "bow shot"
                );
            } else {
                self.phase = BowPhase::Idle;
            }
            self.charge_strength = 0.0;
            self.pull_start_x = None;
        }

        // shot timeout, including the release frame itself
        if self.phase == BowPhase::Shot {
            if self.shot_countdown > 0 {
                self.shot_countdown -= 1;
            } else {
                self.phase = BowPhase::Idle;
            }
        }

        if is_pinching {
            self.consecutive_pinch_frames = self.consecutive_pinch_frames.saturating_add(1);
        } else {
            self.consecutive_pinch_frames = 0;
        }
        self.is_pinching_prev = is_pinching;

        if self.phase != previous_phase {
            tracing::debug!("bow phase {} -> {}", previous_phase, self.phase);
        }
        self.phase
    }

    /// Convenience wrapper taking the elected hand directly
    pub fn update_with_hand(
        &mut self,
        hand: Option<&HandLandmarks>,
        config: &BowConfig,
    ) -> BowPhase {
        self.update(hand.map(PinchInput::from_landmarks), config)
    }

    #[inline]
    pub fn phase(&self) -> BowPhase {
        self.phase
    }

    /// Charge while loading, last release strength while shot, else zero
    pub fn strength(&self) -> f64 {
        match self.phase {
            BowPhase::Idle => 0.0,
            BowPhase::Loaded | BowPhase::Charging => self.charge_strength,
            BowPhase::Shot => self.last_shot_strength,
        }
    }

    #[inline]
    pub fn is_pinching(&self) -> bool {
        self.is_pinching_prev
    }

    #[inline]
    pub fn consecutive_pinch_frames(&self) -> u32 {
        self.consecutive_pinch_frames
    }

    #[inline]
    pub fn pull_start_x(&self) -> Option<f64> {
        self.pull_start_x
    }

    #[inline]
    pub fn charge_strength(&self) -> f64 {
        self.charge_strength
    }

    #[inline]
    pub fn last_shot_strength(&self) -> f64 {
        self.last_shot_strength
    }

    #[inline]
    pub fn shot_countdown(&self) -> u32 {
        self.shot_countdown
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn pinch_at(x: f64) -> Option<PinchInput> {
        Some(PinchInput {
            index_tip: Point2D::new(x, 0.5),
            thumb_tip: Point2D::new(x + 0.02, 0.5),
        })
    }

    fn open_at(x: f64) -> Option<PinchInput> {
        Some(PinchInput {
            index_tip: Point2D::new(x, 0.5),
            thumb_tip: Point2D::new(x + 0.2, 0.5),
        })
    }

    fn run(bow: &mut BowState, inputs: &[Option<PinchInput>], config: &BowConfig) -> Vec<BowPhase> {
        inputs.iter().map(|i| bow.update(*i, config)).collect()
    }

    #[test]
    fn test_starts_idle() {
        let bow = BowState::new();
        assert_eq!(bow.phase(), BowPhase::Idle);
        assert_eq!(bow.strength(), 0.0);
    }

    #[test]
    fn test_pinch_loads() {
        let config = BowConfig::default();
        let mut bow = BowState::new();
        assert_eq!(bow.update(pinch_at(0.4), &config), BowPhase::Loaded);
        assert_eq!(bow.pull_start_x(), Some(0.4));
        assert_eq!(bow.consecutive_pinch_frames(), 1);
        assert!(bow.is_pinching());
    }

    #[test]
    fn test_open_hand_stays_idle() {
        let config = BowConfig::default();
        let mut bow = BowState::new();
        let phases = run(&mut bow, &[open_at(0.4); 5], &config);
        assert!(phases.iter().all(|p| *p == BowPhase::Idle));
    }

    #[test]
    fn test_pull_left_does_not_charge() {
        let config = BowConfig::default();
        let mut bow = BowState::new();
        bow.update(pinch_at(0.5), &config);
        assert_eq!(bow.update(pinch_at(0.3), &config), BowPhase::Loaded);
        assert_eq!(bow.charge_strength(), 0.0);
    }

    #[test]
    fn test_charge_clamped_to_one() {
        let config = BowConfig::default();
        let mut bow = BowState::new();
        bow.update(pinch_at(0.1), &config);
        assert_eq!(bow.update(pinch_at(0.9), &config), BowPhase::Charging);
        assert_eq!(bow.charge_strength(), 1.0);
        assert_eq!(bow.strength(), 1.0);
    }

    #[test]
    fn test_short_pinch_never_shoots() {
        let config = BowConfig::default();
        let mut bow = BowState::new();
        let frames = config.min_pinch_frames as usize - 1;
        let mut inputs: Vec<_> = (0..frames).map(|i| pinch_at(0.3 + 0.1 * i as f64)).collect();
        inputs.push(open_at(0.7));
        let phases = run(&mut bow, &inputs, &config);
        assert_eq!(*phases.last().unwrap(), BowPhase::Idle);
        assert!(!phases.contains(&BowPhase::Shot));
        assert_eq!(bow.last_shot_strength(), 0.0);
    }

    #[test]
    fn test_weak_release_goes_idle() {
        let config = BowConfig::default();
        let mut bow = BowState::new();
        // 0.02 pull -> charge 0.0667, below the 0.10 minimum
        let mut inputs = vec![pinch_at(0.40); 5];
        inputs.push(pinch_at(0.42));
        inputs.push(open_at(0.42));
        let phases = run(&mut bow, &inputs, &config);
        assert_eq!(phases[5], BowPhase::Charging);
        assert_eq!(phases[6], BowPhase::Idle);
        assert_eq!(bow.charge_strength(), 0.0);
        assert_eq!(bow.pull_start_x(), None);
    }

    #[test]
    fn test_min_frames_with_enough_pull_shoots() {
        let config = BowConfig::default();
        let mut bow = BowState::new();
        let pull = config.min_shot_strength * config.max_pull + 0.01;
        let mut inputs = vec![pinch_at(0.4); config.min_pinch_frames as usize - 1];
        inputs.push(pinch_at(0.4 + pull));
        inputs.push(None);
        let phases = run(&mut bow, &inputs, &config);
        assert_eq!(*phases.last().unwrap(), BowPhase::Shot);
        assert_relative_eq!(bow.last_shot_strength(), pull / config.max_pull, epsilon = 1e-9);
        assert_relative_eq!(bow.strength(), bow.last_shot_strength());
    }

    #[test]
    fn test_shot_lasts_timer_frames() {
        let config = BowConfig::default();
        let mut bow = BowState::new();
        let mut inputs = vec![pinch_at(0.4); 5];
        inputs.push(pinch_at(0.55));
        for i in inputs {
            bow.update(i, &config);
        }

        let mut shot_frames = 0;
        let mut phase = bow.update(open_at(0.55), &config);
        while phase == BowPhase::Shot {
            shot_frames += 1;
            assert!(shot_frames <= 100);
            phase = bow.update(open_at(0.55), &config);
        }
        assert_eq!(shot_frames, config.shot_timer_frames);
        assert_eq!(phase, BowPhase::Idle);
        assert_eq!(bow.strength(), 0.0);
    }

    #[test]
    fn test_new_pinch_interrupts_shot() {
        let config = BowConfig::default();
        let mut bow = BowState::new();
        let mut inputs = vec![pinch_at(0.4); 5];
        inputs.push(pinch_at(0.6));
        inputs.push(open_at(0.6));
        inputs.push(open_at(0.6));
        let phases = run(&mut bow, &inputs, &config);
        assert_eq!(*phases.last().unwrap(), BowPhase::Shot);

        assert_eq!(bow.update(pinch_at(0.3), &config), BowPhase::Loaded);
        assert_eq!(bow.shot_countdown(), 0);
        assert_eq!(bow.pull_start_x(), Some(0.3));
    }

    #[test]
    fn test_hand_loss_mid_pull_releases() {
        // Losing the hand reads as "not pinching": the stale pinch state
        // triggers a release rather than a reset.
        let config = BowConfig::default();
        let mut bow = BowState::new();
        let mut inputs = vec![pinch_at(0.40); 5];
        inputs.push(pinch_at(0.55));
        run(&mut bow, &inputs, &config);
        assert_eq!(bow.phase(), BowPhase::Charging);

        assert_eq!(bow.update(None, &config), BowPhase::Shot);
        assert_relative_eq!(bow.last_shot_strength(), 0.5, epsilon = 1e-9);

        // absence keeps the shot countdown running
        for _ in 1..config.shot_timer_frames {
            assert_eq!(bow.update(None, &config), BowPhase::Shot);
        }
        assert_eq!(bow.update(None, &config), BowPhase::Idle);
        // last shot strength survives until the next shot
        assert_relative_eq!(bow.last_shot_strength(), 0.5, epsilon = 1e-9);
    }

    #[test]
    fn test_absence_while_idle_is_noop() {
        let config = BowConfig::default();
        let mut bow = BowState::new();
        for _ in 0..10 {
            assert_eq!(bow.update(None, &config), BowPhase::Idle);
        }
        assert_eq!(bow, BowState::new());
    }

    #[test]
    fn test_reset() {
        let config = BowConfig::default();
        let mut bow = BowState::new();
        bow.update(pinch_at(0.4), &config);
        bow.update(pinch_at(0.6), &config);
        bow.reset();
        assert_eq!(bow, BowState::new());
    }
}
