//! Hand election for each signal
//!
//! Single-hand signals use a labeled lookup only. The two-hand pose check
//! falls back to detector order when labels are missing or incomplete.

use super::{HandLandmarks, Handedness, LandmarkFrame};

/// Which tier produced a [`HandPair`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairSource {
    /// First `Left` and first `Right` labeled hands
    Labeled,
    /// First two detected hands, in detector order
    Positional,
}

/// A left / right hand pair for two-hand checks
#[derive(Debug, Clone, Copy)]
pub struct HandPair<'a> {
    pub left: &'a HandLandmarks,
    pub right: &'a HandLandmarks,
    pub source: PairSource,
}

impl<'a> HandPair<'a> {
    /// Two-tier selection: labeled lookup, then positional fallback
    pub fn select(frame: &'a LandmarkFrame) -> Option<Self> {
        if let (Some(left), Some(right)) = (
            frame.first(Handedness::Left),
            frame.first(Handedness::Right),
        ) {
            return Some(Self {
                left,
                right,
                source: PairSource::Labeled,
            });
        }

        match frame.hands() {
            [first, second, ..] => Some(Self {
                left: &first.landmarks,
                right: &second.landmarks,
                source: PairSource::Positional,
            }),
            _ => None,
        }
    }
}

/// Hand driving the bow gesture: first labeled `Right`
#[inline]
pub fn bow_hand(frame: &LandmarkFrame) -> Option<&HandLandmarks> {
    frame.first(Handedness::Right)
}

/// Hand driving the joystick: first labeled `Left`
#[inline]
pub fn joystick_hand(frame: &LandmarkFrame) -> Option<&HandLandmarks> {
    frame.first(Handedness::Left)
}
