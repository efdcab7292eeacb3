//! Hand joints, handedness and per-hand landmark sets

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Point2D;
use crate::{Error, Result};

/// Number of joints the detector emits per hand
pub const JOINT_COUNT: usize = 21;

/// Joints the core actually reads: wrist through index tip
pub const REQUIRED_JOINTS: usize = HandJoint::IndexTip.index() + 1;

/// The 21 hand joints in detector emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandJoint {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandJoint {
    /// The index finger chain, base to tip
    pub const INDEX_CHAIN: [HandJoint; 4] = [
        HandJoint::IndexMcp,
        HandJoint::IndexPip,
        HandJoint::IndexDip,
        HandJoint::IndexTip,
    ];

    /// Every joint in emission order
    pub const ALL: [HandJoint; JOINT_COUNT] = [
        HandJoint::Wrist,
        HandJoint::ThumbCmc,
        HandJoint::ThumbMcp,
        HandJoint::ThumbIp,
        HandJoint::ThumbTip,
        HandJoint::IndexMcp,
        HandJoint::IndexPip,
        HandJoint::IndexDip,
        HandJoint::IndexTip,
        HandJoint::MiddleMcp,
        HandJoint::MiddlePip,
        HandJoint::MiddleDip,
        HandJoint::MiddleTip,
        HandJoint::RingMcp,
        HandJoint::RingPip,
        HandJoint::RingDip,
        HandJoint::RingTip,
        HandJoint::PinkyMcp,
        HandJoint::PinkyPip,
        HandJoint::PinkyDip,
        HandJoint::PinkyTip,
    ];

    /// Position of this joint in the detector output
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether every valid [`HandLandmarks`] carries this joint
    #[inline]
    pub const fn is_required(self) -> bool {
        self.index() < REQUIRED_JOINTS
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbCmc => "thumb_cmc",
            Self::ThumbMcp => "thumb_mcp",
            Self::ThumbIp => "thumb_ip",
            Self::ThumbTip => "thumb_tip",
            Self::IndexMcp => "index_mcp",
            Self::IndexPip => "index_pip",
            Self::IndexDip => "index_dip",
            Self::IndexTip => "index_tip",
            Self::MiddleMcp => "middle_mcp",
            Self::MiddlePip => "middle_pip",
            Self::MiddleDip => "middle_dip",
            Self::MiddleTip => "middle_tip",
            Self::RingMcp => "ring_mcp",
            Self::RingPip => "ring_pip",
            Self::RingDip => "ring_dip",
            Self::RingTip => "ring_tip",
            Self::PinkyMcp => "pinky_mcp",
            Self::PinkyPip => "pinky_pip",
            Self::PinkyDip => "pinky_dip",
            Self::PinkyTip => "pinky_tip",
        }
    }
}

impl fmt::Display for HandJoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HandJoint {
    type Err = Error;

    /// Parse the snake_case joint name, e.g. `"index_mcp"`
    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|joint| joint.as_str() == name)
            .ok_or_else(|| Error::InvalidLandmarks(format!("unknown hand joint: {s:?}")))
    }
}

/// Detector-assigned hand label, as seen by the (mirrored) camera
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
        }
    }

    /// Lenient label parsing; anything unrecognized counts as unlabeled
    pub fn from_label(label: &str) -> Option<Self> {
        label.parse().ok()
    }
}

impl FromStr for Handedness {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::Left),
            "right" => Ok(Self::Right),
            other => Err(Error::InvalidLandmarks(format!(
                "unknown handedness label: {other:?}"
            ))),
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered joints of one detected hand
///
/// Always holds at least [`REQUIRED_JOINTS`] points, so the accessors for
/// the wrist, thumb tip and index chain never fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Point2D>", into = "Vec<Point2D>")]
pub struct HandLandmarks {
    points: ArrayVec<Point2D, JOINT_COUNT>,
}

impl HandLandmarks {
    /// Build from detector points in emission order
    ///
    /// Fails when fewer than [`REQUIRED_JOINTS`] or more than
    /// [`JOINT_COUNT`] points are supplied, or when any coordinate is NaN
    /// or infinite.
    pub fn new(points: &[Point2D]) -> Result<Self> {
        if points.len() < REQUIRED_JOINTS {
            return Err(Error::InvalidLandmarks(format!(
                "expected at least {} joints, got {}",
                REQUIRED_JOINTS,
                points.len()
            )));
        }
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(Error::InvalidLandmarks(format!(
                "joint {} is not finite: {:?}",
                i, points[i]
            )));
        }
        let points = ArrayVec::try_from(points).map_err(|_| {
            Error::InvalidLandmarks(format!(
                "expected at most {} joints, got {}",
                JOINT_COUNT,
                points.len()
            ))
        })?;
        Ok(Self { points })
    }

    /// Number of joints present
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Never true for a constructed value; provided for API symmetry
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Whether all 21 joints are present
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.points.is_full()
    }

    /// Position of any joint, `None` if the detector did not emit it
    #[inline]
    pub fn get(&self, joint: HandJoint) -> Option<Point2D> {
        self.points.get(joint.index()).copied()
    }

    #[inline]
    pub fn as_slice(&self) -> &[Point2D] {
        &self.points
    }

    #[inline]
    fn required(&self, joint: HandJoint) -> Point2D {
        debug_assert!(joint.is_required());
        self.points[joint.index()]
    }

    #[inline]
    pub fn wrist(&self) -> Point2D {
        self.required(HandJoint::Wrist)
    }

    #[inline]
    pub fn thumb_tip(&self) -> Point2D {
        self.required(HandJoint::ThumbTip)
    }

    #[inline]
    pub fn index_mcp(&self) -> Point2D {
        self.required(HandJoint::IndexMcp)
    }

    #[inline]
    pub fn index_pip(&self) -> Point2D {
        self.required(HandJoint::IndexPip)
    }

    #[inline]
    pub fn index_dip(&self) -> Point2D {
        self.required(HandJoint::IndexDip)
    }

    #[inline]
    pub fn index_tip(&self) -> Point2D {
        self.required(HandJoint::IndexTip)
    }

    /// Index MCP, PIP, DIP and tip
    pub fn index_chain(&self) -> [Point2D; 4] {
        HandJoint::INDEX_CHAIN.map(|j| self.required(j))
    }
}

impl TryFrom<Vec<Point2D>> for HandLandmarks {
    type Error = Error;

    fn try_from(points: Vec<Point2D>) -> Result<Self> {
        Self::new(&points)
    }
}

impl From<HandLandmarks> for Vec<Point2D> {
    fn from(landmarks: HandLandmarks) -> Self {
        landmarks.points.to_vec()
    }
}

/// One detected hand
///
/// `handedness` is `None` when the detector gave no usable label; such
/// hands only take part in positional fallback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    #[serde(default)]
    pub handedness: Option<Handedness>,
    pub landmarks: HandLandmarks,
}

impl Hand {
    pub fn new(handedness: Option<Handedness>, landmarks: HandLandmarks) -> Self {
        Self {
            handedness,
            landmarks,
        }
    }

    pub fn labeled(handedness: Handedness, landmarks: HandLandmarks) -> Self {
        Self::new(Some(handedness), landmarks)
    }

    pub fn unlabeled(landmarks: HandLandmarks) -> Self {
        Self::new(None, landmarks)
    }

    #[inline]
    pub fn is_labeled(&self) -> bool {
        self.handedness.is_some()
    }
}
