//! One tick of detector output

use serde::{Deserialize, Serialize};

use super::{Hand, HandLandmarks, Handedness, Point2D};

/// Raw per-hand detector result, before validation
///
/// Mirrors what a MediaPipe-style detector hands back: ordered joint
/// positions and, when available, a handedness label.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHand {
    /// Detector label, e.g. `"Left"`; `None` or an unknown label means unlabeled
    #[serde(default)]
    pub label: Option<String>,
    pub landmarks: Vec<Point2D>,
}

impl RawHand {
    pub fn new(label: Option<&str>, landmarks: Vec<Point2D>) -> Self {
        Self {
            label: label.map(str::to_owned),
            landmarks,
        }
    }
}

/// All hands detected in the current frame, in detector emission order
///
/// Handedness-keyed lookups only see labeled hands and take the first
/// match; unlabeled hands are kept for positional fallback.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LandmarkFrame {
    #[serde(default)]
    hands: Vec<Hand>,
}

impl LandmarkFrame {
    /// A frame with no hands
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hands(hands: Vec<Hand>) -> Self {
        Self { hands }
    }

    /// Validate raw detector output
    ///
    /// Hands that do not expose the joints the core reads are dropped with a
    /// warning, i.e. treated as absent for this frame. Unknown labels are
    /// logged and the hand is kept as unlabeled.
    pub fn from_detections<I>(detections: I) -> Self
    where
        I: IntoIterator<Item = RawHand>,
    {
        let mut hands = Vec::new();
        for (i, raw) in detections.into_iter().enumerate() {
            let landmarks = match HandLandmarks::new(&raw.landmarks) {
                Ok(landmarks) => landmarks,
                Err(e) => {
                    tracing::warn!("dropping detection {}: {}", i, e);
                    continue;
                }
            };
            let handedness = raw.label.as_deref().and_then(|label| {
                let parsed = Handedness::from_label(label);
                if parsed.is_none() {
                    tracing::debug!("detection {} has unknown label {:?}", i, label);
                }
                parsed
            });
            hands.push(Hand::new(handedness, landmarks));
        }
        Self { hands }
    }

    pub fn push(&mut self, hand: Hand) {
        self.hands.push(hand);
    }

    #[inline]
    pub fn hands(&self) -> &[Hand] {
        &self.hands
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.hands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.hands.is_empty()
    }

    /// First hand carrying the given label; later duplicates are ignored
    pub fn first(&self, handedness: Handedness) -> Option<&HandLandmarks> {
        self.hands
            .iter()
            .find(|h| h.handedness == Some(handedness))
            .map(|h| &h.landmarks)
    }

    /// Labeled hands in detector order
    pub fn labeled(&self) -> impl Iterator<Item = &Hand> + '_ {
        self.hands.iter().filter(|h| h.is_labeled())
    }

    /// Unlabeled hands in detector order
    pub fn unlabeled(&self) -> impl Iterator<Item = &Hand> + '_ {
        self.hands.iter().filter(|h| !h.is_labeled())
    }
}

impl FromIterator<Hand> for LandmarkFrame {
    fn from_iter<T: IntoIterator<Item = Hand>>(iter: T) -> Self {
        Self::with_hands(iter.into_iter().collect())
    }
}
