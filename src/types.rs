use std::{fmt, str::FromStr, time::Instant};

use crate::features::FEATURE_LEN;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Keypoint {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Keypoint {
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Handedness as reported by the landmark detector, in the image's frame of
/// reference.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    pub fn label(&self) -> &'static str {
        match self {
            Handedness::Left => "Left",
            Handedness::Right => "Right",
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Handedness::Left => Handedness::Right,
            Handedness::Right => Handedness::Left,
        }
    }
}

impl FromStr for Handedness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Left" => Ok(Handedness::Left),
            "Right" => Ok(Handedness::Right),
            other => Err(format!("unknown handedness {other:?}")),
        }
    }
}

#[derive(Clone, Debug)]
pub struct Hand {
    pub keypoints: Vec<Keypoint>,
    pub handedness: Handedness,
    pub score: f32,
}

impl Hand {
    pub fn new(keypoints: Vec<Keypoint>, handedness: Handedness) -> Self {
        Self {
            keypoints,
            handedness,
            score: 1.0,
        }
    }

    pub fn with_score(mut self, score: f32) -> Self {
        self.score = score;
        self
    }
}

/// One detector result: every hand seen in a single video frame.
#[derive(Clone, Debug)]
pub struct Frame {
    pub hands: Vec<Hand>,
    pub is_mirrored: bool,
    pub timestamp: Instant,
}

impl Frame {
    pub fn new(hands: Vec<Hand>, is_mirrored: bool) -> Self {
        Self {
            hands,
            is_mirrored,
            timestamp: Instant::now(),
        }
    }

    pub fn empty(is_mirrored: bool) -> Self {
        Self::new(Vec::new(), is_mirrored)
    }
}

/// Fixed-size classifier input: the logical right hand at `[0, 63)`, the
/// logical left hand at `[63, 126)`.
#[derive(Clone, Copy, PartialEq)]
pub struct FeatureBuffer([f32; FEATURE_LEN]);

impl FeatureBuffer {
    pub fn zeros() -> Self {
        Self([0.0; FEATURE_LEN])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.0
    }

    pub(crate) fn slot_mut(&mut self, offset: usize, len: usize) -> &mut [f32] {
        &mut self.0[offset..offset + len]
    }

    pub fn right_slot(&self) -> &[f32] {
        &self.0[..FEATURE_LEN / 2]
    }

    pub fn left_slot(&self) -> &[f32] {
        &self.0[FEATURE_LEN / 2..]
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|v| *v == 0.0)
    }

    pub fn non_zero_count(&self) -> usize {
        self.0.iter().filter(|v| **v != 0.0).count()
    }

    pub fn landmark_ratio(&self) -> f32 {
        self.non_zero_count() as f32 / FEATURE_LEN as f32
    }

    /// Raw bytes as the model consumes them: native byte order, f32.
    pub fn to_ne_bytes(&self) -> Vec<u8> {
        self.0.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }
}

impl Default for FeatureBuffer {
    fn default() -> Self {
        Self::zeros()
    }
}

impl fmt::Debug for FeatureBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FeatureBuffer")
            .field("non_zero", &self.non_zero_count())
            .field("right", &&self.right_slot()[..3])
            .field("left", &&self.left_slot()[..3])
            .finish()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LabelScore {
    pub index: usize,
    pub confidence: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    Accurate,
    Medium,
    Low,
    NoInput,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Accurate => "accurate",
            Tier::Medium => "medium",
            Tier::Low => "low",
            Tier::NoInput => "no input",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FrameResult {
    pub label: String,
    pub tier: Tier,
    pub confidence: f32,
    pub stable_count: u32,
    pub dynamic_threshold: f32,
    pub landmark_ratio: f32,
    pub hands_used: usize,
    /// Hands dropped for a malformed keypoint list.
    pub rejected_hands: usize,
}

impl FrameResult {
    pub fn display_text(&self) -> String {
        match self.tier {
            Tier::Accurate | Tier::Medium => format!(
                "{} [{}] {:.1}% | stable {} | landmarks {:.1}%",
                self.label,
                self.tier.label(),
                self.confidence * 100.0,
                self.stable_count,
                self.landmark_ratio * 100.0
            ),
            Tier::Low => format!(
                "waiting for input [{}] {:.1}% | landmarks {:.1}% | threshold {:.1}%",
                self.tier.label(),
                self.confidence * 100.0,
                self.landmark_ratio * 100.0,
                self.dynamic_threshold * 100.0
            ),
            Tier::NoInput if self.rejected_hands > 0 => format!(
                "waiting for input [{}] | hands {} | rejected {}",
                self.tier.label(),
                self.hands_used,
                self.rejected_hands
            ),
            Tier::NoInput => format!(
                "waiting for input [{}] | hands {}",
                self.tier.label(),
                self.hands_used
            ),
        }
    }
}
