//! Geometry side of the pipeline: turning detector keypoints into the fixed
//! classifier input.

mod assemble;
mod handedness;
mod normalize;

pub use assemble::{Assembly, CoordinateTransform, FeatureAssembler, SlotConflict};
pub use handedness::{Side, resolve_side};
pub use normalize::{NormalizedVector, normalize_hand};

use thiserror::Error;

pub const NUM_LANDMARKS: usize = 21;
pub const HAND_FEATURE_LEN: usize = NUM_LANDMARKS * 3;
pub const FEATURE_LEN: usize = HAND_FEATURE_LEN * 2;

/// Below this wrist-relative radius a hand is treated as collapsed.
pub const DEGENERATE_EPSILON: f32 = 1e-6;

#[derive(Debug, Error, PartialEq)]
pub enum FeatureError {
    #[error("unexpected keypoint count: got {got}, need 0 or 21")]
    KeypointCount { got: usize },
}
