//! Landmark-to-label core of a hand-sign recognizer.
//!
//! Detector keypoints are normalized per hand, slotted by anatomical side
//! into a fixed 126-value buffer, classified, and then smoothed over time
//! into a confidence-gated label. See [`pipeline::Session`] for the per-frame
//! entry point.

pub mod classifier;
pub mod features;
pub mod labels;
pub mod pipeline;
pub mod recording;
pub mod stabilizer;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use classifier::{Classifier, OrtClassifier};
pub use labels::Labels;
pub use pipeline::{PipelineConfig, Session};
pub use types::{Frame, FrameResult, Hand, Handedness, Keypoint, Tier};
