mod ort;

pub use self::ort::OrtClassifier;

use std::cmp::Ordering;

use crate::types::{FeatureBuffer, LabelScore};

/// How many ranked scores a classifier hands back per frame.
pub const TOP_K: usize = 5;

/// Maps one feature buffer to ranked label scores.
///
/// Implementations must be deterministic for identical input and signal
/// "unable to classify" with an empty vec instead of failing.
pub trait Classifier: Send + 'static {
    fn classify(&mut self, features: &FeatureBuffer) -> Vec<LabelScore>;
}

impl<F> Classifier for F
where
    F: FnMut(&FeatureBuffer) -> Vec<LabelScore> + Send + 'static,
{
    fn classify(&mut self, features: &FeatureBuffer) -> Vec<LabelScore> {
        self(features)
    }
}

/// Sorts raw per-class scores descending and keeps the best `top_k`. NaN
/// scores sort last.
pub fn rank_scores(scores: &[f32], top_k: usize) -> Vec<LabelScore> {
    let mut ranked: Vec<LabelScore> = scores
        .iter()
        .enumerate()
        .map(|(index, &confidence)| LabelScore { index, confidence })
        .collect();
    ranked.sort_by(|a, b| match (a.confidence.is_nan(), b.confidence.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b
            .confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal),
    });
    ranked.truncate(top_k);
    ranked
}
