use std::path::Path;

use anyhow::{Context, Result, anyhow};
use ndarray::Array2;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;

use super::{Classifier, TOP_K, rank_scores};
use crate::{
    features::FEATURE_LEN,
    types::{FeatureBuffer, LabelScore},
};

/// Hand-sign classifier backed by an ONNX model taking a `(1, 126)` f32
/// input and producing one score per label.
pub struct OrtClassifier {
    session: Session,
    top_k: usize,
}

impl OrtClassifier {
    pub fn new(model_path: &Path) -> Result<Self> {
        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(2)?
            .commit_from_file(model_path)
            .with_context(|| {
                format!(
                    "failed to load sign classifier from {}",
                    model_path.display()
                )
            })?;

        log::info!("loaded sign classifier from {}", model_path.display());

        Ok(Self {
            session,
            top_k: TOP_K,
        })
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    fn run(&mut self, features: &FeatureBuffer) -> Result<Vec<f32>> {
        let input = Array2::from_shape_vec((1, FEATURE_LEN), features.as_slice().to_vec())
            .map_err(|err| anyhow!("failed to build classifier input: {err}"))?;
        let tensor = Tensor::from_array(input)?;

        let outputs = self
            .session
            .run(ort::inputs![tensor])
            .context("failed to run sign classifier")?;

        if outputs.len() < 1 {
            return Err(anyhow!("sign classifier returned no outputs"));
        }

        let scores = outputs[0].try_extract_array::<f32>()?;
        Ok(scores.iter().copied().collect())
    }
}

impl Classifier for OrtClassifier {
    fn classify(&mut self, features: &FeatureBuffer) -> Vec<LabelScore> {
        let started = std::time::Instant::now();
        let scores = match self.run(features) {
            Ok(scores) => scores,
            Err(err) => {
                log::warn!("sign classification failed: {err:?}");
                return Vec::new();
            }
        };

        let ranked = rank_scores(&scores, self.top_k);
        log::debug!(
            "inference took {:?}, {} classes, top: {:?}",
            started.elapsed(),
            scores.len(),
            ranked.iter().take(3).collect::<Vec<_>>()
        );
        ranked
    }
}
