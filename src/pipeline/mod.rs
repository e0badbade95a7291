mod worker;

pub use worker::{recv_latest_frame, start_worker};

use crate::{
    classifier::Classifier,
    features::{CoordinateTransform, FeatureAssembler, SlotConflict},
    labels::Labels,
    stabilizer::{Observation, Stabilizer, StabilizerConfig, StabilizerState},
    types::{Frame, FrameResult},
};

#[derive(Clone, Debug, Default)]
pub struct PipelineConfig {
    pub transform: CoordinateTransform,
    pub slot_conflict: SlotConflict,
    pub stabilizer: StabilizerConfig,
}

/// One analysis session: a classifier, its labels and the stabilizer state
/// for a single camera stream.
///
/// Frames go through [`process_frame`](Self::process_frame) one at a time, in
/// order. Sessions share nothing, so independent streams can run on separate
/// threads.
pub struct Session<C: Classifier> {
    classifier: C,
    labels: Labels,
    assembler: FeatureAssembler,
    stabilizer: Stabilizer,
    state: StabilizerState,
}

impl<C: Classifier> Session<C> {
    pub fn new(classifier: C, labels: Labels, config: PipelineConfig) -> Self {
        let stabilizer = Stabilizer::new(config.stabilizer);
        let state = stabilizer.initial_state();
        Self {
            classifier,
            labels,
            assembler: FeatureAssembler::new(config.transform, config.slot_conflict),
            stabilizer,
            state,
        }
    }

    pub fn state(&self) -> &StabilizerState {
        &self.state
    }

    /// Forget all history, as when the camera session restarts.
    pub fn reset(&mut self) {
        self.state.reset();
    }

    pub fn process_frame(&mut self, frame: &Frame) -> FrameResult {
        log::debug!("hands detected: {}", frame.hands.len());

        let assembly = self.assembler.assemble(&frame.hands, frame.is_mirrored);
        let buffer = &assembly.buffer;
        log::debug!(
            "non-zero features: {}/{}",
            buffer.non_zero_count(),
            buffer.as_slice().len()
        );

        let observation = if buffer.is_empty() {
            Observation::NoInput
        } else {
            let scores = self.classifier.classify(buffer);
            match scores.first() {
                Some(best) => Observation::Prediction {
                    label: self.labels.resolve(best.index).to_string(),
                    confidence: best.confidence,
                },
                None => {
                    log::warn!("classifier returned no scores, treating frame as no input");
                    Observation::NoInput
                }
            }
        };

        let decision = self.stabilizer.step(&mut self.state, observation);

        FrameResult {
            label: decision.label,
            tier: decision.tier,
            confidence: decision.confidence,
            stable_count: decision.stable_count,
            dynamic_threshold: decision.dynamic_threshold,
            landmark_ratio: buffer.landmark_ratio(),
            hands_used: assembly.hands_used,
            rejected_hands: assembly.rejected,
        }
    }
}
