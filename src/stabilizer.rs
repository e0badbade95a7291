//! Temporal smoothing of per-frame predictions.
//!
//! The stabilizer keeps a short window of recent top-1 labels, reports the
//! majority label, counts how many consecutive frames that majority has held,
//! and gates the output on a confidence threshold that follows the current
//! confidence band. All mutable data lives in [`StabilizerState`], which the
//! caller owns and passes in for every frame.

use std::collections::VecDeque;

use crate::types::Tier;

/// Label pushed into the history for frames without a usable prediction, and
/// reported when nothing clears the confidence gate.
pub const NO_INPUT_LABEL: &str = "";

#[derive(Clone, Debug, PartialEq)]
pub struct StabilizerConfig {
    pub history_capacity: usize,
    /// Consecutive frames the majority label must hold before it can be
    /// reported as accurate.
    pub min_stable_count: u32,
    pub min_threshold: f32,
    pub max_threshold: f32,
    /// Confidence above which the threshold jumps to `max_threshold`.
    pub high_confidence: f32,
    /// Confidence below which the threshold drops to `min_threshold`.
    pub low_confidence: f32,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            history_capacity: 5,
            min_stable_count: 3,
            min_threshold: 0.4,
            max_threshold: 0.8,
            high_confidence: 0.8,
            low_confidence: 0.3,
        }
    }
}

impl StabilizerConfig {
    fn mid_threshold(&self) -> f32 {
        (self.min_threshold + self.max_threshold) / 2.0
    }
}

/// Bounded FIFO of the most recent labels, oldest first.
#[derive(Clone, Debug)]
pub struct PredictionHistory {
    labels: VecDeque<String>,
    capacity: usize,
}

impl PredictionHistory {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            labels: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, label: impl Into<String>) {
        while self.labels.len() >= self.capacity {
            self.labels.pop_front();
        }
        self.labels.push_back(label.into());
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    /// Most frequent label. On a tie the label that first appears earliest in
    /// the window wins, so identical sequences always vote the same way.
    pub fn majority(&self) -> Option<&str> {
        let mut counts: Vec<(&str, usize)> = Vec::new();
        for label in self.iter() {
            match counts.iter_mut().find(|(seen, _)| *seen == label) {
                Some((_, count)) => *count += 1,
                None => counts.push((label, 1)),
            }
        }

        let mut best: Option<(&str, usize)> = None;
        for (label, count) in counts {
            match best {
                Some((_, best_count)) if count <= best_count => {}
                _ => best = Some((label, count)),
            }
        }
        best.map(|(label, _)| label)
    }
}

/// Per-session stabilizer data. Create one per camera session and drop or
/// [`reset`](Self::reset) it when the session restarts.
#[derive(Clone, Debug)]
pub struct StabilizerState {
    history: PredictionHistory,
    last_stable_label: String,
    stable_count: u32,
    dynamic_threshold: f32,
    initial_threshold: f32,
}

impl StabilizerState {
    pub fn new(config: &StabilizerConfig) -> Self {
        let initial_threshold = config.mid_threshold();
        Self {
            history: PredictionHistory::new(config.history_capacity),
            last_stable_label: NO_INPUT_LABEL.to_string(),
            stable_count: 0,
            dynamic_threshold: initial_threshold,
            initial_threshold,
        }
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.last_stable_label = NO_INPUT_LABEL.to_string();
        self.stable_count = 0;
        self.dynamic_threshold = self.initial_threshold;
    }

    pub fn history(&self) -> &PredictionHistory {
        &self.history
    }

    pub fn last_stable_label(&self) -> &str {
        &self.last_stable_label
    }

    pub fn stable_count(&self) -> u32 {
        self.stable_count
    }

    pub fn dynamic_threshold(&self) -> f32 {
        self.dynamic_threshold
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Observation {
    Prediction { label: String, confidence: f32 },
    /// No hand, or the classifier produced nothing for this frame.
    NoInput,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Decision {
    pub label: String,
    pub tier: Tier,
    pub confidence: f32,
    /// Majority label of the window, whatever the tier.
    pub smoothed: String,
    pub stable_count: u32,
    pub dynamic_threshold: f32,
}

#[derive(Clone, Debug, Default)]
pub struct Stabilizer {
    config: StabilizerConfig,
}

impl Stabilizer {
    pub fn new(config: StabilizerConfig) -> Self {
        Self { config }
    }

    pub fn initial_state(&self) -> StabilizerState {
        StabilizerState::new(&self.config)
    }

    /// Three-band threshold, recomputed from the current frame alone.
    pub fn threshold_for(&self, confidence: f32) -> f32 {
        if confidence > self.config.high_confidence {
            self.config.max_threshold
        } else if confidence < self.config.low_confidence {
            self.config.min_threshold
        } else {
            self.config.mid_threshold()
        }
    }

    pub fn step(&self, state: &mut StabilizerState, observation: Observation) -> Decision {
        let (label, confidence, no_input) = match observation {
            Observation::Prediction { label, confidence } => (label, confidence, false),
            Observation::NoInput => (NO_INPUT_LABEL.to_string(), 0.0, true),
        };

        state.history.push(label);
        let smoothed = state
            .history
            .majority()
            .unwrap_or(NO_INPUT_LABEL)
            .to_string();

        if smoothed == state.last_stable_label {
            state.stable_count = state.stable_count.saturating_add(1);
        } else {
            state.last_stable_label = smoothed.clone();
            state.stable_count = 1;
        }

        state.dynamic_threshold = self.threshold_for(confidence);

        let tier = if no_input {
            Tier::NoInput
        } else if confidence > state.dynamic_threshold
            && state.stable_count >= self.config.min_stable_count
        {
            Tier::Accurate
        } else if confidence > self.config.min_threshold {
            Tier::Medium
        } else {
            Tier::Low
        };

        let label = match tier {
            Tier::Accurate | Tier::Medium => smoothed.clone(),
            Tier::Low | Tier::NoInput => NO_INPUT_LABEL.to_string(),
        };

        Decision {
            label,
            tier,
            confidence,
            smoothed,
            stable_count: state.stable_count,
            dynamic_threshold: state.dynamic_threshold,
        }
    }
}
