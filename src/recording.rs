//! Recorded landmark streams, one JSON frame per line:
//!
//! ```text
//! {"mirrored": true, "hands": [{"handedness": "Right", "score": 0.97,
//!   "landmarks": [{"x": 0.51, "y": 0.80, "z": 0.0}, ...]}]}
//! ```
//!
//! `mirrored` defaults to `true` (front camera), `score` to 1.0 and `z` to 0.0.
//! Blank lines and lines starting with `#` are ignored.

use std::{
    fs,
    io::{BufRead, BufReader},
    path::Path,
};

use anyhow::Context;
use serde::Deserialize;
use thiserror::Error;

use crate::types::{Frame, Hand, Handedness, Keypoint};

#[derive(Debug, Error)]
pub enum RecordingError {
    #[error("failed to read recording")]
    Io(#[from] std::io::Error),
    #[error("line {line}: malformed frame")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: {message}")]
    Handedness { line: usize, message: String },
}

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[serde(default)]
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    handedness: String,
    #[serde(default = "default_score")]
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct FrameJson {
    #[serde(default = "default_mirrored")]
    mirrored: bool,
    #[serde(default)]
    hands: Vec<HandJson>,
}

fn default_score() -> f32 {
    1.0
}

fn default_mirrored() -> bool {
    true
}

pub fn parse_frame(json: &str, line: usize) -> Result<Frame, RecordingError> {
    let parsed: FrameJson =
        serde_json::from_str(json).map_err(|source| RecordingError::Parse { line, source })?;

    let mut hands = Vec::with_capacity(parsed.hands.len());
    for hand in parsed.hands {
        let handedness: Handedness = hand
            .handedness
            .parse()
            .map_err(|message| RecordingError::Handedness { line, message })?;
        let keypoints = hand
            .landmarks
            .iter()
            .map(|lm| Keypoint::new(lm.x, lm.y, lm.z))
            .collect();
        hands.push(Hand::new(keypoints, handedness).with_score(hand.score));
    }

    Ok(Frame::new(hands, parsed.mirrored))
}

pub fn read_frames<R: BufRead>(reader: R) -> Result<Vec<Frame>, RecordingError> {
    let mut frames = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        frames.push(parse_frame(trimmed, idx + 1)?);
    }
    Ok(frames)
}

pub fn load(path: &Path) -> anyhow::Result<Vec<Frame>> {
    let file = fs::File::open(path)
        .with_context(|| format!("failed to open recording {}", path.display()))?;
    let frames = read_frames(BufReader::new(file))
        .with_context(|| format!("failed to parse recording {}", path.display()))?;
    log::info!("loaded {} frames from {}", frames.len(), path.display());
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_frames_with_defaults() {
        let input = r#"
# two frames
{"hands": [{"handedness": "Right", "landmarks": [{"x": 0.5, "y": 0.25}]}]}

{"mirrored": false, "hands": [{"handedness": "Left", "score": 0.5, "landmarks": []}]}
{"mirrored": false}
"#;
        let frames = read_frames(input.as_bytes()).unwrap();
        assert_eq!(frames.len(), 3);

        assert!(frames[0].is_mirrored);
        let hand = &frames[0].hands[0];
        assert_eq!(hand.handedness, Handedness::Right);
        assert_eq!(hand.score, 1.0);
        assert_eq!(hand.keypoints, vec![Keypoint::new(0.5, 0.25, 0.0)]);

        assert!(!frames[1].is_mirrored);
        assert_eq!(frames[1].hands[0].handedness, Handedness::Left);
        assert_eq!(frames[1].hands[0].score, 0.5);

        assert!(frames[2].hands.is_empty());
    }

    #[test]
    fn reports_line_of_malformed_frame() {
        let input = "{\"hands\": []}\n{\"hands\": [oops]}\n";
        match read_frames(input.as_bytes()) {
            Err(RecordingError::Parse { line, .. }) => assert_eq!(line, 2),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_handedness() {
        let input = r#"{"hands": [{"handedness": "Both", "landmarks": []}]}"#;
        match read_frames(input.as_bytes()) {
            Err(RecordingError::Handedness { line, message }) => {
                assert_eq!(line, 1);
                assert!(message.contains("Both"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
