use std::thread;

use crossbeam_channel::{Receiver, Sender, TrySendError};

use super::Session;
use crate::{
    classifier::Classifier,
    types::{Frame, FrameResult},
};

/// Runs `session` on its own thread until the frame sender is dropped.
///
/// Only the newest queued frame is processed; older ones are discarded.
/// Results go out with `try_send`, so a slow or vanished consumer never
/// blocks the worker and simply misses those results.
pub fn start_worker<C: Classifier>(
    mut session: Session<C>,
    frame_rx: Receiver<Frame>,
    result_tx: Sender<FrameResult>,
) -> thread::JoinHandle<Session<C>> {
    thread::spawn(move || {
        log::info!("sign recognizer worker started");
        while let Some(frame) = recv_latest_frame(&frame_rx) {
            let result = session.process_frame(&frame);
            match result_tx.try_send(result) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => log::debug!("result consumer busy, dropping result"),
                Err(TrySendError::Disconnected(_)) => {
                    log::debug!("result consumer gone, dropping result")
                }
            }
        }
        log::info!("sign recognizer worker stopped");
        session
    })
}

/// Blocks for the next frame, then drains anything queued behind it and keeps
/// the most recent one. `None` once the sender side is gone.
pub fn recv_latest_frame(frame_rx: &Receiver<Frame>) -> Option<Frame> {
    let mut frame = frame_rx.recv().ok()?;
    let mut dropped = 0usize;
    while let Ok(newer) = frame_rx.try_recv() {
        frame = newer;
        dropped += 1;
    }
    if dropped > 0 {
        log::debug!("skipped {dropped} stale frames");
    }
    Some(frame)
}

#[cfg(test)]
mod tests {
    use crossbeam_channel::{bounded, unbounded};

    use super::*;
    use crate::{
        labels::Labels,
        pipeline::PipelineConfig,
        testing::sample_hand,
        types::{FeatureBuffer, Hand, Handedness, LabelScore, Tier},
    };

    #[test]
    fn keeps_only_the_newest_queued_frame() {
        let (tx, rx) = unbounded();
        tx.send(Frame::empty(false)).unwrap();
        tx.send(Frame::empty(false)).unwrap();
        tx.send(Frame::empty(true)).unwrap();

        let frame = recv_latest_frame(&rx).unwrap();
        assert!(frame.is_mirrored);
        assert!(rx.is_empty());

        drop(tx);
        assert!(recv_latest_frame(&rx).is_none());
    }

    #[test]
    fn worker_processes_frames_until_sender_drops() {
        let classifier = |_: &FeatureBuffer| {
            vec![LabelScore {
                index: 0,
                confidence: 0.95,
            }]
        };
        let session = Session::new(classifier, Labels::alphabet(), PipelineConfig::default());
        let (frame_tx, frame_rx) = bounded(1);
        let (result_tx, result_rx) = unbounded();
        let handle = start_worker(session, frame_rx, result_tx);

        let frame = Frame::new(vec![Hand::new(sample_hand(), Handedness::Left)], false);
        let mut tiers = Vec::new();
        for _ in 0..3 {
            frame_tx.send(frame.clone()).unwrap();
            let result = result_rx.recv().unwrap();
            assert_eq!(result.label, "A");
            tiers.push(result.tier);
        }
        drop(frame_tx);

        let session = handle.join().unwrap();
        assert_eq!(tiers, vec![Tier::Medium, Tier::Medium, Tier::Accurate]);
        assert_eq!(session.state().stable_count(), 3);
    }
}
