use super::{HAND_FEATURE_LEN, Side, normalize_hand, resolve_side};
use crate::types::{FeatureBuffer, Hand, Keypoint};

/// What to do when two hands in one frame resolve to the same side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SlotConflict {
    /// The first hand in detector order keeps the slot.
    #[default]
    KeepFirst,
    /// The hand with the higher detector score keeps the slot; ties keep the
    /// first.
    KeepHigherScore,
    /// The later hand overwrites the earlier one.
    Overwrite,
}

/// Coordinate flips applied to raw keypoints before normalization.
///
/// Models trained on images flipped differently from the live feed need the
/// same flips at inference time, otherwise every feature's sign is off.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoordinateTransform {
    /// `x -> 1 - x` on mirrored frames.
    pub mirror_x_when_mirrored: bool,
    /// `y -> 1 - y` on every frame.
    pub flip_y: bool,
}

impl CoordinateTransform {
    pub fn identity() -> Self {
        Self::default()
    }

    /// Matches the preprocessing of the hand-sign training set: un-mirror x on
    /// front camera frames and point y upwards.
    pub fn training_aligned() -> Self {
        Self {
            mirror_x_when_mirrored: true,
            flip_y: true,
        }
    }

    fn apply(&self, keypoints: &[Keypoint], is_mirrored: bool) -> Vec<Keypoint> {
        let flip_x = self.mirror_x_when_mirrored && is_mirrored;
        keypoints
            .iter()
            .map(|kp| Keypoint {
                x: if flip_x { 1.0 - kp.x } else { kp.x },
                y: if self.flip_y { 1.0 - kp.y } else { kp.y },
                z: kp.z,
            })
            .collect()
    }
}

#[derive(Clone, Debug)]
pub struct Assembly {
    pub buffer: FeatureBuffer,
    /// Hands that ended up in a slot. Collapsed hands never do.
    pub hands_used: usize,
    /// Hands dropped for violating the keypoint contract.
    pub rejected: usize,
}

#[derive(Clone, Debug, Default)]
pub struct FeatureAssembler {
    pub transform: CoordinateTransform,
    pub slot_conflict: SlotConflict,
}

impl FeatureAssembler {
    pub fn new(transform: CoordinateTransform, slot_conflict: SlotConflict) -> Self {
        Self {
            transform,
            slot_conflict,
        }
    }

    pub fn assemble(&self, hands: &[Hand], is_mirrored: bool) -> Assembly {
        let mut buffer = FeatureBuffer::zeros();
        // (hand index, score) of the current occupant, indexed right then left.
        let mut occupants: [Option<(usize, f32)>; 2] = [None, None];
        let mut rejected = 0;

        for (idx, hand) in hands.iter().enumerate() {
            if hand.keypoints.is_empty() {
                continue;
            }

            let keypoints = self.transform.apply(&hand.keypoints, is_mirrored);
            let vector = match normalize_hand(&keypoints) {
                Ok(vector) => vector,
                Err(err) => {
                    log::warn!("dropping hand {idx} from frame: {err}");
                    rejected += 1;
                    continue;
                }
            };
            if vector.iter().all(|v| *v == 0.0) {
                log::debug!("hand {idx} collapsed to its wrist, treating it as absent");
                continue;
            }

            let side = resolve_side(hand.handedness, is_mirrored);
            let slot = match side {
                Side::Right => 0,
                Side::Left => 1,
            };

            if let Some((prev_idx, prev_score)) = occupants[slot] {
                let replace = match self.slot_conflict {
                    SlotConflict::KeepFirst => false,
                    SlotConflict::KeepHigherScore => hand.score > prev_score,
                    SlotConflict::Overwrite => true,
                };
                log::warn!(
                    "hands {prev_idx} and {idx} both resolve to {} ({:?}), keeping hand {}",
                    side.label(),
                    self.slot_conflict,
                    if replace { idx } else { prev_idx }
                );
                if !replace {
                    continue;
                }
            }

            buffer
                .slot_mut(side.offset(), HAND_FEATURE_LEN)
                .copy_from_slice(&vector);
            occupants[slot] = Some((idx, hand.score));

            log::debug!(
                "hand {idx}: raw={} logical={} offset={}",
                hand.handedness.label(),
                side.label(),
                side.offset()
            );
        }

        Assembly {
            buffer,
            hands_used: occupants.iter().flatten().count(),
            rejected,
        }
    }
}
