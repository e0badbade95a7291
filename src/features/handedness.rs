use super::HAND_FEATURE_LEN;
use crate::types::Handedness;

/// Anatomical side of a hand, after undoing any camera mirroring.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Start of this side's slot in the feature buffer. Must match the layout
    /// the model was trained with.
    pub fn offset(&self) -> usize {
        match self {
            Side::Right => 0,
            Side::Left => HAND_FEATURE_LEN,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Side::Left => "Left",
            Side::Right => "Right",
        }
    }
}

impl From<Handedness> for Side {
    fn from(value: Handedness) -> Self {
        match value {
            Handedness::Left => Side::Left,
            Handedness::Right => Side::Right,
        }
    }
}

/// The detector labels hands from the image's point of view, so a mirrored
/// image (front camera preview) reports the opposite of the subject's hand.
pub fn resolve_side(raw: Handedness, is_mirrored: bool) -> Side {
    if is_mirrored {
        raw.flipped().into()
    } else {
        raw.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrored_frames_flip_the_label() {
        assert_eq!(resolve_side(Handedness::Right, true), Side::Left);
        assert_eq!(resolve_side(Handedness::Left, true), Side::Right);
    }

    #[test]
    fn unmirrored_frames_keep_the_label() {
        assert_eq!(resolve_side(Handedness::Right, false), Side::Right);
        assert_eq!(resolve_side(Handedness::Left, false), Side::Left);
    }

    #[test]
    fn slot_offsets() {
        assert_eq!(Side::Right.offset(), 0);
        assert_eq!(Side::Left.offset(), 63);
        assert_eq!(resolve_side(Handedness::Right, true).offset(), 63);
        assert_eq!(resolve_side(Handedness::Right, false).offset(), 0);
    }
}
