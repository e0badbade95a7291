use crate::{features::NUM_LANDMARKS, types::Keypoint};

/// A loosely hand-shaped set of points, wrist first.
pub(crate) fn sample_hand() -> Vec<Keypoint> {
    (0..NUM_LANDMARKS)
        .map(|i| {
            if i == 0 {
                return Keypoint::new(0.52, 0.81, 0.0);
            }
            let finger = ((i - 1) / 4) as f32;
            let joint = ((i - 1) % 4) as f32;
            Keypoint::new(
                0.40 + finger * 0.05,
                0.70 - joint * 0.06 - finger * 0.01,
                -0.01 * (joint + 1.0),
            )
        })
        .collect()
}
