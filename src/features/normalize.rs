use super::{DEGENERATE_EPSILON, FeatureError, HAND_FEATURE_LEN, NUM_LANDMARKS};
use crate::types::Keypoint;

pub type NormalizedVector = [f32; HAND_FEATURE_LEN];

/// Wrist-relative, scale-normalized features for a single hand.
///
/// Every keypoint is translated so the wrist (index 0) sits at the origin and
/// then divided by the largest wrist distance, so the farthest point ends up
/// on the unit sphere. The result does not depend on where the hand is in the
/// image or how large it appears, but it does depend on its rotation.
///
/// An empty hand and a hand whose points all coincide with the wrist both map
/// to the all-zero vector. Any count other than 0 or 21 is rejected.
pub fn normalize_hand(keypoints: &[Keypoint]) -> Result<NormalizedVector, FeatureError> {
    let mut result = [0.0; HAND_FEATURE_LEN];
    if keypoints.is_empty() {
        return Ok(result);
    }
    if keypoints.len() != NUM_LANDMARKS {
        return Err(FeatureError::KeypointCount {
            got: keypoints.len(),
        });
    }

    let wrist = keypoints[0];
    let relative: Vec<[f32; 3]> = keypoints
        .iter()
        .map(|kp| [kp.x - wrist.x, kp.y - wrist.y, kp.z - wrist.z])
        .collect();

    let max_dist = relative.iter().map(|p| length(*p)).fold(0.0f32, f32::max);
    if max_dist < DEGENERATE_EPSILON {
        return Ok(result);
    }

    for (chunk, p) in result.chunks_exact_mut(3).zip(&relative) {
        chunk[0] = p[0] / max_dist;
        chunk[1] = p[1] / max_dist;
        chunk[2] = p[2] / max_dist;
    }
    Ok(result)
}

fn length(v: [f32; 3]) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;
    use crate::testing::sample_hand;

    fn assert_vectors_close(a: &NormalizedVector, b: &NormalizedVector) {
        for (x, y) in a.iter().zip(b) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-5);
        }
    }

    #[test]
    fn empty_hand_is_all_zero() {
        assert_eq!(normalize_hand(&[]).unwrap(), [0.0; HAND_FEATURE_LEN]);
    }

    #[test]
    fn collapsed_hand_is_all_zero() {
        let hand = vec![Keypoint::new(0.3, 0.4, 0.1); NUM_LANDMARKS];
        assert_eq!(normalize_hand(&hand).unwrap(), [0.0; HAND_FEATURE_LEN]);
    }

    #[test]
    fn rejects_partial_hands() {
        let hand = sample_hand();
        assert_eq!(
            normalize_hand(&hand[..20]),
            Err(FeatureError::KeypointCount { got: 20 })
        );
        let mut long = hand.clone();
        long.push(Keypoint::default());
        assert_eq!(
            normalize_hand(&long),
            Err(FeatureError::KeypointCount { got: 22 })
        );
    }

    #[test]
    fn farthest_point_lands_on_unit_sphere() {
        let out = normalize_hand(&sample_hand()).unwrap();
        let max_radius = out
            .chunks_exact(3)
            .map(|p| length([p[0], p[1], p[2]]))
            .fold(0.0f32, f32::max);
        assert_abs_diff_eq!(max_radius, 1.0, epsilon = 1e-5);
        assert_eq!(&out[..3], &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn invariant_to_translation() {
        let hand = sample_hand();
        let moved: Vec<Keypoint> = hand
            .iter()
            .map(|kp| Keypoint::new(kp.x + 0.3, kp.y - 0.2, kp.z + 0.05))
            .collect();
        assert_vectors_close(
            &normalize_hand(&hand).unwrap(),
            &normalize_hand(&moved).unwrap(),
        );
    }

    #[test]
    fn invariant_to_scale_around_wrist() {
        let hand = sample_hand();
        let wrist = hand[0];
        for k in [1.5f32, 3.0, 10.0] {
            let scaled: Vec<Keypoint> = hand
                .iter()
                .map(|kp| {
                    Keypoint::new(
                        wrist.x + (kp.x - wrist.x) * k,
                        wrist.y + (kp.y - wrist.y) * k,
                        wrist.z + (kp.z - wrist.z) * k,
                    )
                })
                .collect();
            assert_vectors_close(
                &normalize_hand(&hand).unwrap(),
                &normalize_hand(&scaled).unwrap(),
            );
        }
    }

    #[test]
    fn not_rotation_invariant() {
        let hand = sample_hand();
        let rotated: Vec<Keypoint> = hand
            .iter()
            .map(|kp| Keypoint::new(-kp.y, kp.x, kp.z))
            .collect();
        assert_ne!(
            normalize_hand(&hand).unwrap(),
            normalize_hand(&rotated).unwrap()
        );
    }
}
