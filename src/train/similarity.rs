//! Vector similarity metrics

use ndarray::ArrayView1;

/// Cosine similarity between two equal-length vectors:
/// `(a · b) / max(‖a‖ ‖b‖, eps)`.
#[must_use]
pub fn cosine_similarity(a: ArrayView1<'_, f32>, b: ArrayView1<'_, f32>, eps: f32) -> f32 {
    assert_eq!(a.len(), b.len(), "vector dimensions must match");
    let dot = a.dot(&b);
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();
    dot / (norm_a * norm_b).max(eps)
}

/// Distance between two vectors normalized by the product of their norms:
/// `‖a − b‖ / (‖a‖ ‖b‖)`.
#[must_use]
pub fn norm_ratio_distance(a: ArrayView1<'_, f32>, b: ArrayView1<'_, f32>) -> f32 {
    assert_eq!(a.len(), b.len(), "vector dimensions must match");
    let diff = (&a - &b).dot(&(&a - &b)).sqrt();
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();
    diff / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    const EPS: f32 = 1e-8;

    #[test]
    fn test_identical_vectors_have_unit_similarity() {
        let a = array![1.0, 2.0, 3.0];
        assert_relative_eq!(cosine_similarity(a.view(), a.view(), EPS), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_orthogonal_vectors_have_zero_similarity() {
        let a = array![1.0, 0.0];
        let b = array![0.0, 1.0];
        assert_relative_eq!(cosine_similarity(a.view(), b.view(), EPS), 0.0);
    }

    #[test]
    fn test_opposite_vectors_have_negative_similarity() {
        let a = array![1.0, 1.0];
        let b = array![-1.0, -1.0];
        assert_relative_eq!(cosine_similarity(a.view(), b.view(), EPS), -1.0, epsilon = 1e-6);
    }

    #[test]
    fn test_eps_guards_zero_vectors() {
        let zero = array![0.0, 0.0];
        let b = array![1.0, 0.0];
        let sim = cosine_similarity(zero.view(), b.view(), EPS);
        assert!(sim.is_finite());
        assert_relative_eq!(sim, 0.0);
    }

    #[test]
    fn test_norm_ratio_distance_zero_for_equal() {
        let a = array![2.0, 1.0];
        assert_relative_eq!(norm_ratio_distance(a.view(), a.view()), 0.0);
    }

    #[test]
    fn test_norm_ratio_distance_known_value() {
        let a = array![3.0, 0.0];
        let b = array![0.0, 4.0];
        // ‖a−b‖ = 5, ‖a‖‖b‖ = 12
        assert_relative_eq!(norm_ratio_distance(a.view(), b.view()), 5.0 / 12.0, epsilon = 1e-6);
    }

    #[test]
    #[should_panic(expected = "vector dimensions must match")]
    fn test_dimension_mismatch_panics() {
        let a = array![1.0, 2.0];
        let b = array![1.0, 2.0, 3.0];
        cosine_similarity(a.view(), b.view(), EPS);
    }

    mod proptests {
        use super::*;
        use ndarray::Array1;
        use proptest::prelude::*;

        proptest! {
            /// Cosine similarity stays within [-1, 1] up to rounding
            #[test]
            fn similarity_is_bounded(
                values in prop::collection::vec(-10.0f32..10.0, 2..64),
                other in prop::collection::vec(-10.0f32..10.0, 2..64),
            ) {
                let len = values.len().min(other.len());
                let a = Array1::from_vec(values[..len].to_vec());
                let b = Array1::from_vec(other[..len].to_vec());
                let sim = cosine_similarity(a.view(), b.view(), EPS);
                prop_assert!(sim >= -1.0 - 1e-4 && sim <= 1.0 + 1e-4);
            }
        }
    }
}
