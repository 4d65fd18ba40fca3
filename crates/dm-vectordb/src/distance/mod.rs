//! Vector similarity primitives.

/// Compute inner product (dot product) of two vectors.
#[inline]
pub fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Euclidean length of a vector.
#[inline]
pub fn l2_norm(v: &[f32]) -> f32 {
    v.iter().map(|x| x * x).sum::<f32>().sqrt()
}

/// Norm of a vector usable as a cosine operand: finite components and a
/// strictly positive, finite length. `None` otherwise.
pub fn usable_norm(v: &[f32]) -> Option<f32> {
    if v.iter().any(|x| !x.is_finite()) {
        return None;
    }
    let norm = l2_norm(v);
    (norm.is_finite() && norm > 0.0).then_some(norm)
}

/// Cosine similarity from precomputed norms, clamped to [-1, 1].
#[inline]
pub fn cosine_with_norms(a: &[f32], norm_a: f32, b: &[f32], norm_b: f32) -> f32 {
    (inner_product(a, b) / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// Compute cosine similarity (returns value in [-1, 1]).
/// Returns `None` when either operand has no usable norm.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Option<f32> {
    let norm_a = usable_norm(a)?;
    let norm_b = usable_norm(b)?;
    Some(cosine_with_norms(a, norm_a, b, norm_b))
}

/// Normalize a vector in-place (L2 normalization).
pub fn normalize_vector(v: &mut [f32]) {
    let norm = l2_norm(v);
    if norm > 0.0 {
        for x in v.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inner_product() {
        assert!((inner_product(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]) - 32.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_identical_and_orthogonal() {
        let a = [1.0, 2.0, 3.0];
        assert!((cosine_similarity(&a, &a).unwrap() - 1.0).abs() < 1e-6);
        assert!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]).unwrap().abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite() {
        let s = cosine_similarity(&[1.0, 1.0], &[-2.0, -2.0]).unwrap();
        assert!((s + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_and_nan_have_no_norm() {
        assert!(usable_norm(&[0.0, 0.0]).is_none());
        assert!(usable_norm(&[f32::NAN, 1.0]).is_none());
        assert!(usable_norm(&[f32::INFINITY, 1.0]).is_none());
        assert!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]).is_none());
    }

    #[test]
    fn test_normalize_vector() {
        let mut v = vec![3.0, 4.0];
        normalize_vector(&mut v);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);

        let mut z = vec![0.0, 0.0];
        normalize_vector(&mut z);
        assert_eq!(z, vec![0.0, 0.0]);
    }
}
