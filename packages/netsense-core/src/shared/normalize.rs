//! Normalization helpers shared by extraction and fusion

/// Ranges narrower than this collapse to all-zero output
pub const FLAT_RANGE_EPSILON: f64 = 1e-12;

/// Min-max normalize to [0, 1].
///
/// A constant (or non-finite) population maps to all zeros so that no
/// division by a vanishing range ever happens.
pub fn minmax_norm(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let (lo, hi) = values
        .iter()
        .filter(|v| !v.is_nan())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    if !lo.is_finite() || !hi.is_finite() || (hi - lo).abs() < FLAT_RANGE_EPSILON {
        return vec![0.0; values.len()];
    }

    let span = hi - lo;
    values.iter().map(|&v| (v - lo) / span).collect()
}

/// Scale a vector to unit L2 norm in place. Zero vectors are left untouched.
pub fn l2_normalize(row: &mut [f32]) {
    let norm = row.iter().map(|v| v * v).sum::<f32>().sqrt();
    if norm > f32::EPSILON {
        for v in row.iter_mut() {
            *v /= norm;
        }
    }
}

/// Map a cosine similarity in [-1, 1] onto [0, 1]
#[inline]
pub fn unit_interval(cos: f64) -> f64 {
    0.5 * (cos + 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_minmax_basic() {
        assert_eq!(minmax_norm(&[2.0, 4.0, 6.0]), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_minmax_constant_is_zero() {
        assert_eq!(minmax_norm(&[3.0, 3.0, 3.0]), vec![0.0, 0.0, 0.0]);
        assert!(minmax_norm(&[]).is_empty());
    }

    #[test]
    fn test_minmax_infinite_range_is_zero() {
        assert_eq!(minmax_norm(&[1.0, f64::INFINITY]), vec![0.0, 0.0]);
    }

    #[test]
    fn test_l2_normalize() {
        let mut row = [3.0f32, 4.0];
        l2_normalize(&mut row);
        assert!((row[0] - 0.6).abs() < 1e-6);
        assert!((row[1] - 0.8).abs() < 1e-6);

        let mut zero = [0.0f32; 3];
        l2_normalize(&mut zero);
        assert_eq!(zero, [0.0; 3]);
    }

    proptest! {
        #[test]
        fn prop_minmax_stays_in_unit_interval(values in prop::collection::vec(-1e6f64..1e6, 1..64)) {
            for v in minmax_norm(&values) {
                prop_assert!((0.0..=1.0).contains(&v));
            }
        }
    }
}
