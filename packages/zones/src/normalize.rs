//! Linear rescaling of raw values onto a 0-100 score.

/// Score given to every value when the reference range is degenerate.
pub const MIDPOINT_SCORE: f64 = 50.0;

/// Rescales `value` from `[min, max]` onto `[0, 100]`, clamping values that
/// fall outside the range.
///
/// When `min == max` the range carries no information and every value maps
/// to [`MIDPOINT_SCORE`]. `NaN` inputs produce `NaN`.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn normalize(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        return MIDPOINT_SCORE;
    }

    ((value - min) / (max - min) * 100.0).clamp(0.0, 100.0)
}

/// Applies [`normalize`] to every value with the same reference range.
#[must_use]
pub fn normalize_all(values: &[f64], min: f64, max: f64) -> Vec<f64> {
    values.iter().map(|v| normalize(*v, min, max)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_range_linearly() {
        assert!((normalize(0.0, 0.0, 10.0) - 0.0).abs() < 1e-12);
        assert!((normalize(2.5, 0.0, 10.0) - 25.0).abs() < 1e-12);
        assert!((normalize(10.0, 0.0, 10.0) - 100.0).abs() < 1e-12);
    }

    #[test]
    fn clamps_out_of_range_values() {
        assert!((normalize(-5.0, 0.0, 10.0) - 0.0).abs() < f64::EPSILON);
        assert!((normalize(50.0, 0.0, 10.0) - 100.0).abs() < f64::EPSILON);
        assert!((normalize(f64::INFINITY, 0.0, 10.0) - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn degenerate_range_is_midpoint() {
        for value in [-1e9, 0.0, 7.0, 1e9, f64::NAN] {
            assert!((normalize(value, 7.0, 7.0) - MIDPOINT_SCORE).abs() < f64::EPSILON);
        }
        let batch = normalize_all(&[1.0, 2.0, 3.0], 4.0, 4.0);
        assert_eq!(batch, vec![50.0, 50.0, 50.0]);
    }

    #[test]
    fn monotonic_in_value() {
        let values: Vec<f64> = (-20..=120).map(f64::from).collect();
        let scores = normalize_all(&values, 0.0, 100.0);
        for pair in scores.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
        assert!(scores.iter().all(|s| (0.0..=100.0).contains(s)));
    }

    #[test]
    fn reversed_range_is_clamped() {
        let score = normalize(5.0, 10.0, 0.0);
        assert!((score - 50.0).abs() < 1e-12);
        assert!((0.0..=100.0).contains(&normalize(-3.0, 10.0, 0.0)));
    }

    #[test]
    fn nan_value_propagates() {
        assert!(normalize(f64::NAN, 0.0, 1.0).is_nan());
    }

    #[test]
    fn batch_preserves_length_and_order() {
        let scores = normalize_all(&[10.0, 0.0, 5.0], 0.0, 10.0);
        assert_eq!(scores.len(), 3);
        assert!((scores[0] - 100.0).abs() < 1e-12);
        assert!(scores[1].abs() < 1e-12);
        assert!((scores[2] - 50.0).abs() < 1e-12);
    }
}
