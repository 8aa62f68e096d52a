//! Missing-value aware summary statistics.
//!
//! `NaN` marks a missing statistic. Every function here ignores missing
//! values, so a single gap does not erase a zone aggregate. A statistic over
//! nothing but missing values is `NaN`, except [`sum`] which is `0.0`.

fn present(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| !v.is_nan())
}

/// Sum of the non-missing values.
#[must_use]
pub fn sum(values: &[f64]) -> f64 {
    present(values).sum()
}

/// Arithmetic mean of the non-missing values.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    let (total, count) = present(values).fold((0.0, 0_u32), |(t, n), v| (t + v, n + 1));
    if count == 0 {
        f64::NAN
    } else {
        total / f64::from(count)
    }
}

/// Median of the non-missing values (mean of the two middle values for an
/// even count).
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    let mut sorted: Vec<f64> = present(values).collect();
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(f64::total_cmp);

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        f64::midpoint(sorted[mid - 1], sorted[mid])
    } else {
        sorted[mid]
    }
}

/// Smallest non-missing value.
#[must_use]
pub fn min(values: &[f64]) -> f64 {
    present(values).reduce(f64::min).unwrap_or(f64::NAN)
}

/// Largest non-missing value.
#[must_use]
pub fn max(values: &[f64]) -> f64 {
    present(values).reduce(f64::max).unwrap_or(f64::NAN)
}

/// Share of `values` strictly below `value`, as a percentage.
///
/// Returns 0 when `value` is missing or `values` is empty.
#[must_use]
pub fn percentile_rank(value: f64, values: &[f64]) -> f64 {
    if value.is_nan() || values.is_empty() {
        return 0.0;
    }
    let below = values.iter().filter(|v| **v < value).count();
    #[allow(clippy::cast_precision_loss)]
    let share = below as f64 / values.len() as f64;
    share * 100.0
}
