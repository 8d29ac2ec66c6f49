//! Descriptive statistics over plain `f64` slices.
//!
//! Callers guarantee non-empty input; the estimator short-circuits the empty
//! sample set before any of these run.

/// Arithmetic mean.
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator). A single value has no spread: 0.
#[must_use]
pub fn sample_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = mean(values);
    let sum_squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_squares / (values.len() - 1) as f64).sqrt()
}

/// Quantile `q` in `[0, 1]` with linear interpolation between order statistics.
///
/// The rank is `q * (n - 1)`; the result interpolates between the values on
/// either side of it.
#[must_use]
pub fn quantile_linear(values: &[f64], q: f64) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q = q.clamp(0.0, 1.0);
    let position = q * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Share of values matching `predicate`, in percent.
#[must_use]
pub fn percent_where(values: &[f64], predicate: impl Fn(f64) -> bool) -> f64 {
    let hits = values.iter().filter(|v| predicate(**v)).count();
    hits as f64 / values.len() as f64 * 100.0
}
