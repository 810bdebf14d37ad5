//! Sample statistics over one group of values.

use wildfire_fire_models::CI_Z_95;

/// Mean, sample deviation, and confidence interval of a group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    /// Number of values.
    pub n: u64,
    /// Sum of values.
    pub sum: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (n - 1 denominator). `None` when n < 2.
    pub std: Option<f64>,
    /// 95% CI half-width, `1.96 * std / sqrt(n)`. `None` when n < 2.
    pub ci: Option<f64>,
}

/// Summarizes a non-empty group. Returns `None` for an empty slice: an empty
/// group has no mean and must not produce a row.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn summarize(values: &[f64]) -> Option<Summary> {
    if values.is_empty() {
        return None;
    }

    let n = values.len();
    let sum: f64 = values.iter().sum();
    let mean = sum / n as f64;

    let std = sample_std(values, mean);
    let ci = std.map(|std| CI_Z_95 * std / (n as f64).sqrt());

    Some(Summary {
        n: n as u64,
        sum,
        mean,
        std,
        ci,
    })
}

/// Arithmetic mean. `None` for an empty slice.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[allow(clippy::cast_precision_loss)]
fn sample_std(values: &[f64], mean: f64) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let squares: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((squares / (values.len() - 1) as f64).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn sample_deviation_uses_n_minus_one() {
        let summary = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(summary.n, 8);
        assert!((summary.mean - 5.0).abs() < EPS);
        // Population std is 2; sample std is sqrt(32 / 7).
        let expected_std = (32.0_f64 / 7.0).sqrt();
        assert!((summary.std.unwrap() - expected_std).abs() < EPS);
        let expected_ci = 1.96 * expected_std / 8.0_f64.sqrt();
        assert!((summary.ci.unwrap() - expected_ci).abs() < EPS);
    }

    #[test]
    fn single_value_has_no_spread() {
        let summary = summarize(&[3.5]).unwrap();
        assert_eq!(summary.n, 1);
        assert!((summary.mean - 3.5).abs() < EPS);
        assert!(summary.std.is_none());
        assert!(summary.ci.is_none());
    }

    #[test]
    fn empty_group_has_no_summary() {
        assert!(summarize(&[]).is_none());
        assert!(mean(&[]).is_none());
    }
}
