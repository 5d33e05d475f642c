use crate::error::RiskError;

/// Calculates historical Value-at-Risk from a series of daily returns.
///
/// The result is the empirical quantile of the return distribution at level
/// `1 - confidence_level` (the 5th percentile at 95% confidence), obtained by
/// linear interpolation between order statistics. It is returned as a signed
/// return: for any loss-making tail it is negative, and "a daily loss worse
/// than this value occurs with probability `1 - confidence_level`".
///
/// # Arguments
///
/// * `returns` - Daily returns (as decimals, e.g., -0.01 for -1%)
/// * `confidence_level` - Confidence level (e.g., 0.95 for 95%)
pub fn historical_var(returns: &[f64], confidence_level: f64) -> Result<f64, RiskError> {
    if returns.is_empty() {
        return Err(RiskError::InsufficientData(
            "no returns provided".to_string(),
        ));
    }

    if confidence_level <= 0.0 || confidence_level >= 1.0 {
        return Err(RiskError::InvalidConfidence(confidence_level));
    }

    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    let var = quantile(&sorted, 1.0 - confidence_level);
    tracing::debug!(confidence_level, var, "historical VaR estimated");

    Ok(var)
}

/// Empirical quantile of an ascending-sorted sample, linearly interpolated
/// between the two neighbouring order statistics (the "type 7" definition:
/// h = (n - 1) * p).
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let h = (n - 1) as f64 * p;
    let lower = h.floor() as usize;
    let upper = (lower + 1).min(n - 1);
    let weight = h - lower as f64;

    sorted[lower] + weight * (sorted[upper] - sorted[lower])
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn var_of_uniform_grid_is_near_minus_point_nine() {
        // 1000 evenly spaced returns over [-1, 1]; the 5th percentile of the
        // underlying uniform distribution is -0.9.
        let returns: Vec<f64> = (0..1000)
            .map(|i| -1.0 + 2.0 * i as f64 / 999.0)
            .collect();

        let var = historical_var(&returns, 0.95).unwrap();

        assert_relative_eq!(var, -0.9, epsilon = 5e-3);
    }

    #[test]
    fn var_interpolates_between_order_statistics() {
        // With five points, h = 4 * 0.05 = 0.2, so the estimate sits one
        // fifth of the way from the worst to the second-worst return.
        let returns = vec![0.01, -0.03, 0.02, -0.01, 0.0];

        let var = historical_var(&returns, 0.95).unwrap();

        assert_relative_eq!(var, -0.03 + 0.2 * 0.02, epsilon = 1e-12);
    }

    #[test]
    fn var_of_single_observation_is_that_observation() {
        let var = historical_var(&[-0.02], 0.95).unwrap();
        assert_relative_eq!(var, -0.02, epsilon = 1e-12);
    }

    #[test]
    fn var_rejects_empty_input() {
        let result = historical_var(&[], 0.95);
        assert!(matches!(result, Err(RiskError::InsufficientData(_))));
    }

    #[test]
    fn var_rejects_out_of_range_confidence() {
        let result = historical_var(&[0.01, -0.01], 1.0);
        assert!(matches!(result, Err(RiskError::InvalidConfidence(_))));
    }
}
