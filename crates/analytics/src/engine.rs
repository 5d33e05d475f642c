use crate::error::AnalyticsError;
use crate::report::CompanyStatistics;
use risk::historical_var;
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Trading-day convention used to convert the annual risk-free rate to a
/// daily rate.
const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Two-sided confidence level for the Welch test's interval on the mean
/// return difference.
const WELCH_CI_LEVEL: f64 = 0.95;

/// A stateless calculator for deriving per-company risk statistics from
/// aligned daily return columns.
///
/// Each statistic is independent: degenerate inputs leave that statistic as
/// `NaN` while the others remain valid.
#[derive(Debug, Clone)]
pub struct AnalyticsEngine {
    risk_free_daily: f64,
    var_confidence: f64,
}

/// Outcome of the Welch unequal-variance two-sample t-test.
struct WelchTest {
    t_statistic: f64,
    p_value: f64,
    ci_lower: f64,
    ci_upper: f64,
}

impl AnalyticsEngine {
    /// Creates an engine for the given annual risk-free rate and VaR
    /// confidence level.
    pub fn new(annual_risk_free_rate: f64, var_confidence: f64) -> Self {
        Self {
            risk_free_daily: annual_risk_free_rate / TRADING_DAYS_PER_YEAR,
            var_confidence,
        }
    }

    /// The main entry point for calculating one company's statistics.
    ///
    /// # Arguments
    ///
    /// * `symbol` - The company's ticker symbol, carried into the report.
    /// * `company` - The company's aligned daily log returns.
    /// * `benchmark` - The benchmark's returns over the same aligned dates.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `CompanyStatistics` or an `AnalyticsError`.
    pub fn calculate(
        &self,
        symbol: &str,
        company: &[f64],
        benchmark: &[f64],
    ) -> Result<CompanyStatistics, AnalyticsError> {
        if company.len() != benchmark.len() {
            return Err(AnalyticsError::MisalignedInput(format!(
                "'{}' has {} returns but the benchmark has {}",
                symbol,
                company.len(),
                benchmark.len()
            )));
        }
        if company.len() < 2 {
            return Err(AnalyticsError::NotEnoughData(format!(
                "'{}' has {} aligned returns, need at least 2",
                symbol,
                company.len()
            )));
        }

        let beta = self.beta(company, benchmark);
        let sharpe_ratio = self.sharpe_ratio(company);
        let var_95 = historical_var(company, self.var_confidence)?;
        let welch = self.welch_t_test(company, benchmark)?;

        tracing::debug!(symbol, beta, sharpe_ratio, var_95, "statistics computed");

        Ok(CompanyStatistics {
            symbol: symbol.to_string(),
            observations: company.len(),
            mean_daily_return: mean(company),
            beta,
            sharpe_ratio,
            var_95,
            t_statistic: welch.t_statistic,
            p_value: welch.p_value,
            ci_lower: welch.ci_lower,
            ci_upper: welch.ci_upper,
        })
    }

    /// CAPM beta: the OLS slope of company returns on benchmark returns,
    /// `cov(benchmark, company) / var(benchmark)`.
    ///
    /// A zero-variance benchmark has no defined slope; the result is `NaN`.
    fn beta(&self, company: &[f64], benchmark: &[f64]) -> f64 {
        let benchmark_variance = sample_variance(benchmark);
        if benchmark_variance == 0.0 {
            return f64::NAN;
        }

        sample_covariance(benchmark, company) / benchmark_variance
    }

    /// Daily Sharpe ratio: mean excess return over the daily risk-free rate,
    /// divided by the sample standard deviation. `NaN` when the series has
    /// no variance.
    fn sharpe_ratio(&self, company: &[f64]) -> f64 {
        let std_dev = sample_variance(company).sqrt();
        if std_dev == 0.0 {
            return f64::NAN;
        }

        (mean(company) - self.risk_free_daily) / std_dev
    }

    /// Welch's unequal-variance t-test of company vs. benchmark returns,
    /// with a two-sided p-value and a confidence interval for the mean
    /// difference.
    fn welch_t_test(
        &self,
        company: &[f64],
        benchmark: &[f64],
    ) -> Result<WelchTest, AnalyticsError> {
        let n1 = company.len() as f64;
        let n2 = benchmark.len() as f64;
        let mean_diff = mean(company) - mean(benchmark);
        let var1 = sample_variance(company);
        let var2 = sample_variance(benchmark);

        let se_squared = var1 / n1 + var2 / n2;
        if se_squared == 0.0 {
            // Both samples are constant; the test statistic is undefined.
            return Ok(WelchTest {
                t_statistic: f64::NAN,
                p_value: f64::NAN,
                ci_lower: f64::NAN,
                ci_upper: f64::NAN,
            });
        }

        let standard_error = se_squared.sqrt();
        let t_statistic = mean_diff / standard_error;

        // Welch-Satterthwaite degrees of freedom.
        let degrees_of_freedom = se_squared * se_squared
            / ((var1 / n1).powi(2) / (n1 - 1.0) + (var2 / n2).powi(2) / (n2 - 1.0));

        let dist = StudentsT::new(0.0, 1.0, degrees_of_freedom)
            .map_err(|e| AnalyticsError::Distribution(e.to_string()))?;

        let p_value = 2.0 * dist.cdf(-t_statistic.abs());
        let t_critical = dist.inverse_cdf(1.0 - (1.0 - WELCH_CI_LEVEL) / 2.0);
        let half_width = t_critical * standard_error;

        Ok(WelchTest {
            t_statistic,
            p_value,
            ci_lower: mean_diff - half_width,
            ci_upper: mean_diff + half_width,
        })
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance with the n-1 denominator.
fn sample_variance(values: &[f64]) -> f64 {
    let m = mean(values);
    values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64
}

/// Sample covariance with the n-1 denominator.
fn sample_covariance(x: &[f64], y: &[f64]) -> f64 {
    let mx = mean(x);
    let my = mean(y);
    x.iter()
        .zip(y)
        .map(|(a, b)| (a - mx) * (b - my))
        .sum::<f64>()
        / (x.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use statrs::statistics::Statistics;

    fn engine() -> AnalyticsEngine {
        AnalyticsEngine::new(0.01, 0.95)
    }

    /// Deterministic stand-in for uniform noise: a multiplicative-hash
    /// sequence folded into [-scale/2, scale/2).
    fn hash_noise(i: usize, multiplier: usize, scale: f64) -> f64 {
        scale * ((i * multiplier % 1000) as f64 / 1000.0 - 0.4995)
    }

    #[test]
    fn beta_matches_independent_ols_fit() {
        let benchmark: Vec<f64> = (0..250).map(|i| hash_noise(i, 761, 0.02)).collect();
        let company: Vec<f64> = benchmark
            .iter()
            .enumerate()
            .map(|(i, b)| 2.0 * b + hash_noise(i, 383, 0.0005))
            .collect();

        let stats = engine().calculate("TM", &company, &benchmark).unwrap();

        // Reference fit via the closed-form normal equations.
        let n = benchmark.len() as f64;
        let sum_x: f64 = benchmark.iter().sum();
        let sum_y: f64 = company.iter().sum();
        let sum_xy: f64 = benchmark.iter().zip(&company).map(|(x, y)| x * y).sum();
        let sum_xx: f64 = benchmark.iter().map(|x| x * x).sum();
        let reference_slope = (n * sum_xy - sum_x * sum_y) / (n * sum_xx - sum_x * sum_x);

        assert_relative_eq!(stats.beta, reference_slope, epsilon = 1e-9);
        assert!((stats.beta - 2.0).abs() < 0.1);
    }

    #[test]
    fn scaled_benchmark_with_equal_means_passes_the_null() {
        // company = 1.5 * benchmark + small noise, both patterns built with
        // exactly zero mean, so the distributions share their mean and the
        // test must fail to reject.
        let benchmark: Vec<f64> = (0..250)
            .map(|i| 0.02 * ((i % 25) as f64 - 12.0) / 12.0)
            .collect();
        let company: Vec<f64> = benchmark
            .iter()
            .enumerate()
            .map(|(i, b)| 1.5 * b + 0.001 * ((i % 10) as f64 - 4.5) / 4.5)
            .collect();

        let stats = engine().calculate("TM", &company, &benchmark).unwrap();

        assert!((stats.beta - 1.5).abs() < 0.1);
        assert!(stats.p_value > 0.05);
        assert!(stats.ci_lower <= 0.0 && 0.0 <= stats.ci_upper);
    }

    #[test]
    fn sharpe_matches_reference_statistics_library() {
        let returns: Vec<f64> = (0..100).map(|i| hash_noise(i, 761, 0.03)).collect();

        let stats = engine().calculate("TM", &returns, &returns).unwrap();

        let reference = ((&returns[..]).mean() - 0.01 / 252.0) / (&returns[..]).std_dev();
        assert_relative_eq!(stats.sharpe_ratio, reference, epsilon = 1e-9);
    }

    #[test]
    fn welch_t_statistic_is_antisymmetric() {
        let a: Vec<f64> = (0..60).map(|i| 0.002 + hash_noise(i, 761, 0.02)).collect();
        let b: Vec<f64> = (0..60).map(|i| hash_noise(i, 383, 0.015)).collect();

        let forward = engine().welch_t_test(&a, &b).unwrap();
        let backward = engine().welch_t_test(&b, &a).unwrap();

        assert_relative_eq!(forward.t_statistic, -backward.t_statistic, epsilon = 1e-12);
        assert_relative_eq!(forward.p_value, backward.p_value, epsilon = 1e-12);
    }

    #[test]
    fn constant_series_degrades_to_nan_without_panicking() {
        let constant = vec![0.001; 50];
        let benchmark: Vec<f64> = (0..50).map(|i| hash_noise(i, 761, 0.02)).collect();

        // Constant company: Sharpe undefined, beta still defined.
        let stats = engine().calculate("TM", &constant, &benchmark).unwrap();
        assert!(stats.sharpe_ratio.is_nan());
        assert!(stats.beta.is_finite());

        // Constant benchmark: beta undefined.
        let stats = engine().calculate("TM", &benchmark, &constant).unwrap();
        assert!(stats.beta.is_nan());
        assert!(stats.sharpe_ratio.is_finite());

        // Both constant: the Welch statistic is undefined too.
        let stats = engine().calculate("TM", &constant, &constant).unwrap();
        assert!(stats.t_statistic.is_nan());
        assert!(stats.p_value.is_nan());
    }

    #[test]
    fn var_is_the_empirical_fifth_percentile() {
        let returns: Vec<f64> = (0..1000)
            .map(|i| -1.0 + 2.0 * i as f64 / 999.0)
            .collect();
        let benchmark = vec![0.0; 1000];

        let stats = engine().calculate("TM", &returns, &benchmark).unwrap();

        assert_relative_eq!(stats.var_95, -0.9, epsilon = 5e-3);
    }

    #[test]
    fn mismatched_columns_are_rejected() {
        let result = engine().calculate("TM", &[0.01, 0.02], &[0.01]);
        assert!(matches!(result, Err(AnalyticsError::MisalignedInput(_))));
    }

    #[test]
    fn single_observation_is_rejected() {
        let result = engine().calculate("TM", &[0.01], &[0.01]);
        assert!(matches!(result, Err(AnalyticsError::NotEnoughData(_))));
    }
}
