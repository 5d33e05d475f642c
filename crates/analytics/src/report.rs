use serde::{Deserialize, Serialize};

/// A standardized record of one company's risk and performance statistics.
///
/// This struct is the final output of the `AnalyticsEngine` and serves as the
/// data transfer object between the statistics engine and the presentation
/// layer. Every statistic is computed once from the aligned return table and
/// never mutated afterwards.
///
/// Degenerate inputs (a zero-variance benchmark for beta, a zero-variance
/// company series for Sharpe, a zero pooled standard error for the Welch
/// test) leave the affected fields as `NaN` rather than failing the run; the
/// remaining statistics for the same company stay valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyStatistics {
    pub symbol: String,

    // I. Sample description
    pub observations: usize,
    pub mean_daily_return: f64,

    // II. Risk and performance measures
    /// CAPM beta: OLS slope of company returns on benchmark returns.
    pub beta: f64,
    /// Daily Sharpe ratio against the configured risk-free rate.
    pub sharpe_ratio: f64,
    /// Historical Value-at-Risk as a signed daily return threshold.
    pub var_95: f64,

    // III. Welch two-sample t-test vs. the benchmark
    pub t_statistic: f64,
    pub p_value: f64,
    /// 95% confidence interval for the mean return difference.
    pub ci_lower: f64,
    pub ci_upper: f64,
}
