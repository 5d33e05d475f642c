use serde::Deserialize;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub report: ReportConfig,
    pub api: ApiConfig,
}

/// Contains parameters for a single report run.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// The company symbols to analyze (e.g., "TM", "F").
    pub tickers: Vec<String>,
    /// The market benchmark symbol the companies are measured against.
    pub benchmark: String,
    /// The trailing lookback window, in calendar days.
    pub lookback_days: i64,
    /// The annual risk-free rate used for the Sharpe ratio.
    /// 0.01 corresponds to 1%.
    pub annual_risk_free_rate: f64,
    /// The Value-at-Risk confidence level (e.g., 0.95 for 95%).
    pub var_confidence: f64,
    /// The trailing rolling-mean window for the smoothed display series.
    pub rolling_window: usize,
}

/// Contains parameters for the market-data provider client.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// The provider's base URL.
    pub base_url: String,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
    /// How many extra attempts to make after a failed fetch.
    pub max_retries: u32,
}
