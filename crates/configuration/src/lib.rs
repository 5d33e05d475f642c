use crate::error::ConfigError;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{ApiConfig, Config, ReportConfig};

/// Loads the application configuration.
///
/// Built-in defaults describe the standard report (four automobile
/// manufacturers against the S&P 500 over a trailing year); an optional
/// `config.toml` in the working directory overrides any of them. The loaded
/// configuration is validated before it is returned.
pub fn load_config() -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .set_default("report.tickers", vec!["TM", "F", "GM", "HMC"])?
        .set_default("report.benchmark", "^GSPC")?
        .set_default("report.lookback_days", 365)?
        .set_default("report.annual_risk_free_rate", 0.01)?
        .set_default("report.var_confidence", 0.95)?
        .set_default("report.rolling_window", 7)?
        .set_default("api.base_url", "https://query1.finance.yahoo.com")?
        .set_default("api.timeout_secs", 10)?
        .set_default("api.max_retries", 2)?
        // The file is optional: the defaults alone produce a working report.
        .add_source(config::File::with_name("config").required(false))
        .build()?;

    let config = builder.try_deserialize::<Config>()?;
    validate(&config)?;

    Ok(config)
}

/// Rejects configurations the pipeline cannot run with.
fn validate(config: &Config) -> Result<(), ConfigError> {
    let report = &config.report;

    if report.tickers.is_empty() {
        return Err(ConfigError::Validation(
            "at least one ticker is required".to_string(),
        ));
    }
    if report.benchmark.is_empty() {
        return Err(ConfigError::Validation(
            "a benchmark symbol is required".to_string(),
        ));
    }
    if report.tickers.contains(&report.benchmark) {
        return Err(ConfigError::Validation(format!(
            "benchmark '{}' must not also be listed as a ticker",
            report.benchmark
        )));
    }
    if report.lookback_days < 2 {
        return Err(ConfigError::Validation(format!(
            "lookback_days must be at least 2, got {}",
            report.lookback_days
        )));
    }
    if report.var_confidence <= 0.0 || report.var_confidence >= 1.0 {
        return Err(ConfigError::Validation(format!(
            "var_confidence must be strictly between 0 and 1, got {}",
            report.var_confidence
        )));
    }
    if report.rolling_window < 1 {
        return Err(ConfigError::Validation(
            "rolling_window must be at least 1".to_string(),
        ));
    }
    if config.api.timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "timeout_secs must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_standard_report() {
        let config = load_config().unwrap();

        assert_eq!(config.report.tickers, vec!["TM", "F", "GM", "HMC"]);
        assert_eq!(config.report.benchmark, "^GSPC");
        assert_eq!(config.report.lookback_days, 365);
        assert_eq!(config.report.rolling_window, 7);
        assert!((config.report.var_confidence - 0.95).abs() < f64::EPSILON);
    }

    #[test]
    fn validation_rejects_benchmark_listed_as_ticker() {
        let mut config = load_config().unwrap();
        config.report.tickers.push(config.report.benchmark.clone());

        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validation_rejects_out_of_range_confidence() {
        let mut config = load_config().unwrap();
        config.report.var_confidence = 1.0;

        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validation_rejects_short_lookback() {
        let mut config = load_config().unwrap();
        config.report.lookback_days = 1;

        assert!(matches!(
            validate(&config),
            Err(ConfigError::Validation(_))
        ));
    }
}
