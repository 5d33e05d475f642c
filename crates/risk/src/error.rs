use thiserror::Error;

#[derive(Error, Debug)]
pub enum RiskError {
    #[error("Not enough data to estimate the quantile: {0}")]
    InsufficientData(String),

    #[error("Confidence level {0} is outside the open interval (0, 1)")]
    InvalidConfidence(f64),
}
