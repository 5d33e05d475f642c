use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Not enough data to perform calculation: {0}")]
    NotEnoughData(String),

    #[error("Input series are misaligned: {0}")]
    MisalignedInput(String),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Failed to construct the test distribution: {0}")]
    Distribution(String),

    #[error("Risk calculation failed: {0}")]
    Risk(#[from] risk::RiskError),

    #[error("Error in calculation: {0}")]
    Calculation(String),
}
