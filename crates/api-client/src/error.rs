use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Failed to build or send the HTTP request: {0}")]
    RequestBuild(#[from] reqwest::Error),

    #[error("The provider returned HTTP status {0}: {1}")]
    Status(u16, String),

    #[error("The provider reported an error: {0}")]
    Provider(String),

    #[error("Failed to deserialize the API response: {0}")]
    Deserialization(String),

    #[error("The provider returned no usable data for '{0}'")]
    EmptySeries(String),

    #[error("Invalid data format from API: {0}")]
    InvalidData(String),
}
