use thiserror::Error;

/// Errors raised while configuring or running the Gaussian context transformer.
#[derive(Debug, Error)]
pub enum GctError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid input shape: expected {expected}, got {actual:?}")]
    InvalidShape {
        expected: &'static str,
        actual: Vec<i64>,
    },

    #[error("tensor operation failed: {0}")]
    Tensor(#[from] tch::TchError),

    #[error("could not read configuration file: {0}")]
    Io(#[from] std::io::Error),

    #[error("could not parse configuration file: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GctError>;
