use thiserror::Error;

/// A projection request that cannot be turned into a `SimulationConfig`.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("--{flag} must be >= 0")]
    Negative { flag: &'static str },
    #[error("--{flag} must be a finite number")]
    NonFinite { flag: &'static str },
    #[error("--years must be <= {max}")]
    HorizonTooLong { max: f64 },
    #[error("Invalid API JSON payload: {0}")]
    Payload(String),
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("failed to render JSON output: {0}")]
    Render(#[from] serde_json::Error),
}
