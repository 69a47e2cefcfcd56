use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Upstream error {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("Entity not found: {0}")]
    NotFound(String),
    #[error("Rate limited, retry in {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
