use crate::domain::errors::DomainError;
use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    /// Server-side misconfiguration, e.g. a missing CRM credential
    Configuration(String),
    /// Non-2xx answer from the CRM; the body is passed on for diagnosis
    Upstream { status: u16, body: String },
    TooManyRequests { retry_after_seconds: u64 },
    Internal(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            ApiError::Upstream { status, body } => write!(f, "Upstream error {}: {}", status, body),
            ApiError::TooManyRequests {
                retry_after_seconds,
            } => write!(f, "Too many requests, retry in {}s", retry_after_seconds),
            ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Status, public message and optional upstream details
    fn parts(&self) -> (StatusCode, String, Option<String>) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            ApiError::Configuration(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone(), None),
            ApiError::Upstream { status, body } => {
                let status = StatusCode::from_u16(*status)
                    .ok()
                    .filter(|s| s.is_client_error() || s.is_server_error())
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (status, "CRM request failed".to_string(), Some(body.clone()))
            }
            ApiError::TooManyRequests {
                retry_after_seconds,
            } => (
                StatusCode::TOO_MANY_REQUESTS,
                format!(
                    "Too many attempts. Please try again in {} seconds.",
                    retry_after_seconds
                ),
                None,
            ),
            ApiError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                None,
            ),
        }
    }

    /// Render with the given boolean discriminator key (`success` or `found`)
    fn render(self, discriminator: &str) -> Response {
        if let ApiError::Internal(msg) = &self {
            tracing::error!("Internal error: {}", msg);
        }

        let (status, message, details) = self.parts();

        let mut body = json!({
            discriminator: false,
            "error": message,
        });
        if let Some(details) = details {
            body["details"] = json!(details);
        }

        let mut response = (status, Json(body)).into_response();
        if let ApiError::TooManyRequests {
            retry_after_seconds,
        } = self
        {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from(retry_after_seconds));
        }
        response
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.render("success")
    }
}

/// Error of the contact lookup, whose body is discriminated by `found`
#[derive(Debug)]
pub struct ContactLookupError(pub ApiError);

impl IntoResponse for ContactLookupError {
    fn into_response(self) -> Response {
        self.0.render("found")
    }
}

impl From<DomainError> for ContactLookupError {
    fn from(err: DomainError) -> Self {
        ContactLookupError(err.into())
    }
}

// Convert from domain errors
impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ValidationError(msg) => ApiError::BadRequest(msg),
            DomainError::Configuration(msg) => ApiError::Configuration(msg),
            DomainError::Upstream { status, body } => ApiError::Upstream { status, body },
            DomainError::NotFound(msg) => ApiError::NotFound(msg),
            DomainError::RateLimited {
                retry_after_seconds,
            } => ApiError::TooManyRequests {
                retry_after_seconds,
            },
            DomainError::Internal(msg) => ApiError::Internal(msg),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
