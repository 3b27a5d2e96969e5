use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("rate limited")]
    RateLimited { retry_after: Option<Duration> },

    #[error("authentication rejected ({0})")]
    Auth(StatusCode),

    #[error("http error {status}")]
    Http { status: StatusCode, retriable: bool },

    #[error("request timeout")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("oracle is not configured")]
    NotConfigured,
}

impl OracleError {
    pub fn should_retry(&self) -> bool {
        match self {
            // Fatal errors - don't retry
            Self::Auth(_) => false,
            Self::MalformedResponse(_) => false,
            Self::NotConfigured => false,
            Self::Http { retriable, .. } => *retriable,

            // Temporary errors - retry
            Self::RateLimited { .. } => true,
            Self::Timeout => true,
            Self::Network(_) => true,
        }
    }

    /// Map a non-success status to an error.
    pub fn from_status(status: StatusCode, retry_after: Option<Duration>) -> Self {
        match status {
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited { retry_after },
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Auth(status),
            _ => Self::Http {
                status,
                retriable: status.is_server_error(),
            },
        }
    }

    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if let Some(status) = err.status() {
            Self::from_status(status, None)
        } else if err.is_decode() {
            Self::MalformedResponse(err.to_string())
        } else {
            Self::Network(err.to_string())
        }
    }
}
