//! Error taxonomy for remote fetches and client configuration.

use std::time::Duration;

use thiserror::Error;

/// Terminal or per-attempt failure of a fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected status {0}")]
    BadStatus(u16),

    #[error("failed to decode response: {0}")]
    DecodeError(String),

    #[error("cancelled")]
    Cancelled,

    #[error("gave up after {attempts} attempts: {last}")]
    RetriesExhausted { attempts: u32, last: Box<FetchError> },
}

impl FetchError {
    /// Whether another attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Timeout | FetchError::Transport(_) | FetchError::BadStatus(_) => true,
            FetchError::DecodeError(_)
            | FetchError::Cancelled
            | FetchError::RetriesExhausted { .. } => false,
        }
    }

    /// Innermost cause, looking through `RetriesExhausted`.
    pub fn root_cause(&self) -> &FetchError {
        match self {
            FetchError::RetriesExhausted { last, .. } => last.root_cause(),
            other => other,
        }
    }

    /// Text safe to show an end user. Never carries transport or decoder internals.
    pub fn user_message(&self) -> String {
        match self.root_cause() {
            FetchError::Timeout => "timed out".to_string(),
            FetchError::Transport(_) => "could not reach the server".to_string(),
            FetchError::BadStatus(code) => format!("server responded with status {code}"),
            FetchError::DecodeError(_) => "the server sent an unexpected response".to_string(),
            FetchError::Cancelled => "cancelled".to_string(),
            FetchError::RetriesExhausted { .. } => "request failed".to_string(),
        }
    }
}

/// Rejected client configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("request timeout must be positive, got {0:?}")]
    NonPositiveTimeout(Duration),

    #[error("max attempts must be at least 1")]
    ZeroAttempts,

    #[error("backoff base {0} does not make every retry wait longer than the last")]
    NonGrowingBackoff(f64),

    #[error("backoff unit must be positive")]
    ZeroBackoffUnit,

    #[error("invalid url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}
