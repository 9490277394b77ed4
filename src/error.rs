// Error types for starboard.
// Covers GitHub API failures, cache storage failures, document parsing and config.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StarboardError {
    #[error("GitHub API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Authentication failed: invalid or expired token")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Rate limit exceeded, resets at {reset_at}")]
    RateLimited { reset_at: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cache storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("{0}")]
    Other(String),
}

impl StarboardError {
    /// Whether the external source rejected the request for quota reasons.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, StarboardError::RateLimited { .. })
    }
}

pub type Result<T> = std::result::Result<T, StarboardError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_classification() {
        let err = StarboardError::RateLimited {
            reset_at: "12:00:00".to_string(),
        };
        assert!(err.is_rate_limited());
        assert!(err.to_string().contains("12:00:00"));

        assert!(!StarboardError::Unauthorized.is_rate_limited());
        assert!(
            !StarboardError::Http {
                status: 502,
                body: String::new()
            }
            .is_rate_limited()
        );
    }
}
