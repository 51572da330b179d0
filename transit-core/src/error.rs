//! Error type shared by every upstream client, normalizer, and service.
//!
//! All resource operations fail with the same enum: callers distinguish an
//! unavailable upstream (network failure, error status, throttling) from a
//! malformed response the normalizer cannot proceed on. Errors propagate
//! unchanged through the service layer; nothing is retried or substituted
//! with defaults here.

/// Errors from talking to the transit agency APIs.
#[derive(Debug, thiserror::Error)]
pub enum TransitError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream returned an error status code
    #[error("upstream error {status}: {message}")]
    Api { status: u16, message: String },

    /// Invalid or missing API credentials
    #[error("unauthorized by upstream API")]
    Unauthorized,

    /// Throttled by the upstream API
    #[error("rate limited by upstream API")]
    RateLimited,

    /// Response is missing required structure or fails to parse
    #[error("malformed upstream response: {message}")]
    Malformed { message: String },
}

impl TransitError {
    /// Build a `Malformed` error from a decode failure, keeping a short
    /// body snippet for diagnosis.
    pub fn malformed_body(err: impl std::fmt::Display, body: &str) -> Self {
        TransitError::Malformed {
            message: format!("{err} (body: {})", body.chars().take(200).collect::<String>()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = TransitError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert_eq!(err.to_string(), "upstream error 503: Service Unavailable");

        let err = TransitError::Malformed {
            message: "prediction missing prdtm".into(),
        };
        assert!(err.to_string().contains("malformed upstream response"));
    }

    #[test]
    fn malformed_body_truncates() {
        let body = "x".repeat(500);
        let err = TransitError::malformed_body("expected value", &body);
        let text = err.to_string();
        assert!(text.contains("expected value"));
        assert!(text.len() < 300);
    }
}
