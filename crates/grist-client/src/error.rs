//! Error types for the Grist client

use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Main error type for Grist API operations
#[derive(Error, Debug)]
pub enum ClientError {
    /// Missing, empty, or rejected credential
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Transport failure or timeout; retryable
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status, carrying the remote error message
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body that does not match the expected shape
    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Whether re-issuing the same request may succeed.
    ///
    /// Only transport-level failures qualify; the operator retries by
    /// re-triggering the operation, there is no automatic retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }

    /// Whether the failure is a credential problem
    pub fn is_auth(&self) -> bool {
        matches!(self, ClientError::Auth(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Network(format!("request timed out: {}", err))
        } else if err.is_connect() {
            ClientError::Network(format!("connection failed: {}", err))
        } else {
            ClientError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        ClientError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_errors_are_retryable() {
        let err = ClientError::Network("connection reset".to_string());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_api_errors_are_not_retryable() {
        let err = ClientError::Api {
            status: 500,
            message: "internal error".to_string(),
        };
        assert!(!err.is_retryable());
        assert!(!err.is_auth());
    }

    #[test]
    fn test_api_error_carries_remote_message() {
        let err = ClientError::Api {
            status: 404,
            message: "document not found".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("404"));
        assert!(text.contains("document not found"));
    }
}
