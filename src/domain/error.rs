//! Error types shared across layers.

use thiserror::Error;

/// Top-level application error
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    ExternalService(#[from] ExternalServiceError),

    #[error("Invalid request body: {0}")]
    Deserialization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failures talking to the ledger explorer API
#[derive(Debug, Error)]
pub enum ExternalServiceError {
    #[error("Ledger API request failed: {0}")]
    Network(String),

    #[error("Ledger API returned {status_code}")]
    ApiError { status_code: u16, message: String },

    #[error("Ledger API response could not be parsed: {0}")]
    ParseError(String),

    #[error("Ledger API request timed out: {0}")]
    Timeout(String),
}

/// Startup configuration problems
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_message_only_mentions_status() {
        let err = AppError::from(ExternalServiceError::ApiError {
            status_code: 503,
            message: "upstream body".to_string(),
        });
        assert_eq!(err.to_string(), "Ledger API returned 503");
    }

    #[test]
    fn test_config_error_names_variable() {
        assert_eq!(
            ConfigError::Missing("FEE_ADDRESS").to_string(),
            "FEE_ADDRESS not set"
        );
    }
}
