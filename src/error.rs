//! Error types for the copy-trade scorer

use thiserror::Error;

/// Result type alias using our custom Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the copy-trade scorer
#[derive(Error, Debug)]
pub enum Error {
    // Engine errors
    #[error("No trades to analyze")]
    EmptyInput,

    #[error("Invalid wallet address: {0:?}")]
    InvalidAddress(String),

    #[error("Malformed record #{index}: {reason}")]
    MalformedRecord { index: usize, reason: String },

    #[error("Timestamp {0} is outside the representable range")]
    TimestampOutOfRange(i64),

    // Configuration errors
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    // Data source errors
    #[error("RPC error: {0}")]
    Rpc(String),

    #[error("RPC timeout after {0}ms")]
    RpcTimeout(u64),

    #[error("API rejected request ({status}): {message}")]
    Api { status: u16, message: String },

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    // Generic errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Check if this error is retryable (transient)
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Rpc(_) | Error::RpcTimeout(_))
    }

    /// Check if this error only affects a single record of a batch
    pub fn is_record_local(&self) -> bool {
        matches!(self, Error::MalformedRecord { .. })
    }
}

// Conversion from reqwest errors
impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Rpc(e.to_string())
    }
}

// Conversion from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

// Conversion from I/O errors
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(Error::Rpc("503".into()).is_retryable());
        assert!(Error::RpcTimeout(10_000).is_retryable());
        assert!(!Error::EmptyInput.is_retryable());
        assert!(!Error::InvalidAddress("x".into()).is_retryable());
        assert!(!Error::Api {
            status: 401,
            message: "invalid api key".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_malformed_record_is_record_local() {
        let err = Error::MalformedRecord {
            index: 3,
            reason: "missing timestamp".into(),
        };
        assert!(err.is_record_local());
        assert_eq!(err.to_string(), "Malformed record #3: missing timestamp");
        assert!(!Error::EmptyInput.is_record_local());
    }
}
