//! Unified error types for the wallet assets core
//!
//! All errors flow through this module so that the aggregator boundary,
//! the FFI layer and the CLI report failures the same way.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Main error type for all asset operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetsError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl AssetsError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    // Convenience constructors
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, msg)
    }

    pub fn invalid_address(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidAddress, msg)
    }

    pub fn invalid_endpoint(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidEndpoint, msg)
    }

    pub fn network_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::NetworkError, msg)
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Timeout, msg)
    }

    pub fn rpc_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::RpcError, msg)
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::ParseError, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, msg)
    }

    /// Whether a later retry could plausibly succeed
    pub fn is_transient(&self) -> bool {
        matches!(
            self.code,
            ErrorCode::NetworkError | ErrorCode::Timeout | ErrorCode::RateLimited
        )
    }
}

impl fmt::Display for AssetsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for AssetsError {}

/// Error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // Input errors
    InvalidInput,
    InvalidAddress,
    InvalidEndpoint,

    // Network errors
    NetworkError,
    RateLimited,
    Timeout,
    RpcError,

    // Parse errors
    ParseError,
    JsonError,

    // Internal
    Internal,
}

/// Result type alias for asset operations
pub type AssetsResult<T> = Result<T, AssetsError>;

// Conversions from common error types

impl From<serde_json::Error> for AssetsError {
    fn from(e: serde_json::Error) -> Self {
        AssetsError::new(ErrorCode::JsonError, e.to_string())
    }
}

impl From<std::io::Error> for AssetsError {
    fn from(e: std::io::Error) -> Self {
        AssetsError::new(ErrorCode::Internal, e.to_string())
    }
}

impl From<reqwest::Error> for AssetsError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AssetsError::new(ErrorCode::Timeout, "Request timed out")
        } else if e.is_connect() {
            AssetsError::new(ErrorCode::NetworkError, "Connection failed")
        } else if e.is_decode() {
            AssetsError::new(ErrorCode::ParseError, e.to_string())
        } else if e.status().map(|s| s.as_u16() == 429).unwrap_or(false) {
            AssetsError::new(ErrorCode::RateLimited, e.to_string())
        } else {
            AssetsError::new(ErrorCode::NetworkError, e.to_string())
        }
    }
}

impl From<url::ParseError> for AssetsError {
    fn from(e: url::ParseError) -> Self {
        AssetsError::new(ErrorCode::InvalidEndpoint, format!("Invalid URL: {}", e))
    }
}

impl From<solana_sdk::pubkey::ParsePubkeyError> for AssetsError {
    fn from(e: solana_sdk::pubkey::ParsePubkeyError) -> Self {
        AssetsError::new(ErrorCode::InvalidAddress, format!("Invalid Solana address: {}", e))
    }
}

impl From<tokio::time::error::Elapsed> for AssetsError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        AssetsError::new(ErrorCode::Timeout, "Asset fetch timed out")
    }
}
