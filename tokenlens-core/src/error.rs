//! Error types for Tokenlens.
//!
//! This module provides the error hierarchy using `thiserror`. All errors
//! include context and are designed to be actionable.
//!
//! A confirmed "not found" from the metadata API is NOT an error: the
//! client surfaces it as `Ok(None)`. Only transport failures, unexpected
//! statuses, deadlines, and invalid input are represented here.

use thiserror::Error;

/// Result type alias using `TokenLensError`.
pub type Result<T> = std::result::Result<T, TokenLensError>;

/// Main error type for all Tokenlens operations.
#[derive(Debug, Error)]
pub enum TokenLensError {
    // ═══════════════════════════════════════════════════════════════════════════
    // NETWORK ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// HTTP request failed at the transport level (connect, DNS, body read).
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The API answered with a non-success status other than 404.
    #[error("API error: unexpected status {status}")]
    UnexpectedStatus {
        /// HTTP status code returned by the API.
        status: u16,
    },

    /// The request exceeded the client's configured deadline.
    #[error("request timeout after {ms}ms")]
    Timeout {
        /// Configured deadline in milliseconds.
        ms: u64,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input validation failed (e.g. empty token address).
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TokenLensError {
    /// Returns true if this error is transient and worth retrying.
    pub fn is_recoverable(&self) -> bool {
        match self {
            TokenLensError::Http(_) | TokenLensError::Timeout { .. } => true,
            TokenLensError::UnexpectedStatus { status } => *status >= 500,
            _ => false,
        }
    }

    /// Returns true if this error is a deadline violation.
    pub fn is_timeout(&self) -> bool {
        matches!(self, TokenLensError::Timeout { .. })
    }
}
