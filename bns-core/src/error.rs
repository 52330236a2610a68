//! Error types for the BNS deploy toolkit.
//!
//! Internal code propagates these with `?`. Public client operations convert
//! them into a [`Status`](crate::Status) before they reach a caller.

use thiserror::Error;

/// Result type alias using `BnsError`.
pub type Result<T> = std::result::Result<T, BnsError>;

/// Main error type for all toolkit operations.
#[derive(Debug, Error)]
pub enum BnsError {
    // ═══════════════════════════════════════════════════════════════════════════
    // NETWORK ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// HTTP transport failed before a response arrived.
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Upstream answered with a non-2xx status.
    #[error("HTTP {method} {url} returned status {status}")]
    HttpStatus {
        /// Request method
        method: String,
        /// Request URL
        url: String,
        /// Upstream status code
        status: u16,
    },

    /// JSON-RPC call returned an `error` member.
    #[error("RPC call failed: {0}")]
    RpcError(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONTENT STORE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Source file for an upload does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// IPFS add failed.
    #[error("IPFS add failed: {0}")]
    IpfsAddFailed(String),

    /// IPFS unpin failed.
    #[error("IPFS unpin failed for CID '{cid}': {reason}")]
    IpfsUnpinFailed {
        /// Content id
        cid: String,
        /// Failure detail
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // EXPORT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Writing an artifact failed.
    #[error("Export to '{path}' failed: {reason}")]
    ExportFailed {
        /// Resolved target path
        path: String,
        /// Failure detail
        reason: String,
    },

    /// Existing artifact is not a JSON object.
    #[error("Corrupt artifact document at '{path}': {reason}")]
    CorruptDocument {
        /// Resolved target path
        path: String,
        /// Parse failure detail
        reason: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // DEPLOYMENT ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// No deployment record exists for a contract.
    #[error("Deployment record not found for '{name}' on {network}")]
    DeploymentNotFound {
        /// Deployment name
        name: String,
        /// Network name
        network: String,
    },

    /// Deployment step failed.
    #[error("Deployment of '{name}' failed: {reason}")]
    DeployFailed {
        /// Deployment name
        name: String,
        /// Failure detail
        reason: String,
    },

    /// Network has no registered profile.
    #[error("Unknown network: {0}")]
    UnknownNetwork(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // SERIALIZATION & STORAGE ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    // ═══════════════════════════════════════════════════════════════════════════
    // VALIDATION & INTERNAL ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Input validation failed.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An operation reported an error status.
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    /// Internal invariant violation.
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl BnsError {
    /// Returns true if a caller could reasonably retry.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BnsError::HttpError(_)
                | BnsError::HttpStatus { .. }
                | BnsError::RpcError(_)
                | BnsError::IpfsAddFailed(_)
                | BnsError::IpfsUnpinFailed { .. }
        )
    }

    /// Returns true if this is a configuration or validation error.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            BnsError::ConfigError(_) | BnsError::ValidationError(_) | BnsError::UnknownNetwork(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = BnsError::HttpStatus {
            method: "GET".into(),
            url: "https://example.com".into(),
            status: 503,
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("https://example.com"));
    }

    #[test]
    fn test_error_classification() {
        assert!(BnsError::HttpError("reset".into()).is_recoverable());
        assert!(BnsError::RpcError("nonce too low".into()).is_recoverable());
        assert!(!BnsError::FileNotFound("a.txt".into()).is_recoverable());

        assert!(BnsError::UnknownNetwork("moon".into()).is_config_error());
        assert!(!BnsError::HttpError("reset".into()).is_config_error());
    }

    #[test]
    fn test_json_error_conversion() {
        let json_result: std::result::Result<serde_json::Value, _> = serde_json::from_str("{oops");
        let result: Result<serde_json::Value> = json_result.map_err(BnsError::from);
        assert!(matches!(result, Err(BnsError::JsonError(_))));
    }
}
