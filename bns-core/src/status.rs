//! The uniform outcome value returned by client operations.
//!
//! Clients never hand errors back through `Result`; they return a [`Status`]
//! whose tag the caller must check before reading the payload.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::constants::SYSTEM_BUSY;
use crate::error::{BnsError, Result};

/// Type tag of a [`Status`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
    /// Informational outcome
    Info,
    /// Neither success nor failure
    Neutral,
}

impl StatusKind {
    /// Returns the lowercase tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            StatusKind::Success => "success",
            StatusKind::Error => "error",
            StatusKind::Info => "info",
            StatusKind::Neutral => "neutral",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatusKind {
    type Err = BnsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "success" => Ok(StatusKind::Success),
            "error" => Ok(StatusKind::Error),
            "info" => Ok(StatusKind::Info),
            "neutral" => Ok(StatusKind::Neutral),
            other => Err(BnsError::ValidationError(format!(
                "unknown status type '{}'",
                other
            ))),
        }
    }
}

/// Outcome of an operation: a type tag, a message and an optional payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Status<T> {
    /// Operation succeeded.
    Success {
        /// Human-readable message (often empty)
        message: String,
        /// Payload
        data: Option<T>,
    },
    /// Operation failed.
    Error {
        /// Error message shown to callers
        message: String,
        /// Optional payload
        data: Option<T>,
    },
    /// Informational outcome.
    Info {
        /// Message
        message: String,
        /// Optional payload
        data: Option<T>,
    },
    /// Neutral outcome.
    Neutral {
        /// Message
        message: String,
        /// Optional payload
        data: Option<T>,
    },
}

impl<T> Status<T> {
    /// Builds a success status.
    pub fn success(message: impl Into<String>, data: impl Into<Option<T>>) -> Self {
        Status::Success {
            message: message.into(),
            data: data.into(),
        }
    }

    /// Builds an error status.
    pub fn error(message: impl Into<String>, data: impl Into<Option<T>>) -> Self {
        Status::Error {
            message: message.into(),
            data: data.into(),
        }
    }

    /// Builds an info status.
    pub fn info(message: impl Into<String>, data: impl Into<Option<T>>) -> Self {
        Status::Info {
            message: message.into(),
            data: data.into(),
        }
    }

    /// Builds a neutral status.
    pub fn neutral(message: impl Into<String>, data: impl Into<Option<T>>) -> Self {
        Status::Neutral {
            message: message.into(),
            data: data.into(),
        }
    }

    /// The opaque error returned for transport, status and storage failures.
    pub fn system_busy() -> Self {
        Status::Error {
            message: SYSTEM_BUSY.into(),
            data: None,
        }
    }

    /// Builds a status from a textual tag.
    ///
    /// Never fails: an unrecognised tag yields an error status carrying a
    /// diagnostic message.
    pub fn from_parts(kind: &str, message: impl Into<String>, data: Option<T>) -> Self {
        match kind.parse::<StatusKind>() {
            Ok(kind) => Self::with_kind(kind, message, data),
            Err(e) => {
                warn!(kind, error = %e, "Malformed status");
                Status::Error {
                    message: format!("an error occurred: {}", e),
                    data: None,
                }
            }
        }
    }

    fn with_kind(kind: StatusKind, message: impl Into<String>, data: Option<T>) -> Self {
        let message = message.into();
        match kind {
            StatusKind::Success => Status::Success { message, data },
            StatusKind::Error => Status::Error { message, data },
            StatusKind::Info => Status::Info { message, data },
            StatusKind::Neutral => Status::Neutral { message, data },
        }
    }

    /// Returns the type tag.
    pub fn kind(&self) -> StatusKind {
        match self {
            Status::Success { .. } => StatusKind::Success,
            Status::Error { .. } => StatusKind::Error,
            Status::Info { .. } => StatusKind::Info,
            Status::Neutral { .. } => StatusKind::Neutral,
        }
    }

    /// Returns the message.
    pub fn message(&self) -> &str {
        match self {
            Status::Success { message, .. }
            | Status::Error { message, .. }
            | Status::Info { message, .. }
            | Status::Neutral { message, .. } => message,
        }
    }

    /// Returns the payload, if any.
    pub fn data(&self) -> Option<&T> {
        match self {
            Status::Success { data, .. }
            | Status::Error { data, .. }
            | Status::Info { data, .. }
            | Status::Neutral { data, .. } => data.as_ref(),
        }
    }

    /// Consumes the status and returns the payload.
    pub fn into_data(self) -> Option<T> {
        match self {
            Status::Success { data, .. }
            | Status::Error { data, .. }
            | Status::Info { data, .. }
            | Status::Neutral { data, .. } => data,
        }
    }

    /// True for error statuses.
    pub fn is_error(&self) -> bool {
        matches!(self, Status::Error { .. })
    }

    /// True for success statuses.
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success { .. })
    }

    /// True for info statuses.
    pub fn is_info(&self) -> bool {
        matches!(self, Status::Info { .. })
    }

    /// True for neutral statuses.
    pub fn is_neutral(&self) -> bool {
        matches!(self, Status::Neutral { .. })
    }

    /// Transforms the payload, keeping tag and message.
    pub fn map<U, F>(self, f: F) -> Status<U>
    where
        F: FnOnce(T) -> U,
    {
        let kind = self.kind();
        let message = self.message().to_string();
        Status::<U>::with_kind(kind, message, self.into_data().map(f))
    }

    /// Converts into a `Result`, turning an error status into
    /// [`BnsError::OperationFailed`].
    pub fn into_result(self) -> Result<Option<T>> {
        match self {
            Status::Error { message, .. } => Err(BnsError::OperationFailed(message)),
            other => Ok(other.into_data()),
        }
    }
}

impl<T> From<Result<T>> for Status<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Status::success("", data),
            Err(e) => Status::Error {
                message: e.to_string(),
                data: None,
            },
        }
    }
}

impl<T> fmt::Display for Status<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message().is_empty() {
            write!(f, "{}", self.kind())
        } else {
            write!(f, "{}: {}", self.kind(), self.message())
        }
    }
}
