//! Error types for the NEAR RPC client.
//!
//! Every failure a call function can produce is one of four kinds. Callers should
//! branch on [`NearError::kind`] rather than on message text.

use thiserror::Error;

/// Coarse classification of a [`NearError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller arguments were malformed, missing, or conflicting
    Validation,

    /// Network failure, timeout, or non-2xx HTTP status after retries
    Transport,

    /// The node answered with a JSON-RPC `error` envelope
    Protocol,

    /// The response was JSON but not the shape the method expects
    Format,
}

/// Errors surfaced by the transport and every call function
#[derive(Debug, Error)]
pub enum NearError {
    #[error("Invalid argument: {0}")]
    Validation(String),

    #[error("Transport error calling '{method}'{}: {message}", fmt_status(.status))]
    Transport {
        method: String,
        status: Option<u16>,
        message: String,
        /// Whether another attempt could succeed
        retryable: bool,
    },

    #[error("RPC error from '{method}': {message}")]
    Protocol {
        method: String,
        code: Option<i64>,
        message: String,
        /// NEAR's structured `cause.name`, when the node sends one
        cause: Option<String>,
        data: Option<serde_json::Value>,
    },

    #[error("Unexpected response from '{method}': {message}")]
    Format { method: String, message: String },
}

fn fmt_status(status: &Option<u16>) -> String {
    match status {
        Some(code) => format!(" (HTTP {})", code),
        None => String::new(),
    }
}

impl NearError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn format(method: &str, message: impl Into<String>) -> Self {
        Self::Format {
            method: method.to_string(),
            message: message.into(),
        }
    }

    pub fn transport(
        method: &str,
        status: Option<u16>,
        message: impl Into<String>,
        retryable: bool,
    ) -> Self {
        Self::Transport {
            method: method.to_string(),
            status,
            message: message.into(),
            retryable,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Transport { .. } => ErrorKind::Transport,
            Self::Protocol { .. } => ErrorKind::Protocol,
            Self::Format { .. } => ErrorKind::Format,
        }
    }

    /// Remote method the error relates to (none for validation errors)
    pub fn method(&self) -> Option<&str> {
        match self {
            Self::Validation(_) => None,
            Self::Transport { method, .. }
            | Self::Protocol { method, .. }
            | Self::Format { method, .. } => Some(method),
        }
    }

    /// Only transport failures flagged retryable are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport { retryable: true, .. })
    }
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, NearError>;

/// Errors from writing rendered tables
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to write output: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize table: {0}")]
    Serialize(#[from] serde_json::Error),
}
