//! Error handling for domain-scout

use std::time::Duration;

use thiserror::Error;

use crate::types::FailureKind;

/// Main error type for domain-scout
#[derive(Error, Debug, Clone)]
pub enum ScoutError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("Timeout error: {operation} timed out{}", timeout_suffix(.timeout))]
    Timeout {
        operation: String,
        timeout: Option<Duration>,
    },

    #[error("Parse error: {message}")]
    Parse {
        message: String,
        content: Option<String>,
    },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },

    #[error("CLI error: {message}")]
    Cli { message: String },
}

fn timeout_suffix(timeout: &Option<Duration>) -> String {
    timeout.map_or(String::new(), |t| format!(" after {}ms", t.as_millis()))
}

/// Longest response excerpt kept inside a parse error.
const MAX_CONTENT_EXCERPT: usize = 256;

impl ScoutError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a network error
    pub fn network(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout,
        }
    }

    /// Create a parse error, keeping at most a short excerpt of the content
    pub fn parse(message: impl Into<String>, content: Option<String>) -> Self {
        Self::Parse {
            message: message.into(),
            content: content.map(|c| excerpt(&c)),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Create a CLI error
    pub fn cli(message: impl Into<String>) -> Self {
        Self::Cli {
            message: message.into(),
        }
    }

    /// Map a per-key lookup error onto the failure taxonomy recorded with
    /// an `Unknown` outcome.
    ///
    /// Anything that is neither a timeout nor a parse problem happened on the
    /// way to or from the registry, so it counts as a network failure.
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::Timeout { .. } => FailureKind::Timeout,
            Self::Parse { .. } => FailureKind::Parse,
            _ => FailureKind::Network,
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!(
                    "❌ Configuration problem: {}\n💡 Check your .env file or command flags",
                    message
                )
            }
            Self::Network { message, status_code, .. } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                format!("❌ Network error{}: {}\n💡 Check your internet connection", status, message)
            }
            Self::Timeout { operation, .. } => {
                format!(
                    "⏱️  Operation '{}' timed out\n💡 Try increasing --timeout or reducing --concurrency",
                    operation
                )
            }
            Self::Parse { message, .. } => {
                format!(
                    "❌ Parse error: {}\n💡 The registry may be throttling requests, try again later",
                    message
                )
            }
            Self::Validation { message } => {
                format!(
                    "❌ Validation error: {}\n💡 Keys must be lowercase letters, digits, hyphens and dots",
                    message
                )
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!(
                    "❌ File error{}: {}\n💡 Check file permissions and paths",
                    path_info,
                    message
                )
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
            Self::Cli { message } => {
                format!("❌ Command error: {}\n💡 Use --help for usage information", message)
            }
        }
    }
}

fn excerpt(content: &str) -> String {
    if content.len() <= MAX_CONTENT_EXCERPT {
        return content.to_string();
    }
    let mut end = MAX_CONTENT_EXCERPT;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…", &content[..end])
}

/// Convert from common error types
impl From<reqwest::Error> for ScoutError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| u.to_string());

        if err.is_timeout() {
            Self::timeout("HTTP request", None)
        } else if err.is_connect() {
            Self::network(format!("Connection failed: {}", err), status_code, url)
        } else if err.is_decode() {
            Self::network(format!("Failed to read response body: {}", err), status_code, url)
        } else {
            Self::network(err.to_string(), status_code, url)
        }
    }
}

impl From<serde_json::Error> for ScoutError {
    fn from(err: serde_json::Error) -> Self {
        Self::parse(err.to_string(), None)
    }
}

impl From<std::io::Error> for ScoutError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string(), None)
    }
}

impl From<tokio::time::error::Elapsed> for ScoutError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Self::timeout("Operation", None)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ScoutError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! config_error {
    ($msg:expr) => {
        $crate::error::ScoutError::config($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::ScoutError::config(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::ScoutError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::ScoutError::validation(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::error::ScoutError::internal($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::ScoutError::internal(format!($fmt, $($arg)*))
    };
}
