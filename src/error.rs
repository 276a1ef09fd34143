//! Global error handling for mediabrowse
//!
//! Every fallible operation in the crate returns [`MediaError`]. Callers at the
//! boundary (the CLI, or a web layer) map the variants to their own responses.

use std::io;
use thiserror::Error;

/// Global error type for mediabrowse operations
#[derive(Error, Debug)]
pub enum MediaError {
    /// The requested path escapes the media root
    #[error("Forbidden: path escapes the media root")]
    Forbidden,

    /// Path does not exist or has the wrong type
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad user input
    #[error("Validation error: {0}")]
    Validation(String),

    /// A required setting is absent from the settings store
    #[error("Missing required setting: {0}")]
    MissingSetting(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File system errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON processing errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Unexpected error
    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl MediaError {
    /// Message safe to show to an end user.
    ///
    /// Security-sensitive failures get a generic text so the filesystem layout
    /// is not leaked; validation failures keep their specific message.
    pub fn public_message(&self) -> String {
        match self {
            Self::Forbidden => "Access denied".to_string(),
            Self::NotFound(_) => "Not found".to_string(),
            Self::Validation(msg) => msg.clone(),
            Self::MissingSetting(_) | Self::Config(_) => "Server misconfigured".to_string(),
            Self::Io(_) | Self::Json(_) | Self::Unexpected(_) => {
                "Internal error".to_string()
            }
        }
    }

    /// Process exit code used by the command-line front end
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Forbidden => 3,
            Self::NotFound(_) => 4,
            Self::Validation(_) => 2,
            Self::MissingSetting(_) | Self::Config(_) => 78,
            Self::Io(_) | Self::Json(_) | Self::Unexpected(_) => 1,
        }
    }
}

/// Specialized Result type for mediabrowse operations
pub type Result<T> = std::result::Result<T, MediaError>;

/// Creates a MediaError with a formatted message
#[macro_export]
macro_rules! error {
    ($error_type:ident, $($arg:tt)*) => {
        $crate::error::MediaError::$error_type(format!($($arg)*))
    };
}

/// Returns an error result with a formatted message
#[macro_export]
macro_rules! bail {
    ($error_type:ident, $($arg:tt)*) => {
        return Err($crate::error!($error_type, $($arg)*))
    };
}

/// Ensures a condition is true, otherwise returns an error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $error_type:ident, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($error_type, $($arg)*)
        }
    };
}

/// Extension trait for adding context to errors
pub trait ResultExt<T, E> {
    /// Add additional context to an error
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display;
}

impl<T, E: std::error::Error + 'static> ResultExt<T, E> for std::result::Result<T, E> {
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: std::fmt::Display,
    {
        self.map_err(|e| {
            let context = f();
            MediaError::Unexpected(format!("{}: {}", context, e))
        })
    }
}
