//! Error type shared by every script building stage
//!
//! All errors are returned synchronously to the immediate caller. Argument and binding
//! errors are raised before any fragment for the failing call is appended, dependency
//! errors are raised while rendering and abort the whole document.

use std::path::PathBuf;

/// Errors that can occur while building, rendering or writing a script
#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    /// A declared dependency has no entry in the inline library table
    #[error("dependency '{0}' has no inline library source")]
    DependencyNotFound(String),

    /// The target of a key binding cannot be emitted
    #[error("invalid binding target for '{key}': {reason}")]
    InvalidBindingTarget { key: String, reason: String },

    /// Arguments do not satisfy the operation's declared contract
    #[error("invalid arguments for '{operation}': {reason}")]
    InvalidArgument { operation: String, reason: String },

    /// No operation with this name exists in the global operation table
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    /// A script manifest could not be parsed
    #[error("invalid script manifest: {0}")]
    Manifest(String),

    /// Reading libraries or writing the rendered script failed
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScriptError {
    pub(crate) fn invalid_argument(operation: &str, reason: impl Into<String>) -> Self {
        ScriptError::InvalidArgument {
            operation: operation.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_binding(key: &str, reason: impl Into<String>) -> Self {
        ScriptError::InvalidBindingTarget {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScriptError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ScriptError>;
