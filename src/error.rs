//! Error types for Shockwatch
//!
//! The detector core never fails. Everything here is raised at a boundary:
//! JSON input validation, state files, or the CLI.

use thiserror::Error;

/// Errors raised before or after evaluation, never during it
#[derive(Error, Debug)]
pub enum ShockError {
    /// A field was present but had the wrong shape
    #[error("malformed input at `{field}`: {message}")]
    MalformedInput { field: String, message: String },

    #[error("I/O operation failed: {operation}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ShockError {
    pub fn malformed(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn io(operation: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }

    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }

    /// Field name for malformed input, if that is what this is
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MalformedInput { field, .. } => Some(field),
            _ => None,
        }
    }

    /// True when the caller supplied bad data (400-class in the HTTP host)
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::MalformedInput { .. })
    }
}
