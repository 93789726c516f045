//! Error types for format reading and writing.

use thiserror::Error;

/// Errors that can occur while reading or writing a checklist format.
#[derive(Debug, Error)]
pub enum FormatError {
    /// Bytes or structure that do not match what the format expects.
    #[error("Malformed {format} file: {message}")]
    Malformed {
        format: &'static str,
        message: String,
    },

    /// Missing required field or entry.
    #[error("Missing required {kind}: {name}")]
    Missing { kind: &'static str, name: String },

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// Compressed archive error.
    #[error("Archive error: {0}")]
    Archive(String),

    /// Encryption or decryption failure.
    #[error("Crypto error: {0}")]
    Crypto(String),

    /// The model cannot be expressed in the target format.
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// The model failed validation before writing.
    #[error("Validation error: {0}")]
    Validation(String),

    /// IO error during read/write.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FormatError {
    /// Create a malformed-input error for the given format.
    pub fn malformed(format: &'static str, message: impl Into<String>) -> Self {
        Self::Malformed {
            format,
            message: message.into(),
        }
    }

    /// Create a JSON error.
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json(message.into())
    }

    /// Create an archive error.
    pub fn archive(message: impl Into<String>) -> Self {
        Self::Archive(message.into())
    }

    /// Create a crypto error.
    pub fn crypto(message: impl Into<String>) -> Self {
        Self::Crypto(message.into())
    }

    /// Create an unsupported-content error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    /// Create a missing field error.
    pub fn missing_field(name: impl Into<String>) -> Self {
        Self::Missing {
            kind: "field",
            name: name.into(),
        }
    }

    /// Create a missing archive entry error.
    pub fn missing_entry(name: impl Into<String>) -> Self {
        Self::Missing {
            kind: "entry",
            name: name.into(),
        }
    }

    /// Whether the input simply is not a file of the attempted format.
    ///
    /// These errors are expected while probing candidate formats. Anything
    /// else points at a fault in the environment or the model.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Self::Malformed { .. }
                | Self::Missing { .. }
                | Self::Json(_)
                | Self::Archive(_)
                | Self::Crypto(_)
        )
    }
}
