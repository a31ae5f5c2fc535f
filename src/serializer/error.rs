//! Error types for serializer operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by format plugins and the shared serializer plumbing.
#[derive(Debug, Error)]
pub enum SerializerError {
    /// The file is not an instance of this plugin's format. The host may try
    /// another plugin.
    #[error("Unknown file format: {path}: {message}")]
    Format { path: PathBuf, message: String },

    /// The format was recognized but this version/variant is not handled.
    #[error("Unsupported format version: {0}")]
    UnsupportedVersion(String),

    /// IO error during read, write, staging or file replacement.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error while staging or packaging.
    #[error("Archive error: {0}")]
    Archive(String),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(String),

    /// A save-as path was set on a plugin that can only overwrite its input.
    #[error("Saving to a new file is not supported by this format: {0}")]
    SaveAsNotSupported(PathBuf),

    /// No registered plugin recognized the file.
    #[error("No plugin recognized {0}")]
    NoPluginFound(PathBuf),
}

impl SerializerError {
    /// Create an unknown-format error for `path`.
    pub fn format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Format {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an archive error.
    pub fn archive(message: impl Into<String>) -> Self {
        Self::Archive(message.into())
    }

    /// Create a JSON error.
    pub fn json(message: impl Into<String>) -> Self {
        Self::Json(message.into())
    }

    /// Whether the host should fall through to the next candidate plugin.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Format { .. })
    }

    /// Whether the failure came from the file system or archive layer.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Io(_) | Self::Archive(_))
    }

    /// The detected version string of an [`SerializerError::UnsupportedVersion`].
    pub fn unsupported_version(&self) -> Option<&str> {
        match self {
            Self::UnsupportedVersion(v) => Some(v),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for SerializerError {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(io) => Self::Io(io),
            other => Self::Archive(other.to_string()),
        }
    }
}

impl From<serde_json::Error> for SerializerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Shorthand result type for serializer operations.
pub type Result<T, E = SerializerError> = std::result::Result<T, E>;
