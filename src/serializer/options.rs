//! Host-level serializer options.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::SerializerError;
use crate::base::TextEncoding;

/// Options every plugin instance is created with.
///
/// Stored as JSON, e.g.:
///
/// ```json
/// { "default_encoding": "windows-1254", "compress_archives": true }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializerOptions {
    /// Code page for formats without an encoding marker.
    pub default_encoding: TextEncoding,
    /// Parent directory for staged archives (system temp dir when unset).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_root: Option<PathBuf>,
    /// Deflate archive members when repackaging instead of storing them.
    pub compress_archives: bool,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            default_encoding: TextEncoding::default(),
            temp_root: None,
            compress_archives: true,
        }
    }
}

impl SerializerOptions {
    /// Read options from a JSON file; missing keys keep their defaults.
    pub fn read_from_file(path: &Path) -> Result<Self, SerializerError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, SerializerError> {
        serde_json::from_str(json).map_err(|e| SerializerError::json(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, SerializerError> {
        serde_json::to_string_pretty(self).map_err(|e| SerializerError::json(e.to_string()))
    }

    pub fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    pub fn with_default_encoding(mut self, encoding: TextEncoding) -> Self {
        self.default_encoding = encoding;
        self
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let opts = SerializerOptions::from_json(r#"{ "compress_archives": false }"#).unwrap();
        assert!(!opts.compress_archives);
        assert_eq!(opts.default_encoding, TextEncoding::Windows1254);
        assert!(opts.temp_root.is_none());
    }

    #[test]
    fn test_read_from_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        let opts = SerializerOptions::default()
            .with_default_encoding(TextEncoding::Utf8)
            .with_temp_root(dir.path());
        std::fs::write(&path, opts.to_json().unwrap()).unwrap();

        let loaded = SerializerOptions::read_from_file(&path).unwrap();
        assert_eq!(loaded, opts);
    }

    #[test]
    fn test_invalid_json_is_json_error() {
        let err = SerializerOptions::from_json("{ nope").unwrap_err();
        assert!(matches!(err, SerializerError::Json(_)));
    }
}
