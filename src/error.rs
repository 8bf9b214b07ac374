//! Error types for configuration loading.

use crate::decode::FormatTag;
use serde::Serialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error codes for programmatic error handling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    UnsupportedFormat,
    DecodeError,
    ConfigurationError,
    IoError,
    InternalError,
}

/// Errors raised by a decoder for content that violates its format.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// INI grammar violation at a 1-based line number.
    #[error("invalid INI at line {line}: {message}")]
    Ini { line: usize, message: String },

    #[error("content is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// The document root decoded to something other than a mapping.
    #[error("top-level value must be a mapping, found {found}")]
    NotAMapping { found: &'static str },

    /// A mapping key that cannot be represented as a string.
    #[error("mapping key must be a scalar, found {found}")]
    UnsupportedKey { found: &'static str },
}

impl DecodeError {
    pub(crate) fn ini(line: usize, message: impl Into<String>) -> Self {
        DecodeError::Ini {
            line,
            message: message.into(),
        }
    }
}

/// Errors surfaced by loading, discovery and aggregation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Path does not exist as a regular file.
    #[error("config file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Extension is not one of the recognized config formats.
    #[error("unsupported config file format '{extension}' for {}", path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// File content is not valid for its format.
    #[error("failed to decode {format} file {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        format: FormatTag,
        source: DecodeError,
    },

    /// A mapping does not have the shape its consumer requires.
    #[error("invalid configuration in section '{section}': {message}")]
    Configuration { section: String, message: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A blocking task failed to run to completion.
    #[error("background task failed: {0}")]
    Task(String),
}

impl ConfigError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ConfigError::NotFound { .. } => ErrorCode::NotFound,
            ConfigError::UnsupportedFormat { .. } => ErrorCode::UnsupportedFormat,
            ConfigError::Decode { .. } => ErrorCode::DecodeError,
            ConfigError::Configuration { .. } => ErrorCode::ConfigurationError,
            ConfigError::Io { .. } => ErrorCode::IoError,
            ConfigError::Task(_) => ErrorCode::InternalError,
        }
    }

    /// Path the error refers to, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::NotFound { path }
            | ConfigError::UnsupportedFormat { path, .. }
            | ConfigError::Decode { path, .. }
            | ConfigError::Io { path, .. } => Some(path),
            ConfigError::Configuration { .. } | ConfigError::Task(_) => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Structured error report, printed by the command-line binary.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

impl From<&ConfigError> for ErrorReport {
    fn from(err: &ConfigError) -> Self {
        Self {
            code: err.code(),
            message: err.to_string(),
            path: err.path().map(Path::to_path_buf),
        }
    }
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_codes() {
        let err = ConfigError::NotFound {
            path: PathBuf::from("/tmp/missing.yaml"),
        };
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(err.path(), Some(Path::new("/tmp/missing.yaml")));

        let err = ConfigError::Configuration {
            section: "server".into(),
            message: "section value is not a mapping".into(),
        };
        assert_eq!(err.code(), ErrorCode::ConfigurationError);
        assert!(err.path().is_none());
    }

    #[test]
    fn test_decode_error_names_path_and_format() {
        let err = ConfigError::Decode {
            path: PathBuf::from("conf/app.ini"),
            format: FormatTag::Ini,
            source: DecodeError::ini(3, "expected '=' or ':'"),
        };
        let message = err.to_string();
        assert!(message.contains("conf/app.ini"));
        assert!(message.contains("INI"));
        assert!(message.contains("line 3"));
    }

    #[test]
    fn test_report_serialization() {
        let err = ConfigError::UnsupportedFormat {
            path: PathBuf::from("a.xyz"),
            extension: ".xyz".into(),
        };
        let report = serde_json::to_value(ErrorReport::from(&err)).unwrap();
        assert_eq!(report["code"], json!("UNSUPPORTED_FORMAT"));
        assert_eq!(report["path"], json!("a.xyz"));

        let err = ConfigError::Task("join error".into());
        let report = serde_json::to_value(ErrorReport::from(&err)).unwrap();
        assert_eq!(report["code"], json!("INTERNAL_ERROR"));
        assert!(report.get("path").is_none());
    }
}
