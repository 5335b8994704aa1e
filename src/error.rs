//! Error types for dpdk-preflight
//!
//! Errors raised while talking to the host (reading pseudo files, running
//! helper utilities) or while resolving configuration. The preflight checker
//! turns most of them into diagnostics instead of propagating them.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for dpdk-preflight operations
#[derive(Error, Debug)]
pub enum PreflightError {
    /// I/O error while reading a host interface
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Path not found
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// External command could not be spawned or exited unsuccessfully
    #[error("Command '{command}' failed: {message}")]
    CommandFailed { command: String, message: String },

    /// Required environment variable is not set
    #[error("Environment variable {0} undefined")]
    MissingEnv(&'static str),

    /// Host interface returned text we cannot interpret
    #[error("Malformed {source_name} output: {message}")]
    Malformed {
        source_name: &'static str,
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Report serialization error
    #[error("Report serialization error: {0}")]
    Serialization(String),
}

impl PreflightError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a command failure error
    pub fn command(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CommandFailed {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Create a malformed-output error
    pub fn malformed(source_name: &'static str, message: impl Into<String>) -> Self {
        Self::Malformed {
            source_name,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError(message.into())
    }

    /// Get the path associated with this error, if any
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Io { path, .. } | Self::NotFound(path) => Some(path),
            _ => None,
        }
    }
}

/// Result type alias for dpdk-preflight operations
pub type Result<T> = std::result::Result<T, PreflightError>;

impl From<std::io::Error> for PreflightError {
    fn from(err: std::io::Error) -> Self {
        PreflightError::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for PreflightError {
    fn from(err: serde_json::Error) -> Self {
        PreflightError::Serialization(err.to_string())
    }
}

/// Extension trait for adding path context to std::io::Result
pub trait IoResultExt<T> {
    /// Add path context to an I/O error
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T>;
}

impl<T> IoResultExt<T> for std::io::Result<T> {
    fn with_path(self, path: impl Into<PathBuf>) -> Result<T> {
        self.map_err(|e| PreflightError::io(path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_with_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = PreflightError::io("/proc/meminfo", io_err);
        assert_eq!(err.path(), Some(&PathBuf::from("/proc/meminfo")));
        assert!(err.to_string().contains("/proc/meminfo"));
    }

    #[test]
    fn test_with_path_extension() {
        let res: std::io::Result<()> =
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"));
        let err = res.with_path("/sys/devices").unwrap_err();
        assert!(matches!(err, PreflightError::Io { .. }));
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            PreflightError::MissingEnv("RTE_SDK").to_string(),
            "Environment variable RTE_SDK undefined"
        );
        let err = PreflightError::command("lscpu -p", "exit status 1");
        assert_eq!(err.to_string(), "Command 'lscpu -p' failed: exit status 1");
        assert!(err.path().is_none());
    }
}
