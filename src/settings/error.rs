//! Settings persistence error types.
//!
//! Loading never fails: missing or damaged files degrade to defaults. These
//! errors only surface from explicit writes.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while writing settings files.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// No per-user configuration directory could be determined.
    #[error("could not determine a configuration directory for this user")]
    NoConfigDir,

    /// Reading or writing a settings file failed.
    #[error("settings file {path}: {source}")]
    Io {
        /// File or directory involved
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// Settings could not be encoded as JSON.
    #[error("failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),
}

impl SettingsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns a user-friendly suggestion for resolving this error.
    #[must_use]
    pub fn suggestion(&self) -> &'static str {
        match self {
            Self::NoConfigDir => "pass --config-dir to choose where settings are kept",
            Self::Io { .. } => "check that the settings directory is writable",
            Self::Encode(_) => "report this as a bug",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SettingsError::io(
            "/tmp/x.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(err.to_string().contains("/tmp/x.json"));
        assert!(err.to_string().contains("denied"));
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn test_suggestion() {
        assert!(SettingsError::NoConfigDir.suggestion().contains("--config-dir"));
    }
}
