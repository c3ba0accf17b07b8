//! Error types for tomatempo.

use std::path::PathBuf;

/// Everything that can go wrong outside the timer state machine itself.
///
/// The controller never surfaces these; collaborator failures are logged and
/// the transition carries on without that side effect.
#[derive(Debug, thiserror::Error)]
pub enum TomatempoError {
    #[error("Configuration file malformed: {path}: {source}")]
    ConfigMalformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration write failed: {path}: {source}")]
    ConfigWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Terminal I/O error: {context}: {source}")]
    Terminal {
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Notification could not be delivered: {0}")]
    NotificationFailed(String),
}

pub type Result<T> = std::result::Result<T, TomatempoError>;

impl TomatempoError {
    pub fn terminal(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Terminal {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_error_mentions_context() {
        let err = TomatempoError::terminal(
            "ringing bell",
            std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"),
        );
        let msg = err.to_string();
        assert!(msg.contains("ringing bell"));
        assert!(msg.contains("closed"));
    }

    #[test]
    fn write_failure_mentions_path() {
        let err = TomatempoError::ConfigWriteFailed {
            path: PathBuf::from("/tmp/x/config.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.to_string().contains("/tmp/x/config.json"));
    }
}
