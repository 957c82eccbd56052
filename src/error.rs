use std::path::PathBuf;

use thiserror::Error;

/// Result type for the planner/writer chain
pub type Result<T> = std::result::Result<T, ChainError>;

/// Errors that abort a chain run
#[derive(Debug, Error)]
pub enum ChainError {
    /// Service could not be reached (refused, DNS, timeout)
    #[error("cannot reach {service}: {message}")]
    Connection { service: String, message: String },

    /// Service answered, but with an error or an unusable body
    #[error("{service} returned an unusable response: {message}")]
    Upstream { service: String, message: String },

    /// Output directory or file is not writable
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ChainError {
    pub fn connection(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Connection {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
