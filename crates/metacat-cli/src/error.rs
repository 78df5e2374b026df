//! Error types for metacat-cli

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for metacat-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in metacat-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from metacat-core
    #[error(transparent)]
    Core(#[from] metacat_core::Error),

    /// Error from metacat-api
    #[error(transparent)]
    Api(#[from] metacat_api::Error),

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error on a specific file
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// The file involved.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates an I/O error tagged with the file it concerns.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}
