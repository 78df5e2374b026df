//! Error types for the Metacat catalogue.
//!
//! The taxonomy mirrors how a search request can fail:
//!
//! - request validation (the caller's fault, never retried)
//! - consistency between the index and the relational store
//! - upstream infrastructure (index or database unreachable)
//! - configuration (detected at startup, fail fast)

/// Errors that can occur anywhere in the catalogue search path.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// A request parameter is out of bounds or malformed.
    #[error("{message}")]
    InvalidParameter {
        /// Name of the offending query parameter.
        parameter: String,
        /// Human-readable explanation.
        message: String,
    },

    /// One or more requested search fields are not indexed for the resource type.
    #[error("The available search fields for this entity are: {}", .available.join(", "))]
    InvalidSearchField {
        /// Fields that were requested but are not indexed.
        rejected: Vec<String>,
        /// The indexed fields of the resource type.
        available: Vec<String>,
    },

    /// One or more requested platforms are unknown to the relational store.
    #[error("The available platforms are: {}", .available.join(", "))]
    UnknownPlatform {
        /// Platforms that were requested but do not exist.
        rejected: Vec<String>,
        /// Platforms currently registered.
        available: Vec<String>,
    },

    /// Index hits whose identifiers are absent from the relational store.
    #[error(
        "Some resources, with identifiers {}, could not be found in the database.",
        .identifiers.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    )]
    NotFound {
        /// Every identifier that failed to resolve.
        identifiers: Vec<i64>,
    },

    /// The index service or the relational store could not be reached.
    #[error("Upstream unavailable: {message}")]
    Upstream {
        /// Short description of the failed operation.
        message: String,
        /// Underlying transport error, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A hit returned by the index lacks a field every document must carry.
    #[error("Index hit is missing required field '{field}'")]
    InvalidHit {
        /// The missing or malformed field.
        field: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience `Result` type alias used throughout the catalogue.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether the caller caused this error.
    ///
    /// Client errors map to 4xx responses; everything else is a 5xx.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidParameter { .. }
                | Error::InvalidSearchField { .. }
                | Error::UnknownPlatform { .. }
                | Error::NotFound { .. }
        )
    }

    /// Returns whether retrying the same request later could succeed.
    ///
    /// Missing identifiers clear once replication catches up; upstream
    /// outages are transient. The catalogue itself never retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::NotFound { .. } => true,
            Error::Upstream { .. } => true,
            Error::Io(_) => true,
            Error::InvalidParameter { .. } => false,
            Error::InvalidSearchField { .. } => false,
            Error::UnknownPlatform { .. } => false,
            Error::InvalidHit { .. } => false,
            Error::Config { .. } => false,
            Error::Serialization(_) => false,
        }
    }

    /// Creates a new invalid-parameter error.
    pub fn invalid_parameter<P, M>(parameter: P, message: M) -> Self
    where
        P: Into<String>,
        M: Into<String>,
    {
        Error::InvalidParameter {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Creates a new upstream error with a message.
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Error::Upstream {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new upstream error with a message and source error.
    pub fn upstream_with_source<S, E>(message: S, source: E) -> Self
    where
        S: Into<String>,
        E: std::error::Error + Send + Sync + 'static,
    {
        Error::Upstream {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Creates a new invalid-hit error.
    pub fn invalid_hit<S: Into<String>>(field: S) -> Self {
        Error::InvalidHit {
            field: field.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }
}
