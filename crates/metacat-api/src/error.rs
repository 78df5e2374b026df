//! Error types for metacat-api and their HTTP mapping.
//!
//! Every error renders as `{"detail": "..."}`:
//!
//! | Error | Status |
//! |-------|--------|
//! | invalid limit, offset, search field | 422 |
//! | unknown platform | 400 |
//! | unknown resource type, missing identifiers | 404 |
//! | index or database unreachable, malformed hit | 502 |
//! | anything else | 500 |

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde_json::json;

/// Result type alias for metacat-api operations
pub type Result<T> = std::result::Result<T, Error>;

/// Shown instead of upstream failure details, which stay in the log.
pub const UPSTREAM_DETAIL: &str = "The search service could not reach one of its backends. \
     Please try again later, and contact the maintainers if the problem persists.";

/// Errors that can occur in metacat-api
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from the search path
    #[error(transparent)]
    Catalogue(#[from] metacat_core::Error),

    /// No resource type is registered under the requested plural name
    #[error("No searchable resource type '{plural}'. Available: {}", .available.join(", "))]
    UnknownResourceType {
        /// The requested plural name.
        plural: String,
        /// Registered plural names.
        available: Vec<String>,
    },

    /// Server I/O error (binding, accepting)
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        use metacat_core::Error as Core;
        match self {
            Error::Catalogue(err) => match err {
                Core::UnknownPlatform { .. } => StatusCode::BAD_REQUEST,
                Core::NotFound { .. } => StatusCode::NOT_FOUND,
                err if err.is_client_error() => StatusCode::UNPROCESSABLE_ENTITY,
                Core::Upstream { .. } | Core::InvalidHit { .. } => StatusCode::BAD_GATEWAY,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Error::UnknownResourceType { .. } => StatusCode::NOT_FOUND,
            Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Returns whether the same request could succeed later.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Catalogue(err) => err.is_retryable(),
            Error::UnknownResourceType { .. } => false,
            Error::Io(_) => true,
        }
    }

    /// Text for the `detail` field of the response body.
    pub fn detail(&self) -> String {
        match self {
            Error::Catalogue(metacat_core::Error::Upstream { .. }) => UPSTREAM_DETAIL.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            let source = std::error::Error::source(&self)
                .map(ToString::to_string)
                .unwrap_or_default();
            tracing::error!(
                %status,
                retryable = self.is_retryable(),
                error = %self,
                %source,
                "Search request failed"
            );
        } else {
            tracing::debug!(
                %status,
                retryable = self.is_retryable(),
                error = %self,
                "Search request rejected"
            );
        }
        (status, Json(json!({"detail": self.detail()}))).into_response()
    }
}
