//! # metacat-api
//!
//! HTTP API for the Metacat catalogue search.
//!
//! This crate exposes the search facade over HTTP:
//! - `GET {prefix}/search/{plural}/v1` for every registered resource type
//! - `GET {prefix}/health`
//! - error-to-status mapping with `{"detail": ...}` bodies

pub mod error;
pub mod routes;
pub mod server;

pub use error::{Error, Result};
pub use routes::{AppState, router};
pub use server::{Server, ServerConfig};
