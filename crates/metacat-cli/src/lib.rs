//! # metacat-cli
//!
//! Command-line interface for the Metacat catalogue search service.
//!
//! - `serve`: run the HTTP search API
//! - `setup-indices`: provision one full-text index per resource type
//! - `mapping <plural>`: print a generated index mapping
//! - `config path|show|get|set|init`: manage the configuration file

pub mod cli;
pub mod commands;
pub mod config;
pub mod config_handlers;
pub mod error;

pub use cli::{Cli, Command, ConfigAction};
pub use config::CatalogueConfig;
pub use error::{Error, Result};
