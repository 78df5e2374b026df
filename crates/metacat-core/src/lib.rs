//! Metacat core: resource-type contracts, registry, and errors.
//!
//! This crate provides the foundational types shared by every Metacat
//! crate. It has no internal Metacat dependencies.
//!
//! # Modules
//!
//! - [`error`]: Error taxonomy and Result alias
//! - [`resource`]: The indexed-field contract of one resource type
//! - [`registry`]: The data-driven registry of searchable resource types

pub mod error;
pub mod registry;
pub mod resource;

// Re-export key types at crate root for convenience
pub use error::{Error, Result};
pub use registry::Registry;
pub use resource::{BASE_TEXT_FIELDS, ResourceType};
