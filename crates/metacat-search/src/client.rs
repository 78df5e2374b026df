//! Process-wide index client adapter.
//!
//! [`IndexClient`] is a cheap-to-clone indirection point in front of the
//! current [`IndexService`]. Consumers keep the adapter and call
//! [`IndexClient::get`] per request, so a [`IndexClient::replace`] is seen
//! by every holder, including routers constructed before the swap.
//!
//! # Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use metacat_search::{IndexClient, ScriptedIndex};
//!
//! let client = IndexClient::new(Arc::new(ScriptedIndex::empty()));
//! let router_handle = client.clone();
//!
//! client.replace(Arc::new(ScriptedIndex::unavailable()));
//! assert_eq!(router_handle.get().name(), "scripted");
//! ```

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use crate::backend::IndexService;

/// Shared, swappable handle to the index service.
#[derive(Clone)]
pub struct IndexClient {
    inner: Arc<RwLock<Arc<dyn IndexService>>>,
}

impl IndexClient {
    /// Wrap an index service.
    pub fn new(service: Arc<dyn IndexService>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(service)),
        }
    }

    /// The service currently installed.
    ///
    /// Fetch this per request; do not cache it across requests.
    pub fn get(&self) -> Arc<dyn IndexService> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Install a new service, returning the previous one.
    ///
    /// Requests already holding the previous service finish against it.
    pub fn replace(&self, service: Arc<dyn IndexService>) -> Arc<dyn IndexService> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        log::info!(
            "Replacing index client '{}' with '{}'",
            guard.name(),
            service.name()
        );
        std::mem::replace(&mut *guard, service)
    }
}

impl fmt::Debug for IndexClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexClient")
            .field("backend", &self.get().name())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
