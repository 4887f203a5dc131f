//! Scoped monotonic id counters.
//!
//! Each scope gets one shared counter for the process lifetime; ids are
//! formatted as `scope_N`.

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

static SCOPES: Lazy<Mutex<HashMap<String, Arc<IdCounter>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// A monotonic counter bound to a named scope.
#[derive(Debug)]
pub struct IdCounter {
    scope: String,
    count: AtomicU64,
}

impl IdCounter {
    /// Create a standalone counter starting at `initial`
    pub fn new(scope: impl Into<String>, initial: u64) -> Self {
        Self {
            scope: scope.into(),
            count: AtomicU64::new(initial),
        }
    }

    /// Get or create the shared counter for a scope
    pub fn for_scope(scope: &str) -> Arc<IdCounter> {
        let mut scopes = SCOPES.lock();
        scopes
            .entry(scope.to_string())
            .or_insert_with(|| Arc::new(IdCounter::new(scope, 0)))
            .clone()
    }

    /// The counter's scope name
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// Return the current count, then advance it
    pub fn increment(&self) -> u64 {
        self.count.fetch_add(1, Ordering::SeqCst)
    }

    /// Produce the next id in this scope, e.g. `"modal_0"`
    pub fn next_id(&self) -> String {
        format!("{}_{}", self.scope, self.increment())
    }
}
