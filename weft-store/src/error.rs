//! Error types for store operations.

use thiserror::Error;

/// Errors raised by store instances and event handling.
#[derive(Debug, Error)]
pub enum StoreError {
    /// State was accessed before the instance finished initializing
    #[error("store instance {key} has no initialized state")]
    Uninitialized {
        /// Canonical key of the instance
        key: String,
    },

    /// An event handler reported a failure
    #[error("event handling failed: {0}")]
    Handler(String),
}

impl StoreError {
    /// Construct a handler failure
    pub fn handler(message: impl Into<String>) -> Self {
        Self::Handler(message.into())
    }
}
