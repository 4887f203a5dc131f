//! Event values carried through the dispatcher.

use crate::types::StoreId;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An event delivered to registered dispatch handlers.
///
/// Events are opaque to the dispatch plumbing: the only field it inspects is
/// the optional store identifier, which selects between single-instance and
/// broadcast delivery. Everything else lives in `payload` and is interpreted
/// by the receiving store behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchEvent {
    /// Target store instance, if the event names one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_id: Option<StoreId>,
    /// Application-defined event data
    #[serde(default)]
    pub payload: Value,
}

impl DispatchEvent {
    /// Create an event with no target instance (broadcast)
    pub fn new(payload: impl Into<Value>) -> Self {
        Self {
            store_id: None,
            payload: payload.into(),
        }
    }

    /// Create an event targeting one store instance
    pub fn for_store(id: impl Into<StoreId>, payload: impl Into<Value>) -> Self {
        Self {
            store_id: Some(id.into()),
            payload: payload.into(),
        }
    }

    /// The target store id, if any
    pub fn store_id(&self) -> Option<&StoreId> {
        self.store_id.as_ref()
    }
}
