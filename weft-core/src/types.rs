//! Store identifier type and its canonical string encoding.
//!
//! Registries index instances by the canonical key rather than the raw
//! identifier value, so any JSON-serializable value can act as an id.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Identifier for a store instance.
///
/// Wraps any JSON value. Two ids with equal canonical keys address the same
/// registry slot, so `StoreId::from("x")` and a JSON string `"x"` are the
/// same instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(Value);

impl StoreId {
    /// Create an id from any JSON-convertible value
    pub fn new(value: impl Into<Value>) -> Self {
        Self(value.into())
    }

    /// The underlying JSON value
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Canonical string encoding used to key registries.
    ///
    /// Compact JSON with deterministic object-key ordering (serde_json maps
    /// are BTreeMap-backed), so structurally equal ids encode identically.
    pub fn canonical_key(&self) -> String {
        self.0.to_string()
    }
}

impl From<Value> for StoreId {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for StoreId {
    fn from(value: &str) -> Self {
        Self(Value::from(value))
    }
}

impl From<String> for StoreId {
    fn from(value: String) -> Self {
        Self(Value::from(value))
    }
}

impl From<i64> for StoreId {
    fn from(value: i64) -> Self {
        Self(Value::from(value))
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
