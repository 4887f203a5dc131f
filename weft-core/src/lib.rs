//! Shared leaf types for the weft application toolkit.
//!
//! This crate holds the pieces the router and store crates agree on:
//!
//! - [`StoreId`]: a JSON-serializable identifier with a canonical string
//!   encoding, used to key per-id store registries.
//! - [`DispatchEvent`]: an opaque event value that may carry a store
//!   identifier.
//! - [`Dispatcher`]: the collaborator trait for external event dispatchers.
//! - [`IdCounter`]: scoped monotonic counters for generating display ids.
//!
//! Nothing here owns application state; these are the vocabulary types the
//! rest of the workspace builds on.

pub mod counter;
pub mod dispatch;
pub mod event;
pub mod types;

pub use counter::IdCounter;
pub use dispatch::{DispatchError, DispatchHandler, Dispatcher, DispatcherIndex};
pub use event::DispatchEvent;
pub use types::StoreId;
