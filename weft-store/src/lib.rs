//! Per-identifier singleton stores.
//!
//! A *store* holds application state for one identifier and reacts to
//! dispatched events. Stores of the same kind share a [`StoreClass`] — an
//! explicit factory value owning the registry that maps canonical id keys to
//! live instances. Instances are created lazily on first access and live
//! until explicitly discarded.
//!
//! # Core pieces
//!
//! - [`StoreKind`]: the behavior trait. Implementations provide the initial
//!   state, lifecycle hooks, and the event handler; every hook has a no-op
//!   default.
//! - [`StoreClass`]: registry plus dispatcher integration. One registry per
//!   class value, never shared between classes.
//! - [`StoreHandle`]: a cheaply clonable reference to one instance: its id,
//!   state slot, and change listeners.
//!
//! # Lifecycle
//!
//! Construction runs in a fixed order: the instance is registered **before**
//! its initialization hooks run, so re-entrant lookups from inside
//! `will_initialize`/`did_initialize` observe the instance (with an empty
//! state slot). This is a documented contract, required so initializers can
//! reference their own instance through the class.
//!
//! Change listeners are edge-triggered: the first listener added fires
//! `did_become_active` (after the add), the removal that empties the list
//! fires `did_become_inactive` (after the removal), and re-activation fires
//! the hook again.
//!
//! # Dispatch
//!
//! [`StoreClass::register_with_dispatcher`] wires the class to an external
//! [`Dispatcher`](weft_core::Dispatcher). An event naming an acceptable
//! store id is delivered to that one instance (created on demand); any other
//! event is broadcast to every registered instance in ascending canonical
//! key order, completing only when all instances complete. A single failing
//! instance fails the whole broadcast.

pub mod class;
pub mod error;
pub mod instance;
pub mod kind;

pub use class::StoreClass;
pub use error::StoreError;
pub use instance::{ChangeListener, StoreHandle};
pub use kind::StoreKind;

pub use weft_core::{
    DispatchError, DispatchEvent, DispatchHandler, Dispatcher, DispatcherIndex, StoreId,
};
