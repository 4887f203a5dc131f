//! The store behavior trait.

use crate::class::StoreClass;
use crate::error::StoreError;
use crate::instance::StoreHandle;
use futures_util::future::BoxFuture;
use std::sync::Arc;
use weft_core::{DispatchEvent, StoreId};

/// Behavior of one kind of store.
///
/// A `StoreKind` value is shared by every instance of its [`StoreClass`];
/// per-instance data belongs in `State`, not in the kind. All hooks have
/// no-op defaults, so a minimal kind only names its state type:
///
/// ```
/// use weft_store::StoreKind;
///
/// struct Tabs;
///
/// impl StoreKind for Tabs {
///     const NAME: &'static str = "tabs";
///     type State = Vec<String>;
///     type Args = ();
/// }
/// ```
///
/// `handle_event` returns a boxed future whether or not the reaction
/// suspends; synchronous and asynchronous handlers look identical to the
/// dispatch plumbing.
pub trait StoreKind: Send + Sync + Sized + 'static {
    /// Display name used in diagnostics and logging
    const NAME: &'static str;

    /// Per-instance application state
    type State: Default + Send + Sync + 'static;

    /// Extra arguments forwarded to the initialization hooks
    type Args: Send + Sync + 'static;

    /// Initial state for a newly created instance
    fn initial_state(&self, _id: &StoreId) -> Self::State {
        Self::State::default()
    }

    /// Called after the instance is registered, before its state exists
    fn will_initialize(
        &self,
        _class: &StoreClass<Self>,
        _instance: &StoreHandle<Self>,
        _args: &Self::Args,
    ) {
    }

    /// Called once the instance's state is in place
    fn did_initialize(
        &self,
        _class: &StoreClass<Self>,
        _instance: &StoreHandle<Self>,
        _args: &Self::Args,
    ) {
    }

    /// Called when the first change listener is added
    fn did_become_active(&self, _instance: &StoreHandle<Self>) {}

    /// Called when the last change listener is removed
    fn did_become_inactive(&self, _instance: &StoreHandle<Self>) {}

    /// Identifier-validity predicate for targeted dispatch.
    ///
    /// An event naming a store id this rejects falls back to broadcast
    /// delivery. The default accepts every id.
    fn accepts_id(&self, _id: &StoreId) -> bool {
        true
    }

    /// React to a dispatched event. Default: complete immediately.
    fn handle_event(
        &self,
        _instance: StoreHandle<Self>,
        _event: Arc<DispatchEvent>,
    ) -> BoxFuture<'static, Result<(), StoreError>> {
        Box::pin(async { Ok(()) })
    }
}
