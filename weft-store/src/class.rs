//! The store class: an explicit registry of instances plus dispatcher
//! integration.

use crate::instance::{ChangeListener, StoreHandle};
use crate::kind::StoreKind;
use futures_util::future::{BoxFuture, try_join_all};
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeMap;
use std::sync::Arc;
use weft_core::{DispatchError, DispatchEvent, DispatchHandler, Dispatcher, DispatcherIndex, StoreId};

/// Factory and registry for one kind of store.
///
/// Each `StoreClass` value owns its registry; constructing a second class of
/// the same kind yields a fully independent set of instances. `Clone` is
/// cheap and clones share the registry -- all internal state is
/// `Arc`-wrapped.
///
/// The registry is a `BTreeMap` keyed by canonical id key, which is what
/// gives broadcast dispatch its ascending-key visiting order.
pub struct StoreClass<K: StoreKind> {
    kind: Arc<K>,
    registry: Arc<RwLock<BTreeMap<String, StoreHandle<K>>>>,
    dispatcher_index: Arc<Mutex<Option<DispatcherIndex>>>,
}

impl<K: StoreKind> Clone for StoreClass<K> {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind.clone(),
            registry: self.registry.clone(),
            dispatcher_index: self.dispatcher_index.clone(),
        }
    }
}

impl<K: StoreKind> StoreClass<K> {
    /// Create a class around a behavior value, with an empty registry
    pub fn new(kind: K) -> Self {
        Self {
            kind: Arc::new(kind),
            registry: Arc::new(RwLock::new(BTreeMap::new())),
            dispatcher_index: Arc::new(Mutex::new(None)),
        }
    }

    /// The shared behavior value
    pub fn kind(&self) -> &K {
        &self.kind
    }

    /// Number of registered instances
    pub fn len(&self) -> usize {
        self.registry.read().len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.registry.read().is_empty()
    }

    /// Look up an instance without creating it
    pub fn lookup(&self, id: impl Into<StoreId>) -> Option<StoreHandle<K>> {
        let key = id.into().canonical_key();
        self.registry.read().get(&key).cloned()
    }

    /// Snapshot of all registered instances, in ascending canonical key order
    pub fn instances(&self) -> Vec<StoreHandle<K>> {
        self.registry.read().values().cloned().collect()
    }

    /// Resolve an instance, creating and initializing it on first access
    pub fn get_instance(&self, id: impl Into<StoreId>) -> StoreHandle<K>
    where
        K::Args: Default,
    {
        self.get_instance_with(id, K::Args::default())
    }

    /// Resolve an instance, passing `args` to the init hooks if it must be
    /// created.
    ///
    /// Construction order: register the instance, run `will_initialize`,
    /// assign `initial_state`, run `did_initialize`. The instance is visible
    /// to re-entrant lookups from inside the hooks; its state slot is empty
    /// until the `initial_state` step. The registry lock is never held while
    /// hooks run.
    pub fn get_instance_with(&self, id: impl Into<StoreId>, args: K::Args) -> StoreHandle<K> {
        let id = id.into();
        let key = id.canonical_key();
        if let Some(existing) = self.registry.read().get(&key) {
            return existing.clone();
        }

        let handle = StoreHandle::new(id, self.kind.clone());
        {
            let mut registry = self.registry.write();
            if let Some(existing) = registry.get(&key) {
                return existing.clone();
            }
            registry.insert(key.clone(), handle.clone());
        }
        tracing::debug!(store = K::NAME, key = %key, "store instance created");

        self.kind.will_initialize(self, &handle, &args);
        handle.init_state(self.kind.initial_state(handle.id()));
        self.kind.did_initialize(self, &handle, &args);
        handle
    }

    /// Remove an instance from the registry.
    ///
    /// The instance itself is untouched; it lives on for as long as other
    /// owners hold handles, and a later [`get_instance`](Self::get_instance)
    /// for the same id constructs a fresh instance.
    pub fn discard_instance(&self, instance: &StoreHandle<K>) {
        let removed = self.registry.write().remove(instance.canonical_key());
        if removed.is_some() {
            tracing::debug!(
                store = K::NAME,
                key = %instance.canonical_key(),
                "store instance discarded"
            );
        }
    }

    /// Resolve-or-create an instance and apply `f` to it.
    ///
    /// This is the id-addressed entry point for instance operations.
    pub fn with_instance<R>(&self, id: impl Into<StoreId>, f: impl FnOnce(&StoreHandle<K>) -> R) -> R
    where
        K::Args: Default,
    {
        let instance = self.get_instance(id);
        f(&instance)
    }

    /// Resolve-or-create an instance and attach a change listener to it
    pub fn add_change_listener(
        &self,
        id: impl Into<StoreId>,
        listener: ChangeListener,
    ) -> StoreHandle<K>
    where
        K::Args: Default,
    {
        let instance = self.get_instance(id);
        instance.add_change_listener(listener);
        instance
    }

    /// Resolve-or-create an instance and detach a change listener from it
    pub fn remove_change_listener(
        &self,
        id: impl Into<StoreId>,
        listener: &ChangeListener,
    ) -> StoreHandle<K>
    where
        K::Args: Default,
    {
        let instance = self.get_instance(id);
        instance.remove_change_listener(listener);
        instance
    }

    /// The registration index from the last
    /// [`register_with_dispatcher`](Self::register_with_dispatcher) call
    pub fn dispatcher_index(&self) -> Option<DispatcherIndex> {
        *self.dispatcher_index.lock()
    }

    /// Register this class's event handler with a dispatcher.
    ///
    /// The handler delivers events per [`dispatch_event`](Self::dispatch_event).
    /// The returned registration index is also stored on the class.
    pub fn register_with_dispatcher(&self, dispatcher: &dyn Dispatcher) -> DispatcherIndex
    where
        K::Args: Default,
    {
        let class = self.clone();
        let handler: DispatchHandler = Box::new(move |event| class.dispatch_event(event));
        let index = dispatcher.register(handler);
        *self.dispatcher_index.lock() = Some(index);
        tracing::debug!(store = K::NAME, index = %index, "registered with dispatcher");
        index
    }

    /// Deliver one event to this class.
    ///
    /// If the event names a store id and [`StoreKind::accepts_id`] accepts
    /// it, that single instance (created on demand) handles the event.
    /// Otherwise the event is broadcast: every registered instance's handler
    /// is started in ascending canonical key order, and the returned future
    /// completes once all of them complete. Broadcast is all-or-nothing -- a
    /// single failing instance fails the whole dispatch.
    pub fn dispatch_event(
        &self,
        event: Arc<DispatchEvent>,
    ) -> BoxFuture<'static, Result<(), DispatchError>>
    where
        K::Args: Default,
    {
        let target = match event.store_id() {
            Some(id) if self.kind.accepts_id(id) => Some(id.clone()),
            _ => None,
        };

        if let Some(id) = target {
            let instance = self.get_instance(id);
            let fut = self.kind.handle_event(instance, event);
            return Box::pin(async move { fut.await.map_err(DispatchError::handler) });
        }

        let instances = self.instances();
        tracing::debug!(store = K::NAME, count = instances.len(), "broadcasting event");
        let mut handlings = Vec::with_capacity(instances.len());
        for instance in instances {
            let key = instance.canonical_key().to_string();
            let fut = self.kind.handle_event(instance, event.clone());
            handlings.push(async move {
                fut.await.map_err(|err| {
                    tracing::error!(store = K::NAME, key = %key, error = %err, "event handler failed");
                    err
                })
            });
        }
        Box::pin(async move {
            try_join_all(handlings)
                .await
                .map(|_| ())
                .map_err(DispatchError::handler)
        })
    }
}

impl<K: StoreKind> std::fmt::Debug for StoreClass<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreClass")
            .field("kind", &K::NAME)
            .field("instances", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[derive(Default)]
    struct Plain;

    impl StoreKind for Plain {
        const NAME: &'static str = "plain";
        type State = Vec<String>;
        type Args = ();
    }

    #[test]
    fn test_get_instance_is_idempotent() {
        let class = StoreClass::new(Plain);
        let first = class.get_instance("x");
        let second = class.get_instance("x");
        assert!(first.ptr_eq(&second));
        assert_eq!(class.len(), 1);
    }

    #[test]
    fn test_discard_then_recreate_builds_fresh_instance() {
        let class = StoreClass::new(Plain);
        let original = class.get_instance("x");
        class.discard_instance(&original);
        assert!(class.is_empty());

        let rebuilt = class.get_instance("x");
        assert!(!original.ptr_eq(&rebuilt));
        // The discarded instance is untouched and still usable by holders.
        assert!(original.is_initialized());
    }

    #[test]
    fn test_classes_do_not_share_registries() {
        let a = StoreClass::new(Plain);
        let b = StoreClass::new(Plain);
        a.get_instance("x");
        assert_eq!(a.len(), 1);
        assert!(b.is_empty());
    }

    #[test]
    fn test_equivalent_ids_share_a_slot() {
        let class = StoreClass::new(Plain);
        let by_str = class.get_instance("x");
        let by_value = class.get_instance(StoreId::new(serde_json::json!("x")));
        assert!(by_str.ptr_eq(&by_value));
    }

    #[derive(Default)]
    struct Reentrant {
        saw_self: AtomicBool,
        saw_empty_state: AtomicBool,
    }

    impl StoreKind for Reentrant {
        const NAME: &'static str = "reentrant";
        type State = Vec<String>;
        type Args = ();

        fn will_initialize(
            &self,
            class: &StoreClass<Self>,
            instance: &StoreHandle<Self>,
            _args: &Self::Args,
        ) {
            // The instance must already be visible through the class.
            if let Some(found) = class.lookup(instance.id().clone()) {
                self.saw_self.store(found.ptr_eq(instance), Ordering::SeqCst);
                self.saw_empty_state
                    .store(!found.is_initialized(), Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_instance_visible_to_reentrant_lookup_during_init() {
        let class = StoreClass::new(Reentrant::default());
        let instance = class.get_instance("x");
        assert!(class.kind().saw_self.load(Ordering::SeqCst));
        assert!(class.kind().saw_empty_state.load(Ordering::SeqCst));
        // After construction the state slot is populated.
        assert!(instance.is_initialized());
    }

    #[derive(Default)]
    struct Recorder {
        visited: Mutex<Vec<String>>,
        fail_for: Option<String>,
    }

    impl Recorder {
        fn failing_for(id: &str) -> Self {
            Self {
                visited: Mutex::new(Vec::new()),
                fail_for: Some(id.to_string()),
            }
        }
    }

    impl StoreKind for Recorder {
        const NAME: &'static str = "recorder";
        type State = Vec<String>;
        type Args = ();

        fn handle_event(
            &self,
            instance: StoreHandle<Self>,
            _event: Arc<DispatchEvent>,
        ) -> BoxFuture<'static, Result<(), StoreError>> {
            // Record at start time: broadcast visits instances in key order.
            let id = instance
                .id()
                .value()
                .as_str()
                .unwrap_or_default()
                .to_string();
            self.visited.lock().push(id.clone());
            let failing = self.fail_for.as_deref() == Some(id.as_str());
            Box::pin(async move {
                tokio::task::yield_now().await;
                if failing {
                    Err(StoreError::handler(format!("instance {id} rejected")))
                } else {
                    Ok(())
                }
            })
        }
    }

    #[tokio::test]
    async fn test_targeted_event_creates_and_handles_single_instance() {
        let class = StoreClass::new(Recorder::default());
        let event = Arc::new(DispatchEvent::for_store("solo", serde_json::json!({})));
        class.dispatch_event(event).await.expect("dispatch");

        assert_eq!(class.len(), 1);
        assert_eq!(class.kind().visited.lock().as_slice(), ["solo"]);
    }

    #[tokio::test]
    async fn test_broadcast_visits_instances_in_key_order() {
        let class = StoreClass::new(Recorder::default());
        // Register out of order; the registry sorts by canonical key.
        class.get_instance("b");
        class.get_instance("a");
        class.get_instance("c");

        let event = Arc::new(DispatchEvent::new(serde_json::json!({})));
        class.dispatch_event(event).await.expect("dispatch");

        assert_eq!(class.kind().visited.lock().as_slice(), ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_broadcast_failure_fails_whole_dispatch() {
        let class = StoreClass::new(Recorder::failing_for("b"));
        class.get_instance("a");
        class.get_instance("b");
        class.get_instance("c");

        let event = Arc::new(DispatchEvent::new(serde_json::json!({})));
        let err = class.dispatch_event(event).await.expect_err("must fail");
        assert!(err.to_string().contains("instance b rejected"));
        // Every instance was still visited (all handlers start).
        assert_eq!(class.kind().visited.lock().len(), 3);
    }

    struct Picky;

    impl StoreKind for Picky {
        const NAME: &'static str = "picky";
        type State = Vec<String>;
        type Args = ();

        fn accepts_id(&self, id: &StoreId) -> bool {
            id.value().as_str().is_some_and(|s| s.starts_with("p-"))
        }
    }

    #[tokio::test]
    async fn test_rejected_id_falls_back_to_broadcast() {
        let class = StoreClass::new(Picky);
        class.get_instance("p-1");

        let event = Arc::new(DispatchEvent::for_store("z-9", serde_json::json!({})));
        class.dispatch_event(event).await.expect("dispatch");

        // The rejected id was not resolved into a new instance.
        assert_eq!(class.len(), 1);
        assert!(class.lookup("z-9").is_none());
    }

    #[test]
    fn test_listener_conveniences_resolve_or_create() {
        let class = StoreClass::new(Plain);
        let listener: ChangeListener = Arc::new(|| {});

        let instance = class.add_change_listener("x", listener.clone());
        assert_eq!(instance.listener_count(), 1);
        assert_eq!(class.len(), 1);

        class.remove_change_listener("x", &listener);
        assert_eq!(instance.listener_count(), 0);

        // Removing against an unknown id still creates the instance.
        class.remove_change_listener("y", &listener);
        assert_eq!(class.len(), 2);
    }
}
