//! Store instances: id, state slot, and change listeners.

use crate::error::StoreError;
use crate::kind::StoreKind;
use parking_lot::{Mutex, RwLock};
use std::fmt;
use std::sync::Arc;
use weft_core::StoreId;

/// A change listener attached to a store instance.
///
/// Listeners are compared by pointer identity, so removal requires a clone
/// of the `Arc` that was added.
pub type ChangeListener = Arc<dyn Fn() + Send + Sync>;

struct Inner<K: StoreKind> {
    id: StoreId,
    key: String,
    kind: Arc<K>,
    // None until initialization assigns the initial state; re-entrant
    // lookups during the init hooks observe the empty slot.
    state: RwLock<Option<K::State>>,
    listeners: Mutex<Vec<ChangeListener>>,
}

/// A cheaply clonable reference to one store instance.
///
/// All clones address the same instance; identity is the instance, not the
/// handle. The registry in [`StoreClass`](crate::StoreClass) keeps one alive
/// until it is explicitly discarded.
pub struct StoreHandle<K: StoreKind> {
    inner: Arc<Inner<K>>,
}

impl<K: StoreKind> Clone for StoreHandle<K> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<K: StoreKind> StoreHandle<K> {
    pub(crate) fn new(id: StoreId, kind: Arc<K>) -> Self {
        let key = id.canonical_key();
        Self {
            inner: Arc::new(Inner {
                id,
                key,
                kind,
                state: RwLock::new(None),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    /// The instance's identifier
    pub fn id(&self) -> &StoreId {
        &self.inner.id
    }

    /// The canonical registry key for this instance
    pub fn canonical_key(&self) -> &str {
        &self.inner.key
    }

    /// The shared behavior value
    pub fn kind(&self) -> &K {
        &self.inner.kind
    }

    /// Whether two handles address the same instance
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether initialization has assigned this instance's state yet
    pub fn is_initialized(&self) -> bool {
        self.inner.state.read().is_some()
    }

    // Assign the initial state without notifying listeners.
    pub(crate) fn init_state(&self, state: K::State) {
        *self.inner.state.write() = Some(state);
    }

    /// Read the state through a closure.
    ///
    /// Fails with [`StoreError::Uninitialized`] if called before
    /// initialization completes (possible only from inside the init hooks).
    pub fn with_state<R>(&self, f: impl FnOnce(&K::State) -> R) -> Result<R, StoreError> {
        let guard = self.inner.state.read();
        match guard.as_ref() {
            Some(state) => Ok(f(state)),
            None => Err(StoreError::Uninitialized {
                key: self.inner.key.clone(),
            }),
        }
    }

    /// Clone the current state out of the instance
    pub fn state(&self) -> Result<K::State, StoreError>
    where
        K::State: Clone,
    {
        self.with_state(|state| state.clone())
    }

    /// Replace the state and notify listeners
    pub fn set_state(&self, state: K::State) {
        *self.inner.state.write() = Some(state);
        self.notify_listeners();
    }

    /// Mutate the state in place, then notify listeners
    pub fn update_state(&self, f: impl FnOnce(&mut K::State)) -> Result<(), StoreError> {
        {
            let mut guard = self.inner.state.write();
            match guard.as_mut() {
                Some(state) => f(state),
                None => {
                    return Err(StoreError::Uninitialized {
                        key: self.inner.key.clone(),
                    });
                }
            }
        }
        self.notify_listeners();
        Ok(())
    }

    /// Number of attached change listeners
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.lock().len()
    }

    /// Attach a change listener.
    ///
    /// If this is the first listener, `did_become_active` fires after the
    /// add. The hook is edge-triggered: re-activating a previously drained
    /// instance fires it again.
    pub fn add_change_listener(&self, listener: ChangeListener) {
        let count = {
            let mut listeners = self.inner.listeners.lock();
            listeners.push(listener);
            listeners.len()
        };
        if count == 1 {
            self.inner.kind.did_become_active(self);
        }
    }

    /// Detach a change listener by pointer identity.
    ///
    /// If this removal empties the listener list, `did_become_inactive`
    /// fires after the removal. Removing a listener that was never attached
    /// is a no-op.
    pub fn remove_change_listener(&self, listener: &ChangeListener) {
        let became_inactive = {
            let mut listeners = self.inner.listeners.lock();
            let had_listeners = !listeners.is_empty();
            listeners.retain(|l| !Arc::ptr_eq(l, listener));
            had_listeners && listeners.is_empty()
        };
        if became_inactive {
            self.inner.kind.did_become_inactive(self);
        }
    }

    /// Invoke every attached listener.
    ///
    /// Listeners are snapshotted first, so a listener may add or remove
    /// listeners without deadlocking.
    pub fn notify_listeners(&self) {
        let listeners: Vec<ChangeListener> = self.inner.listeners.lock().clone();
        for listener in listeners {
            listener();
        }
    }
}

impl<K: StoreKind> fmt::Debug for StoreHandle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreHandle")
            .field("kind", &K::NAME)
            .field("key", &self.inner.key)
            .field("initialized", &self.is_initialized())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
