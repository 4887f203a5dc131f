//! The dispatcher collaborator contract.
//!
//! Weft does not ship a dispatcher; applications bring their own. The only
//! thing the store layer needs from one is [`Dispatcher::register`]: hand it
//! a handler, get back an opaque registration index.

use crate::event::DispatchEvent;
use futures_util::future::BoxFuture;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Opaque token identifying a handler registration with a dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DispatcherIndex(pub u64);

impl fmt::Display for DispatcherIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "dispatch:{}", self.0)
    }
}

/// Error produced when a dispatched event's handling fails.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// An event handler failed or rejected
    #[error("event handler failed: {0}")]
    Handler(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl DispatchError {
    /// Wrap a handler failure
    pub fn handler(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Handler(Box::new(err))
    }
}

/// A registered dispatch handler.
///
/// Handlers always return a future, whether or not the underlying work
/// suspends; this is the uniform completion primitive that lets the
/// dispatcher treat synchronous and asynchronous handling identically.
pub type DispatchHandler =
    Box<dyn Fn(Arc<DispatchEvent>) -> BoxFuture<'static, Result<(), DispatchError>> + Send + Sync>;

/// External event dispatcher collaborator.
///
/// Implementations sequence event delivery to registered handlers. The core
/// assumes nothing else about them: no unregistration, no ordering across
/// handlers, no event schema beyond [`DispatchEvent`].
pub trait Dispatcher {
    /// Register a handler, returning its registration index
    fn register(&self, handler: DispatchHandler) -> DispatcherIndex;
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    // Minimal in-process dispatcher used only to exercise the contract.
    struct LocalDispatcher {
        handlers: Mutex<Vec<DispatchHandler>>,
    }

    impl LocalDispatcher {
        fn new() -> Self {
            Self {
                handlers: Mutex::new(Vec::new()),
            }
        }

        async fn dispatch(&self, event: DispatchEvent) -> Result<(), DispatchError> {
            let event = Arc::new(event);
            let futures: Vec<_> = {
                let handlers = self.handlers.lock();
                handlers.iter().map(|h| h(event.clone())).collect()
            };
            for fut in futures {
                fut.await?;
            }
            Ok(())
        }
    }

    impl Dispatcher for LocalDispatcher {
        fn register(&self, handler: DispatchHandler) -> DispatcherIndex {
            let mut handlers = self.handlers.lock();
            handlers.push(handler);
            DispatcherIndex(handlers.len() as u64 - 1)
        }
    }

    #[tokio::test]
    async fn test_register_returns_sequential_indices() {
        let dispatcher = LocalDispatcher::new();
        let first = dispatcher.register(Box::new(|_| Box::pin(async { Ok(()) })));
        let second = dispatcher.register(Box::new(|_| Box::pin(async { Ok(()) })));
        assert_eq!(first, DispatcherIndex(0));
        assert_eq!(second, DispatcherIndex(1));
    }

    #[tokio::test]
    async fn test_handler_receives_event() {
        let dispatcher = LocalDispatcher::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();
        dispatcher.register(Box::new(move |event| {
            seen_clone.lock().push(event.payload.clone());
            Box::pin(async { Ok(()) })
        }));

        dispatcher
            .dispatch(DispatchEvent::new(serde_json::json!({"name": "tick"})))
            .await
            .expect("dispatch");

        assert_eq!(seen.lock().len(), 1);
    }
}
