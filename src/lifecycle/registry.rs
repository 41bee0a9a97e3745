//! Ordered shutdown handler lists.
//!
//! # Responsibilities
//! - Keep pre-close and post-close handlers in registration order
//! - Validate type-erased registrations
//! - Reset both lists on re-initialization when configured

use std::sync::{Arc, Mutex};

use crate::error::ShutdownError;
use crate::handler::{DynValue, Phase, SharedHandler, ShutdownHandler};

/// Registry of pre-close and post-close handlers.
///
/// Insertion order is execution order. There is no deduplication: a handler
/// registered twice runs twice, once per registered position. Share one
/// registry across host instances (via `Arc`) to carry handlers over
/// create/close cycles; the lifecycle guard clears it on install when the
/// host opts into resetting.
#[derive(Default)]
pub struct HandlerRegistry {
    pre_close: Mutex<Vec<SharedHandler>>,
    post_close: Mutex<Vec<SharedHandler>>,
}

impl HandlerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler that runs before the host's close hook.
    pub fn register_pre_close(&self, handler: impl ShutdownHandler) {
        self.push(Phase::PreClose, Arc::new(handler));
    }

    /// Append a handler that runs after the host's close hook.
    pub fn register_post_close(&self, handler: impl ShutdownHandler) {
        self.push(Phase::PostClose, Arc::new(handler));
    }

    /// Type-erased registration for the pre-close phase.
    ///
    /// # Errors
    ///
    /// [`ShutdownError::InvalidHandler`] when `value` does not hold a
    /// handler; the message names the type actually received.
    pub fn register_pre_close_dyn(&self, value: DynValue) -> Result<(), ShutdownError> {
        self.push(Phase::PreClose, value.into_handler()?);
        Ok(())
    }

    /// Type-erased registration for the post-close phase.
    ///
    /// # Errors
    ///
    /// [`ShutdownError::InvalidHandler`] when `value` does not hold a
    /// handler.
    pub fn register_post_close_dyn(&self, value: DynValue) -> Result<(), ShutdownError> {
        self.push(Phase::PostClose, value.into_handler()?);
        Ok(())
    }

    /// Number of registered pre-close handlers.
    pub fn pre_close_len(&self) -> usize {
        self.pre_close.lock().unwrap().len()
    }

    /// Number of registered post-close handlers.
    pub fn post_close_len(&self) -> usize {
        self.post_close.lock().unwrap().len()
    }

    /// Empty both lists.
    pub fn reset(&self) {
        self.pre_close.lock().unwrap().clear();
        self.post_close.lock().unwrap().clear();
    }

    /// Snapshot of a phase's handlers, in registration order. The sequence
    /// executes the snapshot so the registration lock is never held across
    /// an await point.
    pub(crate) fn snapshot(&self, phase: Phase) -> Vec<SharedHandler> {
        self.list(phase).lock().unwrap().clone()
    }

    fn push(&self, phase: Phase, handler: SharedHandler) {
        self.list(phase).lock().unwrap().push(handler);
    }

    fn list(&self, phase: Phase) -> &Mutex<Vec<SharedHandler>> {
        match phase {
            Phase::PreClose => &self.pre_close,
            Phase::PostClose => &self.post_close,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::signal::Signal;

    fn counting_handler(seen: &Arc<Mutex<Vec<u32>>>, id: u32) -> impl ShutdownHandler + Clone {
        let seen = Arc::clone(seen);
        move |_signal: Option<Signal>| {
            let seen = Arc::clone(&seen);
            async move {
                seen.lock().unwrap().push(id);
                Ok::<(), BoxError>(())
            }
        }
    }

    #[tokio::test]
    async fn snapshot_preserves_registration_order() {
        let registry = HandlerRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        registry.register_pre_close(counting_handler(&seen, 1));
        registry.register_pre_close(counting_handler(&seen, 2));
        registry.register_pre_close(counting_handler(&seen, 3));

        for handler in registry.snapshot(Phase::PreClose) {
            handler.run(None).await.unwrap();
        }
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn duplicate_registration_runs_twice() {
        let registry = HandlerRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let handler = counting_handler(&seen, 7);

        registry.register_post_close(handler.clone());
        registry.register_post_close(handler);
        assert_eq!(registry.post_close_len(), 2);

        for handler in registry.snapshot(Phase::PostClose) {
            handler.run(None).await.unwrap();
        }
        assert_eq!(*seen.lock().unwrap(), vec![7, 7]);
    }

    #[test]
    fn reset_empties_both_lists() {
        let registry = HandlerRegistry::new();
        let seen = Arc::new(Mutex::new(Vec::new()));

        registry.register_pre_close(counting_handler(&seen, 1));
        registry.register_post_close(counting_handler(&seen, 2));
        registry.reset();

        assert_eq!(registry.pre_close_len(), 0);
        assert_eq!(registry.post_close_len(), 0);
    }

    #[test]
    fn dyn_registration_validates_its_input() {
        let registry = HandlerRegistry::new();

        let err = registry
            .register_pre_close_dyn(DynValue::new("not a handler"))
            .unwrap_err();
        assert!(err.to_string().contains("Expected a shutdown handler"));
        assert!(err.to_string().contains("&str"));
        assert_eq!(registry.pre_close_len(), 0);

        let seen: Arc<Mutex<Vec<u32>>> = Arc::new(Mutex::new(Vec::new()));
        registry
            .register_post_close_dyn(DynValue::handler(counting_handler(&seen, 1)))
            .unwrap();
        assert_eq!(registry.post_close_len(), 1);
    }
}
