//! Idempotent re-initialization across host instances.
//!
//! # Responsibilities
//! - Clear stale handlers at install when the host opts in
//! - (Re)bind the signal set for the new instance
//!
//! Creating a second instance in one process after the first has closed must
//! behave exactly like the first: no inherited handlers, no stale bindings,
//! no listener-count growth on the shared notification source.

use std::sync::Arc;

use crate::error::ShutdownError;

use super::coordinator::ShutdownCoordinator;
use super::registry::HandlerRegistry;

/// Install-time coordination of registry reset and signal binding.
pub(crate) struct LifecycleGuard {
    registry: Arc<HandlerRegistry>,
    reset_handlers_on_init: bool,
}

impl LifecycleGuard {
    pub(crate) fn new(registry: Arc<HandlerRegistry>, reset_handlers_on_init: bool) -> Self {
        Self {
            registry,
            reset_handlers_on_init,
        }
    }

    /// Run the install step for `coordinator`: optional reset, then binding.
    pub(crate) fn init(&self, coordinator: &ShutdownCoordinator) -> Result<(), ShutdownError> {
        if self.reset_handlers_on_init {
            let stale = self.registry.pre_close_len() + self.registry.post_close_len();
            if stale > 0 {
                tracing::debug!(stale, "Clearing handlers from a previous instance");
            }
            self.registry.reset();
        }
        coordinator.subscriber().bind(coordinator.clone())
    }
}
