//! Signal subscription layer.
//!
//! # Responsibilities
//! - Arm one one-shot listener per configured signal at install
//! - Forward a delivered signal into the coordinator's trigger entry point
//!   exactly once, never re-arming
//! - Remove every binding on teardown so the shared source does not
//!   accumulate listeners across instances

use std::sync::Arc;

use crate::error::ShutdownError;
use crate::lifecycle::ShutdownCoordinator;

use super::source::{Signal, SignalSource};

/// Binds a set of signals to a coordinator and releases them on teardown.
pub struct SignalSubscriber {
    source: Arc<dyn SignalSource>,
    signals: Vec<Signal>,
}

impl SignalSubscriber {
    /// Create a subscriber over `source` for `signals`.
    pub fn new(source: Arc<dyn SignalSource>, signals: Vec<Signal>) -> Self {
        Self { source, signals }
    }

    /// Signals this subscriber manages.
    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    /// Arm a one-shot listener per configured signal, each forwarding the
    /// delivered signal into `coordinator`.
    pub(crate) fn bind(&self, coordinator: ShutdownCoordinator) -> Result<(), ShutdownError> {
        for &signal in &self.signals {
            let coordinator = coordinator.clone();
            self.source
                .once(
                    signal,
                    Box::new(move |delivered| {
                        Box::pin(async move {
                            coordinator.trigger_from_signal(delivered).await;
                        })
                    }),
                )
                .map_err(|source| ShutdownError::Subscribe { signal, source })?;
            tracing::debug!(signal = %signal, "Subscribed to signal");
        }
        Ok(())
    }

    /// Remove every binding from the source. Idempotent; a binding consumed
    /// by delivery is already gone.
    pub fn release(&self) {
        for &signal in &self.signals {
            self.source.remove(signal);
        }
    }

    /// Armed bindings attributable to this subscriber.
    pub fn listener_count(&self) -> usize {
        self.signals
            .iter()
            .map(|&signal| self.source.listener_count(signal))
            .sum()
    }

    /// Terminate the process through the capability.
    pub(crate) fn terminate(&self, code: i32) {
        self.source.exit(code);
    }
}
