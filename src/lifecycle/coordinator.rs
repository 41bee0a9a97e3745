//! Shutdown sequencing state machine.
//!
//! # Responsibilities
//! - Accept at most one trigger per instance (Idle → Running → Done)
//! - Run pre-close handlers, the host close hook, then post-close handlers,
//!   each awaited to completion in registration order
//! - Release signal bindings once the sequence is done
//! - Terminate the process after signal-initiated runs
//!
//! # Design Decisions
//! - Best-effort failure policy: a failing step is logged and the sequence
//!   continues; the first failure is returned to the explicit-close caller
//!   and turns the signal path's exit code into 1
//! - No timeout and no cancellation: once Running, the sequence runs to
//!   completion

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use futures_util::future::BoxFuture;
use tokio::sync::watch;

use crate::error::{BoxError, ShutdownError};
use crate::handler::Phase;
use crate::signal::{Signal, SignalSubscriber};

use super::registry::HandlerRegistry;

/// The host's close hook: the action that tears down the host's own
/// resources (listeners, connections), run between the pre-close and
/// post-close phases.
pub type CloseAction = Box<dyn Fn() -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;

const IDLE: u8 = 0;
const RUNNING: u8 = 1;
const DONE: u8 = 2;

/// State machine driving the shutdown sequence.
///
/// Cheap to clone; all clones share one state cell, so concurrent triggers
/// collapse into a single run.
#[derive(Clone)]
pub struct ShutdownCoordinator {
    inner: Arc<Inner>,
}

struct Inner {
    registry: Arc<HandlerRegistry>,
    subscriber: SignalSubscriber,
    close: CloseAction,
    state: AtomicU8,
    exit_code: i32,
    done_tx: watch::Sender<bool>,
}

enum Trigger {
    Ran(Result<(), ShutdownError>),
    AlreadyTriggered,
}

impl ShutdownCoordinator {
    pub(crate) fn new(
        registry: Arc<HandlerRegistry>,
        subscriber: SignalSubscriber,
        close: CloseAction,
        exit_code: i32,
    ) -> Self {
        let (done_tx, _) = watch::channel(false);
        Self {
            inner: Arc::new(Inner {
                registry,
                subscriber,
                close,
                state: AtomicU8::new(IDLE),
                exit_code,
                done_tx,
            }),
        }
    }

    /// Whether a trigger has already started the sequence.
    pub fn is_shutting_down(&self) -> bool {
        self.inner.state.load(Ordering::SeqCst) != IDLE
    }

    /// Wait until the sequence has fully completed.
    pub async fn wait_done(&self) {
        let mut done_rx = self.inner.done_tx.subscribe();
        let _ = done_rx.wait_for(|&done| done).await;
    }

    /// Explicit close path. Runs the full sequence and leaves the process
    /// running; the caller retains control of process lifetime. A second
    /// trigger of any kind is a silent no-op returning `Ok`.
    ///
    /// # Errors
    ///
    /// The first failure of the run, per the best-effort policy: a
    /// [`ShutdownError::HandlerExecution`] or [`ShutdownError::CloseHook`].
    pub async fn close(&self) -> Result<(), ShutdownError> {
        match self.run(None).await {
            Trigger::Ran(outcome) => outcome,
            Trigger::AlreadyTriggered => Ok(()),
        }
    }

    /// Signal path. Runs the sequence, then terminates the process through
    /// the notification capability: the configured exit code on a clean run,
    /// 1 if any step failed.
    pub(crate) async fn trigger_from_signal(&self, signal: Signal) {
        match self.run(Some(signal)).await {
            Trigger::Ran(outcome) => {
                let code = match outcome {
                    Ok(()) => self.inner.exit_code,
                    Err(_) => 1,
                };
                self.inner.subscriber.terminate(code);
            }
            Trigger::AlreadyTriggered => {}
        }
    }

    /// Remove this instance's signal bindings from the shared source.
    pub(crate) fn release_signals(&self) {
        self.inner.subscriber.release();
    }

    pub(crate) fn subscriber(&self) -> &SignalSubscriber {
        &self.inner.subscriber
    }

    pub(crate) fn registry(&self) -> &Arc<HandlerRegistry> {
        &self.inner.registry
    }

    async fn run(&self, signal: Option<Signal>) -> Trigger {
        if self
            .inner
            .state
            .compare_exchange(IDLE, RUNNING, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("Shutdown already in progress, ignoring trigger");
            return Trigger::AlreadyTriggered;
        }

        match signal {
            Some(signal) => tracing::info!(signal = %signal, "Starting graceful shutdown"),
            None => tracing::info!("Starting graceful shutdown (explicit close)"),
        }

        let mut first_error = None;

        self.run_phase(Phase::PreClose, signal, &mut first_error).await;

        if let Err(source) = (self.inner.close)().await {
            tracing::error!(error = %source, "Host close hook failed");
            first_error.get_or_insert(ShutdownError::CloseHook(source));
        }

        self.run_phase(Phase::PostClose, signal, &mut first_error).await;

        self.inner.state.store(DONE, Ordering::SeqCst);
        let _ = self.inner.done_tx.send(true);
        self.release_signals();
        tracing::info!("Graceful shutdown complete");

        Trigger::Ran(match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        })
    }

    async fn run_phase(
        &self,
        phase: Phase,
        signal: Option<Signal>,
        first_error: &mut Option<ShutdownError>,
    ) {
        for (index, handler) in self.inner.registry.snapshot(phase).into_iter().enumerate() {
            if let Err(source) = handler.run(signal).await {
                tracing::error!(phase = %phase, index, error = %source, "Shutdown handler failed");
                first_error.get_or_insert(ShutdownError::HandlerExecution {
                    phase,
                    index,
                    source,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io;
    use std::sync::Mutex;

    use super::*;
    use crate::signal::{SignalListener, SignalSource};

    /// Source that records exits and otherwise does nothing.
    #[derive(Default)]
    struct NullSource {
        exits: Mutex<Vec<i32>>,
    }

    impl SignalSource for NullSource {
        fn once(&self, _signal: Signal, _listener: SignalListener) -> io::Result<()> {
            Ok(())
        }

        fn remove(&self, _signal: Signal) {}

        fn listener_count(&self, _signal: Signal) -> usize {
            0
        }

        fn exit(&self, code: i32) {
            self.exits.lock().unwrap().push(code);
        }
    }

    fn test_coordinator(registry: Arc<HandlerRegistry>) -> ShutdownCoordinator {
        let subscriber = SignalSubscriber::new(Arc::new(NullSource::default()), Vec::new());
        let close: CloseAction = Box::new(|| Box::pin(async { Ok(()) }));
        ShutdownCoordinator::new(registry, subscriber, close, 0)
    }

    #[tokio::test]
    async fn concurrent_closes_run_the_sequence_once() {
        let registry = Arc::new(HandlerRegistry::new());
        let ran = Arc::new(Mutex::new(0u32));
        let ran_handle = Arc::clone(&ran);
        registry.register_pre_close(move |_signal: Option<Signal>| {
            let ran = Arc::clone(&ran_handle);
            async move {
                *ran.lock().unwrap() += 1;
                Ok::<(), BoxError>(())
            }
        });

        let coordinator = test_coordinator(registry);
        let (first, second) = tokio::join!(coordinator.close(), coordinator.close());
        first.unwrap();
        second.unwrap();

        assert_eq!(*ran.lock().unwrap(), 1);
        assert!(coordinator.is_shutting_down());
    }

    #[tokio::test]
    async fn wait_done_resolves_after_completion() {
        let coordinator = test_coordinator(Arc::new(HandlerRegistry::new()));
        coordinator.close().await.unwrap();
        // Completes immediately: the done watch already holds true.
        coordinator.wait_done().await;
    }
}
