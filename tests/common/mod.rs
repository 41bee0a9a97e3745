//! Shared utilities for the shutdown integration tests.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use graceful_shutdown::{BoxError, Signal, SignalListener, SignalSource, ShutdownHandler};

/// Recording double for the notification capability.
///
/// Tests deliver signals by hand with [`FakeSignals::fire`] and observe
/// subscription accounting and recorded exits instead of real process state.
#[derive(Default)]
pub struct FakeSignals {
    listeners: Mutex<HashMap<Signal, SignalListener>>,
    added: AtomicUsize,
    removed: AtomicUsize,
    exits: Mutex<Vec<i32>>,
}

impl FakeSignals {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Deliver `signal`, consuming its binding. Returns whether a listener
    /// was armed.
    pub async fn fire(&self, signal: Signal) -> bool {
        let listener = self.listeners.lock().unwrap().remove(&signal);
        match listener {
            Some(listener) => {
                listener(signal).await;
                true
            }
            None => false,
        }
    }

    /// Total one-shot subscriptions made against this source.
    #[allow(dead_code)]
    pub fn added(&self) -> usize {
        self.added.load(Ordering::SeqCst)
    }

    /// Total bindings explicitly removed (delivery consumption not counted).
    #[allow(dead_code)]
    pub fn removed(&self) -> usize {
        self.removed.load(Ordering::SeqCst)
    }

    /// Exit codes the engine asked for.
    pub fn exit_codes(&self) -> Vec<i32> {
        self.exits.lock().unwrap().clone()
    }
}

impl SignalSource for FakeSignals {
    fn once(&self, signal: Signal, listener: SignalListener) -> io::Result<()> {
        self.listeners.lock().unwrap().insert(signal, listener);
        self.added.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn remove(&self, signal: Signal) {
        if self.listeners.lock().unwrap().remove(&signal).is_some() {
            self.removed.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn listener_count(&self, signal: Signal) -> usize {
        usize::from(self.listeners.lock().unwrap().contains_key(&signal))
    }

    fn exit(&self, code: i32) {
        self.exits.lock().unwrap().push(code);
    }
}

/// Shared event log asserted by ordering tests.
pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn event_log() -> EventLog {
    Arc::new(Mutex::new(Vec::new()))
}

/// Current contents of `log`.
pub fn entries(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

/// Handler appending `entry` to `log` when it runs.
pub fn log_handler(log: &EventLog, entry: &'static str) -> impl ShutdownHandler {
    let log = Arc::clone(log);
    move |_signal: Option<Signal>| {
        let log = Arc::clone(&log);
        async move {
            log.lock().unwrap().push(entry.to_string());
            Ok::<(), BoxError>(())
        }
    }
}

/// Handler that always fails with `message`.
#[allow(dead_code)]
pub fn failing_handler(message: &'static str) -> impl ShutdownHandler {
    move |_signal: Option<Signal>| async move { Err::<(), BoxError>(BoxError::from(message)) }
}
