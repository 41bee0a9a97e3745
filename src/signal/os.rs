//! OS-backed notification source.
//!
//! # Responsibilities
//! - Arm one-shot listeners for POSIX signals via tokio
//! - Consume a binding on delivery (no re-arm)
//! - Abort pending listeners on removal
//!
//! # Design Decisions
//! - One spawned task per armed signal (async-safe, no signal-handler code)
//! - A firing binding removes itself from the table before its listener
//!   runs, so removing that signal during the shutdown sequence is a no-op

use std::io;
use std::sync::Arc;

use dashmap::DashMap;
use tokio::task::JoinHandle;

use super::source::{Signal, SignalListener, SignalSource};

#[cfg(unix)]
use tokio::signal::unix::{signal as unix_signal, SignalKind};

/// Real-process signal source backed by `tokio::signal`.
pub struct OsSignals {
    bindings: Arc<DashMap<Signal, JoinHandle<()>>>,
}

impl OsSignals {
    /// Create a new source. Must be used inside a tokio runtime.
    pub fn new() -> Self {
        Self {
            bindings: Arc::new(DashMap::new()),
        }
    }
}

impl Default for OsSignals {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(unix)]
fn signal_kind(signal: Signal) -> SignalKind {
    match signal {
        Signal::Interrupt => SignalKind::interrupt(),
        Signal::Terminate => SignalKind::terminate(),
        Signal::Hangup => SignalKind::hangup(),
        Signal::User1 => SignalKind::user_defined1(),
        Signal::User2 => SignalKind::user_defined2(),
    }
}

impl SignalSource for OsSignals {
    fn once(&self, signal: Signal, listener: SignalListener) -> io::Result<()> {
        let bindings = Arc::clone(&self.bindings);

        #[cfg(unix)]
        let handle = {
            let mut stream = unix_signal(signal_kind(signal))?;
            tokio::spawn(async move {
                if stream.recv().await.is_some() {
                    // Consume the binding before the listener runs.
                    bindings.remove(&signal);
                    tracing::info!(signal = %signal, "Signal received");
                    listener(signal).await;
                }
            })
        };

        #[cfg(not(unix))]
        let handle = {
            // Only the interrupt signal has a portable equivalent.
            if signal != Signal::Interrupt {
                tracing::debug!(signal = %signal, "Signal not supported on this platform");
                return Ok(());
            }
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    bindings.remove(&signal);
                    tracing::info!(signal = %signal, "Signal received");
                    listener(signal).await;
                }
            })
        };

        if let Some(previous) = self.bindings.insert(signal, handle) {
            previous.abort();
        }
        Ok(())
    }

    fn remove(&self, signal: Signal) {
        if let Some((_, handle)) = self.bindings.remove(&signal) {
            handle.abort();
        }
    }

    fn listener_count(&self, signal: Signal) -> usize {
        usize::from(self.bindings.contains_key(&signal))
    }

    fn exit(&self, code: i32) {
        std::process::exit(code);
    }
}
