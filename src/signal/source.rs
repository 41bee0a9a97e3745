//! The notification capability abstraction.

use std::fmt;
use std::io;

use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

/// A POSIX-style signal the engine can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Signal {
    /// SIGINT, the interactive interrupt (Ctrl+C).
    #[serde(rename = "SIGINT")]
    Interrupt,
    /// SIGTERM, the polite termination request.
    #[serde(rename = "SIGTERM")]
    Terminate,
    /// SIGHUP, terminal hangup.
    #[serde(rename = "SIGHUP")]
    Hangup,
    /// SIGUSR1, user-defined.
    #[serde(rename = "SIGUSR1")]
    User1,
    /// SIGUSR2, user-defined.
    #[serde(rename = "SIGUSR2")]
    User2,
}

impl Signal {
    /// Conventional uppercase name, as handlers and logs see it.
    pub fn name(&self) -> &'static str {
        match self {
            Signal::Interrupt => "SIGINT",
            Signal::Terminate => "SIGTERM",
            Signal::Hangup => "SIGHUP",
            Signal::User1 => "SIGUSR1",
            Signal::User2 => "SIGUSR2",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One-shot listener invoked when a subscribed signal is delivered.
pub type SignalListener = Box<dyn FnOnce(Signal) -> BoxFuture<'static, ()> + Send>;

/// The notification capability the engine subscribes against.
///
/// Defaults to the real OS facility ([`crate::signal::OsSignals`]); tests
/// inject a double so the engine is exercised without delivering real
/// signals. The underlying source is long-lived and shared across instances
/// in one process, so holders must remove their bindings when done rather
/// than letting them leak.
pub trait SignalSource: Send + Sync + 'static {
    /// Arm a one-shot listener for `signal`, replacing any previous binding
    /// for the same signal.
    fn once(&self, signal: Signal, listener: SignalListener) -> io::Result<()>;

    /// Drop the binding for `signal`, if any.
    fn remove(&self, signal: Signal);

    /// Number of armed bindings for `signal`. Observability for tests, never
    /// coordination logic.
    fn listener_count(&self, signal: Signal) -> usize;

    /// Terminate the process with `code`.
    fn exit(&self, code: i32);
}
