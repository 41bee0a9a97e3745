//! Graceful shutdown coordination for long-running tokio processes.
//!
//! When an operator delivers a termination signal, or the host application is
//! closed programmatically, registered cleanup actions run in a deterministic
//! order before the process exits:
//!
//! ```text
//! signal / explicit close
//!     → pre-close handlers (registration order, awaited one at a time)
//!     → host close hook
//!     → post-close handlers (registration order, awaited one at a time)
//!     → process exit (signal-initiated shutdowns only)
//! ```
//!
//! The sequence runs exactly once per instance no matter how many signals or
//! close calls race. The notification source is a constructor-injected
//! capability, so tests drive the engine without delivering real signals and
//! several independent instances can coexist in one process without leaking
//! listeners into the shared source.

pub mod config;
pub mod error;
pub mod handler;
pub mod lifecycle;
pub mod signal;

pub use config::ShutdownConfig;
pub use error::{BoxError, ShutdownError, ShutdownResult};
pub use handler::{DynValue, Phase, SharedHandler, ShutdownHandler};
pub use lifecycle::{GracefulShutdown, HandlerRegistry, ShutdownCoordinator};
pub use signal::{OsSignals, Signal, SignalListener, SignalSource, SignalSubscriber};
