//! Shutdown handler types.
//!
//! Handlers are one-shot units of async cleanup work. Each receives the
//! triggering signal, or `None` when shutdown was started by an explicit
//! close call, and completes before the next handler starts.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::error::{BoxError, ShutdownError};
use crate::signal::Signal;

/// Position of a handler relative to the host's close hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Runs before the host's close hook.
    PreClose,
    /// Runs after the host's close hook.
    PostClose,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::PreClose => f.write_str("pre-close"),
            Phase::PostClose => f.write_str("post-close"),
        }
    }
}

/// A unit of cleanup work executed during the shutdown sequence.
///
/// Implemented for any `Fn(Option<Signal>)` closure returning a sendable
/// future of `Result<(), BoxError>`.
pub trait ShutdownHandler: Send + Sync + 'static {
    /// Run the cleanup work for the given trigger.
    fn run(&self, signal: Option<Signal>) -> BoxFuture<'static, Result<(), BoxError>>;
}

impl<F, Fut> ShutdownHandler for F
where
    F: Fn(Option<Signal>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    fn run(&self, signal: Option<Signal>) -> BoxFuture<'static, Result<(), BoxError>> {
        Box::pin(self(signal))
    }
}

impl fmt::Debug for dyn ShutdownHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ShutdownHandler")
    }
}

/// Shared handle to a registered handler.
///
/// Handlers are reference-counted so the sequence can execute a snapshot of
/// the registry without holding its lock across await points.
pub type SharedHandler = Arc<dyn ShutdownHandler>;

/// Type-erased registration input.
///
/// Hosts that forward plugin options dynamically can hand values here without
/// static knowledge of their contents. Conversion back into a handler fails
/// with [`ShutdownError::InvalidHandler`] naming the type actually received.
///
/// Wrap handlers with [`DynValue::handler`]; [`DynValue::new`] stores any
/// other value as-is and will be rejected at registration.
pub struct DynValue {
    value: Box<dyn Any + Send>,
    type_name: &'static str,
}

impl DynValue {
    /// Wrap an arbitrary value.
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_name: std::any::type_name::<T>(),
        }
    }

    /// Wrap a handler so it survives the round-trip through type erasure.
    pub fn handler(handler: impl ShutdownHandler) -> Self {
        Self {
            value: Box::new(Arc::new(handler) as SharedHandler),
            type_name: "shutdown handler",
        }
    }

    /// Name of the wrapped type, as reported in validation errors.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn into_handler(self) -> Result<SharedHandler, ShutdownError> {
        match self.value.downcast::<SharedHandler>() {
            Ok(handler) => Ok(*handler),
            Err(_) => Err(ShutdownError::InvalidHandler {
                received: self.type_name,
            }),
        }
    }
}

impl fmt::Debug for DynValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynValue")
            .field("type_name", &self.type_name)
            .finish()
    }
}
