//! Error definitions for the shutdown engine.

use thiserror::Error;

use crate::handler::Phase;
use crate::signal::Signal;

/// Boxed error carried out of handlers and the host close hook.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by registration, installation, and the shutdown sequence.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Registration input did not hold a handler. Raised synchronously at
    /// registration time, never while the sequence is running.
    #[error("Expected a shutdown handler but got a {received}")]
    InvalidHandler { received: &'static str },

    /// A cleanup handler failed while the sequence was running.
    #[error("{phase} handler #{index} failed: {source}")]
    HandlerExecution {
        phase: Phase,
        index: usize,
        #[source]
        source: BoxError,
    },

    /// The host's close hook failed.
    #[error("host close hook failed: {0}")]
    CloseHook(#[source] BoxError),

    /// Installing a listener against the notification source failed.
    #[error("failed to subscribe to {signal}: {source}")]
    Subscribe {
        signal: Signal,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for shutdown operations.
pub type ShutdownResult<T> = Result<T, ShutdownError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ShutdownError::InvalidHandler { received: "&str" };
        assert_eq!(err.to_string(), "Expected a shutdown handler but got a &str");

        let err = ShutdownError::HandlerExecution {
            phase: Phase::PreClose,
            index: 2,
            source: BoxError::from("flush failed"),
        };
        assert!(err.to_string().contains("pre-close handler #2"));
    }
}
