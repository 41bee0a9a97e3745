//! Configuration schema for the shutdown engine.
//!
//! Types derive Serde traits so hosts can embed them in their own config
//! files. Defaults match a plain single-instance host: no reset on install,
//! interrupt plus termination signals, clean exit code zero.

use serde::{Deserialize, Serialize};

use crate::signal::Signal;

/// Configuration for one [`crate::GracefulShutdown`] instance.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Clear any previously registered pre/post-close handlers at install.
    ///
    /// Needed when the handler registry is shared across host instances in
    /// one process (rapid create/close cycles, multi-instance hosting):
    /// without it, handlers from a discarded instance would run again.
    pub reset_handlers_on_init: bool,

    /// Signals that trigger the shutdown sequence.
    pub signals: Vec<Signal>,

    /// Process exit code for a clean signal-initiated shutdown.
    pub exit_code: i32,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            reset_handlers_on_init: false,
            signals: vec![Signal::Interrupt, Signal::Terminate],
            exit_code: 0,
        }
    }
}
