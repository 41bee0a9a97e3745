//! Signal subscription subsystem.
//!
//! # Data Flow
//! ```text
//! Delivery:
//!     OS signal (or injected double)
//!         → SignalSource one-shot listener (consumed, not re-armed)
//!         → ShutdownCoordinator trigger
//!
//! Teardown:
//!     SignalSubscriber::release → SignalSource::remove (per signal)
//! ```
//!
//! # Design Decisions
//! - The notification source is a constructor-injected capability, never a
//!   process global reached by ambient lookup
//! - Bindings are one-shot: consumed on delivery, removed on release
//! - Listener counts exist for test observability, not coordination

pub mod os;
pub mod source;
pub mod subscriber;

pub use os::OsSignals;
pub use source::{Signal, SignalListener, SignalSource};
pub use subscriber::SignalSubscriber;
