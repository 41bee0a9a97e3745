//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Install (shutdown.rs / guard.rs):
//!     Builder::install → optional registry reset → bind signal set
//!
//! Trigger (coordinator.rs):
//!     Signal or explicit close
//!         → pre-close handlers (registration order)
//!         → host close hook
//!         → post-close handlers (registration order)
//!         → Done → release bindings → process exit (signal path only)
//! ```
//!
//! # Design Decisions
//! - One trigger per instance: the state machine leaves Idle exactly once
//! - Handlers run strictly sequentially, never concurrently with each other
//! - Best-effort failure policy: failures are logged, the sequence continues,
//!   and the first failure is surfaced to the explicit-close caller

pub mod coordinator;
pub mod guard;
pub mod registry;
pub mod shutdown;

pub use coordinator::{CloseAction, ShutdownCoordinator};
pub use registry::HandlerRegistry;
pub use shutdown::{Builder, GracefulShutdown};
