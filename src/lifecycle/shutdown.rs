//! Host-facing shutdown surface.
//!
//! # Responsibilities
//! - Builder wiring: config, notification source, shared registry, close hook
//! - Registration API delegating to the handler registry
//! - Explicit close entry point and completion waiting

use std::future::Future;
use std::sync::Arc;

use crate::config::ShutdownConfig;
use crate::error::{BoxError, ShutdownError};
use crate::handler::{DynValue, ShutdownHandler};
use crate::signal::{OsSignals, SignalSource, SignalSubscriber};

use super::coordinator::{CloseAction, ShutdownCoordinator};
use super::guard::LifecycleGuard;
use super::registry::HandlerRegistry;

/// Coordinated graceful shutdown for one host instance.
///
/// Built with [`GracefulShutdown::builder`]. Installing subscribes the
/// configured signal set; a delivered signal or an explicit [`close`] runs
/// the sequence exactly once:
///
/// ```text
/// pre-close handlers → host close hook → post-close handlers
/// ```
///
/// Dropping the value releases its signal bindings from the shared source;
/// [`close`] does the same as part of the sequence.
///
/// [`close`]: GracefulShutdown::close
pub struct GracefulShutdown {
    coordinator: ShutdownCoordinator,
}

impl GracefulShutdown {
    /// Start building an instance.
    pub fn builder() -> Builder {
        Builder::new()
    }

    /// Append a handler that runs before the host's close hook.
    pub fn register_pre_close(&self, handler: impl ShutdownHandler) {
        self.coordinator.registry().register_pre_close(handler);
    }

    /// Append a handler that runs after the host's close hook.
    pub fn register_post_close(&self, handler: impl ShutdownHandler) {
        self.coordinator.registry().register_post_close(handler);
    }

    /// Type-erased pre-close registration.
    ///
    /// # Errors
    ///
    /// [`ShutdownError::InvalidHandler`] when `value` does not hold a
    /// handler; the message names the type actually received.
    pub fn register_pre_close_dyn(&self, value: DynValue) -> Result<(), ShutdownError> {
        self.coordinator.registry().register_pre_close_dyn(value)
    }

    /// Type-erased post-close registration.
    ///
    /// # Errors
    ///
    /// [`ShutdownError::InvalidHandler`] when `value` does not hold a
    /// handler.
    pub fn register_post_close_dyn(&self, value: DynValue) -> Result<(), ShutdownError> {
        self.coordinator.registry().register_post_close_dyn(value)
    }

    /// The registry backing this instance. Hand the same registry to a later
    /// instance to carry handlers across create/close cycles.
    pub fn registry(&self) -> Arc<HandlerRegistry> {
        Arc::clone(self.coordinator.registry())
    }

    /// Explicitly run the shutdown sequence. Handlers receive `None` for the
    /// signal; the process keeps running. A second trigger of any kind is a
    /// silent no-op returning `Ok`.
    ///
    /// # Errors
    ///
    /// The first failure of the run, per the best-effort policy: every
    /// remaining handler and the close hook still execute.
    pub async fn close(&self) -> Result<(), ShutdownError> {
        self.coordinator.close().await
    }

    /// Wait until a triggered sequence has fully completed.
    pub async fn wait_done(&self) {
        self.coordinator.wait_done().await;
    }

    /// Whether a trigger has already started the sequence.
    pub fn is_shutting_down(&self) -> bool {
        self.coordinator.is_shutting_down()
    }

    /// Armed signal bindings attributable to this instance.
    pub fn listener_count(&self) -> usize {
        self.coordinator.subscriber().listener_count()
    }
}

impl Drop for GracefulShutdown {
    fn drop(&mut self) {
        // The notification source outlives this instance; unbind actively
        // instead of leaking listeners into it.
        self.coordinator.release_signals();
    }
}

/// Builder for [`GracefulShutdown`].
pub struct Builder {
    config: ShutdownConfig,
    source: Option<Arc<dyn SignalSource>>,
    registry: Option<Arc<HandlerRegistry>>,
    close: Option<CloseAction>,
}

impl Builder {
    fn new() -> Self {
        Self {
            config: ShutdownConfig::default(),
            source: None,
            registry: None,
            close: None,
        }
    }

    /// Use `config` instead of the defaults.
    pub fn config(mut self, config: ShutdownConfig) -> Self {
        self.config = config;
        self
    }

    /// Inject a replacement notification capability. Defaults to the real OS
    /// facility.
    pub fn signal_source(mut self, source: Arc<dyn SignalSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Share `registry` with this instance instead of creating a fresh one.
    pub fn registry(mut self, registry: Arc<HandlerRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// The host's close hook, run between the pre-close and post-close
    /// phases. Defaults to a no-op for hosts with nothing of their own to
    /// tear down.
    pub fn on_close<F, Fut>(mut self, close: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        self.close = Some(Box::new(move || Box::pin(close())));
        self
    }

    /// Install the instance: reset handlers when configured, then subscribe
    /// the signal set. Must run inside a tokio runtime.
    ///
    /// # Errors
    ///
    /// [`ShutdownError::Subscribe`] if the notification source refuses a
    /// signal.
    pub fn install(self) -> Result<GracefulShutdown, ShutdownError> {
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(HandlerRegistry::new()));
        let source = self
            .source
            .unwrap_or_else(|| Arc::new(OsSignals::new()) as Arc<dyn SignalSource>);
        let close: CloseAction = match self.close {
            Some(close) => close,
            None => Box::new(|| Box::pin(async { Ok(()) })),
        };

        let subscriber = SignalSubscriber::new(source, self.config.signals.clone());
        let coordinator = ShutdownCoordinator::new(
            Arc::clone(&registry),
            subscriber,
            close,
            self.config.exit_code,
        );

        LifecycleGuard::new(registry, self.config.reset_handlers_on_init).init(&coordinator)?;

        Ok(GracefulShutdown { coordinator })
    }
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}
