//! Demo host: an axum server wired to the graceful shutdown engine.
//!
//! Run it and hit Ctrl+C (or send SIGTERM): the pre-close handler runs, the
//! close hook stops the listener and waits for it to drain, the post-close
//! handler runs, and only then does the process exit.

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::{watch, Notify};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use graceful_shutdown::{BoxError, GracefulShutdown, ShutdownConfig};

#[derive(Parser)]
#[command(name = "demo-server")]
#[command(about = "Demo host for the graceful shutdown engine", long_about = None)]
struct Cli {
    /// Address to bind.
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    bind: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "demo_server=debug,graceful_shutdown=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let listener = TcpListener::bind(&cli.bind).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!(address = %local_addr, "Listening for connections");

    let app = Router::new()
        .route("/", get(|| async { "ok" }))
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(TraceLayer::new_for_http());

    // The close hook stops the listener, then waits until the server task
    // reports that in-flight connections have drained.
    let (stop_tx, mut stop_rx) = watch::channel(false);
    let drained = Arc::new(Notify::new());

    let shutdown = {
        let drained = Arc::clone(&drained);
        GracefulShutdown::builder()
            .config(ShutdownConfig::default())
            .on_close(move || {
                let stop_tx = stop_tx.clone();
                let drained = Arc::clone(&drained);
                async move {
                    let _ = stop_tx.send(true);
                    drained.notified().await;
                    Ok::<(), BoxError>(())
                }
            })
            .install()?
    };

    shutdown.register_pre_close(|signal: Option<graceful_shutdown::Signal>| async move {
        match signal {
            Some(signal) => tracing::info!(signal = %signal, "Draining in-flight work"),
            None => tracing::info!("Draining in-flight work (explicit close)"),
        }
        Ok::<(), BoxError>(())
    });
    shutdown.register_post_close(|_signal: Option<graceful_shutdown::Signal>| async move {
        tracing::info!("Listener closed, flushing state");
        Ok::<(), BoxError>(())
    });

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = stop_rx.changed().await;
        })
        .await?;

    // Unblock the close hook, then wait for the post-close phase. On the
    // signal path the coordinator exits the process once it finishes.
    drained.notify_one();
    shutdown.wait_done().await;

    Ok(())
}
