//! Interchain Event Distributor entry point.

use anyhow::{Context, Result};
use broker_runtime::gateway::build_router;
use broker_runtime::{bootstrap, BrokerConfig, SubsystemContainer};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Bound on the post-listener drain of in-flight handlers. Abandoned
/// replication waits are fine: the next observation resumes them.
const SHUTDOWN_DRAIN: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing()?;

    let config = BrokerConfig::from_env().context("configuration")?;
    info!(
        port = config.port,
        adapters = config.adapters.len(),
        environment = ?config.environment,
        "Starting Interchain Event Distributor"
    );

    let container =
        Arc::new(SubsystemContainer::build(config).context("container construction")?);

    let report = bootstrap::run(&container).await.context("bootstrap")?;
    info!(
        cache_up = report.cache_up,
        healthy_adapters = report.healthy_adapters.len(),
        internal_subscriptions = report.internal_subscriptions,
        "Bootstrap finished"
    );

    let addr = SocketAddr::new(
        IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        container.config.port,
    );
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(addr = %addr, "Gateway listening");

    let router = build_router(Arc::clone(&container));

    // Signal fan-out: the listener stops accepting on the first
    // signal, in-flight handlers get the bounded drain, and whatever
    // is still running after that (replication-delay waits included)
    // is abandoned.
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    let mut server_rx = shutdown_rx.clone();
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        let _ = server_rx.changed().await;
    });

    let mut drain_rx = shutdown_rx;
    let drain_elapsed = async move {
        let _ = drain_rx.changed().await;
        tokio::time::sleep(SHUTDOWN_DRAIN).await;
    };

    tokio::select! {
        result = server => {
            if let Err(e) = result {
                warn!(error = %e, "Server error");
            }
        }
        () = drain_elapsed => {
            warn!("Drain window elapsed; abandoning in-flight handlers");
        }
    }

    info!("Shutdown complete");
    Ok(())
}

/// Resolve on ctrl-c or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl-c"),
        _ = terminate => info!("Received SIGTERM"),
    }
}

/// Install the global tracing subscriber from `LOG_LEVEL`.
fn init_tracing() -> Result<()> {
    let level = std::env::var("LOG_LEVEL")
        .ok()
        .and_then(|l| l.parse::<Level>().ok())
        .unwrap_or(Level::INFO);

    let json_format = std::env::var("LOG_FORMAT")
        .map(|f| f.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json_format {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(level)
            .json()
            .finish();
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }
    Ok(())
}
