//! ingress-indexd — the index daemon.
//!
//! Watches Kubernetes namespaces and serves a "table of contents" HTML
//! page linking to each Ingress. Single binary that assembles the
//! pieces:
//!
//! - Accumulator (shared record set)
//! - One watch task per namespace feeding the dispatcher
//! - Snapshot publisher
//! - HTTP index page
//!
//! # Usage
//!
//! ```text
//! ingress-indexd --namespaces default,staging --address 0.0.0.0:8080
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tokio::sync::watch;
use tracing::info;

use ingress_index_core::Accumulator;
use ingress_index_watch::{Dispatcher, KubeSource, snapshot_channel};
use ingress_index_web::{Publisher, WebState, build_router};

#[derive(Parser)]
#[command(name = "ingress-indexd", about = "Kubernetes Ingress index daemon")]
struct Cli {
    /// Address to listen on.
    #[arg(long, default_value = "0.0.0.0:8080")]
    address: SocketAddr,

    /// Force all URLs to https, even for Ingresses with no TLS section.
    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    force_tls: bool,

    /// Comma-separated namespaces to watch (required).
    #[arg(long, env = "NAMESPACES", value_delimiter = ',', required = true)]
    namespaces: Vec<String>,

    /// Watch session bound in seconds; each expiry triggers a full
    /// re-list against the cluster.
    #[arg(long, default_value = "60")]
    resync_interval: u64,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,ingress_indexd=debug".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    // Startup validation: refuse to run without at least one namespace.
    let mut namespaces: Vec<String> = cli
        .namespaces
        .into_iter()
        .filter(|ns| !ns.is_empty())
        .collect();
    if namespaces.is_empty() {
        anyhow::bail!("at least one namespace to watch is required (--namespaces)");
    }
    namespaces.sort();
    info!(namespaces = %namespaces.join(", "), "watching namespaces");

    // In-cluster config first, kubeconfig fallback. Fatal on failure.
    let client = kube::Client::try_default()
        .await
        .context("failed to construct Kubernetes client")?;

    // ── Watch pipeline ─────────────────────────────────────────

    let accumulator = Arc::new(Accumulator::new());
    let (snapshot_tx, snapshot_rx) = snapshot_channel();
    let source = KubeSource::new(client, Duration::from_secs(cli.resync_interval));

    // One task per namespace, running for the process lifetime. They
    // are not joined on shutdown; the process exits right after the
    // HTTP server drains.
    for namespace in &namespaces {
        let dispatcher =
            Dispatcher::new(Arc::clone(&accumulator), cli.force_tls, snapshot_tx.clone());
        let source = source.clone();
        let namespace = namespace.clone();
        tokio::spawn(async move {
            source.run(namespace, dispatcher).await;
        });
    }
    drop(snapshot_tx);

    let (publisher, published) = Publisher::new(snapshot_rx);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(publisher.run(shutdown_rx));

    // ── HTTP server ────────────────────────────────────────────

    let router = build_router(WebState { published });
    let listener = tokio::net::TcpListener::bind(cli.address)
        .await
        .with_context(|| format!("failed to bind {}", cli.address))?;

    info!(addr = %cli.address, "listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            let _ = shutdown_tx.send(true);
        })
        .await?;

    info!("ingress-indexd stopped");
    Ok(())
}

/// Resolve on SIGINT or SIGTERM.
async fn shutdown_signal() {
    use tokio::signal;

    #[cfg(unix)]
    {
        let mut term = signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = signal::ctrl_c() => info!("received SIGINT, shutting down"),
            _ = term.recv() => info!("received SIGTERM, shutting down"),
        }
    }
    #[cfg(not(unix))]
    {
        signal::ctrl_c()
            .await
            .expect("failed to install CTRL+C handler");
        info!("shutdown signal received");
    }
}
