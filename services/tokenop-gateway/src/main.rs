//! Tokenization Operations Gateway
//!
//! HTTP surface in front of a single token-factory contract: deploy,
//! mint, burn, transfer, pause and list fungible and non-fungible tokens,
//! with every on-chain write recorded in an in-memory operation ledger.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use tokenop_api::AppState;
use tokenop_chain::ChainGateway;
use tokenop_ingress::{RateLimitConfig, RateLimiter};
use tokenop_ledger::OperationLedger;
use tokenop_types::AuthCredential;

use crate::config::{Args, BootstrapConfig};

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(&args.log_level, &args.log_format);

    let config = match args.validate() {
        Ok(config) => config,
        Err(missing) => {
            for field in &missing {
                eprintln!("missing required configuration: {field}");
            }
            std::process::exit(1);
        }
    };

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "starting tokenop-gateway");

    // Connection and signer are lazily constructed on first use; an
    // unreachable RPC at this point is not fatal, only reflected by the
    // health probe until connectivity is restored.
    let chain = match ChainGateway::connect(config.chain) {
        Ok(chain) => Arc::new(chain),
        Err(err) => {
            eprintln!("failed to initialise chain gateway: {err}");
            std::process::exit(1);
        }
    };

    let ledger = Arc::new(OperationLedger::new(config.ledger_capacity));
    let auth = Arc::new(AuthCredential::new(config.api_keys));
    let rate_limiter = Arc::new(RateLimiter::new(RateLimitConfig::new(
        config.rate_limit_window,
        config.rate_limit_max_requests,
    )));

    let state = AppState::new(chain, ledger, auth, rate_limiter);
    let app = tokenop_api::build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .unwrap_or_else(|err| {
            eprintln!("invalid listen address {}:{}: {err}", config.host, config.port);
            std::process::exit(1);
        });

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            eprintln!("failed to bind {addr}: {err}");
            std::process::exit(1);
        }
    };

    tracing::info!(%addr, "listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal(config.shutdown_grace))
    .await
    .unwrap();

    tracing::info!("shutdown complete");
}

fn init_logging(level: &str, format: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = tracing_subscriber::registry().with(env_filter);

    match format {
        "json" => subscriber.with(fmt::layer().json().with_target(true)).init(),
        _ => subscriber.with(fmt::layer().pretty().with_target(true)).init(),
    }
}

/// Waits for Ctrl+C or SIGTERM, then gives in-flight requests `grace` to
/// finish before returning and letting `axum::serve` stop the listener.
async fn shutdown_signal(grace: std::time::Duration) {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }

    tracing::info!(grace_secs = grace.as_secs(), "draining in-flight requests");
    tokio::time::sleep(grace).await;
}
