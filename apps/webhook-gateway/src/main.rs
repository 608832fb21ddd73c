//! Webhook Gateway Binary
//!
//! Starts the alert webhook and routes alerts to OANDA.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin webhook-gateway
//! ```
//!
//! # Environment Variables
//!
//! ## Required
//! - `OANDA_ACCOUNT_ID`: Broker account
//! - `OANDA_API_KEY`: Broker API token
//!
//! ## Optional
//! - `OANDA_ENV`: practice | live (default: practice)
//! - `OANDA_BASE_URL`: Broker host override
//! - `WEBHOOK_SECRET`: Shared secret required on every alert
//! - `DEFAULT_RISK_PCT`: Equity fraction for alerts without units
//! - `AUTO_FLATTEN`: Close opposing positions before entries (default: true)
//! - `ORDER_TIME_IN_FORCE`: FOK | IOC (default: FOK)
//! - `BROKER_TIMEOUT_SECS`: Per-call broker timeout, 1-60 (default: 15)
//! - `PORT`: Webhook port (default: 5000)
//! - `BIND_ADDRESS`: Bind address (default: 0.0.0.0)
//! - `METRICS_PORT`: Prometheus port, 0 disables (default: 0)
//! - `GATEWAY_CONFIG`: YAML config file used instead of the variables above
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;

use webhook_gateway::config::GatewayConfig;
use webhook_gateway::infrastructure::broker::OandaBrokerAdapter;
use webhook_gateway::infrastructure::http::{AppState, create_router};
use webhook_gateway::observability::{MetricsConfig, init_metrics};
use webhook_gateway::telemetry::init_telemetry;
use webhook_gateway::{ExecuteAlertUseCase, OrderMapper};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    load_dotenv();
    let _telemetry = init_telemetry();

    tracing::info!("Starting webhook gateway");

    let config = GatewayConfig::load().context("failed to load configuration")?;
    log_config(&config);

    if let Some(addr) = config.server.metrics_addr() {
        init_metrics(&MetricsConfig::with_addr(addr))?;
    }

    let broker = OandaBrokerAdapter::new(&config.oanda_config())
        .context("failed to create OANDA client")?;
    let use_case = ExecuteAlertUseCase::new(
        Arc::new(broker),
        config.translator(),
        OrderMapper::new(config.mapper_policy()),
    );

    let state = AppState {
        execute_alert: Arc::new(use_case),
        webhook_secret: config.webhook.secret().map(Arc::from),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: config.broker.environment.to_string(),
    };
    let app = create_router(state);

    let http_addr = config.server.http_addr();
    let listener = TcpListener::bind(&http_addr)
        .await
        .with_context(|| format!("failed to bind {http_addr}"))?;

    tracing::info!(%http_addr, "HTTP server starting");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health");
    tracing::info!("  GET  /, /webhook");
    tracing::info!("  POST /, /webhook");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;

    tracing::info!("Webhook gateway stopped");
    Ok(())
}

/// Load .env file from current or ancestor directories.
fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    if let Ok(cwd) = std::env::current_dir() {
        let mut dir = cwd.as_path();
        while let Some(parent) = dir.parent() {
            let env_path = parent.join(".env");
            if env_path.exists() {
                let _ = dotenvy::from_path(&env_path);
                return;
            }
            dir = parent;
        }
    }
}

/// Log the parsed configuration (credentials redacted).
fn log_config(config: &GatewayConfig) {
    tracing::info!(
        environment = %config.broker.environment,
        account_id = config.broker.credentials.account_id(),
        broker_timeout_secs = config.broker.timeout_secs,
        auto_flatten = config.trading.auto_flatten,
        time_in_force = %config.trading.time_in_force,
        default_risk_pct = ?config.trading.default_risk_pct,
        webhook_secret = config.webhook.secret().is_some(),
        "Configuration loaded"
    );

    if config.broker.environment.is_live() {
        tracing::warn!("LIVE trading environment: alerts place real orders");
    }
}

/// Wait for shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, initiating shutdown");
        }
    }
}
