//! Todo HTTP API server.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin todo-server
//! HOST=0.0.0.0 PORT=8080 METRICS_ENABLED=false cargo run --bin todo-server
//! ```
//!
//! # Example Requests
//!
//! ```bash
//! curl -X POST http://localhost:3001/add \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Buy milk", "completed": false}'
//!
//! curl -X POST http://localhost:3001/toggle \
//!   -H "Content-Type: application/json" \
//!   -d '{"name": "Buy milk"}'
//!
//! curl http://localhost:3001/list
//! ```

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusBuilder;
use todo_store::{new_store, server, Config};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    config.validate().context("invalid configuration")?;
    info!(?config, "=== Todo Store Server ===");

    let metrics = if config.metrics_enabled {
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("failed to install Prometheus recorder")?;
        Some(handle)
    } else {
        None
    };

    let store = new_store();
    info!("Store created with todo reducer");

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;

    server::serve(listener, store, metrics, &config).await?;

    Ok(())
}
