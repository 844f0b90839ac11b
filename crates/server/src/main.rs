// crates/server/src/main.rs
//! Plotgrid server binary.
//!
//! Resolves the store configuration from the environment once, builds the
//! DynamoDB and S3 clients, and serves the plot metadata API.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use plotgrid_store::{DynamoMetadataStore, S3ArtifactStore, StoreConfig};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use plotgrid_server::state::AppState;
use plotgrid_server::create_app;

/// Default port for the server.
const DEFAULT_PORT: u16 = 47911;

/// Get the server port from environment or use default.
fn get_port() -> u16 {
    std::env::var("PLOTGRID_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = StoreConfig::from_env();
    tracing::info!(
        table = %config.table_name,
        bucket = %config.bucket_name,
        dynamodb_endpoint = ?config.dynamodb_endpoint,
        s3_endpoint = ?config.s3_endpoint,
        "Store configuration resolved"
    );

    let metadata = DynamoMetadataStore::new(config.dynamodb_client().await, &config.table_name);
    let artifacts = S3ArtifactStore::new(config.s3_client().await, &config.bucket_name);

    let state = AppState::new(config, Arc::new(metadata), Arc::new(artifacts));
    let app = create_app(state);

    let port = get_port();
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "Plotgrid server listening");

    axum::serve(listener, app).await?;
    Ok(())
}
