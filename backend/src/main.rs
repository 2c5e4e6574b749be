//! Main entry point for the BCR API backend.
//!
//! This file initializes the Axum web server, sets up the database connection,
//! applies migrations, and wires the authentication service into the router.

mod api;
mod auth;
mod config;
mod database;
mod errors;
mod repositories;
mod utils;

use std::sync::Arc;

use anyhow::Context;
use auth::service::AuthService;
use auth::store::SqliteCredentialStore;
use config::Config;
use database::Database;
use tracing::info;
use tracing_subscriber::fmt::init;
use utils::jwt::TokenIssuer;
use utils::password::PasswordHasher;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init();

    let config = Config::from_env()?;
    let db = Database::new(&config).await?;
    db.migrate().await?;

    let auth_config = config.auth();
    let auth_service = Arc::new(AuthService::new(
        Arc::new(SqliteCredentialStore::new(db.pool().clone())),
        PasswordHasher::new(auth_config.bcrypt_cost),
        Arc::new(TokenIssuer::new(&auth_config)?),
    ));

    let app = api::app_router(auth_service);

    let bind_address = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("failed to bind {bind_address}"))?;

    info!("Starting BCR API server on port {}", config.server_port);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
    info!("Shutdown signal received");
}
