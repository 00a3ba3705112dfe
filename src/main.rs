// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use role_auth_server::{
    api::router,
    auth::TokenCodec,
    config::AppConfig,
    logging::{init_logging, LogConfig},
    state::AppState,
    storage::{seed_demo_users, CredentialStore, RedbCredentialStore},
};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    init_logging(LogConfig::from_env())?;

    let config = AppConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    let db_path = config.user_db_path();
    let store: Arc<dyn CredentialStore> = Arc::new(RedbCredentialStore::open(&db_path)?);
    tracing::info!(path = %db_path.display(), "Credential store opened");

    if config.seed_demo_users {
        let created = seed_demo_users(store.as_ref())?;
        tracing::info!(created, "Demo accounts seeded");
    }

    let tokens = TokenCodec::new(config.jwt_secret.as_bytes(), config.token_ttl_minutes);
    tracing::info!(ttl_minutes = tokens.default_ttl().num_minutes(), "Token codec ready");
    let app = router(AppState::new(store, tokens), &config.cors_origins);

    let addr = config.bind_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Role-based Auth API listening (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped gracefully");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::warn!("Received Ctrl+C, shutting down"),
        _ = terminate => tracing::warn!("Received SIGTERM, shutting down"),
    }
}
