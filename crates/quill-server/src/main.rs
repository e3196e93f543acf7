mod config;

use std::sync::Arc;

use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use quill_api::firebase::{FirebaseVerifier, ServiceAccount};
use quill_api::state::AppStateInner;
use quill_crypto::keys::AdminPublicKey;
use quill_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quill=debug,quill_api=debug,quill_db=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;

    // Collaborators
    let db = Database::connect(&config.database_url)?;
    let admin_key = AdminPublicKey::load(&config.admin_public_key)
        .with_context(|| format!("loading admin key from {}", config.admin_public_key.display()))?;
    let account = ServiceAccount::from_json(&config.firebase_admin)?;
    info!("Verifying identities against Firebase project {}", account.project_id);
    let identity = Arc::new(FirebaseVerifier::new(account)?);

    let state = AppStateInner::new(db, identity, admin_key);

    let app = quill_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    info!("Quill listening on {}", config.addr);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    tracing::warn!("SIGTERM handler unavailable: {}", e);
                    ctrl_c.await.ok();
                    return;
                }
            };
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
