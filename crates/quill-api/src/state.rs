use std::sync::Arc;

use quill_crypto::keys::AdminPublicKey;
use quill_db::Database;
use tracing::error;

use crate::error::ApiError;
use crate::identity::IdentityVerifier;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub identity: Arc<dyn IdentityVerifier>,
    pub admin_key: AdminPublicKey,
}

impl AppStateInner {
    pub fn new(db: Database, identity: Arc<dyn IdentityVerifier>, admin_key: AdminPublicKey) -> AppState {
        Arc::new(Self {
            db,
            identity,
            admin_key,
        })
    }
}

/// Run blocking DB work off the async runtime.
pub(crate) async fn with_db<F, T>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal(e.into())
        })?
        .map_err(ApiError::Internal)
}
