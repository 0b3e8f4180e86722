//! Builders for HTTP state over the configured storage backend.

use std::sync::Arc;

use actix_web::web;
use tracing::{info, warn};

use bloglist::inbound::http::state::HttpState;
use bloglist::outbound::persistence::{
    DieselOwnershipLedger, DieselPostRepository, DieselUserRepository,
};
use bloglist::outbound::{Argon2PasswordHasher, InMemoryStore};

use super::ServerConfig;

/// Build handler state backed by PostgreSQL when a pool is configured, or by
/// a fresh in-memory store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let hasher = Arc::new(Argon2PasswordHasher::default());
    let credentials = config.credentials.clone();
    let state = match &config.db_pool {
        Some(pool) => {
            info!("using PostgreSQL storage");
            HttpState::from_stores(
                Arc::new(DieselUserRepository::new(pool.clone())),
                Arc::new(DieselPostRepository::new(pool.clone())),
                Arc::new(DieselOwnershipLedger::new(pool.clone())),
                hasher,
                credentials,
            )
        }
        None => {
            warn!("no database configured; users and posts are kept in memory");
            let store = Arc::new(InMemoryStore::new());
            HttpState::from_stores(store.clone(), store.clone(), store, hasher, credentials)
        }
    };
    web::Data::new(state)
}
