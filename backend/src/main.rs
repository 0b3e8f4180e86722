//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::web;
#[cfg(feature = "metrics")]
use actix_web_prom::{PrometheusMetrics, PrometheusMetricsBuilder};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use bloglist::config::{AppSettings, BuildMode};
use bloglist::domain::{CredentialService, OwnershipReconciler};
use bloglist::inbound::http::health::HealthState;
use bloglist::outbound::persistence::{
    DbPool, DieselOwnershipLedger, DieselPostRepository, DieselUserRepository, PoolConfig,
    run_pending_migrations,
};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let token_config = settings
        .token_config(BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    let credentials = Arc::new(CredentialService::new(token_config, Arc::new(DefaultClock)));

    let bind_addr = SocketAddr::from(([0, 0, 0, 0], settings.port));
    let mut config = ServerConfig::new(bind_addr, credentials);

    if let Some(database_url) = settings.database_url.clone() {
        let pool = prepare_database(database_url).await?;
        if settings.reconcile_on_startup() {
            reconcile_ownership(&pool).await?;
        }
        config = config.with_db_pool(pool);
    }

    #[cfg(feature = "metrics")]
    let config = config.with_metrics(make_metrics());

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    info!(%bind_addr, "server listening");
    server.await
}

/// Apply pending migrations and open the connection pool.
async fn prepare_database(database_url: String) -> std::io::Result<DbPool> {
    let migration_url = database_url.clone();
    tokio::task::spawn_blocking(move || run_pending_migrations(&migration_url))
        .await
        .map_err(|e| std::io::Error::other(format!("migration task failed: {e}")))?
        .map_err(std::io::Error::other)?;
    DbPool::new(PoolConfig::new(database_url))
        .await
        .map_err(|e| std::io::Error::other(format!("create database pool: {e}")))
}

/// Rebuild owner indexes from post records before accepting traffic.
async fn reconcile_ownership(pool: &DbPool) -> std::io::Result<()> {
    let reconciler = OwnershipReconciler::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselPostRepository::new(pool.clone())),
        Arc::new(DieselOwnershipLedger::new(pool.clone())),
    );
    let report = reconciler
        .run()
        .await
        .map_err(|e| std::io::Error::other(format!("ownership reconciliation failed: {e}")))?;
    info!(
        users_scanned = report.users_scanned,
        users_repaired = report.users_repaired,
        entries_attached = report.entries_attached,
        entries_detached = report.entries_detached,
        "ownership indexes reconciled"
    );
    Ok(())
}

#[cfg(feature = "metrics")]
fn make_metrics() -> Option<PrometheusMetrics> {
    match PrometheusMetricsBuilder::new("bloglist")
        .endpoint("/metrics")
        .build()
    {
        Ok(metrics) => Some(metrics),
        Err(e) => {
            warn!(error = %e, "Prometheus metrics disabled");
            None
        }
    }
}
