//! Rebuild every user's owned-post index from the posts' owner fields.
//!
//! Run after restoring a backup or after a crash between the post write and
//! the index update. The server performs the same pass at startup unless
//! `BLOGLIST_RECONCILE_ON_STARTUP=false`. Repairs are applied entry by entry,
//! so the tool may run against a store a live server is writing to.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::sync::Arc;

use bloglist::domain::OwnershipReconciler;
use bloglist::outbound::persistence::{
    DbPool, DieselOwnershipLedger, DieselPostRepository, DieselUserRepository, PoolConfig,
};
use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use tokio::runtime::Builder;
use tracing_subscriber::{EnvFilter, fmt};

const DATABASE_URL_ENV: &str = "BLOGLIST_DATABASE_URL";

/// `reconcile-ownership` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "reconcile-ownership",
    about = "Rewrite owned-post indexes that diverge from the post records",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `BLOGLIST_DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = fmt().with_env_filter(EnvFilter::from_default_env()).try_init();
    let args = CliArgs::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(args))
}

async fn run(args: CliArgs) -> Result<()> {
    let database_url = resolve_database_url(args.database_url, env::var(DATABASE_URL_ENV).ok())?;
    let pool = DbPool::new(PoolConfig::new(database_url))
        .await
        .wrap_err("create database pool")?;

    let reconciler = OwnershipReconciler::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselPostRepository::new(pool.clone())),
        Arc::new(DieselOwnershipLedger::new(pool)),
    );
    let report = reconciler
        .run()
        .await
        .map_err(|error| eyre!("reconciliation failed: {error}"))?;

    println!("users_scanned={}", report.users_scanned);
    println!("users_repaired={}", report.users_repaired);
    println!("entries_attached={}", report.entries_attached);
    println!("entries_detached={}", report.entries_detached);
    Ok(())
}

fn resolve_database_url(flag: Option<String>, env_value: Option<String>) -> Result<String> {
    flag.or(env_value)
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| eyre!("a database URL is required: pass --database-url or set {DATABASE_URL_ENV}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some("postgres://flag"), Some("postgres://env"), "postgres://flag")]
    #[case(None, Some("postgres://env"), "postgres://env")]
    fn flag_takes_precedence_over_environment(
        #[case] flag: Option<&str>,
        #[case] env_value: Option<&str>,
        #[case] expected: &str,
    ) {
        let resolved = resolve_database_url(flag.map(str::to_owned), env_value.map(str::to_owned))
            .expect("url resolves");
        assert_eq!(resolved, expected);
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some("  "), None)]
    fn missing_urls_are_rejected(#[case] flag: Option<&str>, #[case] env_value: Option<&str>) {
        let err = resolve_database_url(flag.map(str::to_owned), env_value.map(str::to_owned))
            .expect_err("no url");
        assert!(err.to_string().contains("--database-url"));
    }

    #[rstest]
    fn arguments_parse() {
        let args = CliArgs::try_parse_from(["reconcile-ownership", "--database-url", "postgres://x"])
            .expect("parses");
        assert_eq!(args.database_url.as_deref(), Some("postgres://x"));
    }
}
