//! Application configuration loaded via OrthoConfig.
//!
//! Values come from command-line flags, `BLOGLIST_*` environment variables
//! and configuration files, in OrthoConfig's usual precedence.

mod token_secret;

use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use tracing::info;

pub use token_secret::{
    BuildMode, TOKEN_SECRET_MIN_LEN, TokenSecret, TokenSecretError, load_token_secret,
    secret_fingerprint,
};

use crate::domain::TokenConfig;

const DEFAULT_TOKEN_SECRET_PATH: &str = "/var/run/secrets/token_secret";

/// Runtime settings for the API server and its tools.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BLOGLIST")]
pub struct AppSettings {
    /// TCP port the HTTP server listens on.
    #[ortho_config(default = 3003)]
    pub port: u16,
    /// PostgreSQL connection string. Without one the in-memory store is used.
    pub database_url: Option<String>,
    /// Path to the token signing secret.
    pub token_secret_file: Option<PathBuf>,
    /// Token lifetime in seconds. Unset means tokens never expire.
    pub token_ttl_seconds: Option<u64>,
    /// Permit a per-process random secret when the secret file is unreadable.
    pub allow_ephemeral_secret: Option<bool>,
    /// Rebuild owner indexes from post records before serving.
    pub reconcile_on_startup: Option<bool>,
}

impl AppSettings {
    /// Configured secret path or the default mount point.
    pub fn token_secret_path(&self) -> PathBuf {
        self.token_secret_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_SECRET_PATH))
    }

    /// Whether release builds may fall back to an ephemeral secret. Off by default.
    pub fn allow_ephemeral_secret(&self) -> bool {
        self.allow_ephemeral_secret.unwrap_or(false)
    }

    /// Whether the server repairs owner indexes before binding. On by default.
    pub fn reconcile_on_startup(&self) -> bool {
        self.reconcile_on_startup.unwrap_or(true)
    }

    /// Configured token lifetime. Zero is treated as unset.
    pub fn token_ttl(&self) -> Option<Duration> {
        self.token_ttl_seconds
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Load the signing secret and build the credential configuration.
    ///
    /// Logs the secret's fingerprint, never the secret itself.
    pub fn token_config(&self, mode: BuildMode) -> Result<TokenConfig, TokenSecretError> {
        let path = self.token_secret_path();
        let secret = load_token_secret(&path, mode, self.allow_ephemeral_secret())?;
        info!(
            fingerprint = %secret_fingerprint(&secret.bytes),
            ephemeral = secret.ephemeral,
            ttl_seconds = ?self.token_ttl().map(|ttl| ttl.as_secs()),
            "token signing secret loaded"
        );
        Ok(TokenConfig::new(secret.bytes, self.token_ttl()))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "BLOGLIST_PORT",
        "BLOGLIST_DATABASE_URL",
        "BLOGLIST_TOKEN_SECRET_FILE",
        "BLOGLIST_TOKEN_TTL_SECONDS",
        "BLOGLIST_ALLOW_EPHEMERAL_SECRET",
        "BLOGLIST_RECONCILE_ON_STARTUP",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("bloglist")]).expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.port, 3003);
        assert!(settings.database_url.is_none());
        assert_eq!(
            settings.token_secret_path(),
            PathBuf::from(DEFAULT_TOKEN_SECRET_PATH)
        );
        assert_eq!(settings.token_ttl(), None);
        assert!(!settings.allow_ephemeral_secret());
        assert!(settings.reconcile_on_startup());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("BLOGLIST_PORT", Some("8080".to_owned())),
            (
                "BLOGLIST_DATABASE_URL",
                Some("postgres://localhost/bloglist".to_owned()),
            ),
            (
                "BLOGLIST_TOKEN_SECRET_FILE",
                Some("/tmp/bloglist-secret".to_owned()),
            ),
            ("BLOGLIST_TOKEN_TTL_SECONDS", Some("3600".to_owned())),
            ("BLOGLIST_ALLOW_EPHEMERAL_SECRET", Some("true".to_owned())),
            ("BLOGLIST_RECONCILE_ON_STARTUP", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.port, 8080);
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/bloglist")
        );
        assert_eq!(
            settings.token_secret_path(),
            PathBuf::from("/tmp/bloglist-secret")
        );
        assert_eq!(settings.token_ttl(), Some(Duration::from_secs(3600)));
        assert!(settings.allow_ephemeral_secret());
        assert!(!settings.reconcile_on_startup());
    }

    #[rstest]
    fn zero_ttl_means_unbounded() {
        let _guard = lock_env([
            ("BLOGLIST_PORT", None::<String>),
            ("BLOGLIST_DATABASE_URL", None),
            ("BLOGLIST_TOKEN_SECRET_FILE", None),
            ("BLOGLIST_TOKEN_TTL_SECONDS", Some("0".to_owned())),
            ("BLOGLIST_ALLOW_EPHEMERAL_SECRET", None),
            ("BLOGLIST_RECONCILE_ON_STARTUP", None),
        ]);

        assert_eq!(load_from_empty_args().token_ttl(), None);
    }
}
