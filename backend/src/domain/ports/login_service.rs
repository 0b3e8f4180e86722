//! Driving port for login use-cases.
//!
//! Inbound adapters call it to exchange credentials for a bearer token
//! without knowing which store or signing key backs the exchange.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials};

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSession {
    /// Signed bearer credential.
    pub token: String,
    pub username: String,
    pub name: String,
}

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and issue a token for the matching user.
    ///
    /// Unknown usernames and wrong passwords fail identically.
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginSession, Error>;
}
