//! Driving port that turns a bearer credential into a user.

use async_trait::async_trait;

use crate::domain::{Error, User};

#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// Resolve the caller behind `token`.
    ///
    /// A missing, malformed, forged or expired token fails with
    /// `Unauthorized`. A valid token whose subject no longer exists fails
    /// with `NotFound`.
    async fn resolve_user(&self, token: Option<&str>) -> Result<User, Error>;
}
