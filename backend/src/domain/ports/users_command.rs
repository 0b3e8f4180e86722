//! Driving port for account registration.

use async_trait::async_trait;

use crate::domain::{Error, Registration, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Create an account owning no posts.
    async fn register(&self, registration: Registration) -> Result<User, Error>;
}
