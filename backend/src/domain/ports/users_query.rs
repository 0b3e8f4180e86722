//! Driving port for user-facing queries.

use async_trait::async_trait;

use crate::domain::{Error, Post, User};

/// A user together with the posts its index points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserWithPosts {
    pub user: User,
    /// Resolved posts. Index entries with no matching post are skipped.
    pub posts: Vec<Post>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Every registered user with their owned posts expanded.
    async fn list_users(&self) -> Result<Vec<UserWithPosts>, Error>;
}
