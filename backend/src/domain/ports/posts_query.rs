//! Driving port for reading the public post listing.

use async_trait::async_trait;

use crate::domain::{Error, Post, PublicUser};

/// A post with its owner projected to public fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostWithOwner {
    pub post: Post,
    /// `None` when the owner record no longer exists.
    pub owner: Option<PublicUser>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsQuery: Send + Sync {
    async fn list_posts(&self) -> Result<Vec<PostWithOwner>, Error>;
}
