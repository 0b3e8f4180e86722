//! Driving port for post mutations.
//!
//! Every operation takes the already-resolved caller. Adapters resolve the
//! caller through [`super::IdentityResolver`] before calling in.

use async_trait::async_trait;

use crate::domain::{Error, Post, PostChanges, PostDraft, PostId, User};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsCommand: Send + Sync {
    /// Create a post owned by `caller` and record it in the caller's index.
    async fn create(&self, caller: &User, draft: PostDraft) -> Result<Post, Error>;

    /// Apply `changes` to a post `caller` owns.
    async fn update(&self, caller: &User, id: PostId, changes: PostChanges)
    -> Result<Post, Error>;

    /// Delete a post `caller` owns and drop it from the caller's index.
    async fn delete(&self, caller: &User, id: PostId) -> Result<(), Error>;
}
