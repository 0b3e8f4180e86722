//! Port abstraction for post persistence adapters.
use async_trait::async_trait;

use crate::domain::{Post, PostId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by post repository adapters.
    pub enum PostRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "post repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "post repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Persist a new post.
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError>;

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError>;

    /// Overwrite the mutable fields of an existing post.
    ///
    /// Returns the stored post after the write, or `None` when the row
    /// disappeared between the caller's read and this write.
    async fn update(&self, post: &Post) -> Result<Option<Post>, PostRepositoryError>;

    /// Remove a post. Returns `false` when nothing was deleted.
    async fn delete(&self, id: &PostId) -> Result<bool, PostRepositoryError>;

    async fn list(&self) -> Result<Vec<Post>, PostRepositoryError>;
}
