//! Post mutation protocol.
//!
//! Every mutation touches two records: the post, whose `owner` field decides
//! authorisation, and the owner's owned-post index. The post is always
//! written first. When the index write fails afterwards the request still
//! succeeds, the lag is logged, and [`crate::domain::OwnershipReconciler`]
//! repairs it on its next pass.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::persistence_errors::{map_post_error, map_user_error};
use crate::domain::ports::{
    OwnershipLedger, PostRepository, PostWithOwner, PostsCommand, PostsQuery, UserRepository,
};
use crate::domain::{Error, Post, PostChanges, PostDraft, PostId, User};

/// Post service implementing the post driving ports.
#[derive(Clone)]
pub struct PostMutationService<U, P, L> {
    users: Arc<U>,
    posts: Arc<P>,
    ledger: Arc<L>,
}

impl<U, P, L> PostMutationService<U, P, L> {
    pub fn new(users: Arc<U>, posts: Arc<P>, ledger: Arc<L>) -> Self {
        Self {
            users,
            posts,
            ledger,
        }
    }
}

impl<U, P, L> PostMutationService<U, P, L>
where
    P: PostRepository,
{
    /// Load a post the caller owns.
    ///
    /// Absence is reported before ownership so non-owners can still tell a
    /// missing post from a foreign one.
    async fn owned_post(&self, caller: &User, id: PostId, action: &str) -> Result<Post, Error> {
        let post = self
            .posts
            .find_by_id(&id)
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| Error::not_found("blog not found"))?;
        if !post.is_owned_by(caller.id()) {
            debug!(user_id = %caller.id(), post_id = %id, action, "caller does not own post");
            return Err(Error::forbidden(format!("only the creator can {action} a blog")));
        }
        Ok(post)
    }
}

#[async_trait]
impl<U, P, L> PostsCommand for PostMutationService<U, P, L>
where
    U: Send + Sync,
    P: PostRepository,
    L: OwnershipLedger,
{
    async fn create(&self, caller: &User, draft: PostDraft) -> Result<Post, Error> {
        let post = Post::from_draft(PostId::random(), caller.id().clone(), draft);
        self.posts.insert(&post).await.map_err(map_post_error)?;

        if let Err(err) = self.ledger.attach(caller.id(), &post.id()).await {
            warn!(
                user_id = %caller.id(),
                post_id = %post.id(),
                error = %err,
                "post created but owner index not updated"
            );
        }
        debug!(user_id = %caller.id(), post_id = %post.id(), "created post");
        Ok(post)
    }

    async fn update(
        &self,
        caller: &User,
        id: PostId,
        changes: PostChanges,
    ) -> Result<Post, Error> {
        let existing = self.owned_post(caller, id, "update").await?;
        let updated = self
            .posts
            .update(&existing.apply(changes))
            .await
            .map_err(map_post_error)?
            .ok_or_else(|| Error::not_found("blog not found"))?;

        if let Err(err) = self.ledger.reconcile(caller.id(), &id, &id).await {
            warn!(
                user_id = %caller.id(),
                post_id = %id,
                error = %err,
                "post updated but owner index not normalised"
            );
        }
        Ok(updated)
    }

    async fn delete(&self, caller: &User, id: PostId) -> Result<(), Error> {
        self.owned_post(caller, id, "delete").await?;
        if !self.posts.delete(&id).await.map_err(map_post_error)? {
            debug!(post_id = %id, "post already removed by a concurrent delete");
        }

        if let Err(err) = self.ledger.detach(caller.id(), &id).await {
            warn!(
                user_id = %caller.id(),
                post_id = %id,
                error = %err,
                "post deleted but owner index not updated"
            );
        }
        Ok(())
    }
}

#[async_trait]
impl<U, P, L> PostsQuery for PostMutationService<U, P, L>
where
    U: UserRepository,
    P: PostRepository,
    L: Send + Sync,
{
    async fn list_posts(&self) -> Result<Vec<PostWithOwner>, Error> {
        let posts = self.posts.list().await.map_err(map_post_error)?;
        let owners: HashMap<_, _> = self
            .users
            .list()
            .await
            .map_err(map_user_error)?
            .into_iter()
            .map(|user| (user.id().clone(), user.public_profile()))
            .collect();

        Ok(posts
            .into_iter()
            .map(|post| {
                let owner = owners.get(post.owner()).cloned();
                PostWithOwner { post, owner }
            })
            .collect())
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
