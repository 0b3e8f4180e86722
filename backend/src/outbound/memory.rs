//! In-process store implementing the user, post and ownership ports.
//!
//! Used when no database URL is configured and by the HTTP behaviour suite.
//! All three ports share one lock, so every ledger operation is atomic with
//! respect to the user record it edits. Contents vanish with the process.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    OwnershipLedger, OwnershipLedgerError, PostRepository, PostRepositoryError, UserPersistenceError,
    UserRepository,
};
use crate::domain::{Post, PostId, User, UserId};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    posts: Vec<Post>,
}

impl Tables {
    fn user_mut(&mut self, id: &UserId) -> Result<&mut User, OwnershipLedgerError> {
        self.users
            .iter_mut()
            .find(|user| user.id() == id)
            .ok_or_else(|| OwnershipLedgerError::unknown_user(id.to_string()))
    }
}

/// Shared in-memory backing store. Wrap in an `Arc` and hand the same value
/// to every port.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

const POISONED: &str = "in-memory store lock poisoned";

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock<E>(&self, poisoned: impl FnOnce(&'static str) -> E) -> Result<MutexGuard<'_, Tables>, E> {
        self.tables.lock().map_err(|_| poisoned(POISONED))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut tables = self.lock(UserPersistenceError::query)?;
        if tables
            .users
            .iter()
            .any(|existing| existing.username() == user.username())
        {
            return Err(UserPersistenceError::duplicate_username(
                user.username().as_ref(),
            ));
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock(UserPersistenceError::query)?;
        Ok(tables.users.iter().find(|user| user.id() == id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, UserPersistenceError> {
        let tables = self.lock(UserPersistenceError::query)?;
        Ok(tables
            .users
            .iter()
            .find(|user| user.username().as_ref() == username)
            .cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let tables = self.lock(UserPersistenceError::query)?;
        Ok(tables.users.clone())
    }
}

#[async_trait]
impl PostRepository for InMemoryStore {
    async fn insert(&self, post: &Post) -> Result<(), PostRepositoryError> {
        let mut tables = self.lock(PostRepositoryError::query)?;
        tables.posts.push(post.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Option<Post>, PostRepositoryError> {
        let tables = self.lock(PostRepositoryError::query)?;
        Ok(tables.posts.iter().find(|post| &post.id() == id).cloned())
    }

    async fn update(&self, post: &Post) -> Result<Option<Post>, PostRepositoryError> {
        let mut tables = self.lock(PostRepositoryError::query)?;
        let Some(slot) = tables.posts.iter_mut().find(|stored| stored.id() == post.id()) else {
            return Ok(None);
        };
        // The owner column is immutable.
        *slot = Post::from_parts(
            slot.id(),
            slot.owner().clone(),
            post.title().to_owned(),
            post.author().to_owned(),
            post.url().to_owned(),
            post.likes(),
        );
        Ok(Some(slot.clone()))
    }

    async fn delete(&self, id: &PostId) -> Result<bool, PostRepositoryError> {
        let mut tables = self.lock(PostRepositoryError::query)?;
        let before = tables.posts.len();
        tables.posts.retain(|post| &post.id() != id);
        Ok(tables.posts.len() < before)
    }

    async fn list(&self) -> Result<Vec<Post>, PostRepositoryError> {
        let tables = self.lock(PostRepositoryError::query)?;
        Ok(tables.posts.clone())
    }
}

#[async_trait]
impl OwnershipLedger for InMemoryStore {
    async fn attach(&self, user: &UserId, post: &PostId) -> Result<(), OwnershipLedgerError> {
        let mut tables = self.lock(OwnershipLedgerError::query)?;
        tables.user_mut(user)?.posts_mut().attach(*post);
        Ok(())
    }

    async fn detach(&self, user: &UserId, post: &PostId) -> Result<(), OwnershipLedgerError> {
        let mut tables = self.lock(OwnershipLedgerError::query)?;
        tables.user_mut(user)?.posts_mut().detach(post);
        Ok(())
    }

    async fn reconcile(
        &self,
        user: &UserId,
        old: &PostId,
        new: &PostId,
    ) -> Result<(), OwnershipLedgerError> {
        let mut tables = self.lock(OwnershipLedgerError::query)?;
        tables.user_mut(user)?.posts_mut().reconcile(old, *new);
        Ok(())
    }
}
