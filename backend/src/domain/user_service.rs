//! Account services: registration, login and the user listing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::domain::persistence_errors::{map_post_error, map_user_error};
use crate::domain::ports::{
    LoginService, LoginSession, PasswordHasher, PostRepository, UserRepository, UserWithPosts,
    UsersCommand, UsersQuery,
};
use crate::domain::{
    CredentialService, Error, LoginCredentials, PostId, Registration, User, UserId,
};

/// Account service implementing the user-facing driving ports.
#[derive(Clone)]
pub struct UserAccountService<U, P, H> {
    users: Arc<U>,
    posts: Arc<P>,
    hasher: Arc<H>,
    credentials: Arc<CredentialService>,
}

impl<U, P, H> UserAccountService<U, P, H> {
    pub fn new(
        users: Arc<U>,
        posts: Arc<P>,
        hasher: Arc<H>,
        credentials: Arc<CredentialService>,
    ) -> Self {
        Self {
            users,
            posts,
            hasher,
            credentials,
        }
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid username or password")
        .with_details(json!({ "code": "invalid_credentials" }))
}

#[async_trait]
impl<U, P, H> LoginService for UserAccountService<U, P, H>
where
    U: UserRepository,
    P: Send + Sync,
    H: PasswordHasher,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<LoginSession, Error> {
        let Some(user) = self
            .users
            .find_by_username(credentials.username())
            .await
            .map_err(map_user_error)?
        else {
            debug!("login for unknown username");
            return Err(invalid_credentials());
        };

        if !self
            .hasher
            .verify(credentials.password(), user.password_hash())
        {
            debug!(user_id = %user.id(), "login with wrong password");
            return Err(invalid_credentials());
        }

        let token = self.credentials.issue(&user)?;
        Ok(LoginSession {
            token,
            username: user.username().to_string(),
            name: user.name().to_owned(),
        })
    }
}

#[async_trait]
impl<U, P, H> UsersCommand for UserAccountService<U, P, H>
where
    U: UserRepository,
    P: Send + Sync,
    H: PasswordHasher,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let password_hash = self
            .hasher
            .hash(registration.password())
            .map_err(|err| Error::internal(err.to_string()))?;
        let user = User::new(
            UserId::random(),
            registration.username().clone(),
            registration.name(),
            password_hash,
        );
        self.users.insert(&user).await.map_err(map_user_error)?;
        debug!(user_id = %user.id(), "registered user");
        Ok(user)
    }
}

#[async_trait]
impl<U, P, H> UsersQuery for UserAccountService<U, P, H>
where
    U: UserRepository,
    P: PostRepository,
    H: Send + Sync,
{
    async fn list_users(&self) -> Result<Vec<UserWithPosts>, Error> {
        let users = self.users.list().await.map_err(map_user_error)?;
        let mut posts: HashMap<PostId, _> = self
            .posts
            .list()
            .await
            .map_err(map_post_error)?
            .into_iter()
            .map(|post| (post.id(), post))
            .collect();

        Ok(users
            .into_iter()
            .map(|user| {
                let owned = user
                    .posts()
                    .iter()
                    .filter_map(|id| posts.remove(id))
                    .collect();
                UserWithPosts { user, posts: owned }
            })
            .collect())
    }
}
