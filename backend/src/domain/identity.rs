//! Identity resolution: bearer credential to user.
//!
//! Resolution is a fixed pipeline. Verify the token, parse its subject, then
//! load the user. Each stage either hands an enriched value to the next or
//! ends the request with an error.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::persistence_errors::map_user_error;
use crate::domain::ports::{IdentityResolver, UserRepository};
use crate::domain::{CredentialService, Error, TokenError, User};

/// Resolves callers from signed tokens against the user store.
#[derive(Clone)]
pub struct TokenIdentityResolver<U> {
    credentials: Arc<CredentialService>,
    users: Arc<U>,
}

impl<U> TokenIdentityResolver<U> {
    pub fn new(credentials: Arc<CredentialService>, users: Arc<U>) -> Self {
        Self { credentials, users }
    }
}

#[async_trait]
impl<U> IdentityResolver for TokenIdentityResolver<U>
where
    U: UserRepository,
{
    async fn resolve_user(&self, token: Option<&str>) -> Result<User, Error> {
        let claims = self.credentials.verify(token).map_err(|err| {
            if token.is_some() && err == TokenError::Invalid {
                warn!("rejected bearer token that failed verification");
            }
            Error::from(err)
        })?;
        let user_id = claims.user_id()?;

        match self
            .users
            .find_by_id(&user_id)
            .await
            .map_err(map_user_error)?
        {
            Some(user) => Ok(user),
            None => {
                debug!(user_id = %user_id, "token subject no longer exists");
                Err(Error::not_found("user not found"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{MockUserRepository, UserPersistenceError};
    use crate::domain::{ErrorCode, PasswordHash, TokenConfig, UserId, Username};
    use mockable::DefaultClock;
    use rstest::{fixture, rstest};
    use zeroize::Zeroizing;

    #[fixture]
    fn credentials() -> Arc<CredentialService> {
        Arc::new(CredentialService::new(
            TokenConfig::new(
                Zeroizing::new(b"0123456789abcdef0123456789abcdef".to_vec()),
                None,
            ),
            Arc::new(DefaultClock),
        ))
    }

    fn user() -> User {
        User::new(
            UserId::random(),
            Username::new("root").expect("username"),
            "Superuser",
            PasswordHash::new("hash").expect("hash"),
        )
    }

    #[rstest]
    #[tokio::test]
    async fn resolves_the_token_subject(credentials: Arc<CredentialService>) {
        let stored = user();
        let token = credentials.issue(&stored).expect("issue");
        let expected_id = stored.id().clone();

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .withf(move |id| id == &expected_id)
            .times(1)
            .return_once(move |_| Ok(Some(stored)));

        let resolver = TokenIdentityResolver::new(credentials, Arc::new(users));
        let resolved = resolver.resolve_user(Some(&token)).await.expect("resolve");
        assert_eq!(resolved.username().as_ref(), "root");
    }

    #[rstest]
    #[case(None)]
    #[case(Some("garbage"))]
    #[tokio::test]
    async fn invalid_tokens_never_reach_the_store(
        credentials: Arc<CredentialService>,
        #[case] token: Option<&str>,
    ) {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().never();

        let resolver = TokenIdentityResolver::new(credentials, Arc::new(users));
        let err = resolver.resolve_user(token).await.expect_err("rejected");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
        assert_eq!(err.message(), "token invalid");
    }

    #[rstest]
    #[tokio::test]
    async fn deleted_users_resolve_to_not_found(credentials: Arc<CredentialService>) {
        let token = credentials.issue(&user()).expect("issue");

        let mut users = MockUserRepository::new();
        users.expect_find_by_id().return_once(|_| Ok(None));

        let resolver = TokenIdentityResolver::new(credentials, Arc::new(users));
        let err = resolver.resolve_user(Some(&token)).await.expect_err("missing");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn store_outages_surface_as_unavailable(credentials: Arc<CredentialService>) {
        let token = credentials.issue(&user()).expect("issue");

        let mut users = MockUserRepository::new();
        users
            .expect_find_by_id()
            .return_once(|_| Err(UserPersistenceError::connection("refused")));

        let resolver = TokenIdentityResolver::new(credentials, Arc::new(users));
        let err = resolver.resolve_user(Some(&token)).await.expect_err("outage");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
