//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    IdentityResolver, LoginService, OwnershipLedger, PasswordHasher, PostRepository, PostsCommand,
    PostsQuery, UserRepository, UsersCommand, UsersQuery,
};
use crate::domain::{
    CredentialService, PostMutationService, TokenIdentityResolver, UserAccountService,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use bloglist::domain::{
///     CredentialService, PostMutationService, TokenConfig, TokenIdentityResolver,
///     UserAccountService,
/// };
/// use bloglist::inbound::http::state::HttpState;
/// use bloglist::outbound::{Argon2PasswordHasher, InMemoryStore};
/// use mockable::DefaultClock;
/// use zeroize::Zeroizing;
///
/// let store = Arc::new(InMemoryStore::new());
/// let credentials = Arc::new(CredentialService::new(
///     TokenConfig::new(Zeroizing::new(vec![7_u8; 32]), None),
///     Arc::new(DefaultClock),
/// ));
/// let accounts = Arc::new(UserAccountService::new(
///     store.clone(),
///     store.clone(),
///     Arc::new(Argon2PasswordHasher::default()),
///     credentials.clone(),
/// ));
/// let posts = Arc::new(PostMutationService::new(store.clone(), store.clone(), store.clone()));
/// let state = HttpState {
///     login: accounts.clone(),
///     users: accounts.clone(),
///     users_query: accounts,
///     posts: posts.clone(),
///     posts_query: posts,
///     identity: Arc::new(TokenIdentityResolver::new(credentials, store)),
/// };
/// let _login = state.login.clone();
/// ```
///
/// [`HttpState::from_stores`] performs the same wiring in one call:
///
/// ```
/// # use std::sync::Arc;
/// # use bloglist::domain::{CredentialService, TokenConfig};
/// # use bloglist::inbound::http::state::HttpState;
/// # use bloglist::outbound::{Argon2PasswordHasher, InMemoryStore};
/// # use mockable::DefaultClock;
/// # use zeroize::Zeroizing;
/// let store = Arc::new(InMemoryStore::new());
/// let credentials = Arc::new(CredentialService::new(
///     TokenConfig::new(Zeroizing::new(vec![7_u8; 32]), None),
///     Arc::new(DefaultClock),
/// ));
/// let state = HttpState::from_stores(
///     store.clone(),
///     store.clone(),
///     store,
///     Arc::new(Argon2PasswordHasher::default()),
///     credentials,
/// );
/// # let _ = state;
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UsersCommand>,
    pub users_query: Arc<dyn UsersQuery>,
    pub posts: Arc<dyn PostsCommand>,
    pub posts_query: Arc<dyn PostsQuery>,
    /// Bearer token to user resolution used by [`super::auth::AuthenticatedUser`].
    pub identity: Arc<dyn IdentityResolver>,
}

impl HttpState {
    /// Wire the account, post and identity services over the given stores.
    pub fn from_stores<U, P, L, H>(
        users: Arc<U>,
        posts: Arc<P>,
        ledger: Arc<L>,
        hasher: Arc<H>,
        credentials: Arc<CredentialService>,
    ) -> Self
    where
        U: UserRepository + 'static,
        P: PostRepository + 'static,
        L: OwnershipLedger + 'static,
        H: PasswordHasher + 'static,
    {
        let accounts = Arc::new(UserAccountService::new(
            users.clone(),
            posts.clone(),
            hasher,
            credentials.clone(),
        ));
        let mutations = Arc::new(PostMutationService::new(users.clone(), posts, ledger));
        Self {
            login: accounts.clone(),
            users: accounts.clone(),
            users_query: accounts,
            posts: mutations.clone(),
            posts_query: mutations,
            identity: Arc::new(TokenIdentityResolver::new(credentials, users)),
        }
    }
}
