//! Test helpers for inbound HTTP components.
//!
//! Wires the real services over an [`InMemoryStore`] so handler tests cover
//! the whole request path without a database.

use std::sync::Arc;

use actix_web::web;
use argon2::Params;
use mockable::DefaultClock;
use zeroize::Zeroizing;

use crate::domain::{
    CredentialService, PasswordHash, Registration, TokenConfig, User, UserId, Username,
};
use crate::outbound::{Argon2PasswordHasher, InMemoryStore};

use super::state::HttpState;

/// Fully wired state plus handles on the pieces tests poke directly.
pub struct TestApp {
    pub state: web::Data<HttpState>,
    pub store: Arc<InMemoryStore>,
    pub credentials: Arc<CredentialService>,
}

/// Build state with a fixed secret, no token expiry and cheap hashing.
pub fn test_app() -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let credentials = Arc::new(CredentialService::new(
        TokenConfig::new(Zeroizing::new(vec![b's'; 32]), None),
        Arc::new(DefaultClock),
    ));
    let params = Params::new(8, 1, 1, None).expect("argon2 params");
    let state = HttpState::from_stores(
        store.clone(),
        store.clone(),
        store.clone(),
        Arc::new(Argon2PasswordHasher::with_params(params)),
        credentials.clone(),
    );
    TestApp {
        state: web::Data::new(state),
        store,
        credentials,
    }
}

impl TestApp {
    /// Register a user through the service and mint a token for it.
    pub async fn register_and_login(&self, username: &str, password: &str) -> (User, String) {
        let registration =
            Registration::try_from_parts(Some(username), Some("Test User"), Some(password))
                .expect("valid registration");
        let user = self
            .state
            .users
            .register(registration)
            .await
            .expect("registration succeeds");
        let token = self.credentials.issue(&user).expect("token issues");
        (user, token)
    }

    /// A correctly signed token whose subject was never stored.
    pub fn token_for_unknown_user(&self) -> String {
        let ghost = User::new(
            UserId::random(),
            Username::new("ghost").expect("username"),
            "Ghost",
            PasswordHash::new("unused").expect("hash"),
        );
        self.credentials.issue(&ghost).expect("token issues")
    }
}
