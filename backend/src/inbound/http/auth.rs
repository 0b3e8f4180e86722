//! Bearer authentication for HTTP handlers.
//!
//! [`AuthenticatedUser`] runs the identity pipeline before the handler body:
//! read the `Authorization` header, verify the token, load the user. Handlers
//! that take it as an argument never see an unauthenticated request.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Error, User};

use super::state::HttpState;

const BEARER_PREFIX: &str = "Bearer ";

/// Token carried by an `Authorization: Bearer <token>` header.
///
/// Only the exact `Bearer ` prefix is recognised. Any other scheme or
/// spelling, or a missing header, yields `None`.
pub fn extract_token(req: &HttpRequest) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix(BEARER_PREFIX)?.trim();
    (!token.is_empty()).then_some(token)
}

/// Caller resolved from a bearer token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub User);

impl std::ops::Deref for AuthenticatedUser {
    type Target = User;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = extract_token(req).map(str::to_owned);
        let identity = req
            .app_data::<web::Data<HttpState>>()
            .map(|state| state.identity.clone());
        Box::pin(async move {
            let identity = identity
                .ok_or_else(|| Error::internal("identity resolver not configured"))?;
            let user = identity.resolve_user(token.as_deref()).await?;
            Ok(AuthenticatedUser(user))
        })
    }
}
