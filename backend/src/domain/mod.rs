//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed entities for users, posts and bearer
//! credentials, and the services that drive them through ports. Adapters
//! live under `inbound` and `outbound`; nothing here imports a framework.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Post and OwnedPosts: the aggregates and the owner index.
//! - CredentialService: signs and verifies bearer tokens.
//! - TokenIdentityResolver, UserAccountService, PostMutationService:
//!   implementations of the driving ports in [`ports`].
//! - OwnershipReconciler: rebuilds owner indexes from post records.

pub mod auth;
pub mod error;
pub mod identity;
pub mod ownership;
mod persistence_errors;
pub mod ports;
pub mod post;
pub mod post_service;
pub mod token;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::auth::{
    LoginCredentials, LoginValidationError, PASSWORD_MIN, Registration,
    RegistrationValidationError,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::TokenIdentityResolver;
pub use self::ownership::{OwnedPosts, OwnershipReconciler, ReconcileReport};
pub use self::post::{Likes, Post, PostChanges, PostDraft, PostId, PostValidationError};
pub use self::post_service::PostMutationService;
pub use self::token::{Claims, CredentialService, TokenConfig, TokenError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{
    PasswordHash, PublicUser, USERNAME_MIN, User, UserId, UserValidationError, Username,
};
pub use self::user_service::UserAccountService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use bloglist::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
