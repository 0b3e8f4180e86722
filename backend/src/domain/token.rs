//! Credential service: issues and verifies signed bearer tokens.
//!
//! Tokens are HS256 JWTs carrying the user's identifier and username. When a
//! lifetime is configured the token also carries an `exp` claim, checked
//! against the injected clock rather than the system time.
//!
//! Without a configured lifetime a token stays valid for as long as the
//! signing secret does. Rotating the secret is then the only revocation.

use std::sync::Arc;
use std::time::Duration;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::{Error, User, UserId};

/// Signing material and lifetime policy for issued tokens.
#[derive(Clone)]
pub struct TokenConfig {
    secret: Zeroizing<Vec<u8>>,
    ttl: Option<Duration>,
}

impl TokenConfig {
    pub fn new(secret: Zeroizing<Vec<u8>>, ttl: Option<Duration>) -> Self {
        Self { secret, ttl }
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("secret", &"..")
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// Claims carried by a bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identifier of the user the token was issued to.
    pub sub: String,
    pub username: String,
    /// Expiry as seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

impl Claims {
    /// Parsed subject identifier.
    pub fn user_id(&self) -> Result<UserId, TokenError> {
        UserId::new(&self.sub).map_err(|_| TokenError::Invalid)
    }
}

/// Failures raised while issuing or verifying tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Absent, malformed, or signed with another key.
    #[error("token invalid")]
    Invalid,
    /// Well-formed and authentic but past its expiry.
    #[error("token expired")]
    Expired,
    /// Encoding failed while issuing.
    #[error("token signing failed: {message}")]
    Signing { message: String },
}

impl From<TokenError> for Error {
    fn from(value: TokenError) -> Self {
        match value {
            TokenError::Invalid => Error::unauthorized(value.to_string())
                .with_details(json!({ "code": "token_invalid" })),
            TokenError::Expired => Error::unauthorized(value.to_string())
                .with_details(json!({ "code": "token_expired" })),
            TokenError::Signing { message } => {
                Error::internal(format!("token signing failed: {message}"))
            }
        }
    }
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidToken
            | ErrorKind::InvalidSignature
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => TokenError::Invalid,
            _ => {
                debug!(error = %err, "unexpected token decode failure");
                TokenError::Invalid
            }
        }
    }
}

/// Issues and verifies bearer tokens.
#[derive(Clone)]
pub struct CredentialService {
    config: TokenConfig,
    clock: Arc<dyn Clock>,
}

impl CredentialService {
    pub fn new(config: TokenConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    fn now_secs(&self) -> u64 {
        u64::try_from(self.clock.utc().timestamp()).unwrap_or(0)
    }

    /// Sign a token naming `user`.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let exp = self
            .config
            .ttl
            .map(|ttl| self.now_secs().saturating_add(ttl.as_secs()));
        let claims = Claims {
            sub: user.id().to_string(),
            username: user.username().to_string(),
            exp,
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(&self.config.secret),
        )
        .map_err(|err| TokenError::Signing {
            message: err.to_string(),
        })
    }

    /// Check signature and expiry, returning the embedded claims.
    ///
    /// `None` is rejected as [`TokenError::Invalid`].
    pub fn verify(&self, token: Option<&str>) -> Result<Claims, TokenError> {
        let token = token.ok_or(TokenError::Invalid)?;

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(&self.config.secret),
            &validation,
        )?;
        let claims = data.claims;

        match claims.exp {
            Some(exp) if self.now_secs() >= exp => Err(TokenError::Expired),
            _ => Ok(claims),
        }
    }
}
