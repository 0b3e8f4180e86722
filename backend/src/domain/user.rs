//! User aggregate and identity primitives.
//!
//! A [`User`] carries an opaque password verifier that never leaves the
//! domain in serialised form, and the set of posts it owns. The owned-post
//! set is an index over each post's `owner` field; see
//! [`crate::domain::ownership`].

use std::fmt;

use uuid::Uuid;

use crate::domain::ownership::OwnedPosts;

/// Minimum number of characters in a username.
pub const USERNAME_MIN: usize = 3;

/// Validation errors raised by user primitives.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UserValidationError {
    #[error("user id must not be empty")]
    EmptyId,
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("username must be at least {min} characters")]
    UsernameTooShort { min: usize },
    #[error("password verifier must not be empty")]
    EmptyPasswordHash,
}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    ///
    /// # Examples
    /// ```
    /// use bloglist::domain::UserId;
    ///
    /// let id = UserId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").unwrap();
    /// assert_eq!(id.to_string(), "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    /// assert!(UserId::new("not-a-uuid").is_err());
    /// ```
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let id = id.as_ref();
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }
        let parsed = Uuid::parse_str(id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self::from_uuid(parsed))
    }

    /// Wrap an already-parsed UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Unique, case-sensitive login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Validate a username.
    ///
    /// Surrounding whitespace is trimmed; comparison after that is exact, so
    /// `Alice` and `alice` are different users.
    pub fn new(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }
        if trimmed.chars().count() < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque one-way password verifier (a PHC string).
///
/// Deliberately implements neither `Display` nor `Serialize`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a stored verifier.
    pub fn new(encoded: impl Into<String>) -> Result<Self, UserValidationError> {
        let encoded = encoded.into();
        if encoded.is_empty() {
            return Err(UserValidationError::EmptyPasswordHash);
        }
        Ok(Self(encoded))
    }

    /// Encoded verifier for storage adapters.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Registered user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    username: Username,
    name: String,
    password_hash: PasswordHash,
    posts: OwnedPosts,
}

impl User {
    /// Build a freshly registered user owning no posts.
    pub fn new(
        id: UserId,
        username: Username,
        name: impl Into<String>,
        password_hash: PasswordHash,
    ) -> Self {
        Self {
            id,
            username,
            name: name.into(),
            password_hash,
            posts: OwnedPosts::default(),
        }
    }

    /// Replace the owned-post index, used when rehydrating from storage.
    #[must_use]
    pub fn with_posts(mut self, posts: OwnedPosts) -> Self {
        self.posts = posts;
        self
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Display name.
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// Identifiers of the posts this user owns.
    pub fn posts(&self) -> &OwnedPosts {
        &self.posts
    }

    /// Mutable index access for storage adapters applying ledger operations.
    pub fn posts_mut(&mut self) -> &mut OwnedPosts {
        &mut self.posts
    }

    /// Minimal projection safe to embed in other resources.
    pub fn public_profile(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            username: self.username.as_ref().to_owned(),
            name: self.name.clone(),
        }
    }
}

/// Public projection of a user: identity and names only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicUser {
    pub id: UserId,
    pub username: String,
    pub name: String,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", UserValidationError::EmptyId)]
    #[case(" 3fa85f64-5717-4562-b3fc-2c963f66afa6", UserValidationError::InvalidId)]
    #[case("abc", UserValidationError::InvalidId)]
    fn user_id_rejects_invalid_input(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(UserId::new(raw).expect_err("invalid id"), expected);
    }

    #[rstest]
    #[case("   ", UserValidationError::EmptyUsername)]
    #[case("ab", UserValidationError::UsernameTooShort { min: USERNAME_MIN })]
    #[case(" ab ", UserValidationError::UsernameTooShort { min: USERNAME_MIN })]
    fn username_rejects_short_values(#[case] raw: &str, #[case] expected: UserValidationError) {
        assert_eq!(Username::new(raw).expect_err("invalid username"), expected);
    }

    #[rstest]
    fn usernames_are_case_sensitive() {
        let lower = Username::new("alice").expect("valid");
        let upper = Username::new("Alice").expect("valid");
        assert_ne!(lower, upper);
    }

    #[rstest]
    fn password_hash_debug_is_redacted() {
        let hash = PasswordHash::new("$argon2id$v=19$secret").expect("hash");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }

    #[rstest]
    fn public_profile_omits_verifier() {
        let user = User::new(
            UserId::random(),
            Username::new("root").expect("username"),
            "Superuser",
            PasswordHash::new("hash").expect("hash"),
        );
        let profile = user.public_profile();
        assert_eq!(profile.username, "root");
        assert_eq!(profile.name, "Superuser");
        assert_eq!(&profile.id, user.id());
    }
}
