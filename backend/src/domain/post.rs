//! Blog post aggregate.
//!
//! ## Invariants
//! - `title` and `url` are non-empty once trimmed.
//! - `likes` is never negative; absent or null on creation means zero.
//! - `owner` is fixed at creation. [`Post::apply`] cannot change it.

use std::fmt;

use uuid::Uuid;

use crate::domain::UserId;

/// Validation errors raised while building posts from caller input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PostValidationError {
    #[error("malformatted id")]
    InvalidId,
    #[error("title or url missing")]
    MissingTitle,
    #[error("title or url missing")]
    MissingUrl,
    #[error("likes must not be negative")]
    NegativeLikes,
    #[error("likes must not exceed {}", u32::MAX)]
    LikesTooLarge,
    #[error("blog data is missing")]
    EmptyChanges,
}

impl PostValidationError {
    /// Request field the failure refers to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidId => Some("id"),
            Self::MissingTitle => Some("title"),
            Self::MissingUrl => Some("url"),
            Self::NegativeLikes | Self::LikesTooLarge => Some("likes"),
            Self::EmptyChanges => None,
        }
    }

    /// Stable machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidId => "malformatted_id",
            Self::MissingTitle | Self::MissingUrl => "missing_field",
            Self::NegativeLikes => "negative_likes",
            Self::LikesTooLarge => "likes_too_large",
            Self::EmptyChanges => "missing_body",
        }
    }
}

/// Stable post identifier. Identifiers never change once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PostId(Uuid);

impl PostId {
    /// Parse a post identifier from a path segment or stored value.
    ///
    /// # Examples
    /// ```
    /// use bloglist::domain::PostId;
    ///
    /// assert!(PostId::new("5a422a851b54a676234d17f7").is_err());
    /// assert!(PostId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").is_ok());
    /// ```
    pub fn new(raw: &str) -> Result<Self, PostValidationError> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| PostValidationError::InvalidId)
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-negative like counter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Likes(u32);

impl Likes {
    /// Validate a caller-supplied count.
    pub fn new(value: i64) -> Result<Self, PostValidationError> {
        if value < 0 {
            return Err(PostValidationError::NegativeLikes);
        }
        u32::try_from(value)
            .map(Self)
            .map_err(|_| PostValidationError::LikesTooLarge)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for Likes {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

/// Validated input for creating a post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    title: String,
    author: String,
    url: String,
    likes: Likes,
}

impl PostDraft {
    /// Validate creation input.
    ///
    /// `title` and `url` must be present and non-blank; `author` is free text;
    /// `likes` defaults to zero.
    ///
    /// # Examples
    /// ```
    /// use bloglist::domain::PostDraft;
    ///
    /// let draft = PostDraft::try_new(Some("test-blog"), None, Some("http://x"), None).unwrap();
    /// assert_eq!(draft.likes().get(), 0);
    /// assert!(PostDraft::try_new(None, None, Some("http://x"), None).is_err());
    /// ```
    pub fn try_new(
        title: Option<&str>,
        author: Option<&str>,
        url: Option<&str>,
        likes: Option<i64>,
    ) -> Result<Self, PostValidationError> {
        let title = required(title, PostValidationError::MissingTitle)?;
        let url = required(url, PostValidationError::MissingUrl)?;
        let likes = likes.map(Likes::new).transpose()?.unwrap_or_default();
        Ok(Self {
            title,
            author: author.unwrap_or_default().to_owned(),
            url,
            likes,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn likes(&self) -> Likes {
        self.likes
    }
}

/// Validated partial update. At least one field is present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostChanges {
    title: Option<String>,
    author: Option<String>,
    url: Option<String>,
    likes: Option<Likes>,
}

impl PostChanges {
    /// Validate update input. Supplied `title`/`url` must be non-blank.
    pub fn try_new(
        title: Option<&str>,
        author: Option<&str>,
        url: Option<&str>,
        likes: Option<i64>,
    ) -> Result<Self, PostValidationError> {
        if title.is_none() && author.is_none() && url.is_none() && likes.is_none() {
            return Err(PostValidationError::EmptyChanges);
        }
        Ok(Self {
            title: title
                .map(|value| required(Some(value), PostValidationError::MissingTitle))
                .transpose()?,
            author: author.map(str::to_owned),
            url: url
                .map(|value| required(Some(value), PostValidationError::MissingUrl))
                .transpose()?,
            likes: likes.map(Likes::new).transpose()?,
        })
    }
}

fn required(
    value: Option<&str>,
    missing: PostValidationError,
) -> Result<String, PostValidationError> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed.to_owned()),
        _ => Err(missing),
    }
}

/// Persisted blog post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    id: PostId,
    owner: UserId,
    title: String,
    author: String,
    url: String,
    likes: Likes,
}

impl Post {
    /// Materialise a draft owned by `owner`.
    pub fn from_draft(id: PostId, owner: UserId, draft: PostDraft) -> Self {
        let PostDraft {
            title,
            author,
            url,
            likes,
        } = draft;
        Self {
            id,
            owner,
            title,
            author,
            url,
            likes,
        }
    }

    /// Rehydrate a stored post.
    pub fn from_parts(
        id: PostId,
        owner: UserId,
        title: String,
        author: String,
        url: String,
        likes: Likes,
    ) -> Self {
        Self {
            id,
            owner,
            title,
            author,
            url,
            likes,
        }
    }

    /// Return a copy with the supplied fields replaced. Identity and owner
    /// are carried over unchanged.
    #[must_use]
    pub fn apply(&self, changes: PostChanges) -> Self {
        let PostChanges {
            title,
            author,
            url,
            likes,
        } = changes;
        Self {
            id: self.id,
            owner: self.owner.clone(),
            title: title.unwrap_or_else(|| self.title.clone()),
            author: author.unwrap_or_else(|| self.author.clone()),
            url: url.unwrap_or_else(|| self.url.clone()),
            likes: likes.unwrap_or(self.likes),
        }
    }

    pub fn id(&self) -> PostId {
        self.id
    }

    pub fn owner(&self) -> &UserId {
        &self.owner
    }

    /// Whether `user` may update or delete this post.
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner == user
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn likes(&self) -> Likes {
        self.likes
    }
}
