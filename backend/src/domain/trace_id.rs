//! Per-request correlation identifier.
//!
//! The [`Trace`](crate::Trace) middleware opens a scope for every request;
//! anything running inside it, such as [`Error`](super::Error) construction,
//! reads the identifier back with [`TraceId::current`]. Task-locals do not
//! follow `tokio::spawn`, so re-enter the scope with [`TraceId::scope`] when
//! handing work to another task.

use std::fmt;
use std::future::Future;
use std::str::FromStr;

use tokio::task_local;
use uuid::Uuid;

/// Response header echoing the identifier back to the client.
pub const TRACE_ID_HEADER: &str = "trace-id";

task_local! {
    static CURRENT: TraceId;
}

/// Random UUID tagging one request's logs and error payloads.
///
/// # Examples
/// ```
/// use bloglist::TraceId;
///
/// let id: TraceId = "5b0a8e4e-6a43-4c47-9a53-0d4c52d1c1a9".parse().expect("uuid");
/// assert_eq!(id.to_string(), "5b0a8e4e-6a43-4c47-9a53-0d4c52d1c1a9");
/// assert!(TraceId::current().is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceId(Uuid);

impl TraceId {
    #[must_use]
    pub(crate) fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Identifier of the request being served, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    #[must_use]
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Run `fut` with `trace_id` as the current identifier.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}
