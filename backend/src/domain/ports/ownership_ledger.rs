//! Port for maintaining each user's owned-post index.
//!
//! Adapters must apply every operation atomically against the stored user
//! record: two concurrent `attach` calls for the same user must both land.
//! A read-modify-write of the whole user record does not satisfy this.
use async_trait::async_trait;

use crate::domain::{PostId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ownership ledger adapters.
    pub enum OwnershipLedgerError {
        /// Backing store connection could not be established.
        Connection { message: String } => "ownership ledger connection failed: {message}",
        /// The update failed during execution.
        Query { message: String } => "ownership ledger update failed: {message}",
        /// No user record exists for the identifier.
        UnknownUser { user_id: String } => "no user with id {user_id}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OwnershipLedger: Send + Sync {
    /// Add `post` to the user's set. Adding a present identifier is a no-op.
    async fn attach(&self, user: &UserId, post: &PostId) -> Result<(), OwnershipLedgerError>;

    /// Remove `post` from the user's set. Removing an absent identifier is a
    /// no-op.
    async fn detach(&self, user: &UserId, post: &PostId) -> Result<(), OwnershipLedgerError>;

    /// Swap `old` for `new`, leaving `new` present afterwards.
    async fn reconcile(
        &self,
        user: &UserId,
        old: &PostId,
        new: &PostId,
    ) -> Result<(), OwnershipLedgerError>;
}
