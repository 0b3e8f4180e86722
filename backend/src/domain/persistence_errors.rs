//! Mapping from driven-port failures to domain errors.
//!
//! Connection failures surface as `service_unavailable`; anything else the
//! store reports becomes an internal error that the HTTP layer redacts.

use serde_json::json;
use tracing::debug;

use crate::domain::Error;
use crate::domain::ports::{OwnershipLedgerError, PostRepositoryError, UserPersistenceError};

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { .. } => {
            Error::invalid_request("expected `username` to be unique")
                .with_details(json!({ "field": "username", "code": "duplicate" }))
        }
    }
}

pub(crate) fn map_post_error(error: PostRepositoryError) -> Error {
    match error {
        PostRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("post repository unavailable: {message}"))
        }
        PostRepositoryError::Query { message } => {
            Error::internal(format!("post repository error: {message}"))
        }
    }
}

pub(crate) fn map_ledger_error(error: OwnershipLedgerError) -> Error {
    match error {
        OwnershipLedgerError::Connection { message } => {
            Error::service_unavailable(format!("ownership ledger unavailable: {message}"))
        }
        OwnershipLedgerError::Query { message } => {
            Error::internal(format!("ownership ledger error: {message}"))
        }
        OwnershipLedgerError::UnknownUser { user_id } => {
            debug!(%user_id, "ledger update targeted a missing user");
            Error::not_found("user not found")
        }
    }
}
