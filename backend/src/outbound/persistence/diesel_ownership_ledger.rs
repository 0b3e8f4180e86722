//! PostgreSQL-backed `OwnershipLedger` using single-statement array updates.
//!
//! Each operation is one `UPDATE` against the user's row, so PostgreSQL's row
//! lock serialises concurrent attaches instead of letting one overwrite the
//! other.

use async_trait::async_trait;
use diesel::sql_query;
use diesel::sql_types::Uuid as SqlUuid;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{OwnershipLedger, OwnershipLedgerError};
use crate::domain::{PostId, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::pool::{DbPool, PoolError};

const ATTACH_SQL: &str = "UPDATE users \
     SET post_ids = CASE WHEN $2 = ANY(post_ids) THEN post_ids \
                         ELSE array_append(post_ids, $2) END \
     WHERE id = $1";

const DETACH_SQL: &str = "UPDATE users SET post_ids = array_remove(post_ids, $2) WHERE id = $1";

const RECONCILE_SQL: &str = "UPDATE users \
     SET post_ids = array_append(array_remove(array_remove(post_ids, $2), $3), $3) \
     WHERE id = $1";

/// Diesel-backed implementation of the `OwnershipLedger` port.
#[derive(Clone)]
pub struct DieselOwnershipLedger {
    pool: DbPool,
}

impl DieselOwnershipLedger {
    /// Create a new ledger with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OwnershipLedgerError {
    map_basic_pool_error(error, OwnershipLedgerError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> OwnershipLedgerError {
    map_basic_diesel_error(
        error,
        OwnershipLedgerError::query,
        OwnershipLedgerError::connection,
    )
}

fn ensure_user_matched(user: &UserId, updated: usize) -> Result<(), OwnershipLedgerError> {
    if updated == 0 {
        Err(OwnershipLedgerError::unknown_user(user.to_string()))
    } else {
        Ok(())
    }
}

#[async_trait]
impl OwnershipLedger for DieselOwnershipLedger {
    async fn attach(&self, user: &UserId, post: &PostId) -> Result<(), OwnershipLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = sql_query(ATTACH_SQL)
            .bind::<SqlUuid, _>(*user.as_uuid())
            .bind::<SqlUuid, _>(*post.as_uuid())
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        ensure_user_matched(user, updated)
    }

    async fn detach(&self, user: &UserId, post: &PostId) -> Result<(), OwnershipLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = sql_query(DETACH_SQL)
            .bind::<SqlUuid, _>(*user.as_uuid())
            .bind::<SqlUuid, _>(*post.as_uuid())
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        ensure_user_matched(user, updated)
    }

    async fn reconcile(
        &self,
        user: &UserId,
        old: &PostId,
        new: &PostId,
    ) -> Result<(), OwnershipLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let updated = sql_query(RECONCILE_SQL)
            .bind::<SqlUuid, _>(*user.as_uuid())
            .bind::<SqlUuid, _>(*old.as_uuid())
            .bind::<SqlUuid, _>(*new.as_uuid())
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        ensure_user_matched(user, updated)
    }
}
