//! PostgreSQL-backed `UpvoteLedger` implementation using Diesel ORM.
//!
//! Each toggle runs in a SERIALIZABLE transaction. PostgreSQL aborts one side
//! of any conflicting pair, so the adapter re-runs aborted attempts until its
//! budget is exhausted.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text};
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncPgConnection, RunQueryDsl};
use tracing::debug;

use crate::domain::ports::{UpvoteLedger, UpvoteLedgerError};
use crate::domain::{ComplaintId, UpvoteToggle, UserId};

use super::diesel_helpers::{
    is_foreign_key_violation, is_retryable_conflict, map_diesel_error, map_pool_error_message,
};
use super::models::NewUpvoteRow;
use super::pool::{DbPool, PoolError};
use super::schema::complaint_upvotes;

const ADJUST_UPVOTES_SQL: &str = r#"
UPDATE complaints
SET upvote_count = GREATEST(COALESCE(upvote_count, 0) + $2, 0)
WHERE id = $1
"#;

/// Diesel-backed implementation of the `UpvoteLedger` port.
#[derive(Clone)]
pub struct DieselUpvoteLedger {
    pool: DbPool,
    attempts: u32,
}

impl DieselUpvoteLedger {
    /// Create a ledger that runs each toggle at most `attempts` times.
    pub fn new(pool: DbPool, attempts: u32) -> Self {
        Self {
            pool,
            attempts: attempts.max(1),
        }
    }
}

/// Failure of one transaction attempt.
#[derive(Debug)]
enum AttemptError {
    Diesel(diesel::result::Error),
    ComplaintMissing,
}

impl From<diesel::result::Error> for AttemptError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

fn map_pool_error(error: PoolError) -> UpvoteLedgerError {
    UpvoteLedgerError::connection(map_pool_error_message(error))
}

async fn toggle_once(
    conn: &mut AsyncPgConnection,
    complaint_id: &str,
    user_id: &str,
    at: DateTime<Utc>,
) -> Result<UpvoteToggle, AttemptError> {
    conn.build_transaction()
        .serializable()
        .run(|conn| {
            async move {
                let existing: Option<String> = complaint_upvotes::table
                    .find((complaint_id, user_id))
                    .select(complaint_upvotes::user_id)
                    .first(conn)
                    .await
                    .optional()?;

                let (outcome, delta) = if existing.is_some() {
                    diesel::delete(complaint_upvotes::table.find((complaint_id, user_id)))
                        .execute(conn)
                        .await?;
                    (UpvoteToggle::Removed, -1_i64)
                } else {
                    diesel::insert_into(complaint_upvotes::table)
                        .values(&NewUpvoteRow {
                            complaint_id,
                            user_id,
                            created_at: at,
                        })
                        .execute(conn)
                        .await?;
                    (UpvoteToggle::Added, 1_i64)
                };

                let updated = sql_query(ADJUST_UPVOTES_SQL)
                    .bind::<Text, _>(complaint_id)
                    .bind::<BigInt, _>(delta)
                    .execute(conn)
                    .await?;
                if updated == 0 {
                    return Err(AttemptError::ComplaintMissing);
                }
                Ok(outcome)
            }
            .scope_boxed()
        })
        .await
}

#[async_trait]
impl UpvoteLedger for DieselUpvoteLedger {
    async fn toggle(
        &self,
        complaint_id: &ComplaintId,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<UpvoteToggle, UpvoteLedgerError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        for attempt in 1..=self.attempts {
            match toggle_once(&mut conn, complaint_id.as_ref(), user_id.as_ref(), at).await {
                Ok(outcome) => return Ok(outcome),
                Err(AttemptError::ComplaintMissing) => {
                    return Err(UpvoteLedgerError::complaint_not_found(complaint_id.as_ref()));
                }
                Err(AttemptError::Diesel(error)) if is_foreign_key_violation(&error) => {
                    return Err(UpvoteLedgerError::complaint_not_found(complaint_id.as_ref()));
                }
                Err(AttemptError::Diesel(error)) if is_retryable_conflict(&error) => {
                    debug!(
                        complaint_id = %complaint_id,
                        user_id = %user_id,
                        attempt,
                        "upvote toggle aborted on conflict; retrying"
                    );
                }
                Err(AttemptError::Diesel(error)) => {
                    return Err(map_diesel_error(
                        error,
                        "toggle upvote",
                        UpvoteLedgerError::connection,
                        UpvoteLedgerError::query,
                    ));
                }
            }
        }
        Err(UpvoteLedgerError::contention(self.attempts))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for attempt error classification.
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[rstest]
    fn diesel_errors_convert_into_attempt_errors() {
        let error = AttemptError::from(DieselError::RollbackTransaction);
        assert!(matches!(
            error,
            AttemptError::Diesel(DieselError::RollbackTransaction)
        ));
    }

    #[rstest]
    fn serialization_failures_are_retried() {
        let error = DieselError::DatabaseError(
            DatabaseErrorKind::SerializationFailure,
            Box::new("could not serialize access".to_owned()),
        );
        assert!(is_retryable_conflict(&error));
    }
}
