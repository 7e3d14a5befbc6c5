//! PostgreSQL-backed `ComplaintRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Jsonb, Text};
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{ComplaintRepository, ComplaintRepositoryError, HistoryAppend};
use crate::domain::{ComplaintDefaults, ComplaintDocument, ComplaintId, StatusTransition};

use super::diesel_helpers::{map_diesel_error, map_pool_error_message};
use super::models::{ComplaintDefaultsChangeset, ComplaintRow};
use super::pool::{DbPool, PoolError};
use super::schema::complaints;

/// Set-union append: only appends when no equal element is already present.
const APPEND_TRANSITION_SQL: &str = r#"
UPDATE complaints
SET status_history = status_history || $2
WHERE id = $1 AND NOT (status_history @> $2)
"#;

const INCREMENT_COMMENTS_SQL: &str = r#"
UPDATE complaints
SET comment_count = COALESCE(comment_count, 0) + 1
WHERE id = $1
"#;

/// Diesel-backed implementation of the `ComplaintRepository` port.
#[derive(Clone)]
pub struct DieselComplaintRepository {
    pool: DbPool,
}

impl DieselComplaintRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ComplaintRepositoryError {
    ComplaintRepositoryError::connection(map_pool_error_message(error))
}

fn db_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> ComplaintRepositoryError {
    move |error| {
        map_diesel_error(
            error,
            operation,
            ComplaintRepositoryError::connection,
            ComplaintRepositoryError::query,
        )
    }
}

async fn exists(
    conn: &mut AsyncPgConnection,
    id: &ComplaintId,
) -> Result<bool, ComplaintRepositoryError> {
    let found: Option<String> = complaints::table
        .find(id.as_ref())
        .select(complaints::id)
        .first(conn)
        .await
        .optional()
        .map_err(db_error("check complaint"))?;
    Ok(found.is_some())
}

#[async_trait]
impl ComplaintRepository for DieselComplaintRepository {
    async fn delete(&self, id: &ComplaintId) -> Result<(), ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::delete(complaints::table.find(id.as_ref()))
            .execute(&mut conn)
            .await
            .map_err(db_error("delete complaint"))?;
        Ok(())
    }

    async fn apply_defaults(
        &self,
        id: &ComplaintId,
        defaults: &ComplaintDefaults,
    ) -> Result<(), ComplaintRepositoryError> {
        if defaults.is_empty() {
            return Ok(());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = ComplaintDefaultsChangeset::from(defaults);
        let updated = diesel::update(complaints::table.find(id.as_ref()))
            .set(&changeset)
            .execute(&mut conn)
            .await
            .map_err(db_error("apply complaint defaults"))?;
        if updated == 0 {
            return Err(ComplaintRepositoryError::not_found(id.as_ref()));
        }
        Ok(())
    }

    async fn append_transition(
        &self,
        id: &ComplaintId,
        transition: &StatusTransition,
    ) -> Result<HistoryAppend, ComplaintRepositoryError> {
        let element = serde_json::to_value([transition]).map_err(|err| {
            ComplaintRepositoryError::query(format!("failed to serialise transition: {err}"))
        })?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = sql_query(APPEND_TRANSITION_SQL)
            .bind::<Text, _>(id.as_ref())
            .bind::<Jsonb, _>(&element)
            .execute(&mut conn)
            .await
            .map_err(db_error("append status transition"))?;
        if updated > 0 {
            return Ok(HistoryAppend::Appended);
        }
        if exists(&mut conn, id).await? {
            Ok(HistoryAppend::AlreadyPresent)
        } else {
            Err(ComplaintRepositoryError::not_found(id.as_ref()))
        }
    }

    async fn increment_comment_count(
        &self,
        id: &ComplaintId,
    ) -> Result<(), ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = sql_query(INCREMENT_COMMENTS_SQL)
            .bind::<Text, _>(id.as_ref())
            .execute(&mut conn)
            .await
            .map_err(db_error("increment comment count"))?;
        if updated == 0 {
            return Err(ComplaintRepositoryError::not_found(id.as_ref()));
        }
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ComplaintDocument>, ComplaintRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<ComplaintRow> = complaints::table
            .select(ComplaintRow::as_select())
            .load(&mut conn)
            .await
            .map_err(db_error("scan complaints"))?;
        Ok(rows.into_iter().map(ComplaintRow::into_document).collect())
    }
}
