//! PostgreSQL-backed `CommentRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CommentRepository, CommentRepositoryError};
use crate::domain::{CommentId, NewComment};

use super::diesel_helpers::{is_foreign_key_violation, map_diesel_error, map_pool_error_message};
use super::models::NewCommentRow;
use super::pool::{DbPool, PoolError};
use super::schema::complaint_comments;

/// Diesel-backed implementation of the `CommentRepository` port.
#[derive(Clone)]
pub struct DieselCommentRepository {
    pool: DbPool,
}

impl DieselCommentRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CommentRepositoryError {
    CommentRepositoryError::connection(map_pool_error_message(error))
}

#[async_trait]
impl CommentRepository for DieselCommentRepository {
    async fn insert(&self, comment: &NewComment) -> Result<CommentId, CommentRepositoryError> {
        let id = CommentId::random();
        let row = NewCommentRow::new(*id.as_uuid(), comment);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(complaint_comments::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|error| {
                if is_foreign_key_violation(&error) {
                    CommentRepositoryError::complaint_not_found(comment.complaint_id.as_ref())
                } else {
                    map_diesel_error(
                        error,
                        "insert comment",
                        CommentRepositoryError::connection,
                        CommentRepositoryError::query,
                    )
                }
            })?;
        Ok(id)
    }
}
