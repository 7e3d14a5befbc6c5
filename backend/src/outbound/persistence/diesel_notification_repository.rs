//! PostgreSQL-backed `NotificationRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{NotificationRepository, NotificationRepositoryError};
use crate::domain::{NewNotification, NotificationId};

use super::diesel_helpers::{map_diesel_error, map_pool_error_message};
use super::models::NewNotificationRow;
use super::pool::{DbPool, PoolError};
use super::schema::notifications;

/// Diesel-backed implementation of the `NotificationRepository` port.
#[derive(Clone)]
pub struct DieselNotificationRepository {
    pool: DbPool,
}

impl DieselNotificationRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> NotificationRepositoryError {
    NotificationRepositoryError::connection(map_pool_error_message(error))
}

#[async_trait]
impl NotificationRepository for DieselNotificationRepository {
    async fn insert(
        &self,
        notification: &NewNotification,
    ) -> Result<NotificationId, NotificationRepositoryError> {
        let id = NotificationId::random();
        let row = NewNotificationRow::new(*id.as_uuid(), notification);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(notifications::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|error| {
                map_diesel_error(
                    error,
                    "insert notification",
                    NotificationRepositoryError::connection,
                    NotificationRepositoryError::query,
                )
            })?;
        Ok(id)
    }
}
