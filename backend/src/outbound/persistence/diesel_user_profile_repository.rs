//! PostgreSQL-backed `UserProfileRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserProfileRepository, UserProfileRepositoryError};
use crate::domain::{Role, UserId, UserProfile};

use super::diesel_helpers::{map_diesel_error, map_pool_error_message};
use super::models::{UserRow, UserWriteRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserProfileRepository` port.
#[derive(Clone)]
pub struct DieselUserProfileRepository {
    pool: DbPool,
}

impl DieselUserProfileRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserProfileRepositoryError {
    UserProfileRepositoryError::connection(map_pool_error_message(error))
}

fn db_error(
    operation: &'static str,
) -> impl FnOnce(diesel::result::Error) -> UserProfileRepositoryError {
    move |error| {
        map_diesel_error(
            error,
            operation,
            UserProfileRepositoryError::connection,
            UserProfileRepositoryError::query,
        )
    }
}

#[async_trait]
impl UserProfileRepository for DieselUserProfileRepository {
    async fn find(&self, uid: &UserId) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(uid.as_ref())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(db_error("load user profile"))?;
        row.map(UserRow::into_profile)
            .transpose()
            .map_err(UserProfileRepositoryError::query)
    }

    async fn put(&self, profile: &UserProfile) -> Result<(), UserProfileRepositoryError> {
        let row = UserWriteRow::from(profile);
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(users::table)
            .values(&row)
            .on_conflict(users::uid)
            .do_update()
            .set(&row)
            .execute(&mut conn)
            .await
            .map_err(db_error("write user profile"))?;
        Ok(())
    }

    async fn set_role(&self, uid: &UserId, role: Role) -> Result<(), UserProfileRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(users::table.find(uid.as_ref()))
            .set(users::role.eq(Some(role.as_str())))
            .execute(&mut conn)
            .await
            .map_err(db_error("set user role"))?;
        if updated == 0 {
            return Err(UserProfileRepositoryError::not_found(uid.as_ref()));
        }
        Ok(())
    }
}
