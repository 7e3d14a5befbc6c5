//! Port for the `users` collection.

use async_trait::async_trait;

use crate::domain::{Role, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user profile repository adapters.
    pub enum UserProfileRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "profile store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "profile store query failed: {message}",
        /// The addressed profile does not exist.
        NotFound { uid: String } =>
            "profile {uid} not found",
    }
}

/// Port for user profile storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileRepository: Send + Sync {
    /// Fetch a profile. Returns `None` when the user has no profile yet.
    async fn find(&self, uid: &UserId) -> Result<Option<UserProfile>, UserProfileRepositoryError>;

    /// Write a full profile, replacing any existing document.
    async fn put(&self, profile: &UserProfile) -> Result<(), UserProfileRepositoryError>;

    /// Update only the role field of an existing profile.
    ///
    /// Fails with [`UserProfileRepositoryError::NotFound`] when the profile
    /// does not exist.
    async fn set_role(&self, uid: &UserId, role: Role) -> Result<(), UserProfileRepositoryError>;
}

/// Fixture implementation for tests where profiles are irrelevant.
///
/// Every lookup misses and every write is discarded.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureUserProfileRepository;

#[async_trait]
impl UserProfileRepository for FixtureUserProfileRepository {
    async fn find(&self, _uid: &UserId) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        Ok(None)
    }

    async fn put(&self, _profile: &UserProfile) -> Result<(), UserProfileRepositoryError> {
        Ok(())
    }

    async fn set_role(&self, _uid: &UserId, _role: Role) -> Result<(), UserProfileRepositoryError> {
        Ok(())
    }
}
