//! Caller identity and role-based authorisation.
//!
//! The identity provider authenticates callers before the core sees them;
//! direct invocations arrive with a [`CallContext`] that is either anonymous
//! or carries the verified uid. Privileged operations route their checks
//! through [`RoleGuard`] so every role gate reads the stored profile the same
//! way.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ports::{UserProfileRepository, UserProfileRepositoryError};
use crate::domain::{Error, Role, UserId};

/// Identity attached to a direct invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallContext {
    caller: Option<UserId>,
}

impl CallContext {
    /// Context for a request that carried no valid credentials.
    pub fn anonymous() -> Self {
        Self { caller: None }
    }

    /// Context for a request authenticated as `uid`.
    ///
    /// # Examples
    /// ```
    /// use civic_backend::domain::{CallContext, UserId};
    ///
    /// let uid = UserId::new("u1").expect("valid uid");
    /// let ctx = CallContext::authenticated(uid.clone());
    /// assert_eq!(ctx.caller(), Some(&uid));
    /// ```
    pub fn authenticated(uid: UserId) -> Self {
        Self { caller: Some(uid) }
    }

    /// The authenticated caller, if any.
    pub fn caller(&self) -> Option<&UserId> {
        self.caller.as_ref()
    }

    /// Return the caller or fail with `unauthenticated`.
    pub fn require_caller(&self) -> Result<&UserId, Error> {
        self.caller
            .as_ref()
            .ok_or_else(|| Error::unauthenticated("caller must be signed in"))
    }
}

/// Single capability check: "the caller's stored role is X".
///
/// The role is read from the caller's profile document, not from token
/// claims, so a role change is visible here once the profile write lands.
pub struct RoleGuard<U> {
    profiles: Arc<U>,
}

impl<U> Clone for RoleGuard<U> {
    fn clone(&self) -> Self {
        Self {
            profiles: Arc::clone(&self.profiles),
        }
    }
}

impl<U> RoleGuard<U> {
    /// Build a guard reading roles from `profiles`.
    pub fn new(profiles: Arc<U>) -> Self {
        Self { profiles }
    }
}

impl<U> RoleGuard<U>
where
    U: UserProfileRepository,
{
    /// Require an authenticated caller whose stored role is `role`.
    ///
    /// Returns the caller's uid on success. An anonymous context fails with
    /// `unauthenticated`; a missing profile, a profile without a role or a
    /// different role all fail with `permission_denied`.
    pub async fn authorize(&self, ctx: &CallContext, role: Role) -> Result<UserId, Error> {
        let caller = ctx.require_caller()?;
        self.ensure_role(caller, role).await?;
        Ok(caller.clone())
    }

    /// Fail with `permission_denied` unless `uid`'s stored role is `role`.
    pub async fn ensure_role(&self, uid: &UserId, role: Role) -> Result<(), Error> {
        let profile = self
            .profiles
            .find(uid)
            .await
            .map_err(map_profile_error)?;
        if profile.as_ref().is_some_and(|p| p.has_role(role)) {
            return Ok(());
        }
        debug!(uid = %uid, required = %role, "role check rejected caller");
        Err(Error::permission_denied(format!(
            "caller must hold the {role} role"
        )))
    }
}

pub(crate) fn map_profile_error(error: UserProfileRepositoryError) -> Error {
    match error {
        UserProfileRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("profile store unavailable: {message}"))
        }
        UserProfileRepositoryError::Query { message } => {
            Error::internal(format!("profile store error: {message}"))
        }
        UserProfileRepositoryError::NotFound { uid } => {
            Error::not_found(format!("profile {uid} not found"))
        }
    }
}
