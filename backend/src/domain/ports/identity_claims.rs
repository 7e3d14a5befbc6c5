//! Port for authorisation claims held by the external identity provider.

use async_trait::async_trait;

use crate::domain::{Role, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by identity claim adapters.
    pub enum IdentityClaimsError {
        /// The identity provider could not be reached.
        Transport { message: String } =>
            "identity provider transport failed: {message}",
        /// The identity provider refused the update.
        Rejected { message: String } =>
            "identity provider rejected claim update: {message}",
        /// No identity exists for the uid.
        UnknownIdentity { uid: String } =>
            "identity {uid} does not exist",
    }
}

/// Sets custom claims carried by future authentication tokens.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityClaims: Send + Sync {
    /// Replace the `role` claim on `uid`.
    async fn set_role_claim(&self, uid: &UserId, role: Role) -> Result<(), IdentityClaimsError>;
}

/// Claims adapter used when no identity provider admin endpoint is
/// configured. Every update fails with [`IdentityClaimsError::Transport`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledIdentityClaims;

#[async_trait]
impl IdentityClaims for DisabledIdentityClaims {
    async fn set_role_claim(&self, _uid: &UserId, _role: Role) -> Result<(), IdentityClaimsError> {
        Err(IdentityClaimsError::transport(
            "identity provider admin endpoint is not configured",
        ))
    }
}
