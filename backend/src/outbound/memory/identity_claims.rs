//! In-process identity claim registry.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::ports::{IdentityClaims, IdentityClaimsError};
use crate::domain::{Role, UserId};

/// Records the latest role claim per identity.
#[derive(Debug, Default)]
pub struct InMemoryIdentityClaims {
    roles: Mutex<BTreeMap<UserId, Role>>,
}

impl InMemoryIdentityClaims {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// The role claim currently set on `uid`.
    pub async fn role_claim(&self, uid: &UserId) -> Option<Role> {
        self.roles.lock().await.get(uid).copied()
    }
}

#[async_trait]
impl IdentityClaims for InMemoryIdentityClaims {
    async fn set_role_claim(&self, uid: &UserId, role: Role) -> Result<(), IdentityClaimsError> {
        self.roles.lock().await.insert(uid.clone(), role);
        Ok(())
    }
}
