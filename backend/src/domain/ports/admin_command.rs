//! Driving ports for government-only administration.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{CallContext, DashboardStats, Error};

/// Driving port for `getDashboardStats`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DashboardQuery: Send + Sync {
    /// Aggregate complaint counts for a government caller.
    ///
    /// # Errors
    ///
    /// - `unauthenticated` when the context has no caller.
    /// - `permission_denied` unless the caller's stored role is government.
    async fn dashboard_stats(&self, ctx: &CallContext) -> Result<DashboardStats, Error>;
}

/// Request to change another user's role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetUserRoleRequest {
    /// User whose role changes.
    pub target_uid: String,
    /// Requested role; must be `citizen` or `government`.
    pub role: String,
}

/// Result of a role assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetUserRoleResponse {
    /// Always `true`; failures are reported as errors.
    pub success: bool,
    /// User whose role changed.
    pub target_uid: String,
    /// Role now held.
    pub role: String,
}

/// Driving port for `setUserRole`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RoleAssignmentCommand: Send + Sync {
    /// Assign `role` to the target user.
    ///
    /// # Errors
    ///
    /// - `unauthenticated` when the context has no caller.
    /// - `invalid_argument` for an empty target or an unknown role.
    /// - `permission_denied` unless the caller's stored role is government.
    /// - `not_found` when the target has no profile document.
    async fn set_user_role(
        &self,
        ctx: &CallContext,
        request: SetUserRoleRequest,
    ) -> Result<SetUserRoleResponse, Error>;
}
