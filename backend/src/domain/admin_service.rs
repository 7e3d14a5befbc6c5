//! Government-only administration: dashboard statistics and role assignment.
//!
//! Both operations gate on the caller's stored role through [`RoleGuard`].
//!
//! Role assignment performs two independent writes: the identity claim first,
//! then the profile's `role` field. A failure between them leaves the two
//! disagreeing until the assignment is repeated.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::auth::map_profile_error;
use crate::domain::complaint_intake::map_complaint_error;
use crate::domain::ports::{
    ComplaintRepository, DashboardQuery, IdentityClaims, IdentityClaimsError,
    RoleAssignmentCommand, SetUserRoleRequest, SetUserRoleResponse, UserProfileRepository,
};
use crate::domain::{CallContext, DashboardStats, Error, Role, RoleGuard, UserId};

/// Admin operations over complaints, profiles and identity claims.
pub struct AdminService<C, U, I> {
    complaints: Arc<C>,
    profiles: Arc<U>,
    claims: Arc<I>,
    guard: RoleGuard<U>,
}

impl<C, U, I> Clone for AdminService<C, U, I> {
    fn clone(&self) -> Self {
        Self {
            complaints: Arc::clone(&self.complaints),
            profiles: Arc::clone(&self.profiles),
            claims: Arc::clone(&self.claims),
            guard: self.guard.clone(),
        }
    }
}

impl<C, U, I> AdminService<C, U, I> {
    /// Create the service. Role checks read from `profiles`.
    pub fn new(complaints: Arc<C>, profiles: Arc<U>, claims: Arc<I>) -> Self {
        let guard = RoleGuard::new(Arc::clone(&profiles));
        Self {
            complaints,
            profiles,
            claims,
            guard,
        }
    }
}

fn map_claims_error(error: IdentityClaimsError) -> Error {
    match error {
        IdentityClaimsError::Transport { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
        IdentityClaimsError::Rejected { message } => {
            Error::internal(format!("identity provider rejected claim update: {message}"))
        }
        IdentityClaimsError::UnknownIdentity { uid } => {
            Error::not_found(format!("identity {uid} not found"))
        }
    }
}

fn parse_request(request: &SetUserRoleRequest) -> Result<(UserId, Role), Error> {
    if request.target_uid.trim().is_empty() {
        return Err(Error::invalid_argument("targetUid is required"));
    }
    let target = UserId::new(request.target_uid.as_str())
        .map_err(|err| Error::invalid_argument(format!("invalid targetUid: {err}")))?;
    let role = request
        .role
        .parse::<Role>()
        .map_err(|err| Error::invalid_argument(err.to_string()))?;
    Ok((target, role))
}

#[async_trait]
impl<C, U, I> DashboardQuery for AdminService<C, U, I>
where
    C: ComplaintRepository,
    U: UserProfileRepository,
    I: IdentityClaims,
{
    async fn dashboard_stats(&self, ctx: &CallContext) -> Result<DashboardStats, Error> {
        let caller = self.guard.authorize(ctx, Role::Government).await?;
        let complaints = self
            .complaints
            .list_all()
            .await
            .map_err(map_complaint_error)?;
        let stats = DashboardStats::tally(&complaints);
        info!(uid = %caller, total = stats.total, "dashboard stats requested");
        Ok(stats)
    }
}

#[async_trait]
impl<C, U, I> RoleAssignmentCommand for AdminService<C, U, I>
where
    C: ComplaintRepository,
    U: UserProfileRepository,
    I: IdentityClaims,
{
    async fn set_user_role(
        &self,
        ctx: &CallContext,
        request: SetUserRoleRequest,
    ) -> Result<SetUserRoleResponse, Error> {
        let caller = ctx.require_caller()?;
        let (target, role) = parse_request(&request)?;
        self.guard.ensure_role(caller, Role::Government).await?;

        self.claims
            .set_role_claim(&target, role)
            .await
            .map_err(map_claims_error)?;
        if let Err(err) = self.profiles.set_role(&target, role).await {
            error!(
                target_uid = %target,
                %role,
                error = %err,
                "role claim set but profile update failed"
            );
            return Err(map_profile_error(err));
        }

        info!(uid = %caller, target_uid = %target, %role, "role assigned");
        Ok(SetUserRoleResponse {
            success: true,
            target_uid: target.to_string(),
            role: role.as_str().to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{
        MockComplaintRepository, MockIdentityClaims, MockUserProfileRepository,
        UserProfileRepositoryError,
    };
    use crate::domain::{ComplaintDocument, ComplaintStatus, ErrorCode, UserProfile};
    use crate::test_support::{profile, uid};
    use rstest::rstest;

    type Service =
        AdminService<MockComplaintRepository, MockUserProfileRepository, MockIdentityClaims>;

    fn caller_profile(role: Option<Role>) -> UserProfile {
        let mut found = profile("admin", "Admin");
        found.role = role;
        found
    }

    fn service(
        complaints: MockComplaintRepository,
        profiles: MockUserProfileRepository,
        claims: MockIdentityClaims,
    ) -> Service {
        AdminService::new(Arc::new(complaints), Arc::new(profiles), Arc::new(claims))
    }

    fn role_request(target: &str, role: &str) -> SetUserRoleRequest {
        SetUserRoleRequest {
            target_uid: target.to_owned(),
            role: role.to_owned(),
        }
    }

    fn admin_ctx() -> CallContext {
        CallContext::authenticated(uid("admin"))
    }

    fn profiles_for_caller(found: Option<UserProfile>) -> MockUserProfileRepository {
        let mut profiles = MockUserProfileRepository::new();
        profiles
            .expect_find()
            .withf(|id| id.as_ref() == "admin")
            .times(1)
            .return_once(move |_| Ok(found));
        profiles
    }

    #[tokio::test]
    async fn dashboard_tallies_scan_for_government_caller() {
        let mut complaints = MockComplaintRepository::new();
        complaints.expect_list_all().times(1).return_once(|| {
            Ok(vec![
                ComplaintDocument {
                    status: Some(ComplaintStatus::new("Resolved")),
                    category: Some("Roads".to_owned()),
                    ..ComplaintDocument::default()
                },
                ComplaintDocument::default(),
            ])
        });

        let stats = service(
            complaints,
            profiles_for_caller(Some(caller_profile(Some(Role::Government)))),
            MockIdentityClaims::new(),
        )
        .dashboard_stats(&admin_ctx())
        .await
        .expect("stats succeed");

        assert_eq!(stats.total, 2);
        assert_eq!(stats.by_status["Resolved"], 1);
        assert_eq!(stats.by_status["Pending"], 1);
        assert_eq!(stats.by_category["Uncategorized"], 1);
    }

    #[rstest]
    #[case::citizen(Some(caller_profile(Some(Role::Citizen))))]
    #[case::no_role(Some(caller_profile(None)))]
    #[case::no_profile(None)]
    #[tokio::test]
    async fn dashboard_denies_non_government(#[case] found: Option<UserProfile>) {
        let mut complaints = MockComplaintRepository::new();
        complaints.expect_list_all().times(0);

        let error = service(complaints, profiles_for_caller(found), MockIdentityClaims::new())
            .dashboard_stats(&admin_ctx())
            .await
            .expect_err("non-government denied");
        assert_eq!(error.code(), ErrorCode::PermissionDenied);
    }

    #[tokio::test]
    async fn dashboard_requires_authentication() {
        let error = service(
            MockComplaintRepository::new(),
            MockUserProfileRepository::new(),
            MockIdentityClaims::new(),
        )
        .dashboard_stats(&CallContext::anonymous())
        .await
        .expect_err("anonymous rejected");
        assert_eq!(error.code(), ErrorCode::Unauthenticated);
    }

    #[tokio::test]
    async fn set_role_writes_claim_then_profile() {
        let mut profiles = profiles_for_caller(Some(caller_profile(Some(Role::Government))));
        profiles
            .expect_set_role()
            .withf(|id, role| id.as_ref() == "u2" && *role == Role::Government)
            .times(1)
            .return_once(|_, _| Ok(()));
        let mut claims = MockIdentityClaims::new();
        claims
            .expect_set_role_claim()
            .withf(|id, role| id.as_ref() == "u2" && *role == Role::Government)
            .times(1)
            .return_once(|_, _| Ok(()));

        let response = service(MockComplaintRepository::new(), profiles, claims)
            .set_user_role(&admin_ctx(), role_request("u2", "government"))
            .await
            .expect("assignment succeeds");
        assert_eq!(
            response,
            SetUserRoleResponse {
                success: true,
                target_uid: "u2".to_owned(),
                role: "government".to_owned(),
            }
        );
    }

    #[rstest]
    #[case::unknown_role("u2", "mayor")]
    #[case::empty_role("u2", "")]
    #[case::empty_target("", "citizen")]
    #[tokio::test]
    async fn set_role_rejects_invalid_arguments(#[case] target: &str, #[case] role: &str) {
        let mut profiles = MockUserProfileRepository::new();
        profiles.expect_find().times(0);

        let error = service(MockComplaintRepository::new(), profiles, MockIdentityClaims::new())
            .set_user_role(&admin_ctx(), role_request(target, role))
            .await
            .expect_err("invalid argument");
        assert_eq!(error.code(), ErrorCode::InvalidArgument);
    }

    #[rstest]
    #[case::citizen(Some(caller_profile(Some(Role::Citizen))))]
    #[case::no_profile(None)]
    #[tokio::test]
    async fn set_role_denies_non_government(#[case] found: Option<UserProfile>) {
        let mut claims = MockIdentityClaims::new();
        claims.expect_set_role_claim().times(0);

        let error = service(MockComplaintRepository::new(), profiles_for_caller(found), claims)
            .set_user_role(&admin_ctx(), role_request("u2", "citizen"))
            .await
            .expect_err("non-government denied");
        assert_eq!(error.code(), ErrorCode::PermissionDenied);
    }

    #[tokio::test]
    async fn missing_target_profile_is_not_found_after_claim_write() {
        let mut profiles = profiles_for_caller(Some(caller_profile(Some(Role::Government))));
        profiles
            .expect_set_role()
            .times(1)
            .return_once(|_, _| Err(UserProfileRepositoryError::not_found("u2")));
        let mut claims = MockIdentityClaims::new();
        claims
            .expect_set_role_claim()
            .times(1)
            .return_once(|_, _| Ok(()));

        let error = service(MockComplaintRepository::new(), profiles, claims)
            .set_user_role(&admin_ctx(), role_request("u2", "citizen"))
            .await
            .expect_err("missing profile surfaces");
        assert_eq!(error.code(), ErrorCode::NotFound);
    }
}
