//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`UpvoteLedger`], [`PushGateway`],
//! [`IdentityClaims`]) are implemented by outbound adapters. Driving ports
//! ([`VoteCommand`], [`CommentCommand`], [`DashboardQuery`],
//! [`RoleAssignmentCommand`]) are implemented by domain services and called
//! by whatever transport hosts the core.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_command;
mod comment_repository;
mod complaint_repository;
mod engagement_command;
mod identity_claims;
mod notification_repository;
mod notifier;
mod push_gateway;
mod upvote_ledger;
mod user_profile_repository;

#[cfg(test)]
pub use admin_command::{MockDashboardQuery, MockRoleAssignmentCommand};
pub use admin_command::{
    DashboardQuery, RoleAssignmentCommand, SetUserRoleRequest, SetUserRoleResponse,
};
#[cfg(test)]
pub use comment_repository::MockCommentRepository;
pub use comment_repository::{CommentRepository, CommentRepositoryError};
#[cfg(test)]
pub use complaint_repository::MockComplaintRepository;
pub use complaint_repository::{
    ComplaintRepository, ComplaintRepositoryError, FixtureComplaintRepository, HistoryAppend,
};
#[cfg(test)]
pub use engagement_command::{MockCommentCommand, MockVoteCommand};
pub use engagement_command::{
    AddCommentRequest, AddCommentResponse, CommentCommand, FixtureEngagementCommand,
    ToggleVoteRequest, ToggleVoteResponse, VoteCommand,
};
#[cfg(test)]
pub use identity_claims::MockIdentityClaims;
pub use identity_claims::{DisabledIdentityClaims, IdentityClaims, IdentityClaimsError};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationRepository, NotificationRepositoryError};
#[cfg(test)]
pub use notifier::MockNotifier;
pub use notifier::Notifier;
#[cfg(test)]
pub use push_gateway::MockPushGateway;
pub use push_gateway::{DisabledPushGateway, PushGateway, PushGatewayError};
#[cfg(test)]
pub use upvote_ledger::MockUpvoteLedger;
pub use upvote_ledger::{UpvoteLedger, UpvoteLedgerError};
#[cfg(test)]
pub use user_profile_repository::MockUserProfileRepository;
pub use user_profile_repository::{
    FixtureUserProfileRepository, UserProfileRepository, UserProfileRepositoryError,
};
