//! Domain primitives, services and ports.
//!
//! Purpose: hold the complaint lifecycle and engagement rules independent of
//! any store or transport. Services depend only on the traits in [`ports`];
//! adapters under `crate::outbound` implement them.
//!
//! Public surface:
//! - Error (alias to `error::Error`): rejected-result payload with a stable
//!   code.
//! - Documents: `ComplaintDocument`, `UserProfile`, `NewComment`,
//!   `NewNotification` and their identifiers.
//! - Trigger handlers: `ComplaintIntakeService`, `StatusHistoryService`,
//!   `IdentityBootstrapService`.
//! - Direct operations: `VoteService`, `CommentService`, `AdminService`.

pub mod admin_service;
pub mod auth;
pub mod comment_service;
pub mod complaint;
pub mod complaint_intake;
pub mod dashboard;
pub mod engagement;
pub mod error;
pub mod events;
pub mod identity_bootstrap;
pub mod notification;
pub mod notification_dispatcher;
pub mod ports;
pub mod status_history;
pub mod user;
pub mod vote_service;

pub use self::admin_service::AdminService;
pub use self::auth::{CallContext, RoleGuard};
pub use self::comment_service::CommentService;
pub use self::complaint::{
    ComplaintDefaults, ComplaintDocument, ComplaintId, ComplaintStatus, ComplaintValidationError,
    RequiredField, StatusTransition,
};
pub use self::complaint_intake::{ComplaintIntakeService, IntakeOutcome};
pub use self::dashboard::{DashboardStats, UNCATEGORIZED};
pub use self::engagement::{ANONYMOUS_AUTHOR, CommentId, NewComment, UpvoteToggle};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::events::{ComplaintCreatedEvent, ComplaintUpdatedEvent, IdentityCreatedEvent};
pub use self::identity_bootstrap::{
    BootstrapResponse, IdentityBootstrapService, IdentityModifications, ProfileWriteHandle,
    default_profile,
};
pub use self::notification::{
    DispatchOutcome, NewNotification, Notice, NotificationId, PushMessage,
};
pub use self::notification_dispatcher::NotificationDispatcher;
pub use self::status_history::{
    STATUS_NOTICE_TITLE, StatusHistoryService, TransitionOutcome, detect_transition,
    status_notice,
};
pub use self::user::{ParseRoleError, PushToken, Role, UserId, UserProfile, UserValidationError};
pub use self::vote_service::VoteService;

/// Convenient result alias for core operations.
///
/// # Examples
/// ```
/// use civic_backend::domain::{CoreResult, Error};
///
/// fn handler() -> CoreResult<()> {
///     Err(Error::permission_denied("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type CoreResult<T> = Result<T, Error>;
