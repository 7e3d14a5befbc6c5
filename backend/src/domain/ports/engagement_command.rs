//! Driving ports for citizen engagement: upvote toggling and commenting.
//!
//! Inbound adapters pass raw request payloads; the services own validation so
//! every transport rejects the same inputs with the same error codes.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{ANONYMOUS_AUTHOR, CallContext, CommentId, Error};

/// Request to toggle the caller's upvote on a complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleVoteRequest {
    /// Target complaint key; must be non-empty.
    pub complaint_id: String,
}

/// Result of a vote toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleVoteResponse {
    /// Whether the caller holds an upvote after the toggle.
    pub upvoted: bool,
}

/// Driving port for `toggleVote`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VoteCommand: Send + Sync {
    /// Toggle the caller's upvote.
    ///
    /// # Errors
    ///
    /// - `unauthenticated` when the context has no caller.
    /// - `invalid_argument` when the complaint id is empty or malformed.
    /// - `not_found` when the complaint does not exist.
    async fn toggle_vote(
        &self,
        ctx: &CallContext,
        request: ToggleVoteRequest,
    ) -> Result<ToggleVoteResponse, Error>;
}

/// Request to comment on a complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentRequest {
    /// Target complaint key; must be non-empty.
    pub complaint_id: String,
    /// Comment body; must be non-empty.
    pub text: String,
}

/// Result of adding a comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCommentResponse {
    /// Generated comment key.
    pub comment_id: CommentId,
    /// Author name snapshot stored on the comment.
    pub author_name: String,
}

/// Driving port for `addComment`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentCommand: Send + Sync {
    /// Append a comment as the caller.
    ///
    /// # Errors
    ///
    /// - `unauthenticated` when the context has no caller.
    /// - `invalid_argument` when the complaint id or text is empty.
    /// - `not_found` when the complaint does not exist.
    async fn add_comment(
        &self,
        ctx: &CallContext,
        request: AddCommentRequest,
    ) -> Result<AddCommentResponse, Error>;
}

/// Fixture implementation for adapter tests.
///
/// Authenticates like the real services but stores nothing: every toggle
/// reports an added upvote and every comment is attributed to
/// `Anonymous`.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEngagementCommand;

#[async_trait]
impl VoteCommand for FixtureEngagementCommand {
    async fn toggle_vote(
        &self,
        ctx: &CallContext,
        _request: ToggleVoteRequest,
    ) -> Result<ToggleVoteResponse, Error> {
        ctx.require_caller()?;
        Ok(ToggleVoteResponse { upvoted: true })
    }
}

#[async_trait]
impl CommentCommand for FixtureEngagementCommand {
    async fn add_comment(
        &self,
        ctx: &CallContext,
        _request: AddCommentRequest,
    ) -> Result<AddCommentResponse, Error> {
        ctx.require_caller()?;
        Ok(AddCommentResponse {
            comment_id: CommentId::random(),
            author_name: ANONYMOUS_AUTHOR.to_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{ErrorCode, UserId};
    use serde_json::json;

    #[tokio::test]
    async fn fixture_rejects_anonymous_toggle() {
        let error = FixtureEngagementCommand
            .toggle_vote(
                &CallContext::anonymous(),
                ToggleVoteRequest {
                    complaint_id: "c1".to_owned(),
                },
            )
            .await
            .expect_err("anonymous rejected");
        assert_eq!(error.code(), ErrorCode::Unauthenticated);
    }

    #[tokio::test]
    async fn fixture_comments_anonymously() {
        let ctx = CallContext::authenticated(UserId::new("u1").expect("valid uid"));
        let response = FixtureEngagementCommand
            .add_comment(
                &ctx,
                AddCommentRequest {
                    complaint_id: "c1".to_owned(),
                    text: "Same here".to_owned(),
                },
            )
            .await
            .expect("fixture succeeds");
        assert_eq!(response.author_name, ANONYMOUS_AUTHOR);
    }

    #[test]
    fn requests_use_camel_case_wire_names() {
        let request: AddCommentRequest =
            serde_json::from_value(json!({ "complaintId": "c1", "text": "hi" }))
                .expect("deserialise");
        assert_eq!(request.complaint_id, "c1");
    }
}
