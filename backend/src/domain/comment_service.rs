//! Comment service implementing [`CommentCommand`].
//!
//! The comment insert and the `commentCount` increment are two separate
//! writes. A failure between them leaves the counter one short until a
//! reconciliation pass; this window is accepted for comments.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::auth::map_profile_error;
use crate::domain::complaint_intake::map_complaint_error;
use crate::domain::ports::{
    AddCommentRequest, AddCommentResponse, CommentCommand, CommentRepository,
    CommentRepositoryError, ComplaintRepository, UserProfileRepository,
};
use crate::domain::vote_service::parse_complaint_id;
use crate::domain::{ANONYMOUS_AUTHOR, CallContext, Error, NewComment, UserId};

/// Comment engine.
pub struct CommentService<M, C, U> {
    comments: Arc<M>,
    complaints: Arc<C>,
    profiles: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<M, C, U> Clone for CommentService<M, C, U> {
    fn clone(&self) -> Self {
        Self {
            comments: Arc::clone(&self.comments),
            complaints: Arc::clone(&self.complaints),
            profiles: Arc::clone(&self.profiles),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<M, C, U> CommentService<M, C, U> {
    /// Create the service.
    pub fn new(
        comments: Arc<M>,
        complaints: Arc<C>,
        profiles: Arc<U>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            comments,
            complaints,
            profiles,
            clock,
        }
    }
}

fn map_comment_error(error: CommentRepositoryError) -> Error {
    match error {
        CommentRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("comment store unavailable: {message}"))
        }
        CommentRepositoryError::Query { message } => {
            Error::internal(format!("comment store error: {message}"))
        }
        CommentRepositoryError::ComplaintNotFound { complaint_id } => {
            Error::not_found(format!("complaint {complaint_id} not found"))
        }
    }
}

impl<M, C, U> CommentService<M, C, U>
where
    U: UserProfileRepository,
{
    async fn author_name(&self, uid: &UserId) -> Result<String, Error> {
        let profile = self.profiles.find(uid).await.map_err(map_profile_error)?;
        Ok(profile
            .as_ref()
            .and_then(|profile| profile.non_blank_display_name())
            .unwrap_or(ANONYMOUS_AUTHOR)
            .to_owned())
    }
}

#[async_trait]
impl<M, C, U> CommentCommand for CommentService<M, C, U>
where
    M: CommentRepository,
    C: ComplaintRepository,
    U: UserProfileRepository,
{
    async fn add_comment(
        &self,
        ctx: &CallContext,
        request: AddCommentRequest,
    ) -> Result<AddCommentResponse, Error> {
        let caller = ctx.require_caller()?;
        let complaint_id = parse_complaint_id(&request.complaint_id)?;
        if request.text.trim().is_empty() {
            return Err(Error::invalid_argument("text is required"));
        }

        let author_name = self.author_name(caller).await?;
        let comment = NewComment {
            complaint_id: complaint_id.clone(),
            author_id: caller.clone(),
            author_name: author_name.clone(),
            text: request.text,
            created_at: self.clock.utc(),
        };
        let comment_id = self
            .comments
            .insert(&comment)
            .await
            .map_err(map_comment_error)?;

        if let Err(error) = self.complaints.increment_comment_count(&complaint_id).await {
            warn!(
                complaint_id = %complaint_id,
                %comment_id,
                %error,
                "comment stored but counter increment failed"
            );
            return Err(map_complaint_error(error));
        }

        info!(complaint_id = %complaint_id, uid = %caller, %comment_id, "comment added");
        Ok(AddCommentResponse {
            comment_id,
            author_name,
        })
    }
}
