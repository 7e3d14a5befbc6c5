//! Port for comment records (`complaints/{id}/comments`).

use async_trait::async_trait;

use crate::domain::{CommentId, NewComment};

use super::define_port_error;

define_port_error! {
    /// Errors raised by comment repository adapters.
    pub enum CommentRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "comment store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "comment store query failed: {message}",
        /// The parent complaint does not exist.
        ComplaintNotFound { complaint_id: String } =>
            "complaint {complaint_id} not found",
    }
}

/// Append-only comment storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// Store a comment under its complaint and return the generated id.
    async fn insert(&self, comment: &NewComment) -> Result<CommentId, CommentRepositoryError>;
}
