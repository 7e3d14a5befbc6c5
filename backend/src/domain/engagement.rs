//! Citizen engagement records: upvotes and comments.
//!
//! Both are stored beneath their complaint and back a denormalised counter
//! on the complaint document:
//!
//! - `upvoteCount` equals the number of upvote records at all times. The
//!   counter moves in the same store transaction that creates or deletes the
//!   record.
//! - `commentCount` equals the number of comment records once the comment
//!   write and the counter increment have both landed; the window between
//!   them is accepted.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ComplaintId, UserId};

/// Result of toggling one user's upvote on one complaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpvoteToggle {
    /// No upvote existed; one was created and the counter incremented.
    Added,
    /// An upvote existed; it was deleted and the counter decremented.
    Removed,
}

impl UpvoteToggle {
    /// Whether the caller now holds an upvote on the complaint.
    pub fn upvoted(self) -> bool {
        matches!(self, Self::Added)
    }
}

/// Auto-generated identifier of a comment record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(Uuid);

impl CommentId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Author name recorded when the commenter has no usable display name.
pub const ANONYMOUS_AUTHOR: &str = "Anonymous";

/// Comment to append beneath a complaint.
///
/// `author_name` is a snapshot taken at creation time and is never kept in
/// sync with later profile edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    /// Parent complaint.
    #[serde(skip)]
    pub complaint_id: ComplaintId,
    /// Commenting user.
    pub author_id: UserId,
    /// Denormalised author display name.
    pub author_name: String,
    /// Comment body.
    pub text: String,
    /// Server creation time.
    pub created_at: DateTime<Utc>,
}
