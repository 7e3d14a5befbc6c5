//! Port for per-user upvote records (`complaints/{id}/upvotes/{uid}`).
//!
//! The toggle is the only operation in the core that needs a multi-document
//! transaction: the upvote record and the complaint's `upvoteCount` change
//! together or not at all.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{ComplaintId, UpvoteToggle, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by upvote ledger adapters.
    pub enum UpvoteLedgerError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "upvote store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "upvote store query failed: {message}",
        /// The complaint whose counter must move does not exist.
        ComplaintNotFound { complaint_id: String } =>
            "complaint {complaint_id} not found",
        /// The transaction kept aborting on conflicts and gave up.
        Contention { attempts: u32 } =>
            "upvote transaction aborted after {attempts} attempts",
    }
}

/// Transactional port for exactly-once-per-user upvotes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpvoteLedger: Send + Sync {
    /// Toggle `user_id`'s upvote on `complaint_id` in one atomic unit.
    ///
    /// Within a single transaction the adapter reads the upvote record; if it
    /// exists it is deleted and `upvoteCount` decremented, otherwise it is
    /// created with `at` as its creation time and `upvoteCount` incremented
    /// (an absent counter counts as zero). Concurrent toggles must serialise:
    /// adapters retry conflict aborts internally and only surface
    /// [`UpvoteLedgerError::Contention`] once their retry budget is spent.
    async fn toggle(
        &self,
        complaint_id: &ComplaintId,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<UpvoteToggle, UpvoteLedgerError>;
}
