//! Port for the `complaints` collection.
//!
//! Adapters must provide strong per-document consistency: a patch or append
//! is visible to every subsequent read of the same complaint.

use async_trait::async_trait;

use crate::domain::{ComplaintDefaults, ComplaintDocument, ComplaintId, StatusTransition};

use super::define_port_error;

define_port_error! {
    /// Errors raised by complaint repository adapters.
    pub enum ComplaintRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "complaint store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "complaint store query failed: {message}",
        /// The addressed complaint does not exist.
        NotFound { complaint_id: String } =>
            "complaint {complaint_id} not found",
    }
}

/// Outcome of a set-union append to `statusHistory`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryAppend {
    /// The transition was not present and has been appended.
    Appended,
    /// A value-identical transition was already present; nothing changed.
    AlreadyPresent,
}

/// Port for complaint document reads and writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    /// Delete a complaint. Deleting a missing complaint succeeds.
    async fn delete(&self, id: &ComplaintId) -> Result<(), ComplaintRepositoryError>;

    /// Patch the fields present in `defaults` with a single write.
    ///
    /// Fails with [`ComplaintRepositoryError::NotFound`] when the complaint
    /// no longer exists.
    async fn apply_defaults(
        &self,
        id: &ComplaintId,
        defaults: &ComplaintDefaults,
    ) -> Result<(), ComplaintRepositoryError>;

    /// Append `transition` to `statusHistory` unless an equal value is
    /// already present.
    async fn append_transition(
        &self,
        id: &ComplaintId,
        transition: &StatusTransition,
    ) -> Result<HistoryAppend, ComplaintRepositoryError>;

    /// Atomically add one to `commentCount`, treating an absent counter as
    /// zero.
    async fn increment_comment_count(&self, id: &ComplaintId)
    -> Result<(), ComplaintRepositoryError>;

    /// Scan every complaint in the collection.
    async fn list_all(&self) -> Result<Vec<ComplaintDocument>, ComplaintRepositoryError>;
}

/// Fixture implementation for tests that do not exercise complaint storage.
///
/// Accepts every write and reports an empty collection.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureComplaintRepository;

#[async_trait]
impl ComplaintRepository for FixtureComplaintRepository {
    async fn delete(&self, _id: &ComplaintId) -> Result<(), ComplaintRepositoryError> {
        Ok(())
    }

    async fn apply_defaults(
        &self,
        _id: &ComplaintId,
        _defaults: &ComplaintDefaults,
    ) -> Result<(), ComplaintRepositoryError> {
        Ok(())
    }

    async fn append_transition(
        &self,
        _id: &ComplaintId,
        _transition: &StatusTransition,
    ) -> Result<HistoryAppend, ComplaintRepositoryError> {
        Ok(HistoryAppend::Appended)
    }

    async fn increment_comment_count(
        &self,
        _id: &ComplaintId,
    ) -> Result<(), ComplaintRepositoryError> {
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ComplaintDocument>, ComplaintRepositoryError> {
        Ok(Vec::new())
    }
}
