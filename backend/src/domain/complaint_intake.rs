//! Complaint intake: validate new complaints and hydrate server defaults.
//!
//! Runs on the complaint-created trigger. Incomplete complaints are deleted
//! (fail closed). Complete ones receive defaults for whatever the client
//! omitted, in at most one patch write. Redelivery of the same event is safe:
//! the second run either deletes an already-deleted document or patches
//! nothing new.

use std::sync::Arc;

use mockable::Clock;
use tracing::{debug, info, warn};

use crate::domain::ports::{ComplaintRepository, ComplaintRepositoryError};
use crate::domain::{ComplaintCreatedEvent, ComplaintDefaults, Error, RequiredField};

/// What intake did with a created complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntakeOutcome {
    /// Required fields were missing; the document was deleted.
    Rejected {
        /// Fields that were absent or empty.
        missing: Vec<RequiredField>,
    },
    /// Defaults were patched onto the document.
    Hydrated(ComplaintDefaults),
    /// The document already carried every defaulted field.
    Unchanged,
}

/// Trigger handler for complaint creation.
#[derive(Clone)]
pub struct ComplaintIntakeService<C> {
    complaints: Arc<C>,
    clock: Arc<dyn Clock>,
}

impl<C> ComplaintIntakeService<C> {
    /// Create the service.
    pub fn new(complaints: Arc<C>, clock: Arc<dyn Clock>) -> Self {
        Self { complaints, clock }
    }
}

impl<C> ComplaintIntakeService<C>
where
    C: ComplaintRepository,
{
    /// Handle one complaint-created event.
    ///
    /// # Errors
    ///
    /// Store failures propagate so the hosting platform can redeliver the
    /// event. A patch against a complaint deleted in the meantime is not an
    /// error.
    pub async fn on_created(&self, event: &ComplaintCreatedEvent) -> Result<IntakeOutcome, Error> {
        let id = &event.complaint_id;
        let missing = event.document.missing_required_fields();
        if !missing.is_empty() {
            let names: Vec<_> = missing.iter().map(|field| field.as_str()).collect();
            warn!(complaint_id = %id, missing = ?names, "rejecting incomplete complaint");
            self.complaints
                .delete(id)
                .await
                .map_err(map_complaint_error)?;
            return Ok(IntakeOutcome::Rejected { missing });
        }

        let defaults = event.document.missing_defaults(self.clock.utc());
        if defaults.is_empty() {
            debug!(complaint_id = %id, "complaint already hydrated");
            return Ok(IntakeOutcome::Unchanged);
        }

        match self.complaints.apply_defaults(id, &defaults).await {
            Ok(()) => {
                info!(complaint_id = %id, ?defaults, "complaint defaults applied");
                Ok(IntakeOutcome::Hydrated(defaults))
            }
            Err(ComplaintRepositoryError::NotFound { .. }) => {
                debug!(complaint_id = %id, "complaint vanished before hydration");
                Ok(IntakeOutcome::Unchanged)
            }
            Err(error) => Err(map_complaint_error(error)),
        }
    }
}

pub(crate) fn map_complaint_error(error: ComplaintRepositoryError) -> Error {
    match error {
        ComplaintRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("complaint store unavailable: {message}"))
        }
        ComplaintRepositoryError::Query { message } => {
            Error::internal(format!("complaint store error: {message}"))
        }
        ComplaintRepositoryError::NotFound { complaint_id } => {
            Error::not_found(format!("complaint {complaint_id} not found"))
        }
    }
}
