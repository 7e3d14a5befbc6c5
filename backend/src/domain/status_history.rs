//! Status transition recorder.
//!
//! Runs on every complaint-updated trigger. When the status moved, a
//! [`StatusTransition`] is set-union appended to `statusHistory` and the
//! complaint's author is notified. The recorder's own append produces another
//! update with an unchanged status, which this handler ignores.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::complaint_intake::map_complaint_error;
use crate::domain::ports::{ComplaintRepository, HistoryAppend, Notifier};
use crate::domain::{
    ComplaintId, ComplaintStatus, ComplaintUpdatedEvent, DispatchOutcome, Error, Notice,
    StatusTransition, UserId,
};

/// Title of the notification sent to a complaint's author.
pub const STATUS_NOTICE_TITLE: &str = "Complaint Status Updated";

/// What the recorder did with an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The status did not change (or one side had no status).
    NoChange,
    /// A transition was appended or found already present.
    Recorded {
        /// The transition written.
        transition: StatusTransition,
        /// Whether an identical transition was already in the history.
        duplicate: bool,
        /// Result of notifying the author, `None` when nobody was notified.
        notification: Option<DispatchOutcome>,
    },
}

/// Trigger handler for complaint updates.
pub struct StatusHistoryService<C, N> {
    complaints: Arc<C>,
    notifier: Arc<N>,
}

impl<C, N> Clone for StatusHistoryService<C, N> {
    fn clone(&self) -> Self {
        Self {
            complaints: Arc::clone(&self.complaints),
            notifier: Arc::clone(&self.notifier),
        }
    }
}

impl<C, N> StatusHistoryService<C, N> {
    /// Create the recorder.
    pub fn new(complaints: Arc<C>, notifier: Arc<N>) -> Self {
        Self {
            complaints,
            notifier,
        }
    }
}

/// Derive the transition carried by an update, if any.
///
/// Only a change between two non-empty statuses is a transition. An update
/// whose before-image has no status is the intake hydration write.
pub fn detect_transition(event: &ComplaintUpdatedEvent) -> Option<StatusTransition> {
    let from = event.before.current_status()?;
    let to = event.after.current_status()?;
    (from != to).then(|| StatusTransition {
        from: from.clone(),
        to: to.clone(),
        changed_at: event.updated_at,
    })
}

/// Build the author-facing notice for a transition.
///
/// # Examples
/// ```
/// use civic_backend::domain::{ComplaintId, ComplaintStatus, status_notice};
///
/// let id = ComplaintId::new("c1").expect("valid id");
/// let notice = status_notice(
///     &id,
///     Some("Pothole"),
///     &ComplaintStatus::new("Pending"),
///     &ComplaintStatus::new("Resolved"),
/// );
/// assert_eq!(notice.body, "Your complaint \"Pothole\" changed from Pending to Resolved.");
/// ```
pub fn status_notice(
    complaint_id: &ComplaintId,
    title: Option<&str>,
    from: &ComplaintStatus,
    to: &ComplaintStatus,
) -> Notice {
    let title = title.unwrap_or_default();
    Notice::new(
        STATUS_NOTICE_TITLE,
        format!("Your complaint \"{title}\" changed from {from} to {to}."),
    )
    .with_extra("complaintId", complaint_id.as_ref())
    .with_extra("newStatus", to.as_str())
}

impl<C, N> StatusHistoryService<C, N>
where
    C: ComplaintRepository,
    N: Notifier,
{
    /// Handle one complaint-updated event.
    ///
    /// # Errors
    ///
    /// Append failures propagate so the platform can redeliver. Notification
    /// failures are logged and never undo or fail the append.
    pub async fn on_updated(
        &self,
        event: &ComplaintUpdatedEvent,
    ) -> Result<TransitionOutcome, Error> {
        let Some(transition) = detect_transition(event) else {
            debug!(complaint_id = %event.complaint_id, "status unchanged");
            return Ok(TransitionOutcome::NoChange);
        };

        let append = self
            .complaints
            .append_transition(&event.complaint_id, &transition)
            .await
            .map_err(map_complaint_error)?;
        let duplicate = append == HistoryAppend::AlreadyPresent;
        info!(
            complaint_id = %event.complaint_id,
            from = %transition.from,
            to = %transition.to,
            duplicate,
            "status transition recorded"
        );

        // Redelivery notifies again; delivery is at-least-once.
        let notification = self.notify_author(event, &transition).await;
        Ok(TransitionOutcome::Recorded {
            transition,
            duplicate,
            notification,
        })
    }

    async fn notify_author(
        &self,
        event: &ComplaintUpdatedEvent,
        transition: &StatusTransition,
    ) -> Option<DispatchOutcome> {
        let author = event
            .after
            .author_id
            .as_deref()
            .and_then(|raw| UserId::new(raw).ok());
        let Some(author) = author else {
            debug!(complaint_id = %event.complaint_id, "complaint has no author to notify");
            return None;
        };

        let notice = status_notice(
            &event.complaint_id,
            event.after.title.as_deref(),
            &transition.from,
            &transition.to,
        );
        match self.notifier.notify(&author, &notice).await {
            Ok(outcome) => Some(outcome),
            Err(error) => {
                warn!(
                    complaint_id = %event.complaint_id,
                    uid = %author,
                    %error,
                    "status notification failed"
                );
                None
            }
        }
    }
}
