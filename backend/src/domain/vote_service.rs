//! Upvote toggling service implementing [`VoteCommand`].

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    ToggleVoteRequest, ToggleVoteResponse, UpvoteLedger, UpvoteLedgerError, VoteCommand,
};
use crate::domain::{CallContext, ComplaintId, Error};

/// Exactly-once-per-user upvote toggling.
///
/// The read-branch-write runs inside [`UpvoteLedger::toggle`] as one store
/// transaction; this service only authenticates, validates and maps errors.
#[derive(Clone)]
pub struct VoteService<L> {
    ledger: Arc<L>,
    clock: Arc<dyn Clock>,
}

impl<L> VoteService<L> {
    /// Create the service.
    pub fn new(ledger: Arc<L>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger, clock }
    }
}

pub(crate) fn parse_complaint_id(raw: &str) -> Result<ComplaintId, Error> {
    if raw.trim().is_empty() {
        return Err(Error::invalid_argument("complaintId is required"));
    }
    ComplaintId::new(raw)
        .map_err(|error| Error::invalid_argument(format!("invalid complaintId: {error}")))
}

fn map_ledger_error(error: UpvoteLedgerError) -> Error {
    match error {
        UpvoteLedgerError::Connection { message } => {
            Error::service_unavailable(format!("upvote store unavailable: {message}"))
        }
        UpvoteLedgerError::Query { message } => {
            Error::internal(format!("upvote store error: {message}"))
        }
        UpvoteLedgerError::ComplaintNotFound { complaint_id } => {
            Error::not_found(format!("complaint {complaint_id} not found"))
        }
        UpvoteLedgerError::Contention { attempts } => Error::service_unavailable(format!(
            "upvote transaction contended after {attempts} attempts; retry later"
        )),
    }
}

#[async_trait]
impl<L> VoteCommand for VoteService<L>
where
    L: UpvoteLedger,
{
    async fn toggle_vote(
        &self,
        ctx: &CallContext,
        request: ToggleVoteRequest,
    ) -> Result<ToggleVoteResponse, Error> {
        let caller = ctx.require_caller()?;
        let complaint_id = parse_complaint_id(&request.complaint_id)?;

        let toggle = self
            .ledger
            .toggle(&complaint_id, caller, self.clock.utc())
            .await
            .map_err(map_ledger_error)?;
        info!(
            complaint_id = %complaint_id,
            uid = %caller,
            upvoted = toggle.upvoted(),
            "vote toggled"
        );
        Ok(ToggleVoteResponse {
            upvoted: toggle.upvoted(),
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::MockUpvoteLedger;
    use crate::domain::{ErrorCode, UpvoteToggle};
    use crate::test_support::{fixture_clock, fixture_timestamp, uid};
    use rstest::rstest;

    fn request(id: &str) -> ToggleVoteRequest {
        ToggleVoteRequest {
            complaint_id: id.to_owned(),
        }
    }

    fn service(ledger: MockUpvoteLedger) -> VoteService<MockUpvoteLedger> {
        VoteService::new(Arc::new(ledger), fixture_clock())
    }

    #[tokio::test]
    async fn anonymous_callers_are_rejected() {
        let mut ledger = MockUpvoteLedger::new();
        ledger.expect_toggle().times(0);

        let error = service(ledger)
            .toggle_vote(&CallContext::anonymous(), request("c1"))
            .await
            .expect_err("anonymous rejected");
        assert_eq!(error.code(), ErrorCode::Unauthenticated);
    }

    #[rstest]
    #[case::empty("")]
    #[case::blank("   ")]
    #[case::padded(" c1")]
    #[tokio::test]
    async fn malformed_ids_are_invalid(#[case] raw: &str) {
        let mut ledger = MockUpvoteLedger::new();
        ledger.expect_toggle().times(0);

        let error = service(ledger)
            .toggle_vote(&CallContext::authenticated(uid("u1")), request(raw))
            .await
            .expect_err("invalid id rejected");
        assert_eq!(error.code(), ErrorCode::InvalidArgument);
    }

    #[rstest]
    #[case(UpvoteToggle::Added, true)]
    #[case(UpvoteToggle::Removed, false)]
    #[tokio::test]
    async fn reports_toggle_direction(#[case] toggle: UpvoteToggle, #[case] upvoted: bool) {
        let mut ledger = MockUpvoteLedger::new();
        ledger
            .expect_toggle()
            .withf(|complaint, user, at| {
                complaint.as_ref() == "c1" && user.as_ref() == "u1" && *at == fixture_timestamp()
            })
            .times(1)
            .return_once(move |_, _, _| Ok(toggle));

        let response = service(ledger)
            .toggle_vote(&CallContext::authenticated(uid("u1")), request("c1"))
            .await
            .expect("toggle succeeds");
        assert_eq!(response.upvoted, upvoted);
    }

    #[rstest]
    #[case(UpvoteLedgerError::complaint_not_found("c1"), ErrorCode::NotFound)]
    #[case(UpvoteLedgerError::contention(5_u32), ErrorCode::ServiceUnavailable)]
    #[case(UpvoteLedgerError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(UpvoteLedgerError::query("bad sql"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn maps_ledger_errors(#[case] failure: UpvoteLedgerError, #[case] code: ErrorCode) {
        let mut ledger = MockUpvoteLedger::new();
        ledger
            .expect_toggle()
            .times(1)
            .return_once(move |_, _, _| Err(failure));

        let error = service(ledger)
            .toggle_vote(&CallContext::authenticated(uid("u1")), request("c1"))
            .await
            .expect_err("ledger failure surfaces");
        assert_eq!(error.code(), code);
    }
}
