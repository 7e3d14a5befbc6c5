//! Port for the external push delivery gateway.
//!
//! Push delivery is best effort. Callers log these errors and carry on.

use async_trait::async_trait;

use crate::domain::PushMessage;

use super::define_port_error;

define_port_error! {
    /// Delivery failures reported by push gateway adapters.
    pub enum PushGatewayError {
        /// The gateway could not be reached.
        Transport { message: String } =>
            "push gateway transport failed: {message}",
        /// The gateway did not answer in time.
        Timeout { message: String } =>
            "push gateway timed out: {message}",
        /// The gateway refused the message (bad or expired token, quota).
        Rejected { message: String } =>
            "push gateway rejected message: {message}",
    }
}

/// Outbound push delivery.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Deliver one message to one device.
    async fn send(&self, message: &PushMessage) -> Result<(), PushGatewayError>;
}

/// Gateway used when no push transport is configured.
///
/// Every send fails with [`PushGatewayError::Transport`], which the
/// dispatcher records as a swallowed delivery failure.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledPushGateway;

#[async_trait]
impl PushGateway for DisabledPushGateway {
    async fn send(&self, _message: &PushMessage) -> Result<(), PushGatewayError> {
        Err(PushGatewayError::transport("push delivery is not configured"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::PushToken;

    #[tokio::test]
    async fn disabled_gateway_reports_transport_failure() {
        let message = PushMessage {
            token: PushToken::new("device-1").expect("non-blank token"),
            title: "Complaint Status Updated".to_owned(),
            body: "body".to_owned(),
            data: BTreeMap::new(),
        };
        let error = DisabledPushGateway
            .send(&message)
            .await
            .expect_err("push is disabled");
        assert!(matches!(error, PushGatewayError::Transport { .. }));
    }
}
