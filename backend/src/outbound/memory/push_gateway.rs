//! Push gateway that records messages instead of delivering them.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::PushMessage;
use crate::domain::ports::{PushGateway, PushGatewayError};

/// Captures every accepted message; optionally rejects everything.
#[derive(Debug, Default)]
pub struct RecordingPushGateway {
    sent: Mutex<Vec<PushMessage>>,
    reject: bool,
}

impl RecordingPushGateway {
    /// Gateway that accepts every message.
    pub fn accepting() -> Self {
        Self::default()
    }

    /// Gateway that rejects every message, as with an expired token.
    pub fn rejecting() -> Self {
        Self {
            sent: Mutex::default(),
            reject: true,
        }
    }

    /// Messages accepted so far.
    pub async fn sent(&self) -> Vec<PushMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl PushGateway for RecordingPushGateway {
    async fn send(&self, message: &PushMessage) -> Result<(), PushGatewayError> {
        if self.reject {
            return Err(PushGatewayError::rejected("registration token is not valid"));
        }
        self.sent.lock().await.push(message.clone());
        Ok(())
    }
}
