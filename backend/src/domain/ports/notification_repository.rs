//! Port for in-app notification storage (`users/{uid}/notifications`).

use async_trait::async_trait;

use crate::domain::{NewNotification, NotificationId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification repository adapters.
    pub enum NotificationRepositoryError {
        /// Store connection could not be established.
        Connection { message: String } =>
            "notification store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "notification store query failed: {message}",
    }
}

/// Durable notification history.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Store a notification under its recipient and return the generated id.
    async fn insert(
        &self,
        notification: &NewNotification,
    ) -> Result<NotificationId, NotificationRepositoryError>;
}
