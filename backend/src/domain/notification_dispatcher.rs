//! Notification dispatch: durable in-app record plus best-effort push.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    NotificationRepository, NotificationRepositoryError, Notifier, PushGateway,
    UserProfileRepository,
};
use crate::domain::{DispatchOutcome, Error, NewNotification, Notice, PushMessage, UserId};

/// Dispatcher implementing [`Notifier`].
///
/// The in-app write must succeed. Everything after it is best effort: a
/// failed token lookup or push delivery is logged and reported as
/// [`DispatchOutcome::PushFailed`], never as an error.
#[derive(Clone)]
pub struct NotificationDispatcher<N, U, P> {
    notifications: Arc<N>,
    profiles: Arc<U>,
    push: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<N, U, P> NotificationDispatcher<N, U, P> {
    /// Create a dispatcher.
    pub fn new(
        notifications: Arc<N>,
        profiles: Arc<U>,
        push: Arc<P>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            notifications,
            profiles,
            push,
            clock,
        }
    }
}

impl<N, U, P> NotificationDispatcher<N, U, P>
where
    N: NotificationRepository,
    U: UserProfileRepository,
    P: PushGateway,
{
    async fn try_push(&self, recipient: &UserId, notice: &Notice) -> DispatchOutcome {
        let profile = match self.profiles.find(recipient).await {
            Ok(profile) => profile,
            Err(error) => {
                warn!(uid = %recipient, %error, "push token lookup failed; skipping push");
                return DispatchOutcome::PushFailed;
            }
        };
        let Some(token) = profile.and_then(|profile| profile.push_token) else {
            info!(uid = %recipient, "no push token registered; in-app only");
            return DispatchOutcome::InAppOnly;
        };

        let message = PushMessage {
            token,
            title: notice.title.clone(),
            body: notice.body.clone(),
            data: notice.push_data(),
        };
        match self.push.send(&message).await {
            Ok(()) => {
                info!(uid = %recipient, "push notification sent");
                DispatchOutcome::Pushed
            }
            Err(error) => {
                warn!(uid = %recipient, %error, "push notification failed");
                DispatchOutcome::PushFailed
            }
        }
    }
}

#[async_trait]
impl<N, U, P> Notifier for NotificationDispatcher<N, U, P>
where
    N: NotificationRepository,
    U: UserProfileRepository,
    P: PushGateway,
{
    async fn notify(&self, recipient: &UserId, notice: &Notice) -> Result<DispatchOutcome, Error> {
        let record = NewNotification::unread(recipient.clone(), notice, self.clock.utc());
        let notification_id = self
            .notifications
            .insert(&record)
            .await
            .map_err(map_notification_error)?;
        info!(uid = %recipient, %notification_id, "in-app notification stored");

        Ok(self.try_push(recipient, notice).await)
    }
}

fn map_notification_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification store unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification store error: {message}"))
        }
    }
}
