//! In-app notification records and push messages.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{PushToken, UserId};

/// Identifier of a stored notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
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

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Message handed to the dispatcher.
///
/// # Examples
/// ```
/// use civic_backend::domain::Notice;
///
/// let notice = Notice::new("Hello", "World").with_extra("complaintId", "c1");
/// assert_eq!(notice.extra["complaintId"], "c1");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    /// Short headline.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Structured payload merged into the stored record and sent as push data.
    pub extra: Map<String, Value>,
}

impl Notice {
    /// Create a notice without extra payload.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            extra: Map::new(),
        }
    }

    /// Add one payload entry.
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Flatten the payload into the string map push gateways accept.
    pub fn push_data(&self) -> BTreeMap<String, String> {
        self.extra
            .iter()
            .map(|(key, value)| {
                let rendered = match value {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                };
                (key.clone(), rendered)
            })
            .collect()
    }
}

/// Notification record persisted under `users/{uid}/notifications`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    /// Target user.
    #[serde(skip)]
    pub recipient: UserId,
    /// Short headline.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Read flag; always `false` on creation.
    pub read: bool,
    /// Merged structured payload.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    /// Server creation time.
    pub created_at: DateTime<Utc>,
}

impl NewNotification {
    /// Build an unread record for `recipient` from a notice.
    pub fn unread(recipient: UserId, notice: &Notice, created_at: DateTime<Utc>) -> Self {
        Self {
            recipient,
            title: notice.title.clone(),
            body: notice.body.clone(),
            read: false,
            extra: notice.extra.clone(),
            created_at,
        }
    }
}

/// Message submitted to the push delivery gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PushMessage {
    /// Device token of the recipient.
    pub token: PushToken,
    /// Headline shown by the device.
    pub title: String,
    /// Body shown by the device.
    pub body: String,
    /// String payload delivered to the client application.
    pub data: BTreeMap<String, String>,
}

/// How a dispatch completed. Every variant is a success for the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Stored in-app; the recipient has no push token.
    InAppOnly,
    /// Stored in-app and delivered through the push gateway.
    Pushed,
    /// Stored in-app; push delivery was attempted and failed.
    PushFailed,
}
