//! Trigger events delivered by the hosting platform.
//!
//! Delivery is at-least-once: every handler consuming these events must
//! tolerate seeing the same event more than once.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::{ComplaintDocument, ComplaintId, UserId};

/// A complaint document was created by a client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintCreatedEvent {
    /// Key of the new document.
    pub complaint_id: ComplaintId,
    /// Document exactly as written.
    pub document: ComplaintDocument,
}

/// A complaint document was updated.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintUpdatedEvent {
    /// Key of the updated document.
    pub complaint_id: ComplaintId,
    /// Image before the write.
    pub before: ComplaintDocument,
    /// Image after the write.
    pub after: ComplaintDocument,
    /// Server commit time of the write.
    pub updated_at: DateTime<Utc>,
}

/// The identity provider is about to create a new identity.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityCreatedEvent {
    /// Key of the new identity.
    pub uid: UserId,
    /// Display name supplied by the sign-in method.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Email supplied by the sign-in method.
    #[serde(default)]
    pub email: Option<String>,
    /// Avatar supplied by the sign-in method.
    #[serde(default, rename = "photoURL")]
    pub photo_url: Option<String>,
}
