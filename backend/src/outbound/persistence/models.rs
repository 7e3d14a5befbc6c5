//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions to and from domain documents
//! live next to the rows they convert.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{
    ComplaintDefaults, ComplaintDocument, ComplaintStatus, NewComment, NewNotification, PushToken,
    Role, StatusTransition, UserId, UserProfile,
};

use super::schema::{complaint_comments, complaint_upvotes, complaints, notifications, users};

// ---------------------------------------------------------------------------
// Complaints
// ---------------------------------------------------------------------------

/// Row struct for reading from the complaints table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = complaints)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ComplaintRow {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub author_id: Option<String>,
    pub status: Option<String>,
    pub upvote_count: Option<i64>,
    pub comment_count: Option<i64>,
    pub status_history: serde_json::Value,
    pub created_at: Option<DateTime<Utc>>,
}

fn counter_from_db(value: Option<i64>) -> Option<u64> {
    value.map(|count| u64::try_from(count).unwrap_or(0))
}

fn counter_to_db(value: Option<u64>) -> Option<i64> {
    value.map(|count| i64::try_from(count).unwrap_or(i64::MAX))
}

impl ComplaintRow {
    /// Convert to the domain document.
    ///
    /// A history column that does not decode is logged and read as empty
    /// rather than hiding the complaint from scans.
    pub fn into_document(self) -> ComplaintDocument {
        let status_history: Vec<StatusTransition> =
            match serde_json::from_value(self.status_history) {
                Ok(history) => history,
                Err(error) => {
                    warn!(complaint_id = %self.id, %error, "undecodable status history");
                    Vec::new()
                }
            };
        ComplaintDocument {
            title: self.title,
            description: self.description,
            category: self.category,
            author_id: self.author_id,
            status: self.status.map(ComplaintStatus::new),
            upvote_count: counter_from_db(self.upvote_count),
            comment_count: counter_from_db(self.comment_count),
            status_history,
            created_at: self.created_at,
        }
    }
}

/// Changeset for hydration defaults. `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = complaints)]
pub(crate) struct ComplaintDefaultsChangeset<'a> {
    pub status: Option<&'a str>,
    pub upvote_count: Option<i64>,
    pub comment_count: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl<'a> From<&'a ComplaintDefaults> for ComplaintDefaultsChangeset<'a> {
    fn from(defaults: &'a ComplaintDefaults) -> Self {
        Self {
            status: defaults.status.as_ref().map(|status| status.as_str()),
            upvote_count: counter_to_db(defaults.upvote_count),
            comment_count: counter_to_db(defaults.comment_count),
            created_at: defaults.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Engagement
// ---------------------------------------------------------------------------

/// Insertable struct for upvote records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = complaint_upvotes)]
pub(crate) struct NewUpvoteRow<'a> {
    pub complaint_id: &'a str,
    pub user_id: &'a str,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for comment records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = complaint_comments)]
pub(crate) struct NewCommentRow<'a> {
    pub id: Uuid,
    pub complaint_id: &'a str,
    pub author_id: &'a str,
    pub author_name: &'a str,
    pub text: &'a str,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewCommentRow<'a> {
    pub fn new(id: Uuid, comment: &'a NewComment) -> Self {
        Self {
            id,
            complaint_id: comment.complaint_id.as_ref(),
            author_id: comment.author_id.as_ref(),
            author_name: &comment.author_name,
            text: &comment.text,
            created_at: comment.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub uid: String,
    pub display_name: String,
    pub email: String,
    pub photo_url: String,
    pub role: Option<String>,
    pub push_token: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl UserRow {
    /// Convert to the domain profile. Unknown roles read as no role.
    pub fn into_profile(self) -> Result<UserProfile, String> {
        let uid = UserId::new(self.uid.as_str())
            .map_err(|error| format!("stored uid '{}' is invalid: {error}", self.uid))?;
        let role = self.role.as_deref().and_then(|raw| match raw.parse::<Role>() {
            Ok(role) => Some(role),
            Err(error) => {
                warn!(uid = %uid, %error, "ignoring unrecognised stored role");
                None
            }
        });
        Ok(UserProfile {
            uid,
            display_name: self.display_name,
            email: self.email,
            photo_url: self.photo_url,
            role,
            push_token: self.push_token.and_then(PushToken::new),
            created_at: self.created_at,
        })
    }
}

/// Insertable and changeset struct for full profile writes.
#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserWriteRow<'a> {
    pub uid: &'a str,
    pub display_name: &'a str,
    pub email: &'a str,
    pub photo_url: &'a str,
    pub role: Option<&'a str>,
    pub push_token: Option<&'a str>,
    pub created_at: Option<DateTime<Utc>>,
}

impl<'a> From<&'a UserProfile> for UserWriteRow<'a> {
    fn from(profile: &'a UserProfile) -> Self {
        Self {
            uid: profile.uid.as_ref(),
            display_name: &profile.display_name,
            email: &profile.email,
            photo_url: &profile.photo_url,
            role: profile.role.map(Role::as_str),
            push_token: profile.push_token.as_ref().map(|token| token.as_ref()),
            created_at: profile.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

/// Insertable struct for notification records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = notifications)]
pub(crate) struct NewNotificationRow<'a> {
    pub id: Uuid,
    pub recipient: &'a str,
    pub title: &'a str,
    pub body: &'a str,
    pub read: bool,
    pub extra: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

impl<'a> NewNotificationRow<'a> {
    pub fn new(id: Uuid, notification: &'a NewNotification) -> Self {
        Self {
            id,
            recipient: notification.recipient.as_ref(),
            title: &notification.title,
            body: &notification.body,
            read: notification.read,
            extra: serde_json::Value::Object(notification.extra.clone()),
            created_at: notification.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn row(history: serde_json::Value) -> ComplaintRow {
        ComplaintRow {
            id: "c1".to_owned(),
            title: Some("Pothole".to_owned()),
            description: None,
            category: None,
            author_id: Some("u1".to_owned()),
            status: Some("Pending".to_owned()),
            upvote_count: Some(-2),
            comment_count: None,
            status_history: history,
            created_at: None,
        }
    }

    #[rstest]
    fn complaint_row_decodes_history_and_clamps_counters() {
        let document = row(json!([
            { "from": "Pending", "to": "Resolved", "changedAt": "2026-03-14T08:00:00Z" }
        ]))
        .into_document();

        assert_eq!(document.status, Some(ComplaintStatus::pending()));
        assert_eq!(document.upvote_count, Some(0));
        assert_eq!(document.comment_count, None);
        assert_eq!(document.status_history.len(), 1);
    }

    #[rstest]
    fn malformed_history_reads_as_empty() {
        let document = row(json!({ "not": "an array" })).into_document();
        assert!(document.status_history.is_empty());
    }

    #[rstest]
    #[case(Some("government"), Some(Role::Government))]
    #[case(Some("mayor"), None)]
    #[case(None, None)]
    fn user_row_parses_roles(#[case] stored: Option<&str>, #[case] expected: Option<Role>) {
        let profile = UserRow {
            uid: "u1".to_owned(),
            display_name: "Ada".to_owned(),
            email: String::new(),
            photo_url: String::new(),
            role: stored.map(str::to_owned),
            push_token: Some("  ".to_owned()),
            created_at: None,
        }
        .into_profile()
        .expect("valid row");

        assert_eq!(profile.role, expected);
        assert!(profile.push_token.is_none());
    }
}
