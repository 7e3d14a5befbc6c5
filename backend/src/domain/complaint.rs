//! Complaint documents, statuses and the append-only transition history.
//!
//! A [`ComplaintDocument`] mirrors the as-written document in the store, so
//! every business field is optional: the intake validator must be able to see
//! exactly what a client omitted before it decides to reject or hydrate.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Validation errors returned by [`ComplaintId::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComplaintValidationError {
    /// The identifier was empty.
    EmptyId,
    /// The identifier carried leading or trailing whitespace.
    PaddedId,
}

impl fmt::Display for ComplaintValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "complaint id must not be empty"),
            Self::PaddedId => write!(f, "complaint id must not contain surrounding whitespace"),
        }
    }
}

impl std::error::Error for ComplaintValidationError {}

/// Identity key of a complaint document.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ComplaintId(String);

impl ComplaintId {
    /// Validate and construct a [`ComplaintId`].
    ///
    /// # Examples
    /// ```
    /// use civic_backend::domain::ComplaintId;
    ///
    /// assert!(ComplaintId::new("c-42").is_ok());
    /// assert!(ComplaintId::new("").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, ComplaintValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ComplaintValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(ComplaintValidationError::PaddedId);
        }
        Ok(Self(id))
    }
}

impl AsRef<str> for ComplaintId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ComplaintId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<ComplaintId> for String {
    fn from(value: ComplaintId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ComplaintId {
    type Error = ComplaintValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Open-ended complaint status.
///
/// Government users may move complaints into statuses beyond the three
/// well-known values, so this is a string newtype rather than an enum.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComplaintStatus(String);

impl ComplaintStatus {
    /// Status assigned to freshly hydrated complaints.
    pub const PENDING: &'static str = "Pending";
    /// Status for complaints under active triage.
    pub const IN_PROGRESS: &'static str = "In Progress";
    /// Terminal status for fixed complaints.
    pub const RESOLVED: &'static str = "Resolved";

    /// Wrap an arbitrary status value.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// The `Pending` status.
    pub fn pending() -> Self {
        Self::new(Self::PENDING)
    }

    /// Whether the status is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the status carries no visible text.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }

    /// Borrow the status text.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable record of a status change, appended to `statusHistory`.
///
/// Equality is by value across all three fields; set-union appends rely on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusTransition {
    /// Status before the write.
    pub from: ComplaintStatus,
    /// Status after the write.
    pub to: ComplaintStatus,
    /// Server time of the write that changed the status.
    pub changed_at: DateTime<Utc>,
}

/// Business fields a complaint must carry to be accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequiredField {
    /// `title`
    Title,
    /// `description`
    Description,
    /// `category`
    Category,
    /// `authorId`
    AuthorId,
}

impl RequiredField {
    /// Every required field, in document order.
    pub const ALL: [Self; 4] = [Self::Title, Self::Description, Self::Category, Self::AuthorId];

    /// Document field name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Description => "description",
            Self::Category => "category",
            Self::AuthorId => "authorId",
        }
    }
}

impl fmt::Display for RequiredField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// As-written complaint document (`complaints/{id}`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintDocument {
    /// Short summary.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Free-text description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category used for dashboard bucketing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Owning user. Kept raw so an invalid value reads as missing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author_id: Option<String>,
    /// Lifecycle status.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ComplaintStatus>,
    /// Number of upvote records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upvote_count: Option<u64>,
    /// Number of comment records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u64>,
    /// Append-only transition audit trail.
    #[serde(default)]
    pub status_history: Vec<StatusTransition>,
    /// Creation time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

fn is_missing(value: Option<&String>) -> bool {
    value.is_none_or(String::is_empty)
}

impl ComplaintDocument {
    /// Required fields that are absent or empty, in document order.
    ///
    /// Whitespace is content: `"  "` counts as supplied.
    ///
    /// # Examples
    /// ```
    /// use civic_backend::domain::{ComplaintDocument, RequiredField};
    ///
    /// let doc = ComplaintDocument {
    ///     title: Some("Pothole".into()),
    ///     description: Some(String::new()),
    ///     ..ComplaintDocument::default()
    /// };
    /// assert_eq!(
    ///     doc.missing_required_fields(),
    ///     vec![RequiredField::Description, RequiredField::Category, RequiredField::AuthorId],
    /// );
    /// ```
    pub fn missing_required_fields(&self) -> Vec<RequiredField> {
        RequiredField::ALL
            .into_iter()
            .filter(|field| match field {
                RequiredField::Title => is_missing(self.title.as_ref()),
                RequiredField::Description => is_missing(self.description.as_ref()),
                RequiredField::Category => is_missing(self.category.as_ref()),
                RequiredField::AuthorId => is_missing(self.author_id.as_ref()),
            })
            .collect()
    }

    /// Status if present and non-empty.
    pub fn current_status(&self) -> Option<&ComplaintStatus> {
        self.status.as_ref().filter(|status| !status.is_empty())
    }

    /// Defaults that hydration must write for fields missing on this document.
    ///
    /// An empty status counts as missing; counters and `createdAt` only count
    /// as missing when absent, so explicit zeroes are preserved.
    pub fn missing_defaults(&self, now: DateTime<Utc>) -> ComplaintDefaults {
        ComplaintDefaults {
            status: self
                .current_status()
                .is_none()
                .then(ComplaintStatus::pending),
            upvote_count: self.upvote_count.is_none().then_some(0),
            comment_count: self.comment_count.is_none().then_some(0),
            created_at: self.created_at.is_none().then_some(now),
        }
    }

    /// Apply a defaults patch in place, mirroring what adapters persist.
    pub fn apply_defaults(&mut self, defaults: &ComplaintDefaults) {
        if let Some(status) = &defaults.status {
            self.status = Some(status.clone());
        }
        if let Some(count) = defaults.upvote_count {
            self.upvote_count = Some(count);
        }
        if let Some(count) = defaults.comment_count {
            self.comment_count = Some(count);
        }
        if let Some(created_at) = defaults.created_at {
            self.created_at = Some(created_at);
        }
    }
}

/// Server-computed defaults written once by intake hydration.
///
/// `None` fields are left untouched by the patch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintDefaults {
    /// Default status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ComplaintStatus>,
    /// Default upvote counter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upvote_count: Option<u64>,
    /// Default comment counter.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment_count: Option<u64>,
    /// Default creation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ComplaintDefaults {
    /// Whether the patch would change nothing.
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.upvote_count.is_none()
            && self.comment_count.is_none()
            && self.created_at.is_none()
    }
}
