//! Mutex-guarded document collections.

use std::collections::{BTreeMap, btree_map::Entry};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

use crate::domain::ports::{
    CommentRepository, CommentRepositoryError, ComplaintRepository, ComplaintRepositoryError,
    HistoryAppend, NotificationRepository, NotificationRepositoryError, UpvoteLedger,
    UpvoteLedgerError, UserProfileRepository, UserProfileRepositoryError,
};
use crate::domain::{
    CommentId, ComplaintDefaults, ComplaintDocument, ComplaintId, ComplaintUpdatedEvent,
    NewComment, NewNotification, NotificationId, Role, StatusTransition, UpvoteToggle, UserId,
    UserProfile,
};

/// Comment record as stored under its complaint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredComment {
    /// Generated key.
    pub id: CommentId,
    /// Stored fields.
    pub comment: NewComment,
}

/// Notification record as stored under its recipient.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredNotification {
    /// Generated key.
    pub id: NotificationId,
    /// Stored fields.
    pub notification: NewNotification,
}

#[derive(Debug, Default)]
struct Collections {
    complaints: BTreeMap<ComplaintId, ComplaintDocument>,
    upvotes: BTreeMap<ComplaintId, BTreeMap<UserId, DateTime<Utc>>>,
    comments: BTreeMap<ComplaintId, Vec<StoredComment>>,
    users: BTreeMap<UserId, UserProfile>,
    notifications: BTreeMap<UserId, Vec<StoredNotification>>,
}

/// Document store held in process memory.
///
/// Every operation takes the single collection lock, so each port call is
/// atomic with respect to every other call.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    inner: Mutex<Collections>,
}

fn increment(counter: &mut Option<u64>) {
    *counter = Some(counter.unwrap_or(0).saturating_add(1));
}

fn decrement(counter: &mut Option<u64>) {
    *counter = Some(counter.unwrap_or(0).saturating_sub(1));
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a complaint as a client would, replacing any existing document.
    pub async fn insert_complaint(&self, id: &ComplaintId, document: ComplaintDocument) {
        self.inner
            .lock()
            .await
            .complaints
            .insert(id.clone(), document);
    }

    /// Read a complaint.
    pub async fn complaint(&self, id: &ComplaintId) -> Option<ComplaintDocument> {
        self.inner.lock().await.complaints.get(id).cloned()
    }

    /// Apply a client-side edit and return the update trigger it produces.
    ///
    /// Returns `None` when the complaint does not exist.
    pub async fn update_complaint<F>(
        &self,
        id: &ComplaintId,
        updated_at: DateTime<Utc>,
        edit: F,
    ) -> Option<ComplaintUpdatedEvent>
    where
        F: FnOnce(&mut ComplaintDocument),
    {
        let mut guard = self.inner.lock().await;
        let document = guard.complaints.get_mut(id)?;
        let before = document.clone();
        edit(document);
        Some(ComplaintUpdatedEvent {
            complaint_id: id.clone(),
            before,
            after: document.clone(),
            updated_at,
        })
    }

    /// Number of upvote records under a complaint.
    pub async fn upvote_records(&self, id: &ComplaintId) -> usize {
        self.inner
            .lock()
            .await
            .upvotes
            .get(id)
            .map_or(0, BTreeMap::len)
    }

    /// Whether `uid` holds an upvote on the complaint.
    pub async fn has_upvoted(&self, id: &ComplaintId, uid: &UserId) -> bool {
        self.inner
            .lock()
            .await
            .upvotes
            .get(id)
            .is_some_and(|votes| votes.contains_key(uid))
    }

    /// Comments under a complaint in insertion order.
    pub async fn comments(&self, id: &ComplaintId) -> Vec<StoredComment> {
        self.inner
            .lock()
            .await
            .comments
            .get(id)
            .cloned()
            .unwrap_or_default()
    }

    /// Read a profile.
    pub async fn profile(&self, uid: &UserId) -> Option<UserProfile> {
        self.inner.lock().await.users.get(uid).cloned()
    }

    /// Notifications stored for `uid` in insertion order.
    pub async fn notifications(&self, uid: &UserId) -> Vec<StoredNotification> {
        self.inner
            .lock()
            .await
            .notifications
            .get(uid)
            .cloned()
            .unwrap_or_default()
    }
}

#[async_trait]
impl ComplaintRepository for InMemoryDocumentStore {
    async fn delete(&self, id: &ComplaintId) -> Result<(), ComplaintRepositoryError> {
        let mut guard = self.inner.lock().await;
        guard.complaints.remove(id);
        guard.upvotes.remove(id);
        guard.comments.remove(id);
        Ok(())
    }

    async fn apply_defaults(
        &self,
        id: &ComplaintId,
        defaults: &ComplaintDefaults,
    ) -> Result<(), ComplaintRepositoryError> {
        let mut guard = self.inner.lock().await;
        let document = guard
            .complaints
            .get_mut(id)
            .ok_or_else(|| ComplaintRepositoryError::not_found(id.as_ref()))?;
        document.apply_defaults(defaults);
        Ok(())
    }

    async fn append_transition(
        &self,
        id: &ComplaintId,
        transition: &StatusTransition,
    ) -> Result<HistoryAppend, ComplaintRepositoryError> {
        let mut guard = self.inner.lock().await;
        let document = guard
            .complaints
            .get_mut(id)
            .ok_or_else(|| ComplaintRepositoryError::not_found(id.as_ref()))?;
        if document.status_history.contains(transition) {
            return Ok(HistoryAppend::AlreadyPresent);
        }
        document.status_history.push(transition.clone());
        Ok(HistoryAppend::Appended)
    }

    async fn increment_comment_count(
        &self,
        id: &ComplaintId,
    ) -> Result<(), ComplaintRepositoryError> {
        let mut guard = self.inner.lock().await;
        let document = guard
            .complaints
            .get_mut(id)
            .ok_or_else(|| ComplaintRepositoryError::not_found(id.as_ref()))?;
        increment(&mut document.comment_count);
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<ComplaintDocument>, ComplaintRepositoryError> {
        Ok(self.inner.lock().await.complaints.values().cloned().collect())
    }
}

#[async_trait]
impl UpvoteLedger for InMemoryDocumentStore {
    async fn toggle(
        &self,
        complaint_id: &ComplaintId,
        user_id: &UserId,
        at: DateTime<Utc>,
    ) -> Result<UpvoteToggle, UpvoteLedgerError> {
        let mut guard = self.inner.lock().await;
        let Collections {
            complaints,
            upvotes,
            ..
        } = &mut *guard;
        let document = complaints
            .get_mut(complaint_id)
            .ok_or_else(|| UpvoteLedgerError::complaint_not_found(complaint_id.as_ref()))?;
        let votes = upvotes.entry(complaint_id.clone()).or_default();

        match votes.entry(user_id.clone()) {
            Entry::Occupied(vote) => {
                vote.remove();
                decrement(&mut document.upvote_count);
                Ok(UpvoteToggle::Removed)
            }
            Entry::Vacant(slot) => {
                slot.insert(at);
                increment(&mut document.upvote_count);
                Ok(UpvoteToggle::Added)
            }
        }
    }
}

#[async_trait]
impl CommentRepository for InMemoryDocumentStore {
    async fn insert(&self, comment: &NewComment) -> Result<CommentId, CommentRepositoryError> {
        let mut guard = self.inner.lock().await;
        if !guard.complaints.contains_key(&comment.complaint_id) {
            return Err(CommentRepositoryError::complaint_not_found(
                comment.complaint_id.as_ref(),
            ));
        }
        let id = CommentId::random();
        guard
            .comments
            .entry(comment.complaint_id.clone())
            .or_default()
            .push(StoredComment {
                id,
                comment: comment.clone(),
            });
        Ok(id)
    }
}

#[async_trait]
impl UserProfileRepository for InMemoryDocumentStore {
    async fn find(&self, uid: &UserId) -> Result<Option<UserProfile>, UserProfileRepositoryError> {
        Ok(self.inner.lock().await.users.get(uid).cloned())
    }

    async fn put(&self, profile: &UserProfile) -> Result<(), UserProfileRepositoryError> {
        self.inner
            .lock()
            .await
            .users
            .insert(profile.uid.clone(), profile.clone());
        Ok(())
    }

    async fn set_role(&self, uid: &UserId, role: Role) -> Result<(), UserProfileRepositoryError> {
        let mut guard = self.inner.lock().await;
        let profile = guard
            .users
            .get_mut(uid)
            .ok_or_else(|| UserProfileRepositoryError::not_found(uid.as_ref()))?;
        profile.role = Some(role);
        Ok(())
    }
}

#[async_trait]
impl NotificationRepository for InMemoryDocumentStore {
    async fn insert(
        &self,
        notification: &NewNotification,
    ) -> Result<NotificationId, NotificationRepositoryError> {
        let id = NotificationId::random();
        self.inner
            .lock()
            .await
            .notifications
            .entry(notification.recipient.clone())
            .or_default()
            .push(StoredNotification {
                id,
                notification: notification.clone(),
            });
        Ok(id)
    }
}
