//! Shared fixtures for integration tests against the in-memory store.
#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use civic_backend::domain::ports::UserProfileRepository;
use civic_backend::domain::{
    CallContext, ComplaintDocument, ComplaintId, ComplaintStatus, PushToken, Role, UserId,
    UserProfile,
};
use civic_backend::outbound::memory::InMemoryDocumentStore;
use mockable::Clock;

/// Clock pinned to one instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 8, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn later(minutes: i64) -> DateTime<Utc> {
    now() + Duration::minutes(minutes)
}

pub fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock(now()))
}

pub fn uid(value: &str) -> UserId {
    UserId::new(value).expect("valid uid")
}

pub fn complaint_id(value: &str) -> ComplaintId {
    ComplaintId::new(value).expect("valid complaint id")
}

pub fn signed_in(value: &str) -> CallContext {
    CallContext::authenticated(uid(value))
}

/// A complaint as it looks once intake has hydrated it.
pub fn complaint(author: &str, category: &str, status: &str) -> ComplaintDocument {
    ComplaintDocument {
        title: Some("Broken streetlight".to_owned()),
        description: Some("Dark since Tuesday".to_owned()),
        category: Some(category.to_owned()),
        author_id: Some(author.to_owned()),
        status: Some(ComplaintStatus::new(status)),
        upvote_count: Some(0),
        comment_count: Some(0),
        status_history: Vec::new(),
        created_at: Some(now()),
    }
}

pub fn profile(value: &str, display_name: &str, role: Option<Role>) -> UserProfile {
    UserProfile {
        uid: uid(value),
        display_name: display_name.to_owned(),
        email: format!("{value}@example.org"),
        photo_url: String::new(),
        role,
        push_token: None,
        created_at: Some(now()),
    }
}

pub fn with_token(mut profile: UserProfile, token: &str) -> UserProfile {
    profile.push_token = PushToken::new(token);
    profile
}

pub async fn seed_profile(store: &InMemoryDocumentStore, profile: UserProfile) {
    store.put(&profile).await.expect("profile write");
}
