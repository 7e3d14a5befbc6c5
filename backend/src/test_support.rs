//! Shared test doubles for unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{UserId, UserProfile};

/// Clock pinned to a fixed instant.
pub struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 8, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

pub fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub fn uid(value: &str) -> UserId {
    UserId::new(value).expect("valid uid")
}

pub fn profile(uid_value: &str, display_name: &str) -> UserProfile {
    UserProfile {
        uid: uid(uid_value),
        display_name: display_name.to_owned(),
        email: format!("{uid_value}@example.org"),
        photo_url: String::new(),
        role: None,
        push_token: None,
        created_at: None,
    }
}
