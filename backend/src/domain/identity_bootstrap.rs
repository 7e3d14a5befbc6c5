//! Default profile creation for new identities.
//!
//! The identity provider calls this hook while it creates an account. The
//! profile write runs as a detached task so account creation never waits on
//! the document store; write failures are logged on the task and go nowhere
//! else.

use std::sync::Arc;

use mockable::Clock;
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::domain::ports::UserProfileRepository;
use crate::domain::{IdentityCreatedEvent, Role, UserProfile};

/// Changes the hook asks the identity provider to make to the new account.
///
/// Always empty: bootstrap never alters credentials or claims.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IdentityModifications {}

/// Handle on the detached profile write.
///
/// Dropping the handle leaves the write running.
#[derive(Debug)]
pub struct ProfileWriteHandle(JoinHandle<()>);

impl ProfileWriteHandle {
    /// Wait for the background write to finish.
    ///
    /// Write failures were already logged by the task itself; this only
    /// reports whether the task ran to completion.
    pub async fn join(self) -> bool {
        self.0.await.is_ok()
    }
}

/// Result of the bootstrap hook.
#[derive(Debug)]
pub struct BootstrapResponse {
    /// Modifications returned to the identity provider.
    pub modifications: IdentityModifications,
    /// The in-flight profile write.
    pub profile_write: ProfileWriteHandle,
}

/// Build the default profile for a new identity.
pub fn default_profile(event: &IdentityCreatedEvent, clock: &dyn Clock) -> UserProfile {
    UserProfile {
        uid: event.uid.clone(),
        display_name: event.display_name.clone().unwrap_or_default(),
        email: event.email.clone().unwrap_or_default(),
        photo_url: event.photo_url.clone().unwrap_or_default(),
        role: Some(Role::Citizen),
        push_token: None,
        created_at: Some(clock.utc()),
    }
}

/// Identity creation hook.
pub struct IdentityBootstrapService<U> {
    profiles: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U> Clone for IdentityBootstrapService<U> {
    fn clone(&self) -> Self {
        Self {
            profiles: Arc::clone(&self.profiles),
            clock: Arc::clone(&self.clock),
        }
    }
}

impl<U> IdentityBootstrapService<U> {
    /// Create the hook.
    pub fn new(profiles: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { profiles, clock }
    }
}

impl<U> IdentityBootstrapService<U>
where
    U: UserProfileRepository + 'static,
{
    /// Start the default profile write and return immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn on_identity_created(&self, event: &IdentityCreatedEvent) -> BootstrapResponse {
        let profile = default_profile(event, self.clock.as_ref());
        let profiles = Arc::clone(&self.profiles);
        let task = tokio::spawn(async move {
            match profiles.put(&profile).await {
                Ok(()) => info!(uid = %profile.uid, "default profile created"),
                Err(err) => {
                    error!(uid = %profile.uid, error = %err, "default profile write failed");
                }
            }
        });

        BootstrapResponse {
            modifications: IdentityModifications::default(),
            profile_write: ProfileWriteHandle(task),
        }
    }
}
