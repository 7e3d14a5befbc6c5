//! Internal port for notifying a user.
//!
//! Not exposed to external callers. Domain services depend on this trait
//! rather than on the concrete dispatcher so trigger handlers can be tested
//! without a notification store.

use async_trait::async_trait;

use crate::domain::{DispatchOutcome, Error, Notice, UserId};

/// Notify one user in-app and, when possible, by push.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Persist `notice` for `recipient` and attempt push delivery.
    ///
    /// # Errors
    ///
    /// Fails only when the in-app notification cannot be stored. Push
    /// delivery problems are reported through [`DispatchOutcome`].
    async fn notify(&self, recipient: &UserId, notice: &Notice) -> Result<DispatchOutcome, Error>;
}
