//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Each document collection of the store maps onto one table:
//!
//! | Collection                       | Table                |
//! |----------------------------------|----------------------|
//! | `users/{uid}`                    | `users`              |
//! | `complaints/{id}`                | `complaints`         |
//! | `complaints/{id}/upvotes/{uid}`  | `complaint_upvotes`  |
//! | `complaints/{id}/comments/{cid}` | `complaint_comments` |
//! | `notifications/{id}`             | `notifications`      |
//!
//! Adapters only translate between Diesel rows and domain types. Row structs
//! and the schema stay private to this module.
//!
//! # Example
//!
//! ```ignore
//! use civic_backend::outbound::persistence::{DbPool, DieselUpvoteLedger, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::from_settings(&settings)?).await?;
//! let ledger = DieselUpvoteLedger::new(pool, settings.transaction_attempts());
//! ```

pub(crate) mod diesel_helpers;
mod diesel_comment_repository;
mod diesel_complaint_repository;
mod diesel_notification_repository;
mod diesel_upvote_ledger;
mod diesel_user_profile_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_comment_repository::DieselCommentRepository;
pub use diesel_complaint_repository::DieselComplaintRepository;
pub use diesel_notification_repository::DieselNotificationRepository;
pub use diesel_upvote_ledger::DieselUpvoteLedger;
pub use diesel_user_profile_repository::DieselUserProfileRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
