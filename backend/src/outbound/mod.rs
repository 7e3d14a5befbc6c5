//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: in-process document store and identity-claim registry
//! - **persistence**: PostgreSQL-backed document store using Diesel ORM
//! - **push**: HTTP push delivery gateway client
//! - **identity**: HTTP identity provider claim client
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod identity;
pub mod memory;
pub mod persistence;
pub mod push;
