//! In-process adapters.
//!
//! - [`InMemoryDocumentStore`] implements every document store port with
//!   serialised access to all collections, which gives strong per-document
//!   consistency and atomic multi-document toggles.
//! - [`InMemoryIdentityClaims`] records role claims.
//! - [`RecordingPushGateway`] captures push messages instead of delivering
//!   them.
//!
//! Used by integration tests and by hosts that embed the core without a
//! database.

mod document_store;
mod identity_claims;
mod push_gateway;

pub use document_store::{InMemoryDocumentStore, StoredComment, StoredNotification};
pub use identity_claims::InMemoryIdentityClaims;
pub use push_gateway::RecordingPushGateway;
