//! Civic complaint lifecycle and engagement core.
//!
//! The [`domain`] module holds the rules; [`outbound`] holds the document
//! store, push gateway and identity provider adapters that the trigger host
//! or the `civic-admin` CLI wires together.

pub mod config;
pub mod domain;
pub mod outbound;
pub mod telemetry;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::CoreSettings;
