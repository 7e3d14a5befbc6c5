//! Push delivery outbound adapters.
//!
//! This module provides a thin HTTP implementation of the `PushGateway` port.

mod dto;
mod http_gateway;

pub use http_gateway::HttpPushGateway;
pub(crate) use http_gateway::status_message;
