//! Identity provider outbound adapters.

mod http_claims;

pub use http_claims::HttpIdentityClaims;
