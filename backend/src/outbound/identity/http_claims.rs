//! Reqwest-backed identity provider claim adapter.
//!
//! Claims are replaced with `PUT {base}/users/{uid}/claims`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::domain::ports::{IdentityClaims, IdentityClaimsError};
use crate::domain::{Role, UserId};
use crate::outbound::push::status_message;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClaimsRequestDto {
    custom_claims: RoleClaimDto,
}

#[derive(Debug, Serialize)]
struct RoleClaimDto {
    role: Role,
}

/// Identity claim adapter talking to the provider's admin API.
pub struct HttpIdentityClaims {
    client: Client,
    base: Url,
    token: Option<String>,
}

impl HttpIdentityClaims {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(
        base: Url,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base,
            token: token.filter(|token| !token.trim().is_empty()),
        })
    }

    fn claims_url(&self, uid: &UserId) -> Result<Url, IdentityClaimsError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                IdentityClaimsError::transport(format!(
                    "identity admin url {} cannot carry a path",
                    self.base
                ))
            })?
            .pop_if_empty()
            .extend(["users", uid.as_ref(), "claims"]);
        Ok(url)
    }
}

#[async_trait]
impl IdentityClaims for HttpIdentityClaims {
    async fn set_role_claim(&self, uid: &UserId, role: Role) -> Result<(), IdentityClaimsError> {
        let body = ClaimsRequestDto {
            custom_claims: RoleClaimDto { role },
        };
        let mut request = self.client.put(self.claims_url(uid)?).json(&body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|error| IdentityClaimsError::transport(error.to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response
            .bytes()
            .await
            .map_err(|error| IdentityClaimsError::transport(error.to_string()))?;
        Err(map_status_error(uid, status, body.as_ref()))
    }
}

fn map_status_error(uid: &UserId, status: StatusCode, body: &[u8]) -> IdentityClaimsError {
    match status {
        StatusCode::NOT_FOUND => IdentityClaimsError::unknown_identity(uid.as_ref()),
        _ if status.is_client_error() => {
            IdentityClaimsError::rejected(status_message(status, body))
        }
        _ => IdentityClaimsError::transport(status_message(status, body)),
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network claim helpers.

    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn adapter(base: &str) -> HttpIdentityClaims {
        HttpIdentityClaims::new(
            Url::parse(base).expect("valid url"),
            Some("secret".to_owned()),
            Duration::from_secs(1),
        )
        .expect("client builds")
    }

    #[rstest]
    #[case("https://idp.example.test/admin", "https://idp.example.test/admin/users/u%201/claims")]
    #[case("https://idp.example.test/admin/", "https://idp.example.test/admin/users/u%201/claims")]
    fn claims_url_appends_encoded_segments(#[case] base: &str, #[case] expected: &str) {
        let uid = UserId::new("u 1").expect("uid without padding");
        let url = adapter(base).claims_url(&uid).expect("url builds");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    #[case(StatusCode::NOT_FOUND, "UnknownIdentity")]
    #[case(StatusCode::FORBIDDEN, "Rejected")]
    #[case(StatusCode::SERVICE_UNAVAILABLE, "Transport")]
    fn maps_statuses(#[case] status: StatusCode, #[case] expected: &str) {
        let uid = UserId::new("u1").expect("valid uid");
        let error = map_status_error(&uid, status, b"");
        let matched = match expected {
            "UnknownIdentity" => matches!(error, IdentityClaimsError::UnknownIdentity { .. }),
            "Rejected" => matches!(error, IdentityClaimsError::Rejected { .. }),
            "Transport" => matches!(error, IdentityClaimsError::Transport { .. }),
            _ => panic!("unsupported test expectation: {expected}"),
        };
        assert!(matched, "{status} should map to {expected}, got {error:?}");
    }

    #[test]
    fn request_body_carries_role_claim() {
        let body = ClaimsRequestDto {
            custom_claims: RoleClaimDto {
                role: Role::Government,
            },
        };
        assert_eq!(
            serde_json::to_value(body).expect("serialise"),
            json!({ "customClaims": { "role": "government" } })
        );
    }
}
