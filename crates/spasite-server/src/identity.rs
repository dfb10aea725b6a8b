//! Bearer-token identity verification against the external identity
//! provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedIdentity {
    pub email: String,
}

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("identity provider request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("identity provider answered with status {0}")]
    UnexpectedStatus(u16),
}

/// Resolves a bearer token to the identity it was issued for.
///
/// `Ok(None)` means the provider rejected the token.
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<Option<VerifiedIdentity>, IdentityError>;
}

#[derive(Debug, Deserialize)]
struct TokenInfo {
    email: Option<String>,
    #[serde(default = "default_verified", deserialize_with = "flag")]
    email_verified: bool,
}

fn default_verified() -> bool {
    true
}

/// Providers send this flag either as a JSON bool or as `"true"`/`"false"`.
fn flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::Bool(b) => b,
        serde_json::Value::String(s) => s.eq_ignore_ascii_case("true"),
        _ => false,
    })
}

/// Calls `GET {identity_url}?id_token={token}`. A 2xx answer carrying a
/// verified e-mail is a valid identity; 400/401/403 are rejected tokens.
pub struct HttpIdentityVerifier {
    client: Client,
    url: Url,
}

impl HttpIdentityVerifier {
    pub fn new(identity_url: &str, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        let url = Url::parse(identity_url)?;
        Ok(Self { client, url })
    }
}

#[async_trait]
impl IdentityVerifier for HttpIdentityVerifier {
    async fn verify(&self, token: &str) -> Result<Option<VerifiedIdentity>, IdentityError> {
        let response = self
            .client
            .get(self.url.clone())
            .query(&[("id_token", token)])
            .send()
            .await?;

        match response.status() {
            s if s.is_success() => {}
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Ok(None);
            }
            s => return Err(IdentityError::UnexpectedStatus(s.as_u16())),
        }

        let info: TokenInfo = response.json().await?;
        Ok(info
            .email
            .filter(|email| info.email_verified && !email.trim().is_empty())
            .map(|email| VerifiedIdentity {
                email: email.trim().to_lowercase(),
            }))
    }
}

#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    async fn verifier_for(server: &MockServer) -> HttpIdentityVerifier {
        HttpIdentityVerifier::new(&format!("{}/tokeninfo", server.uri()), 5).expect("verifier")
    }

    #[tokio::test]
    async fn valid_token_resolves_to_lowercased_email() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("id_token", "good"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "email": "Owner@Example.com",
                "email_verified": true
            })))
            .mount(&server)
            .await;

        let identity = verifier_for(&server).await.verify("good").await.unwrap();
        assert_eq!(
            identity,
            Some(VerifiedIdentity {
                email: "owner@example.com".into()
            })
        );
    }

    #[tokio::test]
    async fn rejected_token_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400))
            .mount(&server)
            .await;

        assert!(verifier_for(&server)
            .await
            .verify("bad")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn unverified_email_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "email": "owner@example.com",
                "email_verified": false
            })))
            .mount(&server)
            .await;

        assert!(verifier_for(&server)
            .await
            .verify("t")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn provider_outage_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        assert!(matches!(
            verifier_for(&server).await.verify("t").await,
            Err(IdentityError::UnexpectedStatus(503))
        ));
    }
}
