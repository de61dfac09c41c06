//! Bearer token resolution against the external auth provider.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use thiserror::Error;

/// The authenticated caller. Every engine call is scoped to `id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Owner {
    pub id: String,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token rejected by auth provider ({0})")]
    Rejected(StatusCode),
    #[error("auth provider returned no user id")]
    MissingId,
    #[error("invalid auth url: {0}")]
    InvalidUrl(String),
    #[error("auth provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Turns a bearer token into an [`Owner`].
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn resolve(&self, token: &str) -> Result<Owner, AuthError>;
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    id: String,
}

/// Introspects tokens with `GET {base}/auth/v1/user`.
#[derive(Debug, Clone)]
pub struct HttpSessionResolver {
    endpoint: Url,
    api_key: String,
    http: reqwest::Client,
}

impl HttpSessionResolver {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, AuthError> {
        let endpoint = format!("{}/auth/v1/user", base_url.trim_end_matches('/'));
        let endpoint =
            Url::parse(&endpoint).map_err(|err| AuthError::InvalidUrl(err.to_string()))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint,
            api_key: api_key.to_string(),
            http,
        })
    }
}

#[async_trait]
impl SessionResolver for HttpSessionResolver {
    async fn resolve(&self, token: &str) -> Result<Owner, AuthError> {
        let res = self
            .http
            .get(self.endpoint.clone())
            .header("apikey", &self.api_key)
            .bearer_auth(token)
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            return Err(AuthError::Rejected(status));
        }

        let user = res.json::<UserInfo>().await?;
        if user.id.trim().is_empty() {
            return Err(AuthError::MissingId);
        }
        Ok(Owner { id: user.id })
    }
}
