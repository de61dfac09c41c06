//! Chat completion client used by the `/chat` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptRole {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: PromptRole,
    pub content: String,
}

impl PromptMessage {
    pub fn new(role: PromptRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum AdvisorError {
    #[error("advisor returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("advisor returned an empty reply")]
    EmptyReply,
    #[error("invalid advisor url: {0}")]
    InvalidUrl(String),
    #[error("advisor request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Produces the assistant's next turn for a conversation.
#[async_trait]
pub trait Advisor: Send + Sync {
    async fn reply(&self, messages: &[PromptMessage]) -> Result<String, AdvisorError>;
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for OpenAI-compatible `POST {base}/chat/completions` APIs.
#[derive(Debug, Clone)]
pub struct OpenAiAdvisor {
    endpoint: Url,
    api_key: Option<String>,
    model: String,
    http: reqwest::Client,
}

impl OpenAiAdvisor {
    pub fn new(
        base_url: &str,
        api_key: Option<&str>,
        model: &str,
        timeout: Duration,
    ) -> Result<Self, AdvisorError> {
        let endpoint = format!("{}/chat/completions", base_url.trim_end_matches('/'));
        let endpoint =
            Url::parse(&endpoint).map_err(|err| AdvisorError::InvalidUrl(err.to_string()))?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            endpoint,
            api_key: api_key.map(str::to_string),
            model: model.to_string(),
            http,
        })
    }
}

#[async_trait]
impl Advisor for OpenAiAdvisor {
    async fn reply(&self, messages: &[PromptMessage]) -> Result<String, AdvisorError> {
        let mut req = self.http.post(self.endpoint.clone()).json(&CompletionRequest {
            model: &self.model,
            messages,
        });
        if let Some(api_key) = &self.api_key {
            req = req.bearer_auth(api_key);
        }

        let res = req.send().await?;
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AdvisorError::Status { status, body });
        }

        let completion = res.json::<CompletionResponse>().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(AdvisorError::EmptyReply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_roles_serialize_lowercase() {
        let message = PromptMessage::new(PromptRole::Assistant, "hi");
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["role"], "assistant");
        assert_eq!(value["content"], "hi");
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let advisor = OpenAiAdvisor::new(
            "https://llm.example.com/v1/",
            None,
            "gpt-4o-mini",
            Duration::from_secs(30),
        )
        .unwrap();
        assert_eq!(
            advisor.endpoint.as_str(),
            "https://llm.example.com/v1/chat/completions"
        );
    }
}
