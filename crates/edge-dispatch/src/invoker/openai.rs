//! OpenAI-compatible `chat/completions` client shared by the local and cloud adapters.

use super::Completion;
use edge_core::{ProviderError, Request};
use reqwest::{Client as HttpClient, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u32,
    #[serde(default)]
    pub completion_tokens: u32,
}

impl<'a> ChatRequest<'a> {
    pub fn from_request(model: &'a str, request: &'a Request) -> Self {
        Self {
            model,
            messages: vec![ChatMessage { role: "user", content: &request.prompt }],
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        }
    }
}

/// Decode a `chat/completions` body.
pub fn parse_completion(body: &str) -> Result<Completion, ProviderError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| ProviderError::Protocol(format!("undecodable response: {}", e)))?;
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| ProviderError::Protocol("response has no choices".into()))?;
    let usage = response.usage.unwrap_or_default();
    Ok(Completion {
        content: choice.message.content.unwrap_or_default(),
        tokens_in: usage.prompt_tokens,
        tokens_out: usage.completion_tokens,
    })
}

/// Map a non-success status to the provider taxonomy.
pub fn status_error(status: StatusCode, body: &str) -> ProviderError {
    let snippet: String = body.chars().take(200).collect();
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        ProviderError::Unavailable(format!("HTTP {}: {}", status.as_u16(), snippet))
    } else {
        ProviderError::Protocol(format!("HTTP {}: {}", status.as_u16(), snippet))
    }
}

/// Thin HTTP client for one OpenAI-compatible endpoint.
#[derive(Clone)]
pub struct OpenAiCompatClient {
    http: HttpClient,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

impl std::fmt::Debug for OpenAiCompatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiCompatClient")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl OpenAiCompatClient {
    pub fn new(base_url: &str, api_key: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::NotConfigured(format!("http client: {}", e)))?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> ProviderError {
        if e.is_timeout() {
            ProviderError::timeout(self.timeout)
        } else if e.is_decode() {
            ProviderError::Protocol(e.to_string())
        } else {
            ProviderError::Unavailable(e.to_string())
        }
    }

    pub async fn chat(&self, model: &str, request: &Request) -> Result<Completion, ProviderError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest::from_request(model, request);

        debug!(url = %url, model, max_tokens = request.max_tokens, "sending chat completion");

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.map_send_error(e))?;

        if !status.is_success() {
            return Err(status_error(status, &text));
        }
        parse_completion(&text)
    }
}
