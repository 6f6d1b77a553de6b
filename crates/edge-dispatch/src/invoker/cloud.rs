//! Cloud API adapter (Groq's OpenAI-compatible endpoint).

use super::{Completion, OpenAiCompatClient, ProviderInvoker};
use async_trait::async_trait;
use edge_core::{CloudBackendConfig, ProviderError, Request};
use edge_router::ProviderDescriptor;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct CloudInvoker {
    client: OpenAiCompatClient,
}

impl CloudInvoker {
    /// Fails with `NotConfigured` when no API key is available.
    pub fn from_config(config: &CloudBackendConfig, timeout: Duration) -> Result<Self, ProviderError> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| ProviderError::NotConfigured("cloud API key not set".into()))?;
        Ok(Self { client: OpenAiCompatClient::new(&config.base_url, api_key, timeout)? })
    }
}

#[async_trait]
impl ProviderInvoker for CloudInvoker {
    fn name(&self) -> &str {
        "cloud"
    }

    async fn invoke(&self, descriptor: &ProviderDescriptor, request: &Request) -> Result<Completion, ProviderError> {
        if descriptor.is_local() {
            return Err(ProviderError::Protocol(format!("{} is an on-premise provider", descriptor.id)));
        }
        self.client.chat(&descriptor.model, request).await
    }
}
