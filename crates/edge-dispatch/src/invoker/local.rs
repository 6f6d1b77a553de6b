//! On-premise runtime adapter (Ollama's OpenAI-compatible endpoint).

use super::{Completion, OpenAiCompatClient, ProviderInvoker};
use async_trait::async_trait;
use edge_core::{LocalBackendConfig, ProviderError, Request};
use edge_router::ProviderDescriptor;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct LocalInvoker {
    client: OpenAiCompatClient,
}

impl LocalInvoker {
    pub fn from_config(config: &LocalBackendConfig, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self { client: OpenAiCompatClient::new(&config.base_url, &config.api_key, timeout)? })
    }
}

#[async_trait]
impl ProviderInvoker for LocalInvoker {
    fn name(&self) -> &str {
        "local"
    }

    async fn invoke(&self, descriptor: &ProviderDescriptor, request: &Request) -> Result<Completion, ProviderError> {
        if !descriptor.is_local() {
            return Err(ProviderError::Protocol(format!(
                "{} runs in {}, not on-premise",
                descriptor.id, descriptor.location
            )));
        }
        self.client.chat(&descriptor.model, request).await
    }
}
