//! Provider adapters behind a narrow invocation trait.

pub mod cloud;
pub mod local;
pub mod openai;

pub use cloud::CloudInvoker;
pub use local::LocalInvoker;
pub use openai::OpenAiCompatClient;

use async_trait::async_trait;
use edge_core::{ProviderError, Request};
use edge_router::ProviderDescriptor;

/// Normalized provider answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
    pub tokens_in: u32,
    pub tokens_out: u32,
}

impl Completion {
    pub fn new(content: impl Into<String>, tokens_in: u32, tokens_out: u32) -> Self {
        Self { content: content.into(), tokens_in, tokens_out }
    }
}

/// One implementation per backend kind.
#[async_trait]
pub trait ProviderInvoker: Send + Sync {
    /// Short label for logs.
    fn name(&self) -> &str;

    async fn invoke(
        &self,
        descriptor: &ProviderDescriptor,
        request: &Request,
    ) -> Result<Completion, ProviderError>;
}
