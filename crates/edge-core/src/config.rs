use crate::error::{DispatchError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub const ENV_LOCAL_BASE_URL: &str = "EDGELLM_LOCAL_BASE_URL";
pub const ENV_LOCAL_API_KEY: &str = "EDGELLM_LOCAL_API_KEY";
pub const ENV_CLOUD_BASE_URL: &str = "EDGELLM_CLOUD_BASE_URL";
pub const ENV_CLOUD_API_KEY: &str = "GROQ_API_KEY";
pub const ENV_TIMEOUT_MS: &str = "EDGELLM_TIMEOUT_MS";
pub const ENV_LOCAL_CAPACITY: &str = "EDGELLM_LOCAL_CAPACITY";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub local: LocalBackendConfig,
    pub cloud: CloudBackendConfig,
    /// Per-invocation deadline.
    pub invocation_timeout_ms: u64,
    /// Concurrent local requests that count as full load.
    pub local_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalBackendConfig {
    pub base_url: String,
    pub api_key: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudBackendConfig {
    pub base_url: String,
    /// `None` disables every cloud-targeted decision.
    pub api_key: Option<String>,
}

impl CloudBackendConfig {
    pub fn is_configured(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            local: LocalBackendConfig {
                base_url: "http://localhost:11434/v1".into(),
                api_key: "ollama".into(),
            },
            cloud: CloudBackendConfig {
                base_url: "https://api.groq.com/openai/v1".into(),
                api_key: None,
            },
            invocation_timeout_ms: 30_000,
            local_capacity: 10,
        }
    }
}

impl EngineConfig {
    /// Load from process environment on top of the defaults.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load using an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_LOCAL_BASE_URL) {
            config.local.base_url = url;
        }
        if let Some(key) = lookup(ENV_LOCAL_API_KEY) {
            config.local.api_key = key;
        }
        if let Some(url) = lookup(ENV_CLOUD_BASE_URL) {
            config.cloud.base_url = url;
        }
        config.cloud.api_key = lookup(ENV_CLOUD_API_KEY).filter(|k| !k.trim().is_empty());

        if let Some(raw) = lookup(ENV_TIMEOUT_MS) {
            config.invocation_timeout_ms = raw
                .trim()
                .parse()
                .with_context(|| format!("{} is not a number: '{}'", ENV_TIMEOUT_MS, raw))?;
        }
        if let Some(raw) = lookup(ENV_LOCAL_CAPACITY) {
            config.local_capacity = raw
                .trim()
                .parse()
                .with_context(|| format!("{} is not a number: '{}'", ENV_LOCAL_CAPACITY, raw))?;
        }

        config.validate()?;
        debug!(
            local = %config.local.base_url,
            cloud_configured = config.cloud.is_configured(),
            timeout_ms = config.invocation_timeout_ms,
            capacity = config.local_capacity,
            "engine config loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.invocation_timeout_ms == 0 {
            return Err(DispatchError::Config("invocation_timeout_ms must be positive".into()));
        }
        if self.local_capacity == 0 {
            return Err(DispatchError::Config("local_capacity must be positive".into()));
        }
        if self.local.base_url.trim().is_empty() {
            return Err(DispatchError::Config("local base_url is empty".into()));
        }
        Ok(())
    }
}
