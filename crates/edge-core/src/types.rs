use crate::error::{DispatchError, ProviderErrorKind, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Upper bound on `max_tokens` accepted from callers.
pub const MAX_TOKENS_LIMIT: u32 = 4096;

/// Content of a degraded result when no backend could answer.
pub const UNAVAILABLE_MARKER: &str = "[Service temporarily unavailable - please retry]";

/// Caller-declared service level. Ordered from cheapest to most aggressive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Standard,
    Premium,
    Enterprise,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Standard, Tier::Premium, Tier::Enterprise];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Premium => "premium",
            Self::Enterprise => "enterprise",
        }
    }

    /// Lenient parse: anything unrecognized is `Standard`.
    pub fn parse_or_standard(label: &str) -> Self {
        label.parse().unwrap_or(Tier::Standard)
    }
}

impl FromStr for Tier {
    type Err = DispatchError;

    /// Strict parse after trimming and lower-casing.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(Tier::Standard),
            "premium" => Ok(Tier::Premium),
            "enterprise" => Ok(Tier::Enterprise),
            other => Err(DispatchError::InvalidRequest(format!("unrecognized tier '{}'", other))),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a provider executes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    #[serde(rename = "on-premise")]
    OnPremise,
    #[serde(rename = "cloud-eu")]
    CloudEu,
    #[serde(rename = "cloud-us")]
    CloudUs,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OnPremise => "on-premise",
            Self::CloudEu => "cloud-eu",
            Self::CloudUs => "cloud-us",
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::OnPremise)
    }

    pub fn is_cloud(&self) -> bool {
        !self.is_local()
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a cataloged inference backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    #[serde(rename = "local_phi4mini")]
    LocalPhi4Mini,
    #[serde(rename = "local_mistral7b")]
    LocalMistral7b,
    #[serde(rename = "groq_llama8b")]
    GroqLlama8b,
    #[serde(rename = "groq_llama70b")]
    GroqLlama70b,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LocalPhi4Mini => "local_phi4mini",
            Self::LocalMistral7b => "local_mistral7b",
            Self::GroqLlama8b => "groq_llama8b",
            Self::GroqLlama70b => "groq_llama70b",
        }
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An already-authenticated inference request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f64,
    pub user_id: String,
    /// Raw tier label as supplied by the caller; normalized during validation.
    pub tier: String,
}

impl Request {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens: 1024,
            temperature: 0.1,
            user_id: "anonymous".into(),
            tier: Tier::Standard.as_str().into(),
        }
    }

    pub fn with_tier(mut self, tier: impl Into<String>) -> Self {
        self.tier = tier.into();
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    /// Check the request and return its normalized tier.
    pub fn validate(&self) -> Result<Tier> {
        if self.prompt.trim().is_empty() {
            return Err(DispatchError::InvalidRequest("prompt is empty".into()));
        }
        if self.max_tokens == 0 || self.max_tokens > MAX_TOKENS_LIMIT {
            return Err(DispatchError::InvalidRequest(format!(
                "max_tokens must be in 1..={}, got {}",
                MAX_TOKENS_LIMIT, self.max_tokens
            )));
        }
        if !self.temperature.is_finite() || !(0.0..=2.0).contains(&self.temperature) {
            return Err(DispatchError::InvalidRequest(format!(
                "temperature must be in [0, 2], got {}",
                self.temperature
            )));
        }
        self.tier.parse()
    }
}

/// Whether a dispatch was answered by the routed provider or degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Fallback,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Fallback => "fallback",
        }
    }
}

/// Lifecycle of a single dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchStage {
    Received,
    Routed,
    Invoking,
    Succeeded,
    Degraded,
    Rejected,
}

impl DispatchStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Routed => "routed",
            Self::Invoking => "invoking",
            Self::Succeeded => "succeeded",
            Self::Degraded => "degraded",
            Self::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Degraded | Self::Rejected)
    }
}

impl fmt::Display for DispatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one dispatch cycle. Built once by the engine, never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceResult {
    pub content: String,
    pub provider: ProviderId,
    pub model: String,
    pub latency_ms: f64,
    pub tokens_in: u32,
    pub tokens_out: u32,
    pub cost_eur: f64,
    pub location: Location,
    pub request_id: String,
    pub outcome: Outcome,
    /// Set only on degraded results.
    pub error_kind: Option<ProviderErrorKind>,
}

impl InferenceResult {
    pub fn total_tokens(&self) -> u32 {
        self.tokens_in.saturating_add(self.tokens_out)
    }

    pub fn is_degraded(&self) -> bool {
        self.outcome == Outcome::Fallback
    }
}
