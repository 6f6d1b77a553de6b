use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Failure reported by a provider backend. Recovered inside the engine by the
/// fallback substitution, never surfaced to the caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Provider unavailable: {0}")]
    Unavailable(String),
    #[error("Provider timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },
    #[error("Provider protocol error: {0}")]
    Protocol(String),
    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// Serializable discriminant of [`ProviderError`], carried in telemetry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    ProviderUnavailable,
    ProviderTimeout,
    ProviderProtocolError,
    ProviderNotConfigured,
}

impl ProviderError {
    /// Timeout after `after`, saturating at `u64::MAX` milliseconds.
    pub fn timeout(after: Duration) -> Self {
        Self::Timeout { after_ms: u64::try_from(after.as_millis()).unwrap_or(u64::MAX) }
    }

    pub fn kind(&self) -> ProviderErrorKind {
        match self {
            Self::Unavailable(_) => ProviderErrorKind::ProviderUnavailable,
            Self::Timeout { .. } => ProviderErrorKind::ProviderTimeout,
            Self::Protocol(_) => ProviderErrorKind::ProviderProtocolError,
            Self::NotConfigured(_) => ProviderErrorKind::ProviderNotConfigured,
        }
    }
}

impl ProviderErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProviderUnavailable => "provider_unavailable",
            Self::ProviderTimeout => "provider_timeout",
            Self::ProviderProtocolError => "provider_protocol_error",
            Self::ProviderNotConfigured => "provider_not_configured",
        }
    }
}

/// Errors that cross the engine boundary.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
    /// Routing or fallback named an identity missing from the registry.
    #[error("Unknown provider: {id}")]
    UnknownProvider { id: String },
    #[error("Configuration error: {0}")]
    Config(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DispatchError {
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }

    /// True for defects in the engine's own wiring rather than the input.
    pub fn is_internal(&self) -> bool {
        !self.is_invalid_request()
    }
}

pub type Result<T> = std::result::Result<T, DispatchError>;
