pub mod config;
pub mod error;
pub mod types;

pub use config::{CloudBackendConfig, EngineConfig, LocalBackendConfig};
pub use error::{DispatchError, ProviderError, ProviderErrorKind, Result};
pub use types::{
    DispatchStage, InferenceResult, Location, Outcome, ProviderId, Request, Tier,
    MAX_TOKENS_LIMIT, UNAVAILABLE_MARKER,
};

#[cfg(test)]
mod tests;
