//! Edge router: complexity scoring, provider catalog, and the tier routing table.

pub mod complexity;
pub mod config;
pub mod registry;
pub mod rules;
pub mod types;

pub use complexity::{ComplexityEstimator, WordCountEstimator};
pub use config::{default_policy, default_registry, DEFAULT_POLICY, LOAD_SHED_THRESHOLD};
pub use registry::ProviderRegistry;
pub use rules::RoutingPolicy;
pub use types::*;

use edge_core::Tier;

/// Score a prompt with the default estimator and route it through the default table.
pub fn route(prompt: &str, tier: Tier, load: LoadSnapshot) -> RoutingDecision {
    let complexity = WordCountEstimator::default().estimate(prompt);
    DEFAULT_POLICY.route(tier, complexity, load)
}
