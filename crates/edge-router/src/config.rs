//! Built-in catalog and rule table.

use crate::registry::ProviderRegistry;
use crate::rules::RoutingPolicy;
use crate::types::*;
use edge_core::{Location, ProviderId, Tier};
use std::sync::Arc;

/// Load fraction at which standard traffic is shed to the cloud.
pub const LOAD_SHED_THRESHOLD: f64 = 0.8;

fn row(
    id: ProviderId,
    location: Location,
    model: &str,
    capability: Capability,
    cost_per_1k_tokens_eur: f64,
    listed_from: Tier,
    local_equivalent: Option<ProviderId>,
) -> ProviderDescriptor {
    ProviderDescriptor {
        id,
        location,
        model: model.to_string(),
        capability,
        base_cost_eur: 0.0,
        cost_per_1k_tokens_eur,
        listed_from,
        local_equivalent,
    }
}

fn fast_local() -> ProviderDescriptor {
    row(ProviderId::LocalPhi4Mini, Location::OnPremise, "phi4-mini", Capability::FastCheap, 0.0, Tier::Standard, None)
}

/// Default catalog: two on-premise models and two cloud models.
pub fn default_catalog() -> Vec<ProviderDescriptor> {
    vec![
        fast_local(),
        row(
            ProviderId::LocalMistral7b,
            Location::OnPremise,
            "mistral:7b-instruct-q4_K_M",
            Capability::Strong,
            0.0,
            Tier::Standard,
            None,
        ),
        row(
            ProviderId::GroqLlama8b,
            Location::CloudUs,
            "llama-3.1-8b-instant",
            Capability::FastCheap,
            0.00007,
            Tier::Premium,
            Some(ProviderId::LocalPhi4Mini),
        ),
        row(
            ProviderId::GroqLlama70b,
            Location::CloudUs,
            "llama-3.3-70b-versatile",
            Capability::Strong,
            0.0007,
            Tier::Enterprise,
            Some(ProviderId::LocalMistral7b),
        ),
    ]
}

pub fn default_registry() -> ProviderRegistry {
    ProviderRegistry::from_parts(default_catalog(), fast_local())
}

/// Default rule table, evaluated top to bottom.
pub fn default_rules() -> Vec<RoutingRule> {
    use ProviderId::*;
    use Threshold::*;
    vec![
        RoutingRule::new("enterprise-complex", Tier::Enterprise, GroqLlama70b).complexity(Above(0.6)),
        RoutingRule::new("enterprise-default", Tier::Enterprise, LocalMistral7b),
        RoutingRule::new("premium-complex", Tier::Premium, GroqLlama70b).complexity(Above(0.7)),
        RoutingRule::new("premium-moderate", Tier::Premium, LocalMistral7b).complexity(Above(0.4)),
        RoutingRule::new("premium-default", Tier::Premium, LocalPhi4Mini),
        RoutingRule::new("standard-shed", Tier::Standard, GroqLlama8b).load(AtLeast(LOAD_SHED_THRESHOLD)),
        RoutingRule::new("standard-complex", Tier::Standard, LocalMistral7b)
            .complexity(Above(0.5))
            .load(Below(LOAD_SHED_THRESHOLD)),
        RoutingRule::new("standard-default", Tier::Standard, LocalPhi4Mini).load(Below(LOAD_SHED_THRESHOLD)),
    ]
}

pub fn default_policy() -> RoutingPolicy {
    RoutingPolicy::from_parts(default_rules(), Arc::new(default_registry()))
}

/// The default policy instance.
pub static DEFAULT_POLICY: std::sync::LazyLock<RoutingPolicy> = std::sync::LazyLock::new(default_policy);
