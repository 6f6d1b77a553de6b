//! Ordered rule table over (tier, complexity, load).

use crate::registry::ProviderRegistry;
use crate::types::{LoadSnapshot, RoutingDecision, RoutingRule};
use edge_core::{Result, Tier};
use std::sync::Arc;
use tracing::{debug, error};

/// Name reported when no rule matched and the registry fallback was used.
pub const DEFAULT_RULE: &str = "registry-fallback";

#[derive(Debug, Clone)]
pub struct RoutingPolicy {
    rules: Vec<RoutingRule>,
    registry: Arc<ProviderRegistry>,
}

impl RoutingPolicy {
    /// Every rule target must be cataloged.
    pub fn new(rules: Vec<RoutingRule>, registry: Arc<ProviderRegistry>) -> Result<Self> {
        for rule in &rules {
            registry.lookup(rule.target)?;
        }
        Ok(Self { rules, registry })
    }

    pub(crate) fn from_parts(rules: Vec<RoutingRule>, registry: Arc<ProviderRegistry>) -> Self {
        Self { rules, registry }
    }

    pub fn rules(&self) -> &[RoutingRule] {
        &self.rules
    }

    pub fn registry(&self) -> &Arc<ProviderRegistry> {
        &self.registry
    }

    /// First rule matching the inputs, if any.
    pub fn first_match(&self, tier: Tier, complexity: f64, load: f64) -> Option<&RoutingRule> {
        self.rules.iter().find(|r| r.matches(tier, complexity, load))
    }

    /// Pure decision. Falls through to the registry fallback when no rule matches.
    /// A matched rule whose target is missing from the registry is an `UnknownProvider` error.
    pub fn try_route(&self, tier: Tier, complexity: f64, load: LoadSnapshot) -> Result<RoutingDecision> {
        let fraction = load.fraction();
        let (descriptor, rule) = match self.first_match(tier, complexity, fraction) {
            Some(rule) => (self.registry.lookup(rule.target)?, rule.name.as_str()),
            None => (self.registry.fallback(), DEFAULT_RULE),
        };

        debug!(
            tier = %tier,
            complexity,
            load = fraction,
            rule,
            provider = %descriptor.id,
            "routed"
        );

        Ok(RoutingDecision {
            descriptor: descriptor.clone(),
            tier,
            complexity,
            load,
            rule: rule.to_string(),
            substituted_from: None,
        })
    }

    /// Infallible form of [`try_route`](Self::try_route) for callers that cannot
    /// surface an error. An uncataloged target is logged and answered with the
    /// registry fallback.
    pub fn route(&self, tier: Tier, complexity: f64, load: LoadSnapshot) -> RoutingDecision {
        self.try_route(tier, complexity, load).unwrap_or_else(|e| {
            error!(tier = %tier, error = %e, "rule targets uncataloged provider");
            RoutingDecision {
                descriptor: self.registry.fallback().clone(),
                tier,
                complexity,
                load,
                rule: DEFAULT_RULE.to_string(),
                substituted_from: None,
            }
        })
    }

    /// Route from a raw tier label; unrecognized labels are treated as standard.
    pub fn route_label(&self, tier: &str, complexity: f64, load: LoadSnapshot) -> RoutingDecision {
        self.route(Tier::parse_or_standard(tier), complexity, load)
    }
}
