use edge_core::{Location, ProviderId, Tier};
use serde::{Deserialize, Serialize};

/// Qualitative strength of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    FastCheap,
    Strong,
}

/// One catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    pub id: ProviderId,
    pub location: Location,
    pub model: String,
    pub capability: Capability,
    /// Flat charge per request.
    pub base_cost_eur: f64,
    pub cost_per_1k_tokens_eur: f64,
    /// Lowest tier this model is advertised to.
    pub listed_from: Tier,
    /// Local row to use when this (cloud) row cannot be reached at all.
    pub local_equivalent: Option<ProviderId>,
}

impl ProviderDescriptor {
    pub fn is_local(&self) -> bool {
        self.location.is_local()
    }

    /// Cost of one call. Always exactly zero on-premise.
    pub fn cost_for(&self, tokens_in: u32, tokens_out: u32) -> f64 {
        if self.is_local() {
            return 0.0;
        }
        let tokens = tokens_in as f64 + tokens_out as f64;
        (self.base_cost_eur + self.cost_per_1k_tokens_eur * tokens / 1000.0).max(0.0)
    }
}

/// In-flight local requests at the moment a decision was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadSnapshot {
    pub in_flight: usize,
    pub capacity: usize,
}

impl LoadSnapshot {
    pub fn new(in_flight: usize, capacity: usize) -> Self {
        Self { in_flight, capacity }
    }

    /// Fraction of local capacity in use, in [0, 1].
    pub fn fraction(&self) -> f64 {
        if self.capacity == 0 {
            return 1.0;
        }
        (self.in_flight as f64 / self.capacity as f64).min(1.0)
    }
}

/// Numeric predicate over complexity or load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    Any,
    Above(f64),
    AtLeast(f64),
    Below(f64),
}

impl Threshold {
    pub fn admits(&self, value: f64) -> bool {
        match *self {
            Threshold::Any => true,
            Threshold::Above(t) => value > t,
            Threshold::AtLeast(t) => value >= t,
            Threshold::Below(t) => value < t,
        }
    }
}

/// A single row of the routing table: predicate on (tier, complexity, load) to provider.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingRule {
    pub name: String,
    pub tier: Tier,
    pub complexity: Threshold,
    pub load: Threshold,
    pub target: ProviderId,
}

impl RoutingRule {
    pub fn new(name: impl Into<String>, tier: Tier, target: ProviderId) -> Self {
        Self { name: name.into(), tier, complexity: Threshold::Any, load: Threshold::Any, target }
    }

    pub fn complexity(mut self, t: Threshold) -> Self {
        self.complexity = t;
        self
    }

    pub fn load(mut self, t: Threshold) -> Self {
        self.load = t;
        self
    }

    pub fn matches(&self, tier: Tier, complexity: f64, load: f64) -> bool {
        self.tier == tier && self.complexity.admits(complexity) && self.load.admits(load)
    }
}

/// Routing decision, retained for telemetry.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingDecision {
    pub descriptor: ProviderDescriptor,
    pub tier: Tier,
    pub complexity: f64,
    pub load: LoadSnapshot,
    /// Name of the rule that fired.
    pub rule: String,
    /// Set when the engine swapped an unreachable cloud target for its local equivalent.
    pub substituted_from: Option<ProviderId>,
}

impl RoutingDecision {
    pub fn provider(&self) -> ProviderId {
        self.descriptor.id
    }
}
