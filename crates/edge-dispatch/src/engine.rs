//! Estimate, route, invoke, and degrade on failure.

use crate::invoker::{CloudInvoker, Completion, LocalInvoker, ProviderInvoker};
use crate::load::LoadTracker;
use crate::telemetry::{TelemetryEvent, TelemetrySink, TracingSink};
use edge_core::{
    DispatchError, DispatchStage, EngineConfig, InferenceResult, Outcome, ProviderError, Request, Result,
    UNAVAILABLE_MARKER,
};
use edge_router::{default_policy, ComplexityEstimator, ProviderDescriptor, RoutingDecision, RoutingPolicy, WordCountEstimator};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, warn};
use uuid::Uuid;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_CAPACITY: usize = 10;

pub struct DispatchEngine {
    estimator: Arc<dyn ComplexityEstimator>,
    policy: Arc<RoutingPolicy>,
    local: Arc<dyn ProviderInvoker>,
    cloud: Option<Arc<dyn ProviderInvoker>>,
    load: Arc<LoadTracker>,
    telemetry: Arc<dyn TelemetrySink>,
    timeout: Duration,
}

impl std::fmt::Debug for DispatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchEngine")
            .field("local", &self.local.name())
            .field("cloud", &self.cloud.as_ref().map(|c| c.name().to_string()))
            .field("rules", &self.policy.rules().len())
            .field("load", &self.load)
            .field("timeout", &self.timeout)
            .finish()
    }
}

pub struct DispatchEngineBuilder {
    local: Arc<dyn ProviderInvoker>,
    cloud: Option<Arc<dyn ProviderInvoker>>,
    estimator: Option<Arc<dyn ComplexityEstimator>>,
    policy: Option<Arc<RoutingPolicy>>,
    load: Option<Arc<LoadTracker>>,
    capacity: usize,
    telemetry: Option<Arc<dyn TelemetrySink>>,
    timeout: Duration,
}

impl DispatchEngineBuilder {
    pub fn new(local: Arc<dyn ProviderInvoker>) -> Self {
        Self {
            local,
            cloud: None,
            estimator: None,
            policy: None,
            load: None,
            capacity: DEFAULT_CAPACITY,
            telemetry: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn cloud(mut self, cloud: Arc<dyn ProviderInvoker>) -> Self {
        self.cloud = Some(cloud);
        self
    }

    pub fn estimator(mut self, estimator: Arc<dyn ComplexityEstimator>) -> Self {
        self.estimator = Some(estimator);
        self
    }

    pub fn policy(mut self, policy: Arc<RoutingPolicy>) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Share a tracker with other engines in the process.
    pub fn load_tracker(mut self, load: Arc<LoadTracker>) -> Self {
        self.load = Some(load);
        self
    }

    /// Ignored when a tracker is supplied.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn telemetry(mut self, sink: Arc<dyn TelemetrySink>) -> Self {
        self.telemetry = Some(sink);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> DispatchEngine {
        if self.cloud.is_none() {
            warn!("cloud backend not configured - cloud fallback disabled");
        }
        DispatchEngine {
            estimator: self.estimator.unwrap_or_else(|| Arc::new(WordCountEstimator::default())),
            policy: self.policy.unwrap_or_else(|| Arc::new(default_policy())),
            local: self.local,
            cloud: self.cloud,
            load: self.load.unwrap_or_else(|| Arc::new(LoadTracker::new(self.capacity))),
            telemetry: self.telemetry.unwrap_or_else(|| Arc::new(TracingSink)),
            timeout: self.timeout,
        }
    }
}

impl DispatchEngine {
    pub fn builder(local: Arc<dyn ProviderInvoker>) -> DispatchEngineBuilder {
        DispatchEngineBuilder::new(local)
    }

    /// Wire the HTTP adapters from configuration. A missing cloud credential
    /// only disables cloud routing.
    pub fn from_config(config: &EngineConfig) -> Result<Self> {
        config.validate()?;
        let timeout = Duration::from_millis(config.invocation_timeout_ms);

        let local = LocalInvoker::from_config(&config.local, timeout)
            .map_err(|e| DispatchError::Config(e.to_string()))?;
        let mut builder = Self::builder(Arc::new(local))
            .timeout(timeout)
            .capacity(config.local_capacity);

        match CloudInvoker::from_config(&config.cloud, timeout) {
            Ok(cloud) => builder = builder.cloud(Arc::new(cloud)),
            Err(ProviderError::NotConfigured(reason)) => debug!(reason = %reason, "cloud adapter skipped"),
            Err(e) => return Err(DispatchError::Config(e.to_string())),
        }

        Ok(builder.build())
    }

    pub fn load_tracker(&self) -> &Arc<LoadTracker> {
        &self.load
    }

    pub fn policy(&self) -> &Arc<RoutingPolicy> {
        &self.policy
    }

    pub fn cloud_enabled(&self) -> bool {
        self.cloud.is_some()
    }

    /// Run one request. Only invalid input is returned as an error; backend
    /// failures come back as a degraded result.
    pub async fn dispatch(&self, request: &Request) -> Result<InferenceResult> {
        let request_id = Uuid::new_v4().to_string();
        debug!(request_id = %request_id, stage = %DispatchStage::Received, user = %request.user_id, "dispatch");

        let tier = match request.validate() {
            Ok(tier) => tier,
            Err(e) => {
                debug!(request_id = %request_id, stage = %DispatchStage::Rejected, error = %e, "dispatch");
                return Err(e);
            }
        };

        let complexity = clamp_score(self.estimator.estimate(&request.prompt));
        let decision = self
            .policy
            .try_route(tier, complexity, self.load.snapshot())
            .and_then(|d| self.resolve_reachable(d))
            .inspect_err(|e| {
                error!(request_id = %request_id, error = %e, "routing produced an uncataloged provider");
            })?;
        debug!(
            request_id = %request_id,
            stage = %DispatchStage::Routed,
            provider = %decision.provider(),
            rule = %decision.rule,
            "dispatch"
        );

        let start = Instant::now();
        debug!(request_id = %request_id, stage = %DispatchStage::Invoking, "dispatch");
        let outcome = self.invoke(&decision.descriptor, request).await;
        let latency_ms = start.elapsed().as_secs_f64() * 1000.0;

        let result = match outcome {
            Ok(completion) => {
                debug!(request_id = %request_id, stage = %DispatchStage::Succeeded, "dispatch");
                success_result(request_id, &decision.descriptor, completion, latency_ms)
            }
            Err(err) => {
                warn!(
                    request_id = %request_id,
                    provider = %decision.provider(),
                    error = %err,
                    stage = %DispatchStage::Degraded,
                    "provider failed, using fallback"
                );
                fallback_result(request_id, self.policy.registry().fallback(), &err, latency_ms)
            }
        };

        self.telemetry.record(TelemetryEvent::from_result(&result, &decision));
        Ok(result)
    }

    /// Swap a cloud target for its local equivalent when no cloud adapter exists.
    fn resolve_reachable(&self, mut decision: RoutingDecision) -> Result<RoutingDecision> {
        if decision.descriptor.is_local() || self.cloud.is_some() {
            return Ok(decision);
        }
        if let Some(eq) = decision.descriptor.local_equivalent {
            let local = self.policy.registry().lookup(eq)?.clone();
            debug!(from = %decision.descriptor.id, to = %local.id, "cloud disabled, substituting local equivalent");
            decision.substituted_from = Some(decision.descriptor.id);
            decision.descriptor = local;
        }
        Ok(decision)
    }

    async fn invoke(&self, descriptor: &ProviderDescriptor, request: &Request) -> std::result::Result<Completion, ProviderError> {
        let invoker = if descriptor.is_local() {
            &self.local
        } else {
            match &self.cloud {
                Some(cloud) => cloud,
                None => {
                    return Err(ProviderError::NotConfigured(format!(
                        "no cloud backend for {}",
                        descriptor.id
                    )))
                }
            }
        };

        let _guard = descriptor.is_local().then(|| self.load.acquire());
        match tokio::time::timeout(self.timeout, invoker.invoke(descriptor, request)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::timeout(self.timeout)),
        }
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 1.0)
    }
}

fn success_result(
    request_id: String,
    descriptor: &ProviderDescriptor,
    completion: Completion,
    latency_ms: f64,
) -> InferenceResult {
    InferenceResult {
        cost_eur: descriptor.cost_for(completion.tokens_in, completion.tokens_out),
        content: completion.content,
        provider: descriptor.id,
        model: descriptor.model.clone(),
        latency_ms,
        tokens_in: completion.tokens_in,
        tokens_out: completion.tokens_out,
        location: descriptor.location,
        request_id,
        outcome: Outcome::Success,
        error_kind: None,
    }
}

fn fallback_result(
    request_id: String,
    fallback: &ProviderDescriptor,
    err: &ProviderError,
    latency_ms: f64,
) -> InferenceResult {
    InferenceResult {
        content: UNAVAILABLE_MARKER.to_string(),
        provider: fallback.id,
        model: fallback.model.clone(),
        latency_ms,
        tokens_in: 0,
        tokens_out: 0,
        cost_eur: 0.0,
        location: fallback.location,
        request_id,
        outcome: Outcome::Fallback,
        error_kind: Some(err.kind()),
    }
}
