//! Dispatch telemetry events and sinks.
//!
//! Sinks are fire-and-forget: `record` never blocks the engine and never fails.

use chrono::{DateTime, Utc};
use edge_core::{InferenceResult, Location, Outcome, ProviderErrorKind, ProviderId, Tier};
use edge_router::RoutingDecision;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// One dispatch outcome.
///
/// `provider` is whoever produced the result; on a degraded dispatch that is
/// the fallback, and `routed_provider` names the backend that was chosen and failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    pub request_id: String,
    pub provider: ProviderId,
    pub routed_provider: ProviderId,
    /// Cloud target replaced by its local equivalent because cloud was disabled.
    pub substituted_from: Option<ProviderId>,
    pub model: String,
    pub tier: Tier,
    pub rule: String,
    pub complexity: f64,
    pub load: f64,
    pub latency_ms: f64,
    pub cost_eur: f64,
    pub tokens_in: u32,
    pub tokens_out: u32,
    pub location: Location,
    pub outcome: Outcome,
    pub error_kind: Option<ProviderErrorKind>,
    pub recorded_at: DateTime<Utc>,
}

impl TelemetryEvent {
    pub fn from_result(result: &InferenceResult, decision: &RoutingDecision) -> Self {
        Self {
            request_id: result.request_id.clone(),
            provider: result.provider,
            routed_provider: decision.provider(),
            substituted_from: decision.substituted_from,
            model: result.model.clone(),
            tier: decision.tier,
            rule: decision.rule.clone(),
            complexity: decision.complexity,
            load: decision.load.fraction(),
            latency_ms: result.latency_ms,
            cost_eur: result.cost_eur,
            tokens_in: result.tokens_in,
            tokens_out: result.tokens_out,
            location: result.location,
            outcome: result.outcome,
            error_kind: result.error_kind,
            recorded_at: Utc::now(),
        }
    }
}

pub trait TelemetrySink: Send + Sync {
    fn record(&self, event: TelemetryEvent);
}

/// Writes one log line per event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn record(&self, event: TelemetryEvent) {
        match event.error_kind {
            None => info!(
                request_id = %event.request_id,
                provider = %event.provider,
                substituted_from = ?event.substituted_from,
                latency_ms = event.latency_ms,
                cost_eur = event.cost_eur,
                location = %event.location,
                outcome = event.outcome.as_str(),
                "Request {}: {} | {:.0}ms | EUR {:.4}",
                event.request_id, event.provider, event.latency_ms, event.cost_eur
            ),
            Some(kind) => info!(
                request_id = %event.request_id,
                provider = %event.provider,
                routed_provider = %event.routed_provider,
                substituted_from = ?event.substituted_from,
                latency_ms = event.latency_ms,
                location = %event.location,
                outcome = event.outcome.as_str(),
                error_kind = kind.as_str(),
                "Request {}: {} failed with {}, fallback to {}",
                event.request_id, event.routed_provider, kind.as_str(), event.provider
            ),
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TelemetrySink for NullSink {
    fn record(&self, _event: TelemetryEvent) {}
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<TelemetryEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TelemetryEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
            .filter(|e| e.outcome == outcome)
            .count()
    }
}

impl TelemetrySink for RecordingSink {
    fn record(&self, event: TelemetryEvent) {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).push(event);
    }
}

/// Forwards events to an external aggregator over a bounded channel.
/// Events are dropped when the channel is full or closed.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::Sender<TelemetryEvent>,
}

impl ChannelSink {
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<TelemetryEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }
}

impl TelemetrySink for ChannelSink {
    fn record(&self, event: TelemetryEvent) {
        if let Err(e) = self.tx.try_send(event) {
            let request_id = match &e {
                mpsc::error::TrySendError::Full(ev) | mpsc::error::TrySendError::Closed(ev) => ev.request_id.clone(),
            };
            warn!(request_id = %request_id, "telemetry event dropped: {}", e);
        }
    }
}
