//! Dispatch engine: routes validated requests to local or cloud backends,
//! degrades to a marked local result on backend failure, and emits telemetry.

pub mod engine;
pub mod invoker;
pub mod load;
pub mod telemetry;

pub use engine::{DispatchEngine, DispatchEngineBuilder};
pub use invoker::{CloudInvoker, Completion, LocalInvoker, ProviderInvoker};
pub use load::{LoadGuard, LoadTracker};
pub use telemetry::{ChannelSink, NullSink, RecordingSink, TelemetryEvent, TelemetrySink, TracingSink};
