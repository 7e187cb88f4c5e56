// Scope Tracker - scoped event instrumentation for UI trees
//
// UI code declares nested scopes (an app root, views, elements/zones) and
// controls inside them fire semantic events through triggers. Each event is
// enriched with the full scope path at dispatch time and handed to a sink.
//
// Architecture:
// - Scopes (scope): explicit tree composition producing a context per depth
// - Triggers (trigger): event-kind-bound callables that read the nearest context
// - Visibility (visibility): injected page-visibility / intersection capabilities
// - Flushing (flush, data_layer): reset stale custom parameters before pushing
//   into a shallow-merging data layer
// - Pipeline (pipeline): processors in front of a sink
// - Ambient: config (TOML), logging (tracing), clock

pub mod clock;
pub mod config;
pub mod data_layer;
pub mod events;
pub mod flush;
pub mod logging;
pub mod pipeline;
pub mod scope;
pub mod sink;
pub mod trigger;
pub mod visibility;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use data_layer::DataLayerSink;
pub use events::{CustomParameters, DispatchFields, EventKind, Payload};
pub use flush::{flushed_payload, flushed_payload_with_keys, FlushedParameters, FlushedPayload};
pub use scope::{
    ScopeContext, TrackingElement, TrackingRoot, TrackingRootBuilder, TrackingView, TrackingZone,
};
pub use sink::{MemorySink, Sink};
pub use trigger::{
    base_trigger, click_trigger, section_expanded_trigger, submit_trigger, PageReactivatedTrigger,
    PageViewOptions, PageViewTrigger, Trigger, ViewTrigger,
};
