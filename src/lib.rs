//! `ordered_fetch` - concurrent fetches with request-ordered output
//!
//! This library dispatches every fetch of a request batch at once against an
//! injected async provider, joins on all of them, and only then hands the
//! results to an output sink in the original request order. A failed fetch
//! is reported after its siblings settle, and nothing partial is emitted.

// Module declarations
pub mod fetch;
pub mod runtime;

// Re-export runtime types
pub use runtime::{AsyncStream, AsyncTask, OrderedEmitter};

// Re-export orchestration types
pub use fetch::{FetchState, FetchSummary, OrderedFetch, fetch_all_ordered, fetch_all_ordered_with_config};

// Re-export error types
pub use fetch::{ConfigError, FetchError, FetchFailure, FetchResult, ProviderError};

// Re-export configuration
pub use fetch::{FetchConfig, SimulationConfig};

// Re-export providers and sinks
pub use fetch::{
    CallbackProvider, Completion, DelayPolicy, FnProvider, LineSink, OutputSink, ProviderResult,
    REFERENCE_RESPONSES, RequestBatch, ResourceId, ResourceProvider, ResultSequence,
    SimulatedProvider, SlotError,
};
