//! Ordered concurrent fetch module
//!
//! Dispatches a batch of fetches against an injected provider, waits for
//! every one to settle, and emits the results in request order.

pub mod config;
pub mod error;
pub mod provider;
pub mod simulated;
pub mod sink;
pub mod types;
pub mod util;

mod convenience;
mod ordered;

// Re-export configuration types
pub use config::{ConfigError, FetchConfig, SimulationConfig};

// Re-export error types
pub use error::{FetchError, FetchFailure, FetchResult, ProviderError};
pub use util::spawn_task;

// Re-export core types
pub use convenience::{fetch_all_ordered, fetch_all_ordered_with_config};
pub use ordered::{FetchState, FetchSummary, OrderedFetch};
pub use provider::{CallbackProvider, Completion, FnProvider, ProviderResult, ResourceProvider};
pub use simulated::{DelayPolicy, REFERENCE_RESPONSES, SimulatedProvider};
pub use sink::{LineSink, OutputSink};
pub use types::{RequestBatch, ResourceId, ResultSequence, SlotError};
