//! Simulated resource provider with timer-driven completions.

use futures::future::BoxFuture;
use log::{debug, info};
use rand::Rng;
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::sleep;

use crate::fetch::config::{ConfigError, SimulationConfig};
use crate::fetch::error::ProviderError;
use crate::fetch::provider::{Completion, ProviderResult, ResourceProvider};
use crate::fetch::types::ResourceId;

/// Canned responses of the reference scenario.
pub const REFERENCE_RESPONSES: [(&str, &str); 3] = [
    ("file1", "The first text"),
    ("file2", "The middle text"),
    ("file3", "The last text"),
];

/// How long each simulated request takes.
#[derive(Debug, Clone)]
pub enum DelayPolicy {
    /// Uniformly random per request, per [`SimulationConfig`].
    Random(SimulationConfig),
    /// Fixed per resource, falling back to `default` for unlisted ids.
    Fixed {
        delays: HashMap<ResourceId, Duration>,
        default: Duration,
    },
}

impl DelayPolicy {
    fn delay_for(&self, id: &ResourceId) -> Duration {
        match self {
            DelayPolicy::Random(config) => {
                // Hand-built configs may carry inverted bounds
                let low = config.min_delay_units.min(config.max_delay_units);
                let high = config.min_delay_units.max(config.max_delay_units);
                let units = rand::thread_rng().gen_range(low..=high);
                config.delay(units)
            }
            DelayPolicy::Fixed { delays, default } => {
                delays.get(id).copied().unwrap_or(*default)
            }
        }
    }
}

/// Fake network: each request completes on its own timer with a canned
/// response, or [`ProviderError::NotFound`] for unknown ids.
#[derive(Debug, Clone)]
pub struct SimulatedProvider {
    responses: HashMap<ResourceId, String>,
    delays: DelayPolicy,
}

impl SimulatedProvider {
    pub fn new<I, K, V>(responses: I, delays: DelayPolicy) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<ResourceId>,
        V: Into<String>,
    {
        Self {
            responses: responses
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            delays,
        }
    }

    /// Reference responses with random delays.
    ///
    /// Rejects a config whose delay range is empty.
    pub fn reference(config: SimulationConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::new(REFERENCE_RESPONSES, DelayPolicy::Random(config)))
    }

    /// Reference responses with the given per-id delays.
    pub fn reference_with_delays<I, K>(delays: I) -> Self
    where
        I: IntoIterator<Item = (K, Duration)>,
        K: Into<ResourceId>,
    {
        let delays = delays.into_iter().map(|(k, d)| (k.into(), d)).collect();
        Self::new(
            REFERENCE_RESPONSES,
            DelayPolicy::Fixed {
                delays,
                default: Duration::ZERO,
            },
        )
    }

    /// Start a request; `done` fires once the simulated delay elapses.
    ///
    /// Must be called from within a tokio runtime.
    pub fn request(&self, id: ResourceId, done: Completion) {
        info!("Requesting: {id}");
        let delay = self.delays.delay_for(&id);
        let response = self.responses.get(&id).cloned();

        tokio::spawn(async move {
            sleep(delay).await;
            debug!("Responding to {id} after {delay:?}");
            done.complete(response.ok_or(ProviderError::NotFound(id)));
        });
    }
}

impl ResourceProvider for SimulatedProvider {
    fn fetch(&self, id: ResourceId) -> BoxFuture<'static, ProviderResult> {
        let (done, settled) = Completion::channel();
        self.request(id, done);
        settled
    }
}
