//! Scripted provider with per-id delays and an event log.

use futures::future::BoxFuture;
use ordered_fetch::{ProviderError, ProviderResult, ResourceId, ResourceProvider};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Started(String),
    Settled(String),
}

#[derive(Default)]
pub struct Scripted {
    scripts: HashMap<ResourceId, (Duration, ProviderResult)>,
    log: Arc<Mutex<Vec<Event>>>,
}

impl Scripted {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ok(mut self, id: &str, delay_ms: u64, value: &str) -> Self {
        self.scripts.insert(
            id.into(),
            (Duration::from_millis(delay_ms), Ok(value.to_string())),
        );
        self
    }

    pub fn fail(mut self, id: &str, delay_ms: u64, cause: ProviderError) -> Self {
        self.scripts
            .insert(id.into(), (Duration::from_millis(delay_ms), Err(cause)));
        self
    }

    pub fn log(&self) -> Arc<Mutex<Vec<Event>>> {
        self.log.clone()
    }
}

impl ResourceProvider for Scripted {
    fn fetch(&self, id: ResourceId) -> BoxFuture<'static, ProviderResult> {
        let (delay, outcome) = self
            .scripts
            .get(&id)
            .cloned()
            .unwrap_or_else(|| (Duration::ZERO, Err(ProviderError::NotFound(id.clone()))));
        let log = self.log.clone();
        log.lock().unwrap().push(Event::Started(id.to_string()));

        Box::pin(async move {
            sleep(delay).await;
            log.lock().unwrap().push(Event::Settled(id.to_string()));
            outcome
        })
    }
}

pub fn settled(log: &Arc<Mutex<Vec<Event>>>) -> Vec<String> {
    log.lock()
        .unwrap()
        .iter()
        .filter_map(|e| match e {
            Event::Settled(id) => Some(id.clone()),
            Event::Started(_) => None,
        })
        .collect()
}
