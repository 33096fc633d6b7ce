//! Type definitions for ordered fetches

use serde::{Deserialize, Serialize};
use std::fmt;
use std::slice;
use thiserror::Error;

/// Opaque identifier naming a fetchable resource.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ResourceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Ordered, immutable sequence of resources to fetch.
///
/// May be empty and may repeat ids; every entry is fetched on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestBatch(Vec<ResourceId>);

impl RequestBatch {
    #[must_use]
    pub fn new(ids: Vec<ResourceId>) -> Self {
        Self(ids)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, ResourceId> {
        self.0.iter()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ResourceId> {
        self.0.get(index)
    }
}

impl<I: Into<ResourceId>> FromIterator<I> for RequestBatch {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<I: Into<ResourceId>, const N: usize> From<[I; N]> for RequestBatch {
    fn from(ids: [I; N]) -> Self {
        ids.into_iter().collect()
    }
}

impl<'a> IntoIterator for &'a RequestBatch {
    type Item = &'a ResourceId;
    type IntoIter = slice::Iter<'a, ResourceId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Misuse of a [`ResultSequence`] slot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotError {
    #[error("slot {index} is out of range for a sequence of {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("slot {0} was already filled")]
    AlreadyFilled(usize),

    #[error("{missing} of {len} slots were never filled")]
    Incomplete { missing: usize, len: usize },
}

/// Index-aligned result buffer for one request batch.
///
/// Each slot is owned by the completion dispatched for that index and is
/// written exactly once.
#[derive(Debug)]
pub struct ResultSequence {
    slots: Vec<Option<String>>,
}

impl ResultSequence {
    /// Create `len` empty slots.
    #[must_use]
    pub fn with_len(len: usize) -> Self {
        Self {
            slots: vec![None; len],
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Store the result for `index`.
    pub fn fill(&mut self, index: usize, value: String) -> Result<(), SlotError> {
        let len = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(SlotError::OutOfRange { index, len })?;
        if slot.is_some() {
            return Err(SlotError::AlreadyFilled(index));
        }
        *slot = Some(value);
        Ok(())
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    /// Consume the sequence, yielding results in request order.
    pub fn into_ordered(self) -> Result<Vec<String>, SlotError> {
        let len = self.slots.len();
        let missing = self.slots.iter().filter(|s| s.is_none()).count();
        if missing > 0 {
            return Err(SlotError::Incomplete { missing, len });
        }
        Ok(self.slots.into_iter().flatten().collect())
    }
}
