// Latest sample per container, shared by collection tasks and the renderer.

use crate::error::{MonitorError, Result};
use crate::models::{ContainerSample, RawSample};
use crate::rate;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mapping from container name to its latest [`ContainerSample`].
///
/// One coarse lock guards the whole map. Writers do lookup-and-replace inside
/// a single critical section; readers copy everything out and release before
/// drawing. Entries are only ever replaced, never removed.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    inner: Arc<Mutex<HashMap<String, ContainerSample>>>,
}

impl SnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` with exclusive access to the map. The guard is released on
    /// every exit path, including a panic inside `f`.
    pub fn with_lock<R>(
        &self,
        f: impl FnOnce(&mut HashMap<String, ContainerSample>) -> R,
    ) -> Result<R> {
        let mut guard = self.inner.lock().map_err(|_| MonitorError::LockPoisoned)?;
        Ok(f(&mut guard))
    }

    /// Derives the CPU percentage against the stored predecessor and replaces
    /// the entry, atomically with respect to other writers.
    pub fn record(&self, raw: RawSample) -> Result<ContainerSample> {
        self.with_lock(|map| {
            let sample = rate::next_sample(map.get(&raw.name), raw);
            map.insert(sample.name.clone(), sample.clone());
            sample
        })
    }

    /// Point-in-time copy of every entry.
    pub fn snapshot(&self) -> Result<Vec<ContainerSample>> {
        self.with_lock(|map| map.values().cloned().collect())
    }

    pub fn len(&self) -> Result<usize> {
        self.with_lock(|map| map.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}
