//! In-memory measurement repository for unit testing and local development.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::db::repository::{MeasurementRepository, RepositoryResult};
use crate::models::{Sample, TimeRange};

/// In-memory store holding samples sorted by timestamp.
///
/// Insertion keeps the vector ordered so `fetch_samples` can hand back an
/// ascending slice, matching the remote store's `order=created_at.asc`.
#[derive(Default)]
pub struct LocalRepository {
    samples: RwLock<Vec<Sample>>,
}

impl LocalRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert samples, keeping ascending timestamp order. A sample with a
    /// timestamp already present replaces the stored one.
    pub fn insert_samples(&self, new_samples: impl IntoIterator<Item = Sample>) {
        let mut samples = self.samples.write();
        for sample in new_samples {
            match samples.binary_search_by_key(&sample.timestamp, |s| s.timestamp) {
                Ok(pos) => samples[pos] = sample,
                Err(pos) => samples.insert(pos, sample),
            }
        }
    }

    /// Remove every stored sample.
    pub fn clear(&self) {
        self.samples.write().clear();
    }

    /// Number of stored samples.
    pub fn len(&self) -> usize {
        self.samples.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.read().is_empty()
    }
}

#[async_trait]
impl MeasurementRepository for LocalRepository {
    async fn fetch_samples(&self, range: &TimeRange) -> RepositoryResult<Vec<Sample>> {
        let samples = self.samples.read();
        Ok(samples
            .iter()
            .filter(|s| s.timestamp >= range.start && s.timestamp <= range.end)
            .copied()
            .collect())
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(true)
    }
}
