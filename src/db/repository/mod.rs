//! Measurement repository trait.
//!
//! The abstract interface every storage backend implements: a time-ranged
//! query returning timestamp/EDI rows, plus a connectivity probe. The engine
//! never talks to a backend directly; it receives materialized
//! [`crate::models::SampleSeries`] values built from these rows.

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

use async_trait::async_trait;

use crate::models::{Sample, TimeRange};

/// Repository trait for melanopic-EDI measurements.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait MeasurementRepository: Send + Sync {
    /// Fetch all samples inside a time range, ascending by timestamp.
    ///
    /// Rows are validated at this boundary: a backend returning non-finite
    /// values or duplicate timestamps yields a `ValidationError`, so the
    /// engine's clean-series precondition holds downstream.
    ///
    /// # Arguments
    /// * `range` - Inclusive UTC time range
    ///
    /// # Returns
    /// * `Ok(Vec<Sample>)` - Samples in ascending timestamp order
    /// * `Err(RepositoryError)` - If the query or row validation fails
    async fn fetch_samples(&self, range: &TimeRange) -> RepositoryResult<Vec<Sample>>;

    /// Check connectivity to the backing store.
    ///
    /// # Returns
    /// * `Ok(true)` - Store reachable
    /// * `Err(RepositoryError)` - If the probe fails
    async fn health_check(&self) -> RepositoryResult<bool>;
}
