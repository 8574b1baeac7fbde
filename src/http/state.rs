//! Application state for the HTTP server.

use std::sync::Arc;

use crate::config::EngineConfig;
use crate::db::repository::MeasurementRepository;
use crate::llm::GroqClient;

/// Shared application state passed to all handlers.
///
/// Constructed once at process start; nothing here is rebuilt per request.
#[derive(Clone)]
pub struct AppState {
    /// Measurement store instance
    pub repository: Arc<dyn MeasurementRepository>,
    /// Validated engine configuration (tiers, offset, gap, cutoff)
    pub engine: Arc<EngineConfig>,
    /// Explanation client; `None` when the environment is not configured,
    /// in which case the insight endpoints report it instead of failing at
    /// startup
    pub llm: Option<Arc<GroqClient>>,
}

impl AppState {
    /// Create application state without an explanation client.
    pub fn new(repository: Arc<dyn MeasurementRepository>, engine: EngineConfig) -> Self {
        Self {
            repository,
            engine: Arc::new(engine),
            llm: None,
        }
    }

    /// Attach an explanation client.
    pub fn with_llm(mut self, llm: GroqClient) -> Self {
        self.llm = Some(Arc::new(llm));
        self
    }
}
