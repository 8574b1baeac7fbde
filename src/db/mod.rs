//! Measurement store module.
//!
//! Abstractions for retrieving melanopic-EDI readings via the Repository
//! pattern, allowing storage backends to be swapped without touching the
//! compliance engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  HTTP Layer (handlers)                                   │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼─────────────────────────────────────┐
//! │  Repository Trait (repository/) - Abstract Interface    │
//! └───────────────────┬─────────────────────────────────────┘
//!                     │
//!     ┌───────────────┴──────────────────┐
//!     │ SupabaseRepository │ LocalRepository │
//!     │   (PostgREST)      │   (in-memory)   │
//!     └──────────────────────────────────┘
//! ```
//!
//! The module includes:
//! - `repository`: Trait definition and error types
//! - `repositories::supabase`: REST implementation against the remote store
//! - `repositories::local`: In-memory implementation for testing and development
//! - `factory`: Factory for creating repository instances
//! - `repo_config`: TOML file configuration for backend selection

// Feature flag priority: supabase > local
// When multiple features are enabled (e.g., --all-features), supabase takes precedence.
#[cfg(not(any(feature = "supabase-repo", feature = "local-repo")))]
compile_error!("Enable at least one repository backend feature.");

pub mod factory;
pub mod repo_config;
pub mod repositories;
pub mod repository;

pub use factory::{RepositoryFactory, RepositoryType};
pub use repo_config::RepositoryConfig;
pub use repositories::LocalRepository;
#[cfg(feature = "supabase-repo")]
pub use repositories::{SupabaseConfig, SupabaseRepository};
pub use repository::{ErrorContext, MeasurementRepository, RepositoryError, RepositoryResult};

use anyhow::{Context, Result};
use std::sync::{Arc, OnceLock};

/// Global repository instance initialized once per process.
static REPOSITORY: OnceLock<Arc<dyn MeasurementRepository>> = OnceLock::new();

// Priority: supabase > local (when --all-features is used)
#[cfg(feature = "supabase-repo")]
fn create_selected_repository() -> RepositoryResult<Arc<dyn MeasurementRepository>> {
    let config = SupabaseConfig::from_env().map_err(RepositoryError::configuration)?;
    let repo = RepositoryFactory::create_supabase(config)?;
    Ok(repo as Arc<dyn MeasurementRepository>)
}

#[cfg(all(feature = "local-repo", not(feature = "supabase-repo")))]
fn create_selected_repository() -> RepositoryResult<Arc<dyn MeasurementRepository>> {
    Ok(RepositoryFactory::create_local())
}

/// Initialize the global repository singleton for the selected backend.
pub fn init_repository() -> Result<()> {
    if REPOSITORY.get().is_some() {
        return Ok(());
    }

    let repo =
        create_selected_repository().map_err(|e| anyhow::Error::msg(e.to_string()))?;
    let _ = REPOSITORY.set(repo);
    Ok(())
}

/// Get a reference to the global repository instance.
pub fn get_repository() -> Result<&'static Arc<dyn MeasurementRepository>> {
    if REPOSITORY.get().is_none() {
        let _ = init_repository();
    }

    REPOSITORY
        .get()
        .context("Store not initialized. Call init_repository() first.")
}
