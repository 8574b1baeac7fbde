//! Repository factory for dependency injection.
//!
//! Creates and configures measurement store instances based on runtime
//! configuration (environment variables or `lightwell.toml`). Construction is
//! synchronous: both backends build their state without touching the network,
//! so connectivity problems surface on the first query or health check.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use super::repo_config::RepositoryConfig;
use super::repositories::LocalRepository;
#[cfg(feature = "supabase-repo")]
use super::repositories::{SupabaseConfig, SupabaseRepository};
use super::repository::{MeasurementRepository, RepositoryError, RepositoryResult};

/// Repository type configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryType {
    /// Supabase REST implementation
    Supabase,
    /// In-memory local repository
    Local,
}

impl FromStr for RepositoryType {
    type Err = String;

    /// Parse repository type from string.
    ///
    /// # Arguments
    /// * `s` - String representation ("supabase", "local")
    ///
    /// # Returns
    /// * `Ok(RepositoryType)` if valid
    /// * `Err` if invalid
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "supabase" | "sb" => Ok(Self::Supabase),
            "local" => Ok(Self::Local),
            _ => Err(format!("Unknown repository type: {}", s)),
        }
    }
}

impl RepositoryType {
    /// Get repository type from environment variable.
    ///
    /// Reads `REPOSITORY_TYPE`. Defaults to Supabase if `SUPABASE_URL` is
    /// present, otherwise Local.
    pub fn from_env() -> Self {
        if let Ok(val) = std::env::var("REPOSITORY_TYPE") {
            return val.parse().unwrap_or(Self::Local);
        }

        if std::env::var("SUPABASE_URL").is_ok() {
            Self::Supabase
        } else {
            Self::Local
        }
    }
}

/// Factory for creating measurement store instances.
///
/// # Example
/// ```ignore
/// use lightwell::db::{RepositoryFactory, RepositoryType};
///
/// let repo = RepositoryFactory::from_env()?;
/// let local = RepositoryFactory::create_local();
/// ```
pub struct RepositoryFactory;

impl RepositoryFactory {
    /// Create a Supabase repository.
    ///
    /// # Arguments
    /// * `config` - Supabase connection configuration
    ///
    /// # Returns
    /// * `Ok(Arc<SupabaseRepository>)` - Supabase repository instance
    /// * `Err(RepositoryError)` - If initialization fails
    #[cfg(feature = "supabase-repo")]
    pub fn create_supabase(config: SupabaseConfig) -> RepositoryResult<Arc<SupabaseRepository>> {
        let repo = SupabaseRepository::new(config)?;
        Ok(Arc::new(repo))
    }

    /// Create an in-memory local repository.
    pub fn create_local() -> Arc<dyn MeasurementRepository> {
        Arc::new(LocalRepository::new())
    }

    /// Create repository from environment configuration.
    ///
    /// Reads `REPOSITORY_TYPE` to determine which backend to create; the
    /// Supabase backend additionally needs `SUPABASE_URL` and `SUPABASE_KEY`.
    ///
    /// # Returns
    /// * `Ok(Arc<dyn MeasurementRepository>)` - Repository instance
    /// * `Err(RepositoryError)` - If creation fails
    pub fn from_env() -> RepositoryResult<Arc<dyn MeasurementRepository>> {
        match RepositoryType::from_env() {
            RepositoryType::Supabase => {
                #[cfg(feature = "supabase-repo")]
                {
                    let config =
                        SupabaseConfig::from_env().map_err(RepositoryError::configuration)?;
                    let repo = Self::create_supabase(config)?;
                    Ok(repo as Arc<dyn MeasurementRepository>)
                }
                #[cfg(not(feature = "supabase-repo"))]
                {
                    Err(RepositoryError::configuration(
                        "Supabase repository feature not enabled",
                    ))
                }
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }

    /// Create repository from a TOML configuration file.
    ///
    /// # Arguments
    /// * `config_path` - Path to the lightwell.toml configuration file
    ///
    /// # Returns
    /// * `Ok(Arc<dyn MeasurementRepository>)` - Repository instance
    /// * `Err(RepositoryError)` - If creation fails
    pub fn from_config_file<P: AsRef<Path>>(
        config_path: P,
    ) -> RepositoryResult<Arc<dyn MeasurementRepository>> {
        let config = RepositoryConfig::from_file(config_path)?;
        Self::from_repository_config(&config)
    }

    /// Create repository from the default configuration file location.
    ///
    /// Searches for `lightwell.toml` in standard locations.
    ///
    /// # Returns
    /// * `Ok(Arc<dyn MeasurementRepository>)` - Repository instance
    /// * `Err(RepositoryError)` - If creation fails
    pub fn from_default_config() -> RepositoryResult<Arc<dyn MeasurementRepository>> {
        let config = RepositoryConfig::from_default_location()?;
        Self::from_repository_config(&config)
    }

    fn from_repository_config(
        config: &RepositoryConfig,
    ) -> RepositoryResult<Arc<dyn MeasurementRepository>> {
        let repo_type = config.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        match repo_type {
            RepositoryType::Supabase => {
                #[cfg(feature = "supabase-repo")]
                {
                    let sb_config = config.to_supabase_config()?.ok_or_else(|| {
                        RepositoryError::configuration(
                            "Supabase repository requires connection configuration",
                        )
                    })?;
                    let repo = Self::create_supabase(sb_config)?;
                    Ok(repo as Arc<dyn MeasurementRepository>)
                }
                #[cfg(not(feature = "supabase-repo"))]
                {
                    Err(RepositoryError::configuration(
                        "Supabase repository feature not enabled",
                    ))
                }
            }
            RepositoryType::Local => Ok(Self::create_local()),
        }
    }
}
