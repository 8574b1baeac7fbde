//! Repository configuration file support.
//!
//! Reads the `[repository]` and `[supabase]` sections of `lightwell.toml` so
//! the storage backend can be selected without recompiling. Engine settings
//! live in their own `[engine]` section handled by `crate::config`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use super::factory::RepositoryType;
use super::repository::RepositoryError;
#[cfg(feature = "supabase-repo")]
use super::repositories::SupabaseConfig;

/// Repository configuration from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository: RepositorySettings,
    #[serde(default)]
    pub supabase: SupabaseSettings,
}

/// Repository type settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositorySettings {
    #[serde(rename = "type")]
    pub repo_type: String,
}

/// Supabase REST connection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupabaseSettings {
    /// Project base URL (https://<project>.supabase.co).
    #[serde(default)]
    pub url: String,
    /// Service or anon API key.
    #[serde(default)]
    pub api_key: String,
    /// Measurement table name.
    #[serde(default = "default_table")]
    pub table: String,
}

fn default_table() -> String {
    "mediciones".to_string()
}

impl RepositoryConfig {
    /// Load repository configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if successful
    /// * `Err(RepositoryError)` if file cannot be read or parsed
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, RepositoryError> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RepositoryError::configuration(format!("Failed to read config file: {}", e))
        })?;

        let config: RepositoryConfig = toml::from_str(&content).map_err(|e| {
            RepositoryError::configuration(format!("Failed to parse config file: {}", e))
        })?;

        Ok(config)
    }

    /// Load repository configuration from the default location.
    ///
    /// Searches for `lightwell.toml` in the current and parent directory.
    ///
    /// # Returns
    /// * `Ok(RepositoryConfig)` if found and parsed successfully
    /// * `Err(RepositoryError)` if no config file found or parse error
    pub fn from_default_location() -> Result<Self, RepositoryError> {
        let search_paths = [
            PathBuf::from("lightwell.toml"),
            PathBuf::from("../lightwell.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        Err(RepositoryError::configuration(
            "No lightwell.toml found in standard locations",
        ))
    }

    /// Get the repository type from configuration.
    pub fn repository_type(&self) -> Result<RepositoryType, String> {
        RepositoryType::from_str(&self.repository.repo_type)
    }

    /// Convert to SupabaseConfig if this is a Supabase configuration.
    #[cfg(feature = "supabase-repo")]
    pub fn to_supabase_config(&self) -> Result<Option<SupabaseConfig>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type != RepositoryType::Supabase {
            return Ok(None);
        }

        if self.supabase.url.is_empty() || self.supabase.api_key.is_empty() {
            return Err(RepositoryError::configuration(
                "Supabase repository requires 'supabase.url' and 'supabase.api_key' settings",
            ));
        }

        Ok(Some(SupabaseConfig {
            url: self.supabase.url.trim_end_matches('/').to_string(),
            api_key: self.supabase.api_key.clone(),
            table: self.supabase.table.clone(),
        }))
    }

    /// Convert to SupabaseConfig when the feature is disabled.
    #[cfg(not(feature = "supabase-repo"))]
    pub fn to_supabase_config(&self) -> Result<Option<()>, RepositoryError> {
        let repo_type = self.repository_type().map_err(|e| {
            RepositoryError::configuration(format!("Invalid repository type: {}", e))
        })?;

        if repo_type == RepositoryType::Supabase {
            return Err(RepositoryError::configuration(
                "Supabase repository feature not enabled",
            ));
        }

        Ok(None)
    }
}
