//! Engine configuration: compliance tiers, local UTC offset, gap tolerance
//! and the noon cutoff.
//!
//! Tier definitions are static configuration, never derived from data. The
//! configuration is loaded once at process start (TOML file with environment
//! overrides) and validated there; a misconfigured tier is a startup error,
//! not a per-request failure.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Duration, FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};

/// Error raised for unusable engine configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(String),

    #[error("failed to parse config file: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// A named compliance tier: minimum melanopic EDI held for a required
/// continuous duration.
///
/// The defaults ship the two WELL v2 L04 tiers; a stricter tier is a
/// configuration addition, not a code change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierDefinition {
    /// Stable key used in report maps ("tier_1", "tier_2").
    pub name: String,
    /// Human-readable label for API consumers.
    pub label: String,
    /// Minimum melanopic EDI the run must hold.
    pub threshold_edi: f64,
    /// Required continuous duration in minutes.
    pub required_minutes: i64,
}

impl TierDefinition {
    pub fn required_duration(&self) -> Duration {
        Duration::minutes(self.required_minutes)
    }
}

/// Complete engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Fixed local UTC offset in minutes (Bogota, UTC-5, by default).
    #[serde(default = "default_local_offset_minutes")]
    pub local_utc_offset_minutes: i32,
    /// Largest tolerated gap between consecutive in-run samples, in minutes.
    /// Larger gaps break continuity even when both neighbors are above
    /// threshold.
    #[serde(default = "default_max_gap_minutes")]
    pub max_gap_minutes: i64,
    /// Local wall-clock time the evidence window must end at or before.
    /// A clock-time surrogate for solar noon.
    #[serde(default = "default_noon_cutoff")]
    pub noon_cutoff: NaiveTime,
    /// Margin (minutes) under which an evidence window is flagged as only
    /// marginally exceeding the requirement.
    #[serde(default = "default_marginal_window_minutes")]
    pub marginal_window_minutes: i64,
    /// Compliance tiers, evaluated independently.
    #[serde(default = "default_tiers")]
    pub tiers: Vec<TierDefinition>,
}

fn default_local_offset_minutes() -> i32 {
    -300
}

fn default_max_gap_minutes() -> i64 {
    10
}

fn default_noon_cutoff() -> NaiveTime {
    NaiveTime::from_hms_opt(12, 0, 0).expect("static time")
}

fn default_marginal_window_minutes() -> i64 {
    15
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn default_tiers() -> Vec<TierDefinition> {
    vec![
        TierDefinition {
            name: "tier_1".to_string(),
            label: "WELL v2 L04 Tier 1".to_string(),
            threshold_edi: 136.0,
            required_minutes: 240,
        },
        TierDefinition {
            name: "tier_2".to_string(),
            label: "WELL v2 L04 Tier 2".to_string(),
            threshold_edi: 250.0,
            required_minutes: 240,
        },
    ]
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            local_utc_offset_minutes: default_local_offset_minutes(),
            max_gap_minutes: default_max_gap_minutes(),
            noon_cutoff: default_noon_cutoff(),
            marginal_window_minutes: default_marginal_window_minutes(),
            tiers: default_tiers(),
        }
    }
}

/// Top-level shape of `lightwell.toml`. Repository settings live in their own
/// section handled by `db::repo_config`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    engine: Option<EngineConfig>,
}

impl EngineConfig {
    /// Load engine configuration from a TOML file.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Ok(EngineConfig)` - Validated configuration
    /// * `Err(ConfigError)` - If the file cannot be read, parsed or validated
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content =
            fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io(e.to_string()))?;

        let file: ConfigFile =
            toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        let config = file.engine.unwrap_or_default();
        config.validate()?;
        Ok(config)
    }

    /// Load engine configuration from the default location.
    ///
    /// Searches for `lightwell.toml` in the current and parent directory;
    /// falls back to the built-in defaults when no file exists.
    pub fn from_default_location() -> Result<Self, ConfigError> {
        let search_paths = [
            PathBuf::from("lightwell.toml"),
            PathBuf::from("../lightwell.toml"),
        ];

        for path in search_paths {
            if path.exists() {
                return Self::from_file(&path);
            }
        }

        let config = Self::default();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides on top of the loaded values.
    ///
    /// Recognized variables: `LIGHTWELL_UTC_OFFSET_MINUTES`,
    /// `LIGHTWELL_MAX_GAP_MINUTES` and `LIGHTWELL_NOON_CUTOFF` (HH:MM or
    /// HH:MM:SS). Unparseable values are configuration errors, not silent
    /// fallbacks. The result is re-validated.
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Some(raw) = non_empty_env("LIGHTWELL_UTC_OFFSET_MINUTES") {
            self.local_utc_offset_minutes = raw.parse().map_err(|_| {
                ConfigError::Invalid(format!("LIGHTWELL_UTC_OFFSET_MINUTES: {}", raw))
            })?;
        }

        if let Some(raw) = non_empty_env("LIGHTWELL_MAX_GAP_MINUTES") {
            self.max_gap_minutes = raw
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("LIGHTWELL_MAX_GAP_MINUTES: {}", raw)))?;
        }

        if let Some(raw) = non_empty_env("LIGHTWELL_NOON_CUTOFF") {
            self.noon_cutoff = NaiveTime::parse_from_str(&raw, "%H:%M:%S")
                .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M"))
                .map_err(|_| ConfigError::Invalid(format!("LIGHTWELL_NOON_CUTOFF: {}", raw)))?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Validate static invariants: positive thresholds and durations,
    /// non-negative gap tolerance, at least one tier, unique tier names.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tiers.is_empty() {
            return Err(ConfigError::Invalid(
                "at least one compliance tier must be configured".to_string(),
            ));
        }

        for tier in &self.tiers {
            if !tier.threshold_edi.is_finite() || tier.threshold_edi <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "tier '{}' has non-positive threshold {}",
                    tier.name, tier.threshold_edi
                )));
            }
            if tier.required_minutes <= 0 {
                return Err(ConfigError::Invalid(format!(
                    "tier '{}' has non-positive required duration {} min",
                    tier.name, tier.required_minutes
                )));
            }
        }

        for (i, tier) in self.tiers.iter().enumerate() {
            if self.tiers[..i].iter().any(|t| t.name == tier.name) {
                return Err(ConfigError::Invalid(format!(
                    "duplicate tier name '{}'",
                    tier.name
                )));
            }
        }

        if self.max_gap_minutes < 0 {
            return Err(ConfigError::Invalid(format!(
                "max_gap_minutes must be non-negative, got {}",
                self.max_gap_minutes
            )));
        }

        if self.local_utc_offset_minutes.abs() >= 24 * 60 {
            return Err(ConfigError::Invalid(format!(
                "local_utc_offset_minutes out of range: {}",
                self.local_utc_offset_minutes
            )));
        }

        Ok(())
    }

    /// The configured fixed offset as a chrono type.
    pub fn local_offset(&self) -> FixedOffset {
        FixedOffset::east_opt(self.local_utc_offset_minutes * 60)
            .expect("offset validated at startup")
    }

    pub fn max_gap(&self) -> Duration {
        Duration::minutes(self.max_gap_minutes)
    }
}
