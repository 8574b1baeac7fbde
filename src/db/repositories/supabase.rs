//! Supabase (PostgREST) measurement repository.
//!
//! Queries the remote measurement table over its REST interface:
//! `select=created_at,edi` filtered with `gte`/`lte` on the time column and
//! ordered ascending. Rows are validated into [`Sample`]s here; malformed
//! rows never reach the compliance engine.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::db::repository::{
    ErrorContext, MeasurementRepository, RepositoryError, RepositoryResult,
};
use crate::models::{Sample, TimeRange};

const DEFAULT_TABLE: &str = "mediciones";
const TIME_COLUMN: &str = "created_at";
const EDI_COLUMN: &str = "edi";

/// Connection settings for the Supabase REST interface.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    /// Project base URL (https://<project>.supabase.co).
    pub url: String,
    /// Service or anon API key.
    pub api_key: String,
    /// Measurement table name.
    pub table: String,
}

impl SupabaseConfig {
    /// Read `SUPABASE_URL`, `SUPABASE_KEY` and optional `SUPABASE_TABLE`.
    pub fn from_env() -> Result<Self, String> {
        let url = std::env::var("SUPABASE_URL")
            .map_err(|_| "SUPABASE_URL not set".to_string())?;
        let api_key = std::env::var("SUPABASE_KEY")
            .map_err(|_| "SUPABASE_KEY not set".to_string())?;
        let table =
            std::env::var("SUPABASE_TABLE").unwrap_or_else(|_| DEFAULT_TABLE.to_string());

        if url.trim().is_empty() || api_key.trim().is_empty() {
            return Err("SUPABASE_URL and SUPABASE_KEY must be non-empty".to_string());
        }

        Ok(Self {
            url: url.trim().trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            table,
        })
    }
}

/// Raw row as returned by PostgREST.
#[derive(Debug, Deserialize)]
struct MeasurementRow {
    created_at: String,
    edi: f64,
}

/// REST-backed measurement repository.
pub struct SupabaseRepository {
    http: reqwest::Client,
    config: SupabaseConfig,
}

impl SupabaseRepository {
    /// Create a repository from explicit configuration.
    pub fn new(config: SupabaseConfig) -> RepositoryResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| RepositoryError::configuration(format!("HTTP client: {}", e)))?;
        Ok(Self { http, config })
    }

    fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.config.url, self.config.table)
    }

    fn parse_row(row: MeasurementRow) -> RepositoryResult<Sample> {
        let timestamp = parse_timestamptz(&row.created_at).ok_or_else(|| {
            RepositoryError::validation(format!("unparseable {}: {}", TIME_COLUMN, row.created_at))
                .with_operation("fetch_samples")
        })?;

        if !row.edi.is_finite() {
            return Err(RepositoryError::validation(format!(
                "non-finite {} at {}",
                EDI_COLUMN, row.created_at
            ))
            .with_operation("fetch_samples"));
        }

        Ok(Sample::new(timestamp, row.edi))
    }
}

/// Parse a PostgREST TIMESTAMPTZ string ('Z' or explicit offset).
fn parse_timestamptz(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[async_trait]
impl MeasurementRepository for SupabaseRepository {
    async fn fetch_samples(&self, range: &TimeRange) -> RepositoryResult<Vec<Sample>> {
        let response = self
            .http
            .get(self.table_url())
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .query(&[
                ("select", format!("{},{}", TIME_COLUMN, EDI_COLUMN)),
                (TIME_COLUMN, format!("gte.{}", range.start.to_rfc3339())),
                (TIME_COLUMN, format!("lte.{}", range.end.to_rfc3339())),
                ("order", format!("{}.asc", TIME_COLUMN)),
            ])
            .send()
            .await
            .map_err(|e| {
                RepositoryError::connection(e.to_string()).with_operation("fetch_samples")
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::query_with_context(
                format!("store returned {}", status),
                ErrorContext::new("fetch_samples").with_details(body),
            ));
        }

        let rows: Vec<MeasurementRow> = response.json().await.map_err(|e| {
            RepositoryError::query(format!("invalid response body: {}", e))
                .with_operation("fetch_samples")
        })?;

        rows.into_iter().map(Self::parse_row).collect()
    }

    async fn health_check(&self) -> RepositoryResult<bool> {
        let response = self
            .http
            .get(self.table_url())
            .header("apikey", &self.config.api_key)
            .bearer_auth(&self.config.api_key)
            .query(&[("select", TIME_COLUMN), ("limit", "1")])
            .send()
            .await
            .map_err(|e| {
                RepositoryError::connection(e.to_string()).with_operation("health_check")
            })?;

        Ok(response.status().is_success())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timestamptz_variants() {
        assert!(parse_timestamptz("2026-03-10T11:00:00Z").is_some());
        assert!(parse_timestamptz("2026-03-10T11:00:00+00:00").is_some());
        assert!(parse_timestamptz("2026-03-10T06:00:00-05:00").is_some());
        assert!(parse_timestamptz("not a time").is_none());
    }

    #[test]
    fn test_parse_row_rejects_non_finite() {
        let row = MeasurementRow {
            created_at: "2026-03-10T11:00:00Z".to_string(),
            edi: f64::INFINITY,
        };
        let err = SupabaseRepository::parse_row(row).unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
    }

    #[test]
    fn test_parse_row_normalizes_offset_to_utc() {
        let row = MeasurementRow {
            created_at: "2026-03-10T06:00:00-05:00".to_string(),
            edi: 150.0,
        };
        let sample = SupabaseRepository::parse_row(row).unwrap();
        assert_eq!(sample.timestamp.to_rfc3339(), "2026-03-10T11:00:00+00:00");
    }

    #[test]
    fn test_table_url() {
        let repo = SupabaseRepository::new(SupabaseConfig {
            url: "https://project.supabase.co".to_string(),
            api_key: "key".to_string(),
            table: DEFAULT_TABLE.to_string(),
        })
        .unwrap();
        assert_eq!(
            repo.table_url(),
            "https://project.supabase.co/rest/v1/mediciones"
        );
    }
}
