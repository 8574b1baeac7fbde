//! Integration tests for the service layer over the in-memory store.
//!
//! These exercise the full fetch → series → analysis path the HTTP handlers
//! use, plus repository selection from the environment.

mod support;

use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};

use lightwell::api::{EngineConfig, Sample, SampleSeries, TimeRange};
use lightwell::db::repositories::LocalRepository;
use lightwell::db::repository::MeasurementRepository;
use lightwell::db::{RepositoryFactory, RepositoryType};
use lightwell::services::{analyze_range, build_insight_context};

use support::with_scoped_env;

/// Timestamp at the given Bogota wall-clock time on 2026-03-10.
fn local(h: u32, m: u32) -> DateTime<Utc> {
    FixedOffset::west_opt(5 * 3600)
        .unwrap()
        .with_ymd_and_hms(2026, 3, 10, h, m, 0)
        .unwrap()
        .with_timezone(&Utc)
}

/// Bright morning: 300 EDI every 5 minutes from 06:00 to 10:30 local.
fn seed_bright_morning(repo: &LocalRepository) {
    repo.insert_samples((0..=54).map(|i| Sample::new(local(6, 0) + Duration::minutes(i * 5), 300.0)));
}

#[tokio::test]
async fn test_health_check() {
    let repo = LocalRepository::new();
    assert!(repo.health_check().await.unwrap());
}

#[tokio::test]
async fn test_fetch_and_analyze_round_trip() {
    let repo = LocalRepository::new();
    seed_bright_morning(&repo);

    let range = TimeRange::new(local(0, 0), local(23, 59)).unwrap();
    let rows = repo.fetch_samples(&range).await.unwrap();
    assert_eq!(rows.len(), 55);

    let series = SampleSeries::new(rows).unwrap();
    let analysis = analyze_range(&series, &EngineConfig::default());

    assert_eq!(analysis.count, 55);
    assert_eq!(analysis.features_global.edi_mean, Some(300.0));
    assert!(analysis.compliance.global["tier_1"].compliant);
    assert!(analysis.compliance.global["tier_2"].compliant);
    assert_eq!(analysis.compliance.by_day.len(), 1);
}

#[tokio::test]
async fn test_narrow_query_range_limits_analysis() {
    let repo = LocalRepository::new();
    seed_bright_morning(&repo);

    // Only the first hour: long enough to exist, too short to comply.
    let range = TimeRange::new(local(6, 0), local(7, 0)).unwrap();
    let rows = repo.fetch_samples(&range).await.unwrap();
    let series = SampleSeries::new(rows).unwrap();
    let analysis = analyze_range(&series, &EngineConfig::default());

    assert_eq!(analysis.count, 13);
    let tier_1 = &analysis.compliance.global["tier_1"];
    assert!(!tier_1.compliant);
    assert_eq!(tier_1.best_continuous_minutes, 60.0);
    assert_eq!(tier_1.missing_minutes, 180.0);
}

#[tokio::test]
async fn test_empty_store_yields_empty_analysis() {
    let repo = LocalRepository::new();

    let range = TimeRange::new(local(0, 0), local(23, 59)).unwrap();
    let rows = repo.fetch_samples(&range).await.unwrap();
    let series = SampleSeries::new(rows).unwrap();
    let analysis = analyze_range(&series, &EngineConfig::default());

    assert_eq!(analysis.count, 0);
    assert!(analysis.compliance.by_day.is_empty());
    assert!(!analysis.compliance.global["tier_1"].compliant);
}

#[tokio::test]
async fn test_insight_context_embeds_finalized_analysis() {
    let repo = LocalRepository::new();
    seed_bright_morning(&repo);

    let range = TimeRange::new(local(0, 0), local(23, 59)).unwrap();
    let rows = repo.fetch_samples(&range).await.unwrap();
    let series = SampleSeries::new(rows).unwrap();
    let analysis = analyze_range(&series, &EngineConfig::default());

    let context = build_insight_context(&range, analysis.clone());
    assert_eq!(context.range.start, range.start);
    assert_eq!(context.analysis, analysis);
}

#[test]
fn test_repository_type_selection_from_env() {
    with_scoped_env(
        &[("REPOSITORY_TYPE", Some("local")), ("SUPABASE_URL", None)],
        || {
            assert_eq!(RepositoryType::from_env(), RepositoryType::Local);
        },
    );

    with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("SUPABASE_URL", Some("https://project.supabase.co")),
        ],
        || {
            assert_eq!(RepositoryType::from_env(), RepositoryType::Supabase);
        },
    );

    with_scoped_env(
        &[("REPOSITORY_TYPE", None), ("SUPABASE_URL", None)],
        || {
            assert_eq!(RepositoryType::from_env(), RepositoryType::Local);
        },
    );
}

#[test]
fn test_engine_config_env_overrides() {
    let config = with_scoped_env(
        &[
            ("LIGHTWELL_UTC_OFFSET_MINUTES", Some("120")),
            ("LIGHTWELL_MAX_GAP_MINUTES", Some("20")),
            ("LIGHTWELL_NOON_CUTOFF", Some("11:30")),
        ],
        || EngineConfig::default().with_env_overrides(),
    )
    .unwrap();

    assert_eq!(config.local_utc_offset_minutes, 120);
    assert_eq!(config.max_gap_minutes, 20);
    assert_eq!(
        config.noon_cutoff,
        chrono::NaiveTime::from_hms_opt(11, 30, 0).unwrap()
    );
}

#[test]
fn test_engine_config_rejects_garbage_env_override() {
    let result = with_scoped_env(
        &[("LIGHTWELL_MAX_GAP_MINUTES", Some("soon"))],
        || EngineConfig::default().with_env_overrides(),
    );
    assert!(result.is_err());
}

#[tokio::test]
async fn test_factory_builds_local_repository_from_env() {
    let repo = with_scoped_env(
        &[("REPOSITORY_TYPE", Some("local"))],
        RepositoryFactory::from_env,
    )
    .unwrap();

    assert!(repo.health_check().await.unwrap());
    let range = TimeRange::new(local(0, 0), local(23, 59)).unwrap();
    assert!(repo.fetch_samples(&range).await.unwrap().is_empty());
}
