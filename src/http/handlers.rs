//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the service
//! layer for business logic. Report building is CPU-bound and runs under
//! `spawn_blocking` so long ranges do not stall the async runtime.

use axum::{
    extract::{Query, State},
    Json,
};

use super::dto::{
    AskQuery, AskResponse, DataResponse, HealthResponse, InsightResponse, RangeQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::config::EngineConfig;
use crate::llm::LlmError;
use crate::models::{SampleSeries, TimeRange};
use crate::services::{analyze_range, build_insight_context, InsightContext, RangeAnalysis};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Verify the service is running, the measurement store is reachable, and
/// whether the explanation client is configured.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let store_status = match state.repository.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        store: store_status,
        llm_configured: state.llm.is_some(),
    }))
}

// =============================================================================
// Range Analysis
// =============================================================================

/// GET /v1/data?start&end
///
/// Raw samples plus the full computed analysis for a time range: feature
/// summaries and tier compliance, global and per local day.
pub async fn get_data(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> HandlerResult<DataResponse> {
    let range = query.parse()?;
    let (series, analysis) = fetch_and_analyze(&state, &range).await?;

    Ok(Json(DataResponse {
        rows: series.samples().to_vec(),
        analysis,
    }))
}

/// GET /v1/insight?start&end
///
/// Computed context plus a model-generated summary of the range.
pub async fn get_insight(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> HandlerResult<InsightResponse> {
    let range = query.parse()?;
    let context = build_context(&state, &range).await?;

    let llm = require_llm(&state)?.generate(&context, None).await?;

    Ok(Json(InsightResponse {
        count: context.analysis.count,
        llm_text: llm.to_display_string(),
        context,
        llm,
    }))
}

/// GET /v1/ask?start&end&question
///
/// Computed context plus a model-generated answer to a free-text question.
pub async fn ask(
    State(state): State<AppState>,
    Query(query): Query<AskQuery>,
) -> HandlerResult<AskResponse> {
    let range = query.parse()?;
    let context = build_context(&state, &range).await?;

    let llm = require_llm(&state)?
        .generate(&context, Some(&query.question))
        .await?;

    Ok(Json(AskResponse {
        count: context.analysis.count,
        question: query.question,
        llm_text: llm.to_display_string(),
        context,
        llm,
    }))
}

// =============================================================================
// Shared plumbing
// =============================================================================

/// Fetch samples for a range and run the analysis off the async runtime.
async fn fetch_and_analyze(
    state: &AppState,
    range: &TimeRange,
) -> Result<(SampleSeries, RangeAnalysis), AppError> {
    let rows = state.repository.fetch_samples(range).await?;

    let series = SampleSeries::new(rows)
        .map_err(|e| AppError::Internal(format!("store returned an invalid series: {}", e)))?;

    let engine: EngineConfig = (*state.engine).clone();
    let blocking_series = series.clone();
    let analysis = tokio::task::spawn_blocking(move || analyze_range(&blocking_series, &engine))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?;

    Ok((series, analysis))
}

async fn build_context(state: &AppState, range: &TimeRange) -> Result<InsightContext, AppError> {
    let (_, analysis) = fetch_and_analyze(state, range).await?;
    Ok(build_insight_context(range, analysis))
}

fn require_llm(state: &AppState) -> Result<&crate::llm::GroqClient, AppError> {
    state
        .llm
        .as_deref()
        .ok_or(AppError::Llm(LlmError::NotConfigured))
}
