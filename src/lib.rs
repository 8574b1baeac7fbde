//! # LightWell Backend
//!
//! Circadian light (melanopic EDI) compliance assessment engine.
//!
//! This crate ingests irregularly-sampled melanopic-EDI measurements from a
//! wearable sensor store and determines, per local calendar day and per
//! regulatory tier, whether the occupant received a continuous qualifying
//! light dose of sufficient duration ending before local noon (WELL v2 L04).
//! The backend exposes a REST API via Axum.
//!
//! ## Features
//!
//! - **Compliance Engine**: gap-tolerant continuous-window detection,
//!   per-tier evaluation, and global plus per-day report assembly
//! - **Feature Summaries**: descriptive statistics over the same series
//! - **Measurement Store**: repository pattern over Supabase REST or an
//!   in-memory backend
//! - **Explanations**: optional Groq-backed natural-language summaries of
//!   already-computed results
//! - **HTTP API**: RESTful endpoints for dashboard integration
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Samples, validated series, and time range values
//! - [`compliance`]: The compliance window engine (the algorithmic core)
//! - [`services`]: Range analysis orchestration and feature reductions
//! - [`config`]: Engine configuration (tiers, offset, gap tolerance, cutoff)
//! - [`db`]: Measurement store, repository pattern, and backend selection
//! - [`llm`]: Explanation collaborator (consumes finalized results only)
//! - [`http`]: Axum-based HTTP server and request handlers
//! - [`api`]: Consolidated public DTO surface

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod api;

pub mod compliance;
pub mod config;
pub mod db;
pub mod llm;
pub mod models;

pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
