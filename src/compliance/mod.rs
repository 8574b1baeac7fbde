//! Compliance window engine.
//!
//! Determines, per local calendar day and per regulatory tier, whether the
//! occupant received a continuous qualifying melanopic-EDI dose of sufficient
//! duration ending before the configured noon cutoff.
//!
//! Data flows strictly upward and every stage is a pure function of its
//! inputs:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  Report Builder (report.rs)                               │
//! │  - global evaluation + independent per-day evaluations    │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Tier Evaluator (tier.rs)                                 │
//! │  - one detector pass per configured tier                  │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Continuous-Window Detector (window.rs)                   │
//! │  - gap-tolerant run detection, O(n) single scan           │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Local-Day Partitioner (partition.rs)                     │
//! │  - UTC series → per-local-date sub-series                 │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing in this module performs I/O, holds shared state, or raises domain
//! errors: empty and degenerate inputs degrade to well-defined non-compliant
//! results with explanatory notes.

pub mod partition;
pub mod report;
pub mod tier;
pub mod window;

pub use partition::partition_by_local_day;
pub use report::{build_compliance_report, ComplianceReport, DailyComplianceRecord};
pub use tier::{evaluate_tier, evaluate_tiers, TierEvaluation, TierResult};
pub use window::{scan_continuous_windows, ContinuousRun, WindowCriteria, WindowScan};
