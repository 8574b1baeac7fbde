//! Measurement store implementations.
//!
//! Two backends implement the `MeasurementRepository` trait:
//! - `supabase`: production store queried over the Supabase REST interface
//! - `local`: in-memory implementation for unit testing and local development
pub mod local;
#[cfg(feature = "supabase-repo")]
pub mod supabase;

pub use local::LocalRepository;
#[cfg(feature = "supabase-repo")]
pub use supabase::{SupabaseConfig, SupabaseRepository};
