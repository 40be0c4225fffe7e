//! `licrec-engine` — license-number reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded sheet grids, returns match
//! results. No CLI or IO dependencies.

pub mod config;
pub mod error;
pub mod indexer;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod report;

pub use config::ReconConfig;
pub use error::ReconError;
pub use model::{CellScalar, Provenance, ReconIndex, ReconResult, ReconSummary, SheetGrid};
pub use normalize::normalize;
