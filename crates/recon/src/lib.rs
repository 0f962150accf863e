//! `pubcheck-recon` — Publication list reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded website and catalog records,
//! returns classified outcomes and a fixed-layout text report.
//! No CLI dependencies; file loaders take strings, not paths.

pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod matcher;
pub mod model;
pub mod report;
pub mod scorer;

pub use config::{MatchStrategy, ReconConfig};
pub use engine::{reconcile, run};
pub use error::ReconError;
pub use model::{CatalogRecord, Creator, MatchOutcome, ReconInput, ReconResult, WebsiteRecord};
pub use report::render;
