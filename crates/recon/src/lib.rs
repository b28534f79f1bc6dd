//! `apptdiff-recon`: appointment schedule reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded grids, returns late adds.
//! No CLI or IO dependencies.

pub mod config;
pub mod dedup;
pub mod engine;
pub mod error;
pub mod header;
pub mod key;
pub mod model;
pub mod normalize;
pub mod project;
pub mod report;
pub mod schema;
pub mod summary;

pub use config::ReconConfig;
pub use engine::{run, ReconInput};
pub use error::ReconError;
pub use model::{CellValue, Grid, ProjectedRow, ReconResult, Row};
pub use report::Report;
