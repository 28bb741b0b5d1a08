//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Error types for consumption statistics."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use thiserror::Error;

pub type Result<T> = std::result::Result<T, StatsError>;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StatsError {
    #[error("cannot summarise an empty reading batch")]
    EmptyBatch,
    #[error("reading {id} has non-finite consumption {value}")]
    NonFinite { id: String, value: f64 },
}
