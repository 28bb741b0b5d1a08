//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Error types for synthetic data producers."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SimError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SimError {
    #[error("reference {reference} leaves no room for a {hours}h span")]
    SpanOutOfRange { reference: DateTime<Utc>, hours: i64 },
}

/// Earliest instant a producer reaches when stepping `hours` back from `reference`.
pub(crate) fn span_start(reference: DateTime<Utc>, hours: i64) -> Result<DateTime<Utc>> {
    reference
        .checked_sub_signed(Duration::hours(hours))
        .ok_or(SimError::SpanOutOfRange { reference, hours })
}
