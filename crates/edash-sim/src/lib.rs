//! ---
//! ems_section: "11-simulation"
//! ems_subsection: "01-bootstrap"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Simulation module exports and shared types."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
//! Synthetic data producers for the energy dashboard: consumption series,
//! flagged anomalies and the static recommendation catalog.
//!
//! Every producer takes an injected random source so seeded runs are
//! reproducible; [`SimulationEngine`] bundles one for callers that do not
//! care about the rng type.

pub mod anomalies;
pub mod errors;
pub mod generator;
pub mod model;
pub mod suggestions;

pub use anomalies::{sample_anomalies, ANOMALY_BATCH_SIZE};
pub use errors::{Result, SimError};
pub use generator::{generate_readings, SimulationEngine};
pub use model::{
    Anomaly, AnomalyKind, DeviceType, Location, Reading, Severity, Suggestion, SuggestionKind,
};
pub use suggestions::suggestion_catalog;
