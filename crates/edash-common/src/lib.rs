//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Shared primitives and utilities for the dashboard pipeline."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
//! Core shared primitives for the edash workspace.
//! This crate exposes configuration loading, logging bootstrap, the period
//! lookup table and selection helpers consumed across the workspace.

pub mod config;
pub mod logging;
pub mod period;
pub mod time;

pub use config::{
    AppConfig, DashboardConfig, LatencyConfig, LoadedAppConfig, LoggingConfig, SimulationConfig,
};
pub use logging::{init_tracing, LogFormat};
pub use period::{BaseLevel, ParsePeriodError, Period, PeriodShape};
pub use time::{period_label, reference_instant, Selection, SelectionError, SelectionWindow};
