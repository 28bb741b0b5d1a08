//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Consumption statistics for dashboard cards and charts."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
//! Derived figures over a reading batch: totals, averages, peak, trend,
//! savings estimate and per-group consumption shares.

pub mod breakdown;
pub mod errors;
pub mod summary;

pub use breakdown::{breakdown_by, device_breakdown, location_breakdown, Share};
pub use errors::{Result, StatsError};
pub use summary::{classify_trend, compute_stats, Stats, Trend, SAVINGS_FACTOR, TREND_THRESHOLD};
