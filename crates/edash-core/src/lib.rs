//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Dashboard refresh runtime and fetch facade."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
//! The runtime fetches readings, statistics, anomalies and suggestions
//! concurrently, publishes them as one [`DashboardSnapshot`] and repeats on a
//! timer or whenever the selection changes.

pub mod refresh;
pub mod snapshot;
pub mod source;

pub use refresh::{fetch_all, refresh_once, Dashboard, DashboardHandle, RefreshTrigger};
pub use snapshot::{DashboardSnapshot, FetchedData, SnapshotStore};
pub use source::{DashboardSource, SimulatedSource};
