//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Last-good dashboard state shared between refresh loop and readers."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use edash_common::Selection;
use edash_sim::{Anomaly, DeviceType, Location, Reading, Suggestion};
use edash_stats::{device_breakdown, location_breakdown, Share, Stats};
use parking_lot::RwLock;
use serde::Serialize;
use tokio::sync::watch;

/// Results of one successful join-all fetch.
#[derive(Debug, Clone)]
pub struct FetchedData {
    pub selection: Selection,
    pub readings: Vec<Reading>,
    pub stats: Stats,
    pub anomalies: Vec<Anomaly>,
    pub suggestions: Vec<Suggestion>,
}

/// Everything the dashboard renders, published atomically.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub generation: u64,
    pub selection: Selection,
    pub label: String,
    pub refreshed_at: DateTime<Utc>,
    pub readings: Vec<Reading>,
    pub stats: Stats,
    pub anomalies: Vec<Anomaly>,
    pub suggestions: Vec<Suggestion>,
}

impl DashboardSnapshot {
    pub fn device_breakdown(&self) -> Vec<Share<DeviceType>> {
        device_breakdown(&self.readings)
    }

    pub fn location_breakdown(&self) -> Vec<Share<Location>> {
        location_breakdown(&self.readings)
    }
}

/// Holds the latest published snapshot plus loading and failure bookkeeping.
///
/// A failed refresh never touches the published snapshot.
#[derive(Debug)]
pub struct SnapshotStore {
    latest: RwLock<Option<Arc<DashboardSnapshot>>>,
    loading: AtomicBool,
    failures: AtomicU64,
    generation: AtomicU64,
    published: watch::Sender<u64>,
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotStore {
    pub fn new() -> Self {
        let (published, _) = watch::channel(0);
        Self {
            latest: RwLock::new(None),
            loading: AtomicBool::new(false),
            failures: AtomicU64::new(0),
            generation: AtomicU64::new(0),
            published,
        }
    }

    pub fn latest(&self) -> Option<Arc<DashboardSnapshot>> {
        self.latest.read().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn set_loading(&self, loading: bool) {
        self.loading.store(loading, Ordering::SeqCst);
    }

    /// Number of refreshes that failed since start.
    pub fn failures(&self) -> u64 {
        self.failures.load(Ordering::SeqCst)
    }

    pub fn record_failure(&self) -> u64 {
        self.failures.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replace all four datasets at once and notify subscribers.
    pub fn publish(&self, data: FetchedData) -> Arc<DashboardSnapshot> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let snapshot = Arc::new(DashboardSnapshot {
            generation,
            label: data.selection.label(),
            selection: data.selection,
            refreshed_at: Utc::now(),
            readings: data.readings,
            stats: data.stats,
            anomalies: data.anomalies,
            suggestions: data.suggestions,
        });
        *self.latest.write() = Some(snapshot.clone());
        self.published.send_replace(generation);
        snapshot
    }

    /// Receiver yielding the generation of each published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.published.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use edash_common::Period;
    use edash_sim::SimulationEngine;
    use edash_stats::compute_stats;

    fn fetched(period: Period) -> FetchedData {
        let selection = Selection::new(period, NaiveDate::from_ymd_opt(2024, 3, 10));
        let mut engine = SimulationEngine::seeded(5);
        let readings = engine.readings(period, selection.reference()).unwrap();
        let stats = compute_stats(&readings).unwrap();
        FetchedData {
            selection,
            readings,
            stats,
            anomalies: engine.anomalies(period, selection.reference()).unwrap(),
            suggestions: engine.suggestions(),
        }
    }

    #[test]
    fn store_starts_empty() {
        let store = SnapshotStore::new();
        assert!(store.latest().is_none());
        assert!(!store.is_loading());
        assert_eq!(store.failures(), 0);
    }

    #[test]
    fn publish_increments_generation_and_notifies() {
        let store = SnapshotStore::new();
        let rx = store.subscribe();
        let first = store.publish(fetched(Period::Daily));
        let second = store.publish(fetched(Period::Weekly));
        assert_eq!(first.generation, 1);
        assert_eq!(second.generation, 2);
        assert_eq!(*rx.borrow(), 2);
        let latest = store.latest().unwrap();
        assert_eq!(latest.selection.period, Period::Weekly);
        assert_eq!(latest.readings.len(), 7);
        assert_eq!(latest.label, "7 days ending Mar 10, 2024");
    }

    #[test]
    fn failures_do_not_touch_snapshot() {
        let store = SnapshotStore::new();
        store.publish(fetched(Period::Monthly));
        assert_eq!(store.record_failure(), 1);
        assert_eq!(store.record_failure(), 2);
        let latest = store.latest().unwrap();
        assert_eq!(latest.generation, 1);
        assert_eq!(latest.readings.len(), 30);
    }

    #[test]
    fn breakdowns_cover_whole_batch() {
        let store = SnapshotStore::new();
        let snapshot = store.publish(fetched(Period::Yearly));
        let total: f64 = snapshot
            .location_breakdown()
            .iter()
            .map(|share| share.consumption)
            .sum();
        let batch: f64 = snapshot.readings.iter().map(|r| r.consumption).sum();
        assert!((total - batch).abs() < 1e-6);
        assert!((batch - snapshot.stats.total_consumption).abs() < 1e-6);
        assert!(!snapshot.device_breakdown().is_empty());
    }

    #[test]
    fn snapshot_serialises_for_consumers() {
        let store = SnapshotStore::new();
        let snapshot = store.publish(fetched(Period::Daily));
        let value = serde_json::to_value(snapshot.as_ref()).unwrap();
        assert_eq!(value["generation"], 1);
        assert_eq!(value["selection"]["period"], "daily");
        assert!(value["stats"].get("avgConsumption").is_some());
        assert_eq!(value["readings"].as_array().unwrap().len(), 24);
    }
}
