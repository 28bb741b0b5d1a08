//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Consumption share per device type and location."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use std::hash::Hash;

use edash_sim::{DeviceType, Location, Reading};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Consumption attributed to one group of a batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Share<K> {
    pub key: K,
    pub consumption: f64,
    /// Percentage of the batch total, 0 when the total is 0.
    pub percentage: f64,
}

/// Group consumption by `key`, keeping groups in first-seen order.
pub fn breakdown_by<K, F>(readings: &[Reading], key: F) -> Vec<Share<K>>
where
    K: Eq + Hash + Copy,
    F: Fn(&Reading) -> K,
{
    let mut totals: IndexMap<K, f64> = IndexMap::new();
    for reading in readings {
        *totals.entry(key(reading)).or_insert(0.0) += reading.consumption;
    }
    let total: f64 = totals.values().sum();
    totals
        .into_iter()
        .map(|(key, consumption)| Share {
            key,
            consumption,
            percentage: if total > 0.0 {
                consumption / total * 100.0
            } else {
                0.0
            },
        })
        .collect()
}

pub fn device_breakdown(readings: &[Reading]) -> Vec<Share<DeviceType>> {
    breakdown_by(readings, |reading| reading.device_type)
}

pub fn location_breakdown(readings: &[Reading]) -> Vec<Share<Location>> {
    breakdown_by(readings, |reading| reading.location)
}
