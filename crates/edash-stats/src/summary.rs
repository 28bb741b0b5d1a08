//! ---
//! ems_section: "08-energy-models-optimization"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Summary statistics over a consumption batch."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use edash_sim::Reading;
use serde::{Deserialize, Serialize};
use strum::Display;

use crate::errors::{Result, StatsError};

/// Share of the average consumption considered recoverable.
pub const SAVINGS_FACTOR: f64 = 0.15;
/// Relative change between batch halves needed to call a trend.
pub const TREND_THRESHOLD: f64 = 0.10;

/// Direction of recent consumption compared with the older half of a batch.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Stable,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_consumption: f64,
    pub avg_consumption: f64,
    pub peak_consumption: f64,
    pub trend: Trend,
    pub savings_potential: f64,
}

/// Summarise a reading batch.
///
/// Rejects empty batches and non-finite consumption values instead of
/// producing NaN statistics.
pub fn compute_stats(readings: &[Reading]) -> Result<Stats> {
    if readings.is_empty() {
        return Err(StatsError::EmptyBatch);
    }
    if let Some(bad) = readings.iter().find(|r| !r.consumption.is_finite()) {
        return Err(StatsError::NonFinite {
            id: bad.id.clone(),
            value: bad.consumption,
        });
    }
    let values: Vec<f64> = readings.iter().map(|r| r.consumption).collect();
    Ok(summarise(&values))
}

fn summarise(values: &[f64]) -> Stats {
    let total: f64 = values.iter().sum();
    let avg = total / values.len() as f64;
    let peak = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Stats {
        total_consumption: total,
        avg_consumption: avg,
        peak_consumption: peak,
        trend: classify_trend(values),
        savings_potential: avg * SAVINGS_FACTOR,
    }
}

/// Compare the mean of the second half against the first half.
///
/// The split point is `len / 2`, so for odd lengths the recent half holds
/// the extra value. Batches with fewer than two values are `Stable`.
pub fn classify_trend(values: &[f64]) -> Trend {
    if values.len() < 2 {
        return Trend::Stable;
    }
    let (older, recent) = values.split_at(values.len() / 2);
    let older_avg = mean(older);
    let recent_avg = mean(recent);
    if recent_avg > older_avg * (1.0 + TREND_THRESHOLD) {
        Trend::Up
    } else if recent_avg < older_avg * (1.0 - TREND_THRESHOLD) {
        Trend::Down
    } else {
        Trend::Stable
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}
