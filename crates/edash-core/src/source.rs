//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Asynchronous fetch facade over the dashboard producers."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use edash_common::{LatencyConfig, Selection};
use edash_sim::{Anomaly, Reading, SimulationEngine, Suggestion};
use edash_stats::{compute_stats, Stats};
use parking_lot::Mutex;
use tracing::debug;

/// Producer of the four independent dashboard datasets.
///
/// Implementations must be side-effect free per call so the refresh loop can
/// drop an in-flight fetch at any await point.
#[async_trait]
pub trait DashboardSource: Send + Sync {
    /// Short name recorded in log events.
    fn name(&self) -> &str;

    async fn readings(&self, selection: Selection) -> Result<Vec<Reading>>;

    /// Statistics over a freshly generated batch, independent of [`Self::readings`].
    async fn stats(&self, selection: Selection) -> Result<Stats>;

    async fn anomalies(&self, selection: Selection) -> Result<Vec<Anomaly>>;

    async fn suggestions(&self) -> Result<Vec<Suggestion>>;
}

/// [`DashboardSource`] backed by the simulation engine with artificial latency.
#[derive(Debug)]
pub struct SimulatedSource {
    engine: Mutex<SimulationEngine>,
    latency: LatencyConfig,
}

impl SimulatedSource {
    pub fn new(engine: SimulationEngine, latency: LatencyConfig) -> Self {
        Self {
            engine: Mutex::new(engine),
            latency,
        }
    }

    /// Entropy or seed driven source without artificial latency.
    pub fn instant(seed: Option<u64>) -> Self {
        Self::new(SimulationEngine::new(seed), LatencyConfig::none())
    }

    pub fn latency(&self) -> &LatencyConfig {
        &self.latency
    }
}

async fn simulate_latency(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}

#[async_trait]
impl DashboardSource for SimulatedSource {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn readings(&self, selection: Selection) -> Result<Vec<Reading>> {
        simulate_latency(self.latency.readings).await;
        let readings = self
            .engine
            .lock()
            .readings(selection.period, selection.reference())?;
        debug!(period = %selection.period, count = readings.len(), "readings fetched");
        Ok(readings)
    }

    async fn stats(&self, selection: Selection) -> Result<Stats> {
        let readings = self
            .engine
            .lock()
            .readings(selection.period, selection.reference())
            .with_context(|| format!("failed to generate {} readings", selection.period))?;
        let stats = compute_stats(&readings)
            .with_context(|| format!("failed to summarise {} readings", selection.period))?;
        simulate_latency(self.latency.stats).await;
        debug!(period = %selection.period, trend = %stats.trend, "stats fetched");
        Ok(stats)
    }

    async fn anomalies(&self, selection: Selection) -> Result<Vec<Anomaly>> {
        simulate_latency(self.latency.anomalies).await;
        let anomalies = self
            .engine
            .lock()
            .anomalies(selection.period, selection.reference())?;
        debug!(period = %selection.period, count = anomalies.len(), "anomalies fetched");
        Ok(anomalies)
    }

    async fn suggestions(&self) -> Result<Vec<Suggestion>> {
        simulate_latency(self.latency.suggestions).await;
        Ok(self.engine.lock().suggestions())
    }
}
