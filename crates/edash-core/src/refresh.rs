//! ---
//! ems_section: "01-core-functionality"
//! ems_subsection: "module"
//! ems_type: "source"
//! ems_scope: "code"
//! ems_description: "Join-all refresh loop driven by a timer and selection changes."
//! ems_version: "v0.1.0"
//! ems_owner: "tbd"
//! ---
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use edash_common::{DashboardConfig, Selection};
use edash_logging::{edash_debug, edash_info, log_system_event, LogContext, SystemEventOutcome};
use strum::Display;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::info;

use crate::snapshot::{DashboardSnapshot, FetchedData, SnapshotStore};
use crate::source::DashboardSource;

/// Why a refresh was started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum RefreshTrigger {
    Initial,
    SelectionChanged,
    Timer,
}

/// Fetch all four datasets concurrently; any failure fails the whole refresh.
pub async fn fetch_all<S>(source: &S, selection: Selection) -> Result<FetchedData>
where
    S: DashboardSource + ?Sized,
{
    let (readings, stats, anomalies, suggestions) = tokio::try_join!(
        source.readings(selection),
        source.stats(selection),
        source.anomalies(selection),
        source.suggestions()
    )?;
    Ok(FetchedData {
        selection,
        readings,
        stats,
        anomalies,
        suggestions,
    })
}

async fn fetch_with_timeout(
    source: &dyn DashboardSource,
    selection: Selection,
    limit: Option<Duration>,
) -> Result<FetchedData> {
    match limit {
        Some(limit) => tokio::time::timeout(limit, fetch_all(source, selection))
            .await
            .map_err(|_| anyhow!("refresh timed out after {limit:?}"))?,
        None => fetch_all(source, selection).await,
    }
}

/// Run one refresh against `store`, keeping the previous snapshot on failure.
pub async fn refresh_once(
    source: &dyn DashboardSource,
    store: &SnapshotStore,
    selection: Selection,
    limit: Option<Duration>,
) -> Result<Arc<DashboardSnapshot>> {
    store.set_loading(true);
    let result = fetch_with_timeout(source, selection, limit).await;
    store.set_loading(false);
    match result {
        Ok(data) => Ok(store.publish(data)),
        Err(err) => {
            store.record_failure();
            Err(err)
        }
    }
}

/// Refresh runtime owning the source and the snapshot store.
pub struct Dashboard {
    source: Arc<dyn DashboardSource>,
    config: DashboardConfig,
    store: Arc<SnapshotStore>,
}

impl Dashboard {
    pub fn new(source: Arc<dyn DashboardSource>, config: DashboardConfig) -> Self {
        Self {
            source,
            config,
            store: Arc::new(SnapshotStore::new()),
        }
    }

    pub fn store(&self) -> Arc<SnapshotStore> {
        self.store.clone()
    }

    /// Start the refresh loop; the first refresh runs immediately.
    pub fn spawn(self, initial: Selection) -> DashboardHandle {
        let (selection_tx, selection_rx) = watch::channel(initial);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let store = self.store.clone();
        info!(
            period = %initial.period,
            interval_secs = self.config.refresh_interval.as_secs(),
            source = self.source.name(),
            "starting dashboard refresh loop"
        );
        let task = tokio::spawn(run_loop(
            self.source,
            self.store,
            self.config,
            selection_rx,
            shutdown_rx,
        ));
        DashboardHandle {
            selection: selection_tx,
            shutdown: shutdown_tx,
            store,
            task,
        }
    }
}

/// Control surface of a running dashboard.
pub struct DashboardHandle {
    selection: watch::Sender<Selection>,
    shutdown: broadcast::Sender<()>,
    store: Arc<SnapshotStore>,
    task: JoinHandle<()>,
}

impl DashboardHandle {
    /// Change the selection. An in-flight refresh for the previous selection
    /// is abandoned and a new one starts right away. Returns `false` when the
    /// selection is unchanged.
    pub fn set_selection(&self, next: Selection) -> bool {
        self.selection.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        })
    }

    pub fn selection(&self) -> Selection {
        *self.selection.borrow()
    }

    pub fn store(&self) -> Arc<SnapshotStore> {
        self.store.clone()
    }

    pub fn latest(&self) -> Option<Arc<DashboardSnapshot>> {
        self.store.latest()
    }

    pub fn is_loading(&self) -> bool {
        self.store.is_loading()
    }

    /// Receiver yielding the generation of each published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.store.subscribe()
    }

    /// Stop the loop, abandoning any in-flight refresh, and wait for it.
    pub async fn shutdown(self) -> Result<()> {
        let _ = self.shutdown.send(());
        self.task.await.context("dashboard refresh task panicked")
    }
}

async fn run_loop(
    source: Arc<dyn DashboardSource>,
    store: Arc<SnapshotStore>,
    config: DashboardConfig,
    mut selection_rx: watch::Receiver<Selection>,
    mut shutdown_rx: broadcast::Receiver<()>,
) {
    let mut ticker = interval(config.refresh_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // The first tick completes immediately; the initial refresh covers it.
    ticker.tick().await;
    let mut pending = Some(RefreshTrigger::Initial);

    loop {
        if let Some(trigger) = pending.take() {
            let selection = *selection_rx.borrow_and_update();
            let refresh = refresh_once(
                source.as_ref(),
                store.as_ref(),
                selection,
                config.refresh_timeout,
            );
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    store.set_loading(false);
                    break;
                }
                changed = selection_rx.changed() => {
                    if changed.is_err() {
                        store.set_loading(false);
                        break;
                    }
                    edash_debug!("selection changed; abandoning {trigger} refresh");
                    pending = Some(RefreshTrigger::SelectionChanged);
                    ticker.reset();
                    continue;
                }
                result = refresh => report(source.name(), selection, trigger, result),
            }
        }

        tokio::select! {
            _ = shutdown_rx.recv() => break,
            changed = selection_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                pending = Some(RefreshTrigger::SelectionChanged);
                ticker.reset();
            }
            _ = ticker.tick() => pending = Some(RefreshTrigger::Timer),
        }
    }
    info!("dashboard refresh loop stopped");
}

fn report(
    source: &str,
    selection: Selection,
    trigger: RefreshTrigger,
    result: Result<Arc<DashboardSnapshot>>,
) {
    let period = selection.period.to_string();
    let date = selection.date.map(|date| date.to_string()).unwrap_or_default();
    let ctx = LogContext::new()
        .with_period(&period)
        .with_date(&date)
        .with_source(source);
    match result {
        Ok(snapshot) => {
            let ctx = ctx.with_generation(snapshot.generation);
            edash_info!(
                context = ctx,
                "{trigger} refresh published {} readings, {} anomalies, trend {}",
                snapshot.readings.len(),
                snapshot.anomalies.len(),
                snapshot.stats.trend
            );
        }
        Err(err) => log_system_event(
            Some(&ctx),
            "dashboard.refresh",
            &format!("{trigger} refresh failed, previous snapshot retained: {err:#}"),
            SystemEventOutcome::Degraded,
        ),
    }
}
