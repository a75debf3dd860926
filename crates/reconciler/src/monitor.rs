use std::{
    sync::{
        atomic::{AtomicBool, AtomicU64, Ordering},
        Arc,
    },
    time::Duration,
};

use floor_render::{DisplayMode, FloorRenderer, RenderProjection};
use serde::Serialize;
use tokio::{
    sync::{broadcast, Mutex, RwLock},
    task::JoinHandle,
    time::MissedTickBehavior,
};
use tracing::{debug, info, warn};
use warehouse::{GridModel, OccupancyStats, Vehicle};

use crate::{FeedSource, RefreshReport, StateReconciler};

#[derive(Debug, Clone, PartialEq)]
pub enum MonitorEvent {
    Refreshed(RefreshReport),
    RefreshFailed { message: String },
    RefreshSkipped,
    DisplayModeChanged(DisplayMode),
}

#[derive(Debug, Clone, PartialEq)]
pub enum RefreshOutcome {
    Completed(RefreshReport),
    Failed(String),
    /// Another cycle was already in flight.
    Skipped,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    pub completed: u64,
    pub failed: u64,
    pub skipped_cycles: u64,
    pub skipped_entries: u64,
}

#[derive(Default)]
struct Counters {
    completed: AtomicU64,
    failed: AtomicU64,
    skipped_cycles: AtomicU64,
    skipped_entries: AtomicU64,
}

impl Counters {
    fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            completed: self.completed.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            skipped_cycles: self.skipped_cycles.load(Ordering::Relaxed),
            skipped_entries: self.skipped_entries.load(Ordering::Relaxed),
        }
    }
}

/// Owned copy of the model for readers outside the refresh cycle.
#[derive(Debug, Clone, Serialize)]
pub struct FloorSnapshot {
    pub grid: GridModel,
    pub vehicles: Vec<Vehicle>,
    pub stats: OccupancyStats,
    pub display_mode: DisplayMode,
}

struct ModelState {
    reconciler: StateReconciler,
    display_mode: DisplayMode,
}

/// Resources used only while a cycle runs. Holding this lock is what marks a
/// cycle as in flight.
struct CycleResources {
    renderer: Box<dyn FloorRenderer>,
}

pub struct FloorMonitor {
    source: Arc<dyn FeedSource>,
    projection: Box<dyn RenderProjection>,
    state: RwLock<ModelState>,
    cycle: Mutex<CycleResources>,
    counters: Counters,
    /// Set when the display mode changed while a cycle held the renderer.
    redraw_pending: AtomicBool,
    events: broadcast::Sender<MonitorEvent>,
}

impl FloorMonitor {
    pub fn new(
        reconciler: StateReconciler,
        source: Arc<dyn FeedSource>,
        projection: Box<dyn RenderProjection>,
        renderer: Box<dyn FloorRenderer>,
    ) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            source,
            projection,
            state: RwLock::new(ModelState {
                reconciler,
                display_mode: DisplayMode::default(),
            }),
            cycle: Mutex::new(CycleResources { renderer }),
            counters: Counters::default(),
            redraw_pending: AtomicBool::new(false),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<MonitorEvent> {
        self.events.subscribe()
    }

    pub fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }

    pub async fn snapshot(&self) -> FloorSnapshot {
        let state = self.state.read().await;
        FloorSnapshot {
            grid: state.reconciler.grid().clone(),
            vehicles: state.reconciler.vehicles().to_vec(),
            stats: state.reconciler.occupancy_stats(),
            display_mode: state.display_mode,
        }
    }

    /// Runs one fetch-reset-apply-render cycle unless one is already running.
    pub async fn refresh_now(&self) -> RefreshOutcome {
        let Ok(mut cycle) = self.cycle.try_lock() else {
            self.counters.skipped_cycles.fetch_add(1, Ordering::Relaxed);
            debug!("refresh trigger ignored; a cycle is already in flight");
            let _ = self.events.send(MonitorEvent::RefreshSkipped);
            return RefreshOutcome::Skipped;
        };
        let outcome = self.run_cycle(&mut cycle).await;
        drop(cycle);
        self.flush_pending_redraw().await;
        outcome
    }

    async fn run_cycle(&self, cycle: &mut CycleResources) -> RefreshOutcome {
        let feed = match self.source.fetch().await {
            Ok(feed) => feed,
            Err(err) => {
                self.counters.failed.fetch_add(1, Ordering::Relaxed);
                warn!(source = %self.source.describe(), error = %err, "feed refresh failed; keeping previous state");
                let message = err.to_string();
                let _ = self.events.send(MonitorEvent::RefreshFailed {
                    message: message.clone(),
                });
                return RefreshOutcome::Failed(message);
            }
        };

        let report = {
            let mut state = self.state.write().await;
            let mode = state.display_mode;
            state.reconciler.complete_cycle(
                &feed,
                cycle.renderer.as_mut(),
                self.projection.as_ref(),
                mode,
            )
        };

        self.counters.completed.fetch_add(1, Ordering::Relaxed);
        self.counters
            .skipped_entries
            .fetch_add(report.skipped.len() as u64, Ordering::Relaxed);
        let _ = self.events.send(MonitorEvent::Refreshed(report.clone()));
        RefreshOutcome::Completed(report)
    }

    /// Switches to the next display mode and redraws the current model
    /// without fetching. Returns the new mode.
    pub async fn toggle_display_mode(&self) -> DisplayMode {
        let mode = {
            let mut state = self.state.write().await;
            state.display_mode = state.display_mode.next();
            state.display_mode
        };
        let _ = self.events.send(MonitorEvent::DisplayModeChanged(mode));
        self.redraw_pending.store(true, Ordering::SeqCst);
        self.flush_pending_redraw().await;
        mode
    }

    /// Draws the current model if a mode change is waiting. When the renderer
    /// is busy the holder flushes after releasing it, so no change is lost.
    async fn flush_pending_redraw(&self) {
        if !self.redraw_pending.load(Ordering::SeqCst) {
            return;
        }
        let Ok(mut cycle) = self.cycle.try_lock() else {
            return;
        };
        if !self.redraw_pending.swap(false, Ordering::SeqCst) {
            return;
        }
        let scene = {
            let state = self.state.read().await;
            state
                .reconciler
                .scene(self.projection.as_ref(), state.display_mode)
        };
        if let Err(err) = cycle.renderer.render(&scene) {
            warn!(error = %err, "renderer rejected floor scene");
        }
    }

    /// Refreshes immediately and then every `period` until the handle is
    /// aborted. Ticks missed behind a slow fetch are dropped, not queued.
    pub fn spawn_polling(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let monitor = Arc::clone(self);
        info!(
            source = %monitor.source.describe(),
            period_ms = period.as_millis() as u64,
            "starting feed polling"
        );
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                ticker.tick().await;
                monitor.refresh_now().await;
            }
        })
    }
}

#[cfg(test)]
#[path = "tests/monitor_tests.rs"]
mod tests;
