use chrono::{DateTime, Utc};
use floor_render::{
    build_scene, destination_markers, DestinationMarker, DisplayMode, FloorRenderer, FloorScene,
    RenderProjection,
};
use serde::Serialize;
use serde_json::Value;
use shared::{
    domain::{IndexBase, SlotNumber, SlotStatus},
    error::{EntryError, SkippedEntry},
    protocol::{FeedEntry, SlotRecord, VehicleRecord, WarehouseFeed},
};
use tracing::{debug, info, warn};
use warehouse::{GridModel, OccupancyStats, Vehicle};

mod color;
mod feed;
mod monitor;

pub use color::{BatteryTiers, ColorStrategy, ColorStrategyKind, PassiveClassNeutral, TaskSentinel};
pub use feed::{FeedError, FeedSource, FileFeedSource, HttpFeedSource};
pub use monitor::{
    CounterSnapshot, FloorMonitor, FloorSnapshot, MonitorEvent, RefreshOutcome,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SlotApplyReport {
    pub applied: usize,
    pub skipped: Vec<SkippedEntry>,
}

/// Outcome of applying one whole feed. `skipped` lists rejected slot entries
/// first, then rejected vehicle entries.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FeedApplyReport {
    pub slots_applied: usize,
    pub vehicles_applied: usize,
    pub skipped: Vec<SkippedEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RefreshReport {
    pub slots_applied: usize,
    pub skipped: Vec<SkippedEntry>,
    pub vehicles: usize,
    pub destinations: usize,
    pub stats: OccupancyStats,
    pub render_error: Option<String>,
    pub completed_at: DateTime<Utc>,
}

/// Owns the grid and vehicle list and merges feeds into them.
pub struct StateReconciler {
    grid: GridModel,
    vehicles: Vec<Vehicle>,
    colors: Box<dyn ColorStrategy>,
    sentinel: TaskSentinel,
    index_base: IndexBase,
}

impl StateReconciler {
    pub fn new(grid: GridModel, colors: Box<dyn ColorStrategy>, sentinel: TaskSentinel) -> Self {
        Self {
            grid,
            vehicles: Vec::new(),
            colors,
            sentinel,
            index_base: IndexBase::default(),
        }
    }

    /// Index base of vehicle coordinates in incoming feeds.
    pub fn with_index_base(mut self, index_base: IndexBase) -> Self {
        self.index_base = index_base;
        self
    }

    pub fn with_defaults(grid: GridModel) -> Self {
        Self::new(grid, ColorStrategyKind::default().build(), TaskSentinel::default())
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn color_strategy(&self) -> &dyn ColorStrategy {
        self.colors.as_ref()
    }

    pub fn occupancy_stats(&self) -> OccupancyStats {
        self.grid.occupancy_stats()
    }

    pub fn reset(&mut self) {
        self.grid.clear_dynamic_state();
    }

    pub fn apply_slot_feed(&mut self, entries: &[FeedEntry<SlotRecord>]) -> SlotApplyReport {
        let mut report = SlotApplyReport::default();
        for (index, entry) in entries.iter().enumerate() {
            let (label, result) = match entry {
                FeedEntry::Record(record) => {
                    (record.slot_number.clone(), self.apply_slot_record(record))
                }
                FeedEntry::Malformed { raw, reason } => {
                    let label = entry_label(raw, "slotNumber", index);
                    let err = EntryError::MalformedSlotRecord {
                        entry: label.clone(),
                        reason: reason.clone(),
                    };
                    (label, Err(err))
                }
            };
            match result {
                Ok(()) => report.applied += 1,
                Err(err) => {
                    debug!(entry = %label, code = ?err.code(), "skipping slot entry: {err}");
                    report.skipped.push(SkippedEntry::new(label, &err));
                }
            }
        }
        if !report.skipped.is_empty() {
            warn!(
                applied = report.applied,
                skipped = report.skipped.len(),
                "slot feed contained rejected entries"
            );
        }
        report
    }

    fn apply_slot_record(&mut self, entry: &SlotRecord) -> Result<(), EntryError> {
        let number: SlotNumber = entry.slot_number.parse()?;
        let (rows, cols) = (self.grid.rows(), self.grid.cols());
        let slot = self
            .grid
            .slot_by_number_mut(&number)
            .ok_or_else(|| EntryError::OutOfBounds {
                slot_number: entry.slot_number.clone(),
                rows,
                cols,
            })?;
        let status: SlotStatus =
            entry
                .status
                .parse()
                .map_err(|status| EntryError::UnknownStatus {
                    slot_number: entry.slot_number.clone(),
                    status,
                })?;
        slot.apply_record(status, entry.product_name(), entry.pallet_number());
        Ok(())
    }

    /// Replaces the vehicle list. Entries that did not decode are left out
    /// and returned.
    pub fn apply_vehicle_feed(&mut self, entries: &[FeedEntry<VehicleRecord>]) -> Vec<SkippedEntry> {
        let mut vehicles = Vec::with_capacity(entries.len());
        let mut skipped = Vec::new();
        for (index, entry) in entries.iter().enumerate() {
            match entry {
                FeedEntry::Record(record) => vehicles.push(self.derive_vehicle(record)),
                FeedEntry::Malformed { raw, reason } => {
                    let label = entry_label(raw, "id", index);
                    let err = EntryError::MalformedVehicleRecord {
                        entry: label.clone(),
                        reason: reason.clone(),
                    };
                    debug!(entry = %label, code = ?err.code(), "skipping vehicle entry: {err}");
                    skipped.push(SkippedEntry::new(label, &err));
                }
            }
        }
        if !skipped.is_empty() {
            warn!(
                applied = vehicles.len(),
                skipped = skipped.len(),
                "vehicle feed contained rejected entries"
            );
        }
        self.vehicles = vehicles;
        skipped
    }

    fn derive_vehicle(&self, record: &VehicleRecord) -> Vehicle {
        Vehicle {
            id: record.id.clone(),
            row: self.index_base.to_one_based(record.row),
            col: self.index_base.to_one_based(record.col),
            battery: record.battery,
            task: record.task.clone(),
            start: record.start.clone(),
            end: record.end.clone(),
            vehicle_type: record.vehicle_type,
            idle: self.sentinel.is_idle(&record.task),
            color: self.colors.vehicle_color(record),
            label_color: self.sentinel.label_color(&record.task),
        }
    }

    /// Reset, then apply slots and vehicles from one feed.
    pub fn apply(&mut self, feed: &WarehouseFeed) -> FeedApplyReport {
        self.reset();
        let slots = self.apply_slot_feed(&feed.slots);
        let mut skipped = slots.skipped;
        skipped.extend(self.apply_vehicle_feed(&feed.vehicles));
        FeedApplyReport {
            slots_applied: slots.applied,
            vehicles_applied: self.vehicles.len(),
            skipped,
        }
    }

    pub fn destination_markers(&self) -> Vec<DestinationMarker> {
        destination_markers(&self.grid, &self.vehicles)
    }

    pub fn scene(&self, projection: &dyn RenderProjection, mode: DisplayMode) -> FloorScene {
        build_scene(&self.grid, &self.vehicles, projection, mode)
    }

    pub async fn refresh<S>(
        &mut self,
        source: &S,
        renderer: &mut dyn FloorRenderer,
        projection: &dyn RenderProjection,
        mode: DisplayMode,
    ) -> Result<RefreshReport, FeedError>
    where
        S: FeedSource + ?Sized,
    {
        let feed = source.fetch().await?;
        Ok(self.complete_cycle(&feed, renderer, projection, mode))
    }

    /// The synchronous part of a cycle, run after a successful fetch.
    pub fn complete_cycle(
        &mut self,
        feed: &WarehouseFeed,
        renderer: &mut dyn FloorRenderer,
        projection: &dyn RenderProjection,
        mode: DisplayMode,
    ) -> RefreshReport {
        let applied = self.apply(feed);
        let scene = self.scene(projection, mode);
        let render_error = renderer.render(&scene).err().map(|err| {
            warn!(error = %err, "renderer rejected floor scene");
            format!("{err:#}")
        });

        info!(
            slots = applied.slots_applied,
            skipped = applied.skipped.len(),
            vehicles = applied.vehicles_applied,
            total = scene.stats.total,
            used = scene.stats.used,
            free = scene.stats.free,
            "reconciled warehouse feed"
        );

        RefreshReport {
            slots_applied: applied.slots_applied,
            skipped: applied.skipped,
            vehicles: applied.vehicles_applied,
            destinations: scene.destinations.len(),
            stats: scene.stats,
            render_error,
            completed_at: Utc::now(),
        }
    }
}

/// Names a rejected entry by its key field when that is readable, otherwise
/// by its position in the feed array.
fn entry_label(raw: &Value, key: &str, index: usize) -> String {
    match raw.get(key) {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => format!("#{index}"),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
