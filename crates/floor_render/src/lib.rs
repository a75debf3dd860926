use serde::Serialize;
use shared::domain::{GridPos, SlotNumber, VehicleId};
use tracing::debug;
use warehouse::{GridModel, OccupancyStats, Vehicle};

mod labels;
mod projection;

pub use labels::{slot_tooltip, vehicle_tooltip, DisplayMode};
pub use projection::{
    CellMark, HeatmapProjection, IconProjection, ProjectionKind, RenderProjection, SlotIcon,
};

/// Chart point. `y` grows upwards, so row 1 sits at the top of the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ChartPoint {
    pub x: i64,
    pub y: i64,
}

impl ChartPoint {
    pub fn for_slot(rows: usize, pos: GridPos) -> Self {
        Self {
            x: pos.col as i64,
            y: rows as i64 - 1 - pos.row as i64,
        }
    }

    /// Same transform for 1-indexed vehicle coordinates. `None` when the
    /// values are too far out to place at all.
    pub fn for_feed(rows: usize, row: i64, col: i64) -> Option<Self> {
        Some(Self {
            x: col.checked_sub(1)?,
            y: i64::try_from(rows).ok()?.checked_sub(row)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneCell {
    pub pos: GridPos,
    pub point: ChartPoint,
    pub mark: CellMark,
    pub label: Option<String>,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleMarker {
    pub id: VehicleId,
    pub point: ChartPoint,
    pub color_hex: &'static str,
    pub label_color_hex: &'static str,
    pub tooltip: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DestinationMarker {
    pub vehicle_id: VehicleId,
    pub slot: SlotNumber,
    pub point: ChartPoint,
    pub label: String,
}

/// Renderer-neutral view of one reconciled model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FloorScene {
    pub rows: usize,
    pub cols: usize,
    pub projection: &'static str,
    pub display_mode: DisplayMode,
    pub cells: Vec<SceneCell>,
    pub vehicles: Vec<VehicleMarker>,
    pub destinations: Vec<DestinationMarker>,
    pub stats: OccupancyStats,
}

/// The presentation collaborator that draws scenes.
pub trait FloorRenderer: Send {
    fn render(&mut self, scene: &FloorScene) -> anyhow::Result<()>;
}

/// Renderer used when only the model is wanted.
pub struct DiscardRenderer;

impl FloorRenderer for DiscardRenderer {
    fn render(&mut self, _scene: &FloorScene) -> anyhow::Result<()> {
        Ok(())
    }
}

/// One marker per working vehicle whose `end` addresses a slot in the grid.
pub fn destination_markers(grid: &GridModel, vehicles: &[Vehicle]) -> Vec<DestinationMarker> {
    vehicles
        .iter()
        .filter_map(|vehicle| {
            let slot = vehicle.destination()?;
            let pos = slot.grid_pos().filter(|pos| grid.contains(*pos))?;
            Some(DestinationMarker {
                vehicle_id: vehicle.id.clone(),
                slot,
                point: ChartPoint::for_slot(grid.rows(), pos),
                label: format!("flag {}", vehicle.id),
            })
        })
        .collect()
}

pub fn build_scene(
    grid: &GridModel,
    vehicles: &[Vehicle],
    projection: &dyn RenderProjection,
    mode: DisplayMode,
) -> FloorScene {
    let rows = grid.rows();
    let cells = grid
        .iter()
        .filter_map(|(pos, slot)| {
            let mark = projection.project_slot(slot)?;
            Some(SceneCell {
                pos,
                point: ChartPoint::for_slot(rows, pos),
                mark,
                label: mode.cell_label(slot),
                tooltip: slot_tooltip(slot),
            })
        })
        .collect();

    let vehicle_markers = vehicles
        .iter()
        .filter_map(|vehicle| {
            let Some(point) = ChartPoint::for_feed(rows, vehicle.row, vehicle.col) else {
                debug!(
                    id = %vehicle.id,
                    row = vehicle.row,
                    col = vehicle.col,
                    "vehicle position cannot be placed on the chart"
                );
                return None;
            };
            Some(VehicleMarker {
                id: vehicle.id.clone(),
                point,
                color_hex: vehicle.color.hex(),
                label_color_hex: vehicle.label_color.hex(),
                tooltip: vehicle_tooltip(vehicle),
            })
        })
        .collect();

    FloorScene {
        rows,
        cols: grid.cols(),
        projection: projection.name(),
        display_mode: mode,
        cells,
        vehicles: vehicle_markers,
        destinations: destination_markers(grid, vehicles),
        stats: grid.occupancy_stats(),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
