use serde::Serialize;
use shared::domain::{GridPos, SlotNumber, SlotStatus};
use tracing::info;

mod layout;
mod slot;
mod vehicle;

pub use layout::{LayoutConfig, LayoutError, ZoneConfig, ZoneKind, ZoneSpan};
pub use slot::{Slot, SlotKind};
pub use vehicle::{BatteryTier, LabelColor, Vehicle, VehicleColor};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OccupancyStats {
    pub total: usize,
    pub used: usize,
    pub free: usize,
}

impl OccupancyStats {
    /// Storage slots that are neither used nor free, i.e. locked.
    pub fn locked(&self) -> usize {
        self.total - self.used - self.free
    }
}

/// Dense row-major grid of slots. Dimensions are fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GridModel {
    rows: usize,
    cols: usize,
    slots: Vec<Slot>,
}

impl GridModel {
    pub fn initialize(rows: usize, cols: usize, zones: &ZoneConfig) -> Result<Self, LayoutError> {
        if rows == 0 || cols == 0 {
            return Err(LayoutError::EmptyGrid { rows, cols });
        }

        let spans = zones
            .corridors
            .iter()
            .map(|span| (ZoneKind::Corridor, span))
            .chain(zones.open_areas.iter().map(|span| (ZoneKind::OpenArea, span)));
        let points = zones
            .charging
            .iter()
            .map(|pos| (ZoneKind::Charging, *pos))
            .chain(zones.pickup.iter().map(|pos| (ZoneKind::Pickup, *pos)));

        let mut zone_cells = Vec::new();
        for (kind, span) in spans {
            span.validate(kind, rows, cols)?;
            zone_cells.extend(span.positions().into_iter().map(|pos| (kind, pos)));
        }
        for (kind, pos) in points {
            if pos.row >= rows || pos.col >= cols {
                return Err(LayoutError::PointOutOfBounds {
                    kind,
                    pos,
                    rows,
                    cols,
                });
            }
            zone_cells.push((kind, pos));
        }

        let mut grid = Self {
            rows,
            cols,
            slots: vec![Slot::default(); rows * cols],
        };
        for (kind, pos) in zone_cells {
            let index = grid.index(pos);
            grid.slots[index].mark_zone(kind);
        }
        Ok(grid)
    }

    /// Initializes the grid and numbers every slot with the layout's layer.
    pub fn from_layout(layout: &LayoutConfig) -> Result<Self, LayoutError> {
        let mut grid = Self::initialize(layout.rows, layout.cols, &layout.zones)?;
        grid.assign_slot_numbers(layout.layer);
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn contains(&self, pos: GridPos) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    pub fn slot(&self, pos: GridPos) -> Option<&Slot> {
        self.contains(pos).then(|| &self.slots[self.index(pos)])
    }

    pub fn slot_mut(&mut self, pos: GridPos) -> Option<&mut Slot> {
        if !self.contains(pos) {
            return None;
        }
        let index = self.index(pos);
        Some(&mut self.slots[index])
    }

    /// 1-indexed lookup, as used in slot numbers and vehicle positions.
    pub fn slot_at(&self, row: usize, col: usize) -> Option<&Slot> {
        if row == 0 || col == 0 {
            return None;
        }
        self.slot(GridPos::new(row - 1, col - 1))
    }

    /// Looks up the slot addressed by `number`. The layer is not part of the
    /// lookup; a single grid models one layer.
    pub fn slot_by_number(&self, number: &SlotNumber) -> Option<&Slot> {
        self.slot(number.grid_pos()?)
    }

    pub fn slot_by_number_mut(&mut self, number: &SlotNumber) -> Option<&mut Slot> {
        self.slot_mut(number.grid_pos()?)
    }

    /// Row-major iteration.
    pub fn iter(&self) -> impl Iterator<Item = (GridPos, &Slot)> + '_ {
        let cols = self.cols;
        self.slots
            .iter()
            .enumerate()
            .map(move |(index, slot)| (GridPos::new(index / cols, index % cols), slot))
    }

    pub fn assign_slot_numbers(&mut self, layer: u32) -> usize {
        let cols = self.cols;
        let mut assigned = 0;
        for (index, slot) in self.slots.iter_mut().enumerate() {
            let row = (index / cols + 1) as u32;
            let col = (index % cols + 1) as u32;
            slot.assign_number(SlotNumber::new(layer, row, col));
            assigned += 1;
        }
        info!(layer, assigned, "assigned slot numbers");
        assigned
    }

    pub fn clear_dynamic_state(&mut self) {
        for slot in &mut self.slots {
            slot.clear_dynamic_state();
        }
    }

    pub fn occupancy_stats(&self) -> OccupancyStats {
        let mut stats = OccupancyStats::default();
        for slot in self.slots.iter().filter(|slot| slot.is_storage_candidate()) {
            stats.total += 1;
            match slot.status() {
                SlotStatus::Occupied => stats.used += 1,
                SlotStatus::Empty => stats.free += 1,
                SlotStatus::Unavailable => {}
            }
        }
        stats
    }

    fn index(&self, pos: GridPos) -> usize {
        pos.row * self.cols + pos.col
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
