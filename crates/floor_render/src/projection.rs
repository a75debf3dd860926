use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared::domain::SlotStatus;
use warehouse::{Slot, SlotKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotIcon {
    Vacant,
    Occupied,
    Passage,
    Locked,
    Charger,
    Loading,
}

impl SlotIcon {
    pub fn asset(self) -> &'static str {
        match self {
            SlotIcon::Vacant => "vacant.png",
            SlotIcon::Occupied => "occupancy.png",
            SlotIcon::Passage => "passage.png",
            SlotIcon::Locked => "locked.png",
            SlotIcon::Charger => "charger.png",
            SlotIcon::Loading => "loading.png",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellMark {
    Icon(SlotIcon),
    /// Heatmap class: 1 empty, 2 occupied, 3 corridor, 4 open area,
    /// 5 locked, 6 charging, 7 pickup.
    Heat(u8),
}

/// Maps one slot to what a renderer should draw for it. `None` hides the cell.
pub trait RenderProjection: Send + Sync {
    fn name(&self) -> &'static str;
    fn project_slot(&self, slot: &Slot) -> Option<CellMark>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IconProjection;

impl RenderProjection for IconProjection {
    fn name(&self) -> &'static str {
        "icon"
    }

    fn project_slot(&self, slot: &Slot) -> Option<CellMark> {
        if slot.is_open_area() && !slot.is_charging() && !slot.is_pickup() {
            return None;
        }

        let mut icon = SlotIcon::Vacant;
        if slot.status() == SlotStatus::Occupied {
            icon = SlotIcon::Occupied;
        }
        if slot.is_corridor() {
            icon = SlotIcon::Passage;
        }
        if slot.is_unavailable() {
            icon = SlotIcon::Locked;
        }
        if slot.is_charging() {
            icon = SlotIcon::Charger;
        }
        if slot.is_pickup() {
            icon = SlotIcon::Loading;
        }
        Some(CellMark::Icon(icon))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HeatmapProjection;

impl HeatmapProjection {
    pub fn class_code(kind: SlotKind) -> u8 {
        match kind {
            SlotKind::Empty => 1,
            SlotKind::Occupied => 2,
            SlotKind::Corridor => 3,
            SlotKind::OpenArea => 4,
            SlotKind::Locked => 5,
            SlotKind::Charging => 6,
            SlotKind::Pickup => 7,
        }
    }
}

impl RenderProjection for HeatmapProjection {
    fn name(&self) -> &'static str {
        "heatmap"
    }

    fn project_slot(&self, slot: &Slot) -> Option<CellMark> {
        Some(CellMark::Heat(Self::class_code(slot.kind())))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    #[default]
    Icon,
    Heatmap,
}

impl ProjectionKind {
    pub fn build(self) -> Box<dyn RenderProjection> {
        match self {
            ProjectionKind::Icon => Box::new(IconProjection),
            ProjectionKind::Heatmap => Box::new(HeatmapProjection),
        }
    }
}

impl FromStr for ProjectionKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "icon" => Ok(ProjectionKind::Icon),
            "heatmap" => Ok(ProjectionKind::Heatmap),
            other => Err(format!("unknown projection '{other}'")),
        }
    }
}
