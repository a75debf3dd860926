use serde::Serialize;
use shared::domain::{SlotNumber, VehicleId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatteryTier {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleColor {
    Battery(BatteryTier),
    /// Vehicle classes that never carry tasks.
    Neutral,
}

impl VehicleColor {
    pub fn hex(self) -> &'static str {
        match self {
            VehicleColor::Battery(BatteryTier::High) => "#00FF00",
            VehicleColor::Battery(BatteryTier::Medium) => "#FFA500",
            VehicleColor::Battery(BatteryTier::Low) => "#FF0000",
            VehicleColor::Neutral => "#000000",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelColor {
    /// Vehicle is working on a task.
    Light,
    /// Vehicle is idle.
    Dark,
}

impl LabelColor {
    pub fn hex(self) -> &'static str {
        match self {
            LabelColor::Light => "#fff",
            LabelColor::Dark => "#000",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Vehicle {
    pub id: VehicleId,
    pub row: i64,
    pub col: i64,
    pub battery: f64,
    pub task: String,
    pub start: Option<String>,
    pub end: Option<String>,
    pub vehicle_type: Option<i64>,
    /// `task` is the no-task sentinel.
    pub idle: bool,
    pub color: VehicleColor,
    pub label_color: LabelColor,
}

impl Vehicle {
    pub fn has_task(&self) -> bool {
        !self.idle
    }

    /// Parsed task destination, only for vehicles that are working.
    pub fn destination(&self) -> Option<SlotNumber> {
        if !self.has_task() {
            return None;
        }
        self.end.as_deref()?.parse().ok()
    }
}
