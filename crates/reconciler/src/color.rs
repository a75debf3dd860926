use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared::protocol::VehicleRecord;
use warehouse::{BatteryTier, LabelColor, VehicleColor};

pub trait ColorStrategy: Send + Sync {
    fn name(&self) -> &'static str;
    fn vehicle_color(&self, record: &VehicleRecord) -> VehicleColor;
}

/// Strict lower bounds: a battery of exactly `high_above` is medium.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryTiers {
    pub high_above: f64,
    pub medium_above: f64,
}

impl Default for BatteryTiers {
    fn default() -> Self {
        Self {
            high_above: 75.0,
            medium_above: 20.0,
        }
    }
}

impl BatteryTiers {
    pub fn tier(&self, battery: f64) -> BatteryTier {
        if battery > self.high_above {
            BatteryTier::High
        } else if battery > self.medium_above {
            BatteryTier::Medium
        } else {
            BatteryTier::Low
        }
    }
}

impl ColorStrategy for BatteryTiers {
    fn name(&self) -> &'static str {
        "battery_tiers"
    }

    fn vehicle_color(&self, record: &VehicleRecord) -> VehicleColor {
        VehicleColor::Battery(self.tier(record.battery))
    }
}

/// Battery tiers, except that one vehicle class always gets the neutral color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassiveClassNeutral {
    pub passive_type: i64,
    pub tiers: BatteryTiers,
}

impl Default for PassiveClassNeutral {
    fn default() -> Self {
        Self {
            passive_type: 0,
            tiers: BatteryTiers::default(),
        }
    }
}

impl ColorStrategy for PassiveClassNeutral {
    fn name(&self) -> &'static str {
        "passive_class_neutral"
    }

    fn vehicle_color(&self, record: &VehicleRecord) -> VehicleColor {
        if record.vehicle_type == Some(self.passive_type) {
            VehicleColor::Neutral
        } else {
            self.tiers.vehicle_color(record)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorStrategyKind {
    #[default]
    BatteryTiers,
    PassiveClassNeutral,
}

impl ColorStrategyKind {
    pub fn build(self) -> Box<dyn ColorStrategy> {
        match self {
            ColorStrategyKind::BatteryTiers => Box::new(BatteryTiers::default()),
            ColorStrategyKind::PassiveClassNeutral => Box::new(PassiveClassNeutral::default()),
        }
    }
}

impl FromStr for ColorStrategyKind {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "battery_tiers" => Ok(ColorStrategyKind::BatteryTiers),
            "passive_class_neutral" => Ok(ColorStrategyKind::PassiveClassNeutral),
            other => Err(format!("unknown color strategy '{other}'")),
        }
    }
}

/// Task strings that mean a vehicle is idle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSentinel {
    markers: Vec<String>,
}

impl Default for TaskSentinel {
    fn default() -> Self {
        Self::new(["无", "none"])
    }
}

impl TaskSentinel {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(Into::into).collect(),
        }
    }

    pub fn is_idle(&self, task: &str) -> bool {
        let task = task.trim();
        self.markers.iter().any(|marker| marker == task)
    }

    pub fn label_color(&self, task: &str) -> LabelColor {
        if self.is_idle(task) {
            LabelColor::Dark
        } else {
            LabelColor::Light
        }
    }
}
