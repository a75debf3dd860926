use std::str::FromStr;

use serde::{Deserialize, Serialize};
use shared::domain::SlotStatus;
use warehouse::{Slot, Vehicle};

const NONE_TEXT: &str = "none";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    None,
    Number,
    Type,
}

impl DisplayMode {
    /// Toggle order: number, type, none.
    pub fn next(self) -> Self {
        match self {
            DisplayMode::Number => DisplayMode::Type,
            DisplayMode::Type => DisplayMode::None,
            DisplayMode::None => DisplayMode::Number,
        }
    }

    pub fn cell_label(self, slot: &Slot) -> Option<String> {
        match self {
            DisplayMode::None => None,
            DisplayMode::Number => slot.slot_number().map(|number| number.to_string()),
            DisplayMode::Type => Some(type_word(slot).to_string()),
        }
    }
}

impl FromStr for DisplayMode {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(DisplayMode::None),
            "number" => Ok(DisplayMode::Number),
            "type" => Ok(DisplayMode::Type),
            other => Err(format!("unknown display mode '{other}'")),
        }
    }
}

fn type_word(slot: &Slot) -> &'static str {
    if slot.is_corridor() {
        "corridor"
    } else if slot.is_charging() {
        "charging"
    } else if slot.is_pickup() {
        "pickup"
    } else {
        match slot.status() {
            SlotStatus::Occupied => "occupied",
            SlotStatus::Empty => "empty",
            SlotStatus::Unavailable => "locked",
        }
    }
}

pub fn slot_tooltip(slot: &Slot) -> String {
    let number = slot
        .slot_number()
        .map(|number| number.to_string())
        .unwrap_or_else(|| NONE_TEXT.to_string());
    let mut text = format!("type: {}\nnumber: {number}", slot.kind().as_str());
    if slot.is_storage_candidate() {
        text.push_str(&format!(
            "\nproduct: {}\npallet: {}",
            slot.product_name().unwrap_or(NONE_TEXT),
            slot.pallet_number().unwrap_or(NONE_TEXT)
        ));
    }
    text
}

pub fn vehicle_tooltip(vehicle: &Vehicle) -> String {
    format!(
        "task: {}\nbattery: {}%\nstart: {}\nend: {}",
        vehicle.task,
        vehicle.battery,
        vehicle.start.as_deref().unwrap_or(NONE_TEXT),
        vehicle.end.as_deref().unwrap_or(NONE_TEXT)
    )
}
