use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::SlotNumberError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    #[default]
    Empty,
    Occupied,
    Unavailable,
}

impl SlotStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SlotStatus::Empty => "empty",
            SlotStatus::Occupied => "occupied",
            SlotStatus::Unavailable => "unavailable",
        }
    }
}

impl FromStr for SlotStatus {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "empty" => Ok(SlotStatus::Empty),
            "occupied" => Ok(SlotStatus::Occupied),
            "unavailable" => Ok(SlotStatus::Unavailable),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage coordinates, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPos {
    pub row: usize,
    pub col: usize,
}

impl GridPos {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// A `"{layer}-{row}-{col}"` slot identifier. Row and column are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotNumber {
    pub layer: u32,
    pub row: u32,
    pub col: u32,
}

impl SlotNumber {
    pub fn new(layer: u32, row: u32, col: u32) -> Self {
        Self { layer, row, col }
    }

    /// 0-indexed storage position addressed by this number.
    pub fn grid_pos(&self) -> Option<GridPos> {
        let row = (self.row as usize).checked_sub(1)?;
        let col = (self.col as usize).checked_sub(1)?;
        Some(GridPos::new(row, col))
    }
}

impl fmt::Display for SlotNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.layer, self.row, self.col)
    }
}

impl FromStr for SlotNumber {
    type Err = SlotNumberError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = raw.trim().split('-').collect();
        if parts.len() != 3 {
            return Err(SlotNumberError::PartCount {
                raw: raw.to_string(),
                found: parts.len(),
            });
        }

        let mut values = [0u32; 3];
        for (value, part) in values.iter_mut().zip(&parts) {
            *value = part.parse().map_err(|_| SlotNumberError::NonNumeric {
                raw: raw.to_string(),
                part: (*part).to_string(),
            })?;
        }

        let [layer, row, col] = values;
        if row == 0 || col == 0 {
            return Err(SlotNumberError::ZeroIndex {
                raw: raw.to_string(),
            });
        }

        Ok(Self { layer, row, col })
    }
}

impl Serialize for SlotNumber {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotNumber {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// Vehicle identifiers arrive either as JSON numbers or strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VehicleId {
    Number(i64),
    Text(String),
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VehicleId::Number(id) => write!(f, "{id}"),
            VehicleId::Text(id) => f.write_str(id),
        }
    }
}

/// Index base of vehicle `row`/`col` values in the feed. Backends disagree, so
/// the monitor normalizes to 1-indexed coordinates on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum IndexBase {
    Zero,
    #[default]
    One,
}

impl IndexBase {
    /// Saturates instead of overflowing; values that far out are off the grid
    /// either way.
    pub fn to_one_based(self, value: i64) -> i64 {
        match self {
            IndexBase::Zero => value.saturating_add(1),
            IndexBase::One => value,
        }
    }
}

impl TryFrom<u8> for IndexBase {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(IndexBase::Zero),
            1 => Ok(IndexBase::One),
            other => Err(format!("index base must be 0 or 1, got {other}")),
        }
    }
}

impl From<IndexBase> for u8 {
    fn from(base: IndexBase) -> Self {
        match base {
            IndexBase::Zero => 0,
            IndexBase::One => 1,
        }
    }
}

impl FromStr for IndexBase {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let value: u8 = raw
            .trim()
            .parse()
            .map_err(|_| format!("index base must be 0 or 1, got '{}'", raw.trim()))?;
        IndexBase::try_from(value)
    }
}
