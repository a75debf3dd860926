use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectCode {
    MalformedSlotNumber,
    UnknownStatus,
    OutOfBounds,
    MalformedSlotRecord,
    MalformedVehicleRecord,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SlotNumberError {
    #[error("slot number '{raw}' has {found} parts, expected 3")]
    PartCount { raw: String, found: usize },
    #[error("slot number '{raw}' has non-numeric part '{part}'")]
    NonNumeric { raw: String, part: String },
    #[error("slot number '{raw}' uses a zero row or column")]
    ZeroIndex { raw: String },
}

/// Rejection of a single feed entry. The rest of the batch still applies.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error(transparent)]
    MalformedSlotNumber(#[from] SlotNumberError),
    #[error("slot '{slot_number}' has unknown status '{status}'")]
    UnknownStatus { slot_number: String, status: String },
    #[error("slot '{slot_number}' is outside the {rows}x{cols} grid")]
    OutOfBounds {
        slot_number: String,
        rows: usize,
        cols: usize,
    },
    #[error("slot entry {entry} does not match the slot record shape: {reason}")]
    MalformedSlotRecord { entry: String, reason: String },
    #[error("vehicle entry {entry} does not match the vehicle record shape: {reason}")]
    MalformedVehicleRecord { entry: String, reason: String },
}

impl EntryError {
    pub fn code(&self) -> RejectCode {
        match self {
            EntryError::MalformedSlotNumber(_) => RejectCode::MalformedSlotNumber,
            EntryError::UnknownStatus { .. } => RejectCode::UnknownStatus,
            EntryError::OutOfBounds { .. } => RejectCode::OutOfBounds,
            EntryError::MalformedSlotRecord { .. } => RejectCode::MalformedSlotRecord,
            EntryError::MalformedVehicleRecord { .. } => RejectCode::MalformedVehicleRecord,
        }
    }
}

/// `entry` is the slot number or vehicle id of the rejected element, or its
/// array position (`#3`) when neither could be read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedEntry {
    pub entry: String,
    pub code: RejectCode,
    pub reason: String,
}

impl SkippedEntry {
    pub fn new(entry: impl Into<String>, err: &EntryError) -> Self {
        Self {
            entry: entry.into(),
            code: err.code(),
            reason: err.to_string(),
        }
    }
}
