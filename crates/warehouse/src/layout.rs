use serde::{Deserialize, Serialize};
use shared::domain::GridPos;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZoneKind {
    Corridor,
    OpenArea,
    Charging,
    Pickup,
}

/// An inclusive, 0-indexed run of slots along one row or one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZoneSpan {
    Row {
        row: usize,
        col_start: usize,
        col_end: usize,
    },
    Col {
        col: usize,
        row_start: usize,
        row_end: usize,
    },
}

impl ZoneSpan {
    pub fn row(row: usize, col_start: usize, col_end: usize) -> Self {
        ZoneSpan::Row {
            row,
            col_start,
            col_end,
        }
    }

    pub fn col(col: usize, row_start: usize, row_end: usize) -> Self {
        ZoneSpan::Col {
            col,
            row_start,
            row_end,
        }
    }

    pub fn positions(&self) -> Vec<GridPos> {
        match *self {
            ZoneSpan::Row {
                row,
                col_start,
                col_end,
            } => (col_start..=col_end).map(|col| GridPos::new(row, col)).collect(),
            ZoneSpan::Col {
                col,
                row_start,
                row_end,
            } => (row_start..=row_end).map(|row| GridPos::new(row, col)).collect(),
        }
    }

    pub(crate) fn validate(&self, kind: ZoneKind, rows: usize, cols: usize) -> Result<(), LayoutError> {
        let (start, end) = match *self {
            ZoneSpan::Row {
                col_start, col_end, ..
            } => (col_start, col_end),
            ZoneSpan::Col {
                row_start, row_end, ..
            } => (row_start, row_end),
        };
        if start > end {
            return Err(LayoutError::InvertedSpan {
                kind,
                span: *self,
            });
        }

        let (last_row, last_col) = match *self {
            ZoneSpan::Row { row, col_end, .. } => (row, col_end),
            ZoneSpan::Col { col, row_end, .. } => (row_end, col),
        };
        if last_row >= rows || last_col >= cols {
            return Err(LayoutError::SpanOutOfBounds {
                kind,
                span: *self,
                rows,
                cols,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneConfig {
    #[serde(default)]
    pub corridors: Vec<ZoneSpan>,
    #[serde(default)]
    pub open_areas: Vec<ZoneSpan>,
    #[serde(default)]
    pub charging: Vec<GridPos>,
    #[serde(default)]
    pub pickup: Vec<GridPos>,
}

/// Full floor description: dimensions, numbering layer, and fixed zones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub rows: usize,
    pub cols: usize,
    #[serde(default = "default_layer")]
    pub layer: u32,
    #[serde(default)]
    pub zones: ZoneConfig,
}

fn default_layer() -> u32 {
    1
}

impl LayoutConfig {
    pub fn from_toml(raw: &str) -> Result<Self, LayoutError> {
        toml::from_str(raw).map_err(|err| LayoutError::Parse(err.to_string()))
    }

    /// The 12x18 single-layer floor the monitor ships with.
    pub fn standard_floor() -> Self {
        Self {
            rows: 12,
            cols: 18,
            layer: 1,
            zones: ZoneConfig {
                corridors: vec![
                    ZoneSpan::col(4, 0, 11),
                    ZoneSpan::col(11, 0, 11),
                    ZoneSpan::row(6, 5, 10),
                ],
                open_areas: vec![
                    ZoneSpan::row(3, 8, 8),
                    ZoneSpan::row(8, 8, 8),
                    ZoneSpan::row(9, 6, 10),
                    ZoneSpan::row(10, 5, 10),
                    ZoneSpan::row(11, 6, 10),
                    ZoneSpan::row(8, 17, 17),
                    ZoneSpan::row(9, 13, 17),
                    ZoneSpan::row(10, 12, 17),
                    ZoneSpan::row(11, 13, 17),
                ],
                charging: vec![GridPos::new(11, 6)],
                pickup: vec![GridPos::new(10, 5), GridPos::new(10, 12)],
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("warehouse dimensions must be non-zero, got {rows}x{cols}")]
    EmptyGrid { rows: usize, cols: usize },
    #[error("{kind:?} span {span:?} has start after end")]
    InvertedSpan { kind: ZoneKind, span: ZoneSpan },
    #[error("{kind:?} span {span:?} leaves the {rows}x{cols} grid")]
    SpanOutOfBounds {
        kind: ZoneKind,
        span: ZoneSpan,
        rows: usize,
        cols: usize,
    },
    #[error("{kind:?} point {pos:?} leaves the {rows}x{cols} grid")]
    PointOutOfBounds {
        kind: ZoneKind,
        pos: GridPos,
        rows: usize,
        cols: usize,
    },
    #[error("invalid layout document: {0}")]
    Parse(String),
}
