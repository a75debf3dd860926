use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::domain::VehicleId;

/// One poll of the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WarehouseFeed {
    #[serde(default)]
    pub slots: Vec<FeedEntry<SlotRecord>>,
    #[serde(default)]
    pub vehicles: Vec<FeedEntry<VehicleRecord>>,
}

/// One element of a feed array. An element that does not fit the record
/// shape is kept as raw JSON instead of failing the whole document.
#[derive(Debug, Clone)]
pub enum FeedEntry<T> {
    Record(T),
    Malformed { raw: Value, reason: String },
}

impl<T> FeedEntry<T> {
    pub fn record(&self) -> Option<&T> {
        match self {
            FeedEntry::Record(record) => Some(record),
            FeedEntry::Malformed { .. } => None,
        }
    }
}

impl<T> From<T> for FeedEntry<T> {
    fn from(record: T) -> Self {
        FeedEntry::Record(record)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for FeedEntry<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Ok(match T::deserialize(&raw) {
            Ok(record) => FeedEntry::Record(record),
            Err(err) => FeedEntry::Malformed {
                raw,
                reason: err.to_string(),
            },
        })
    }
}

impl<T: Serialize> Serialize for FeedEntry<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FeedEntry::Record(record) => record.serialize(serializer),
            FeedEntry::Malformed { raw, .. } => raw.serialize(serializer),
        }
    }
}

/// Slot occupancy as reported by the backend. `slot_number` and `status` stay
/// raw strings so they are checked per entry by the reconciler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotRecord {
    pub slot_number: String,
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pallet_number: Option<String>,
}

impl SlotRecord {
    pub fn product_name(&self) -> Option<&str> {
        non_blank(self.product_name.as_deref())
    }

    pub fn pallet_number(&self) -> Option<&str> {
        non_blank(self.pallet_number.as_deref())
    }
}

/// `row` and `col` are in the feed's own index base.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub id: VehicleId,
    pub row: i64,
    pub col: i64,
    pub battery: f64,
    #[serde(default)]
    pub task: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub vehicle_type: Option<i64>,
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
