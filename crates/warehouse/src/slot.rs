use serde::Serialize;
use shared::domain::{SlotNumber, SlotStatus};

use crate::layout::ZoneKind;

/// Display classification of a slot. When several attributes apply the later
/// variant wins, so a locked charger still shows as a charger.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotKind {
    Empty,
    Occupied,
    Corridor,
    OpenArea,
    Locked,
    Charging,
    Pickup,
}

impl SlotKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SlotKind::Empty => "empty",
            SlotKind::Occupied => "occupied",
            SlotKind::Corridor => "corridor",
            SlotKind::OpenArea => "open area",
            SlotKind::Locked => "locked",
            SlotKind::Charging => "charging",
            SlotKind::Pickup => "pickup",
        }
    }
}

/// Zone flags are only written by [`crate::GridModel::initialize`]; refreshes
/// go through [`Slot::apply_record`] and [`Slot::clear_dynamic_state`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Slot {
    status: SlotStatus,
    corridor: bool,
    open_area: bool,
    charging: bool,
    pickup: bool,
    unavailable: bool,
    slot_number: Option<SlotNumber>,
    product_name: Option<String>,
    pallet_number: Option<String>,
}

impl Slot {
    pub fn status(&self) -> SlotStatus {
        self.status
    }

    pub fn is_corridor(&self) -> bool {
        self.corridor
    }

    pub fn is_open_area(&self) -> bool {
        self.open_area
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    pub fn is_pickup(&self) -> bool {
        self.pickup
    }

    pub fn is_unavailable(&self) -> bool {
        self.unavailable
    }

    pub fn slot_number(&self) -> Option<SlotNumber> {
        self.slot_number
    }

    pub fn product_name(&self) -> Option<&str> {
        self.product_name.as_deref()
    }

    pub fn pallet_number(&self) -> Option<&str> {
        self.pallet_number.as_deref()
    }

    /// True for slots that can hold goods: no zone flag set.
    pub fn is_storage_candidate(&self) -> bool {
        !(self.corridor || self.open_area || self.charging || self.pickup)
    }

    pub fn has_zone(&self, kind: ZoneKind) -> bool {
        match kind {
            ZoneKind::Corridor => self.corridor,
            ZoneKind::OpenArea => self.open_area,
            ZoneKind::Charging => self.charging,
            ZoneKind::Pickup => self.pickup,
        }
    }

    pub fn kind(&self) -> SlotKind {
        if self.pickup {
            SlotKind::Pickup
        } else if self.charging {
            SlotKind::Charging
        } else if self.unavailable {
            SlotKind::Locked
        } else if self.open_area {
            SlotKind::OpenArea
        } else if self.corridor {
            SlotKind::Corridor
        } else if self.status == SlotStatus::Occupied {
            SlotKind::Occupied
        } else {
            SlotKind::Empty
        }
    }

    pub fn apply_record(
        &mut self,
        status: SlotStatus,
        product_name: Option<&str>,
        pallet_number: Option<&str>,
    ) {
        self.status = status;
        self.unavailable = status == SlotStatus::Unavailable;
        self.product_name = product_name.map(str::to_string);
        self.pallet_number = pallet_number.map(str::to_string);
    }

    pub fn clear_dynamic_state(&mut self) {
        self.status = SlotStatus::Empty;
        self.unavailable = false;
        self.product_name = None;
        self.pallet_number = None;
    }

    pub(crate) fn mark_zone(&mut self, kind: ZoneKind) {
        match kind {
            ZoneKind::Corridor => self.corridor = true,
            ZoneKind::OpenArea => self.open_area = true,
            ZoneKind::Charging => self.charging = true,
            ZoneKind::Pickup => self.pickup = true,
        }
    }

    pub(crate) fn assign_number(&mut self, number: SlotNumber) {
        if self.slot_number.is_none() {
            self.slot_number = Some(number);
        }
    }
}
