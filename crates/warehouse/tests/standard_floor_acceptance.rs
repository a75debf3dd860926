use shared::domain::{GridPos, SlotStatus};
use warehouse::{GridModel, LayoutConfig, OccupancyStats, SlotKind};

#[test]
fn standard_floor_layout_and_capacity() {
    let grid = GridModel::from_layout(&LayoutConfig::standard_floor()).expect("standard floor");

    assert_eq!((grid.rows(), grid.cols()), (12, 18));
    assert_eq!(
        grid.occupancy_stats(),
        OccupancyStats {
            total: 151,
            used: 0,
            free: 151
        }
    );

    let charger = grid.slot(GridPos::new(11, 6)).expect("charger");
    assert!(charger.is_charging());
    assert!(charger.is_open_area());
    assert_eq!(charger.kind(), SlotKind::Charging);

    for pickup in [GridPos::new(10, 5), GridPos::new(10, 12)] {
        assert_eq!(grid.slot(pickup).expect("pickup").kind(), SlotKind::Pickup);
    }

    let cross = grid.slot(GridPos::new(6, 7)).expect("cross corridor");
    assert!(cross.is_corridor());
    assert_eq!(
        grid.slot(GridPos::new(0, 0))
            .and_then(|slot| slot.slot_number())
            .map(|number| number.to_string()),
        Some("1-1-1".to_string())
    );
    assert_eq!(
        grid.slot(GridPos::new(11, 17))
            .and_then(|slot| slot.slot_number())
            .map(|number| number.to_string()),
        Some("1-12-18".to_string())
    );
}

#[test]
fn standard_floor_serializes_for_renderers() {
    let mut grid = GridModel::from_layout(&LayoutConfig::standard_floor()).expect("standard floor");
    grid.slot_mut(GridPos::new(0, 0))
        .expect("slot")
        .apply_record(SlotStatus::Occupied, Some("X"), None);

    let json = serde_json::to_value(&grid).expect("json");
    assert_eq!(json["rows"], 12);
    assert_eq!(json["slots"][0]["status"], "occupied");
    assert_eq!(json["slots"][0]["slot_number"], "1-1-1");
    assert_eq!(json["slots"][0]["product_name"], "X");
}
