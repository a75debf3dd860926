use std::collections::HashSet;

use super::*;

fn small_zones() -> ZoneConfig {
    ZoneConfig {
        corridors: vec![ZoneSpan::col(1, 0, 3)],
        open_areas: vec![ZoneSpan::row(3, 2, 4)],
        charging: vec![GridPos::new(3, 4)],
        pickup: vec![GridPos::new(0, 4)],
    }
}

fn set_status(grid: &mut GridModel, row: usize, col: usize, status: SlotStatus) {
    grid.slot_mut(GridPos::new(row, col))
        .expect("slot in grid")
        .apply_record(status, None, None);
}

#[test]
fn initialize_defaults_every_slot() {
    let grid = GridModel::initialize(3, 4, &ZoneConfig::default()).expect("grid");
    assert_eq!(grid.rows(), 3);
    assert_eq!(grid.cols(), 4);
    assert_eq!(grid.iter().count(), 12);
    for (_, slot) in grid.iter() {
        assert_eq!(slot.status(), SlotStatus::Empty);
        assert!(slot.is_storage_candidate());
        assert!(!slot.is_unavailable());
        assert_eq!(slot.slot_number(), None);
        assert_eq!(slot.product_name(), None);
        assert_eq!(slot.pallet_number(), None);
    }
}

#[test]
fn zone_ranges_are_inclusive() {
    let grid = GridModel::initialize(4, 5, &small_zones()).expect("grid");
    for row in 0..4 {
        assert!(grid.slot(GridPos::new(row, 1)).expect("slot").is_corridor());
        assert!(!grid.slot(GridPos::new(row, 0)).expect("slot").is_corridor());
    }
    for col in 2..=4 {
        assert!(grid.slot(GridPos::new(3, col)).expect("slot").is_open_area());
    }
    assert!(grid.slot(GridPos::new(3, 4)).expect("slot").is_charging());
    assert!(grid.slot(GridPos::new(0, 4)).expect("slot").is_pickup());
}

#[test]
fn overlapping_zone_rules_only_add_flags() {
    let zones = ZoneConfig {
        corridors: vec![ZoneSpan::row(0, 0, 2), ZoneSpan::col(1, 0, 2)],
        open_areas: vec![ZoneSpan::row(0, 1, 1)],
        ..ZoneConfig::default()
    };
    let grid = GridModel::initialize(3, 3, &zones).expect("grid");
    let crossing = grid.slot(GridPos::new(0, 1)).expect("slot");
    assert!(crossing.is_corridor());
    assert!(crossing.is_open_area());
    assert_eq!(crossing.kind(), SlotKind::OpenArea);
}

#[test]
fn rejects_out_of_range_zones() {
    let zones = ZoneConfig {
        corridors: vec![ZoneSpan::col(4, 0, 12)],
        ..ZoneConfig::default()
    };
    assert!(matches!(
        GridModel::initialize(12, 18, &zones),
        Err(LayoutError::SpanOutOfBounds {
            kind: ZoneKind::Corridor,
            ..
        })
    ));

    let zones = ZoneConfig {
        pickup: vec![GridPos::new(2, 18)],
        ..ZoneConfig::default()
    };
    assert!(matches!(
        GridModel::initialize(12, 18, &zones),
        Err(LayoutError::PointOutOfBounds {
            kind: ZoneKind::Pickup,
            ..
        })
    ));
}

#[test]
fn rejects_inverted_spans_and_empty_grids() {
    let zones = ZoneConfig {
        open_areas: vec![ZoneSpan::row(1, 5, 2)],
        ..ZoneConfig::default()
    };
    assert!(matches!(
        GridModel::initialize(6, 6, &zones),
        Err(LayoutError::InvertedSpan { .. })
    ));
    assert_eq!(
        GridModel::initialize(0, 6, &ZoneConfig::default()),
        Err(LayoutError::EmptyGrid { rows: 0, cols: 6 })
    );
}

#[test]
fn assigns_unique_numbers_to_every_slot() {
    let mut grid = GridModel::initialize(4, 5, &small_zones()).expect("grid");
    let assigned = grid.assign_slot_numbers(2);
    assert_eq!(assigned, 20);

    let mut seen = HashSet::new();
    for (pos, slot) in grid.iter() {
        let number = slot.slot_number().expect("numbered");
        assert_eq!(
            number.to_string(),
            format!("2-{}-{}", pos.row + 1, pos.col + 1)
        );
        assert!(seen.insert(number));
    }
}

#[test]
fn slot_numbering_is_idempotent_and_stable() {
    let mut grid = GridModel::initialize(3, 3, &ZoneConfig::default()).expect("grid");
    grid.assign_slot_numbers(1);
    let first = grid.clone();
    grid.assign_slot_numbers(1);
    assert_eq!(grid, first);

    grid.assign_slot_numbers(7);
    assert_eq!(
        grid.slot_at(2, 3).and_then(Slot::slot_number),
        Some(SlotNumber::new(1, 2, 3))
    );
}

#[test]
fn occupancy_stats_leave_locked_slots_out_of_used_and_free() {
    let mut grid = GridModel::initialize(4, 5, &small_zones()).expect("grid");
    let fresh = grid.occupancy_stats();
    // 20 cells minus 4 corridor, 3 open area, 1 pickup.
    assert_eq!(
        fresh,
        OccupancyStats {
            total: 12,
            used: 0,
            free: 12
        }
    );

    set_status(&mut grid, 0, 0, SlotStatus::Occupied);
    set_status(&mut grid, 1, 0, SlotStatus::Occupied);
    set_status(&mut grid, 2, 0, SlotStatus::Unavailable);
    // corridors never count, whatever their status
    set_status(&mut grid, 0, 1, SlotStatus::Occupied);

    let stats = grid.occupancy_stats();
    assert_eq!(stats.total, 12);
    assert_eq!(stats.used, 2);
    assert_eq!(stats.free, 9);
    assert!(stats.used + stats.free < stats.total);
    assert_eq!(stats.locked(), 1);
}

#[test]
fn used_plus_free_equals_total_without_locked_slots() {
    let mut grid = GridModel::initialize(4, 5, &small_zones()).expect("grid");
    set_status(&mut grid, 0, 0, SlotStatus::Occupied);
    let stats = grid.occupancy_stats();
    assert_eq!(stats.used + stats.free, stats.total);
}

#[test]
fn kind_uses_last_rule_wins_precedence() {
    let mut grid = GridModel::initialize(4, 5, &small_zones()).expect("grid");
    set_status(&mut grid, 3, 4, SlotStatus::Unavailable);
    set_status(&mut grid, 3, 2, SlotStatus::Unavailable);
    set_status(&mut grid, 0, 1, SlotStatus::Occupied);
    set_status(&mut grid, 1, 0, SlotStatus::Occupied);

    assert_eq!(grid.slot_at(4, 5).expect("slot").kind(), SlotKind::Charging);
    assert_eq!(grid.slot_at(4, 3).expect("slot").kind(), SlotKind::Locked);
    assert_eq!(grid.slot_at(1, 2).expect("slot").kind(), SlotKind::Corridor);
    assert_eq!(grid.slot_at(2, 1).expect("slot").kind(), SlotKind::Occupied);
    assert_eq!(grid.slot_at(3, 1).expect("slot").kind(), SlotKind::Empty);
    assert_eq!(grid.slot_at(1, 5).expect("slot").kind(), SlotKind::Pickup);
}

#[test]
fn clearing_dynamic_state_keeps_zones_and_numbers() {
    let mut grid = GridModel::initialize(4, 5, &small_zones()).expect("grid");
    grid.assign_slot_numbers(1);
    grid.slot_mut(GridPos::new(3, 4))
        .expect("slot")
        .apply_record(SlotStatus::Unavailable, Some("A"), Some("P1"));

    grid.clear_dynamic_state();
    let slot = grid.slot(GridPos::new(3, 4)).expect("slot");
    assert_eq!(slot.status(), SlotStatus::Empty);
    assert!(!slot.is_unavailable());
    assert_eq!(slot.product_name(), None);
    assert_eq!(slot.pallet_number(), None);
    assert!(slot.is_charging());
    assert!(slot.is_open_area());
    assert_eq!(slot.slot_number(), Some(SlotNumber::new(1, 4, 5)));
}

#[test]
fn lookups_reject_positions_outside_the_grid() {
    let grid = GridModel::initialize(2, 2, &ZoneConfig::default()).expect("grid");
    assert!(grid.slot(GridPos::new(2, 0)).is_none());
    assert!(grid.slot_at(0, 1).is_none());
    assert!(grid.slot_at(3, 1).is_none());
    assert!(grid.slot_by_number(&SlotNumber::new(1, 1, 3)).is_none());
    assert!(grid.slot_by_number(&SlotNumber::new(1, 2, 2)).is_some());
}

#[test]
fn iterates_in_row_major_order() {
    let grid = GridModel::initialize(2, 3, &ZoneConfig::default()).expect("grid");
    let order: Vec<GridPos> = grid.iter().map(|(pos, _)| pos).collect();
    assert_eq!(order[0], GridPos::new(0, 0));
    assert_eq!(order[2], GridPos::new(0, 2));
    assert_eq!(order[3], GridPos::new(1, 0));
}

#[test]
fn layout_documents_parse_from_toml() {
    let raw = r#"
rows = 5
cols = 6
layer = 3

[zones]
corridors = [{ col = 2, row_start = 0, row_end = 4 }]
open_areas = [{ row = 4, col_start = 3, col_end = 5 }]
charging = [{ row = 4, col = 5 }]
pickup = [{ row = 0, col = 0 }]
"#;
    let layout = LayoutConfig::from_toml(raw).expect("layout");
    assert_eq!(layout.layer, 3);
    assert_eq!(layout.zones.corridors, vec![ZoneSpan::col(2, 0, 4)]);
    assert_eq!(layout.zones.open_areas, vec![ZoneSpan::row(4, 3, 5)]);

    let grid = GridModel::from_layout(&layout).expect("grid");
    assert_eq!(
        grid.slot_at(5, 6).and_then(Slot::slot_number),
        Some(SlotNumber::new(3, 5, 6))
    );
    assert!(grid.slot_at(5, 6).expect("slot").is_charging());
}

#[test]
fn layout_document_defaults_layer_and_zones() {
    let layout = LayoutConfig::from_toml("rows = 2\ncols = 2\n").expect("layout");
    assert_eq!(layout.layer, 1);
    assert_eq!(layout.zones, ZoneConfig::default());
    assert!(matches!(
        LayoutConfig::from_toml("rows = \"two\""),
        Err(LayoutError::Parse(_))
    ));
}
