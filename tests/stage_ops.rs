use std::path::PathBuf;

use outfitter::{
    Category, DevicePoint, DropOutcome, ImageSource, InstanceId, OverlayAsset, ResizeSession,
    Stage, StageRect, TapPlacement, TransferPayload,
    interact::handle_drop,
    steps::{
        self, MoveDirection, OpacityDirection, ResizeDirection, RotateDirection,
    },
};

fn rect() -> StageRect {
    StageRect::new(0.0, 0.0, 400.0, 400.0).unwrap()
}

fn asset(id: &str) -> OverlayAsset {
    OverlayAsset::new(
        id,
        Category::Top,
        "Shirt",
        ImageSource::Path(PathBuf::from(format!("assets/{id}.png"))),
    )
}

fn drop_asset(stage: &mut Stage, id: &str, device_x: f64, device_y: f64) -> InstanceId {
    let json = TransferPayload::for_asset(&asset(id)).to_json().unwrap();
    match handle_drop(stage, rect(), DevicePoint::new(device_x, device_y), &json) {
        DropOutcome::Placed(instance) => instance,
        other => panic!("expected a placement, got {other:?}"),
    }
}

#[test]
fn drop_then_duplicate_then_rotate_scenario() {
    let mut stage = Stage::new();

    // 400x400 stage, drop at device (160, 120).
    let shirt = drop_asset(&mut stage, "m-shirt-1", 160.0, 120.0);
    let item = stage.get(shirt).unwrap();
    assert_eq!((item.x, item.y), (40.0, 30.0));
    assert_eq!(item.z, 1);

    stage.select(shirt);
    let copy = steps::duplicate_selected(&mut stage).unwrap();
    let item = stage.get(copy).unwrap();
    assert_eq!((item.x, item.y), (45.0, 35.0));
    assert_eq!(item.z, 2);
    assert_eq!(stage.selected(), Some(copy));

    for _ in 0..3 {
        steps::rotate_selected(&mut stage, RotateDirection::Clockwise);
    }
    assert_eq!(stage.effects(copy).rotation_degrees, 45.0);
    assert_eq!(stage.effects(shirt).rotation_degrees, 0.0);
}

#[test]
fn pure_placement_sequence_gets_strictly_increasing_unique_z() {
    let mut stage = Stage::new();
    let ids: Vec<InstanceId> = (0..5)
        .map(|i| drop_asset(&mut stage, &format!("item-{i}"), 40.0 * i as f64, 100.0))
        .collect();

    let zs: Vec<u32> = ids.iter().map(|id| stage.get(*id).unwrap().z).collect();
    assert_eq!(zs, vec![1, 2, 3, 4, 5]);
}

#[test]
fn repositioning_never_changes_the_item_count() {
    let mut stage = Stage::new();
    let a = drop_asset(&mut stage, "a", 100.0, 100.0);
    let _b = drop_asset(&mut stage, "b", 200.0, 200.0);
    assert_eq!(stage.len(), 2);

    let json = TransferPayload::for_existing(stage.get(a).unwrap())
        .to_json()
        .unwrap();
    for device in [(40.0, 360.0), (360.0, 40.0), (200.0, 200.0)] {
        let outcome = handle_drop(&mut stage, rect(), DevicePoint::new(device.0, device.1), &json);
        assert_eq!(outcome, DropOutcome::Moved(a));
        assert_eq!(stage.len(), 2);
    }

    let item = stage.get(a).unwrap();
    assert_eq!((item.x, item.y), (50.0, 50.0));
    assert_eq!(item.z, 1);
}

#[test]
fn rotation_accumulates_past_a_full_turn() {
    let mut stage = Stage::new();
    let id = drop_asset(&mut stage, "m-shirt-1", 200.0, 200.0);
    stage.select(id);

    for _ in 0..24 {
        steps::rotate_selected(&mut stage, RotateDirection::Clockwise);
    }
    assert_eq!(stage.effects(id).rotation_degrees, 360.0);

    steps::rotate_selected(&mut stage, RotateDirection::CounterClockwise);
    assert_eq!(stage.effects(id).rotation_degrees, 345.0);
}

#[test]
fn opacity_steps_stay_inside_the_visible_range() {
    let mut stage = Stage::new();
    let id = drop_asset(&mut stage, "m-shirt-1", 200.0, 200.0);
    stage.select(id);

    for _ in 0..30 {
        steps::fade_selected(&mut stage, OpacityDirection::Decrease);
    }
    assert!((stage.effects(id).opacity - 0.1).abs() < 1e-9);

    for _ in 0..30 {
        steps::fade_selected(&mut stage, OpacityDirection::Increase);
    }
    assert_eq!(stage.effects(id).opacity, 1.0);
}

#[test]
fn discrete_moves_clamp_at_the_stage_edge() {
    let mut stage = Stage::new();
    let id = drop_asset(&mut stage, "m-shirt-1", 396.0, 4.0);
    stage.select(id);

    for _ in 0..5 {
        steps::nudge_selected(&mut stage, MoveDirection::Right);
        steps::nudge_selected(&mut stage, MoveDirection::Up);
    }
    let item = stage.get(id).unwrap();
    assert_eq!((item.x, item.y), (100.0, 0.0));
}

#[test]
fn discrete_resize_floors_and_caps() {
    let mut stage = Stage::new();
    let id = drop_asset(&mut stage, "m-shirt-1", 200.0, 200.0);
    stage.select(id);

    for _ in 0..20 {
        steps::resize_selected(&mut stage, ResizeDirection::Narrower);
    }
    assert_eq!(stage.get(id).unwrap().width_percent, 5.0);

    for _ in 0..60 {
        steps::resize_selected(&mut stage, ResizeDirection::Wider);
    }
    assert_eq!(stage.get(id).unwrap().width_percent, 100.0);
}

#[test]
fn pointer_resize_floors_but_has_no_ceiling() {
    let mut stage = Stage::new();
    let id = drop_asset(&mut stage, "m-shirt-1", 200.0, 200.0);

    let session = ResizeSession::begin(&stage, id, DevicePoint::new(200.0, 200.0)).unwrap();

    // Dragging 360 device px on a 400 px stage adds 90 percent per axis.
    session.update(&mut stage, rect(), DevicePoint::new(560.0, 560.0));
    let item = stage.get(id).unwrap();
    assert_eq!((item.width_percent, item.height_percent), (115.0, 115.0));

    session.update(&mut stage, rect(), DevicePoint::new(-400.0, -400.0));
    let item = stage.get(id).unwrap();
    assert_eq!((item.width_percent, item.height_percent), (5.0, 5.0));
    session.finish();
}

#[test]
fn tap_flow_places_at_center_without_a_stage_tap() {
    let mut stage = Stage::new();
    let mut taps = TapPlacement::new();

    taps.choose(TransferPayload::for_asset(&asset("g-hat-1")));
    let id = taps.place_centered(&mut stage).unwrap();
    let item = stage.get(id).unwrap();
    assert_eq!((item.x, item.y), (50.0, 50.0));
    assert_eq!(item.width_percent, 25.0);
}

#[test]
fn removal_keeps_z_gaps_and_selection_consistent() {
    let mut stage = Stage::new();
    let a = drop_asset(&mut stage, "a", 100.0, 100.0);
    let b = drop_asset(&mut stage, "b", 200.0, 200.0);
    let c = drop_asset(&mut stage, "c", 300.0, 300.0);

    stage.select(b);
    assert_eq!(steps::remove_selected(&mut stage), Some(b));
    assert_eq!(stage.selected(), None);
    assert_eq!(stage.len(), 2);
    assert_eq!(stage.get(a).unwrap().z, 1);
    assert_eq!(stage.get(c).unwrap().z, 3);

    // Next placement lands at count + 1 and may tie with survivors.
    let d = drop_asset(&mut stage, "d", 40.0, 40.0);
    assert_eq!(stage.get(d).unwrap().z, 3);
}
