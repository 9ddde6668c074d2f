//! Discrete control surface: fixed-step adjustments applied to the selected
//! item. Thin wrappers over the stage mutation API, so pointer and button
//! interactions can never disagree on semantics.

use crate::stage::{InstanceId, Stage};

pub const MOVE_STEP_PERCENT: f64 = 2.0;
pub const RESIZE_STEP_PERCENT: f64 = 2.0;
pub const ROTATE_STEP_DEGREES: f64 = 15.0;
pub const OPACITY_STEP: f64 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ResizeDirection {
    Wider,
    Narrower,
    Taller,
    Shorter,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum RotateDirection {
    Clockwise,
    CounterClockwise,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OpacityDirection {
    Increase,
    Decrease,
}

/// Moves the selected item one step, clamped to the stage. Returns false when
/// nothing is selected.
pub fn nudge_selected(stage: &mut Stage, direction: MoveDirection) -> bool {
    let Some(id) = stage.selected() else {
        return false;
    };
    let (dx, dy) = match direction {
        MoveDirection::Up => (0.0, -MOVE_STEP_PERCENT),
        MoveDirection::Down => (0.0, MOVE_STEP_PERCENT),
        MoveDirection::Left => (-MOVE_STEP_PERCENT, 0.0),
        MoveDirection::Right => (MOVE_STEP_PERCENT, 0.0),
    };
    stage.nudge(id, dx, dy)
}

/// Resizes the selected item one step along one axis.
pub fn resize_selected(stage: &mut Stage, direction: ResizeDirection) -> bool {
    let Some(id) = stage.selected() else {
        return false;
    };
    let (dw, dh) = match direction {
        ResizeDirection::Wider => (RESIZE_STEP_PERCENT, 0.0),
        ResizeDirection::Narrower => (-RESIZE_STEP_PERCENT, 0.0),
        ResizeDirection::Taller => (0.0, RESIZE_STEP_PERCENT),
        ResizeDirection::Shorter => (0.0, -RESIZE_STEP_PERCENT),
    };
    stage.adjust_size(id, dw, dh)
}

pub fn rotate_selected(stage: &mut Stage, direction: RotateDirection) -> bool {
    let Some(id) = stage.selected() else {
        return false;
    };
    let degrees = match direction {
        RotateDirection::Clockwise => ROTATE_STEP_DEGREES,
        RotateDirection::CounterClockwise => -ROTATE_STEP_DEGREES,
    };
    stage.rotate_by(id, degrees)
}

pub fn flip_selected(stage: &mut Stage) -> bool {
    let Some(id) = stage.selected() else {
        return false;
    };
    stage.toggle_flip(id)
}

pub fn fade_selected(stage: &mut Stage, direction: OpacityDirection) -> bool {
    let Some(id) = stage.selected() else {
        return false;
    };
    let delta = match direction {
        OpacityDirection::Increase => OPACITY_STEP,
        OpacityDirection::Decrease => -OPACITY_STEP,
    };
    stage.adjust_opacity(id, delta)
}

pub fn duplicate_selected(stage: &mut Stage) -> Option<InstanceId> {
    let id = stage.selected()?;
    stage.duplicate(id)
}

pub fn remove_selected(stage: &mut Stage) -> Option<InstanceId> {
    let id = stage.selected()?;
    if stage.remove(id) { Some(id) } else { None }
}
