//! Continuous pointer controllers: drop handling, tap-to-place, and scoped
//! resize sessions. Everything here converts device coordinates through the
//! caller's live rect and funnels into the stage mutation API.

use crate::{
    geom::{DevicePoint, StagePoint, StageRect},
    payload::TransferPayload,
    stage::{InstanceId, Stage},
};

/// What a drop did to the stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropOutcome {
    Placed(InstanceId),
    Moved(InstanceId),
    Ignored,
}

/// Applies a drop at a device position. Undecodable payloads are logged and
/// ignored so a stray drop can never corrupt the stage.
pub fn handle_drop(
    stage: &mut Stage,
    rect: StageRect,
    at: DevicePoint,
    payload_json: &str,
) -> DropOutcome {
    if rect.is_degenerate() {
        tracing::warn!(?rect, "dropping event against a degenerate stage rect");
        return DropOutcome::Ignored;
    }
    let payload = match TransferPayload::from_json(payload_json) {
        Ok(payload) => payload,
        Err(err) => {
            tracing::warn!(%err, "ignoring undecodable drop payload");
            return DropOutcome::Ignored;
        }
    };
    apply_payload(stage, &payload, rect.to_stage(at))
}

fn apply_payload(stage: &mut Stage, payload: &TransferPayload, at: StagePoint) -> DropOutcome {
    if payload.is_reposition() {
        // The marker decides the branch before anything else; a reposition
        // must never create a second item.
        let Some(instance) = payload.instance else {
            tracing::warn!(id = %payload.id, "reposition payload without an instance id");
            return DropOutcome::Ignored;
        };
        if stage.reposition(instance, at) {
            DropOutcome::Moved(instance)
        } else {
            tracing::warn!(?instance, "reposition for an instance no longer on stage");
            DropOutcome::Ignored
        }
    } else {
        DropOutcome::Placed(stage.place(payload.placement_at(at)))
    }
}

/// Touch-path placement: tapping a catalog entry arms a payload, the next
/// stage tap supplies the position. With no stage tap the pending item can be
/// committed at the stage center.
#[derive(Clone, Debug, Default)]
pub struct TapPlacement {
    pending: Option<TransferPayload>,
}

impl TapPlacement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a payload from a catalog tap, replacing any earlier choice.
    pub fn choose(&mut self, payload: TransferPayload) {
        self.pending = Some(payload);
    }

    pub fn pending(&self) -> Option<&TransferPayload> {
        self.pending.as_ref()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Consumes the pending payload at a tapped stage position. Returns None
    /// when nothing was armed; the tap then falls through to selection.
    pub fn tap_stage(
        &mut self,
        stage: &mut Stage,
        rect: StageRect,
        at: DevicePoint,
    ) -> Option<InstanceId> {
        if rect.is_degenerate() {
            tracing::warn!(?rect, "dropping tap against a degenerate stage rect");
            return None;
        }
        let payload = self.pending.take()?;
        match apply_payload(stage, &payload, rect.to_stage(at)) {
            DropOutcome::Placed(id) | DropOutcome::Moved(id) => Some(id),
            DropOutcome::Ignored => None,
        }
    }

    /// Commits the pending payload at the stage center, the fallback when the
    /// user confirms a choice without tapping a position.
    pub fn place_centered(&mut self, stage: &mut Stage) -> Option<InstanceId> {
        let payload = self.pending.take()?;
        match apply_payload(stage, &payload, StagePoint::CENTER) {
            DropOutcome::Placed(id) | DropOutcome::Moved(id) => Some(id),
            DropOutcome::Ignored => None,
        }
    }
}

/// Scoped resize. Constructing the session captures the item's starting size
/// and the pointer origin; every update is computed against those, never
/// incrementally, so jitter cannot accumulate. Dropping the value is the
/// teardown.
#[derive(Clone, Debug)]
pub struct ResizeSession {
    instance: InstanceId,
    start_width: f64,
    start_height: f64,
    origin: DevicePoint,
}

impl ResizeSession {
    /// Starts a session for an item. None when the instance is not on stage.
    pub fn begin(stage: &Stage, instance: InstanceId, origin: DevicePoint) -> Option<Self> {
        let item = stage.get(instance)?;
        Some(Self {
            instance,
            start_width: item.width_percent,
            start_height: item.height_percent,
            origin,
        })
    }

    pub fn instance(&self) -> InstanceId {
        self.instance
    }

    /// Applies the current pointer position. If the item vanished mid-session
    /// this is a silent no-op; the stage keeps its last consistent state.
    pub fn update(&self, stage: &mut Stage, rect: StageRect, at: DevicePoint) {
        if rect.is_degenerate() {
            tracing::warn!(?rect, "dropping resize update against a degenerate stage rect");
            return;
        }
        let (dw, dh) = rect.delta_to_percent(at.x - self.origin.x, at.y - self.origin.y);
        if !stage.set_size(self.instance, self.start_width + dw, self.start_height + dh) {
            tracing::debug!(instance = ?self.instance, "resize update for a removed item");
        }
    }

    /// Ends the session. Consuming the value is what detaches it.
    pub fn finish(self) {
        tracing::debug!(instance = ?self.instance, "resize session finished");
    }
}
