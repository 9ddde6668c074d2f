use std::collections::BTreeMap;

use crate::{
    catalog::{Category, ImageSource},
    geom::StagePoint,
};

/// Smallest width/height an item can be resized to, in stage percent.
pub const MIN_SIZE_PERCENT: f64 = 5.0;
/// Largest width/height the discrete resize controls allow.
pub const MAX_SIZE_PERCENT: f64 = 100.0;
/// Offset applied to a duplicated item so the copy is visibly apart.
pub const DUPLICATE_OFFSET_PERCENT: f64 = 5.0;

/// Identity of one placement. Allocated by the stage, never reused within a
/// session, stable across reordering and deletes.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct InstanceId(pub u64);

/// One overlay on the stage. `x`/`y` are the item center in percent of stage
/// size; `z` is assigned at insertion and never renumbered, so deletes leave
/// gaps and later insertions may tie.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct PlacedItem {
    pub instance: InstanceId,
    pub asset_id: String,
    pub category: Category,
    pub display_name: String,
    pub image: ImageSource,
    pub x: f64,
    pub y: f64,
    pub width_percent: f64,
    pub height_percent: f64,
    pub z: u32,
}

/// Everything needed to create a placement. Size defaults are resolved by the
/// payload layer before this struct is built.
#[derive(Clone, Debug)]
pub struct Placement {
    pub asset_id: String,
    pub category: Category,
    pub display_name: String,
    pub image: ImageSource,
    pub at: StagePoint,
    pub width_percent: f64,
    pub height_percent: f64,
}

/// Per-instance visual effects, kept out of `PlacedItem` in a sparse side
/// table. Rotation accumulates without bound; rendering wraps it modulo 360.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ItemEffects {
    pub rotation_degrees: f64,
    pub flipped: bool,
    pub opacity: f64,
}

impl Default for ItemEffects {
    fn default() -> Self {
        Self {
            rotation_degrees: 0.0,
            flipped: false,
            opacity: 1.0,
        }
    }
}

/// The stage model: placed items in insertion order, at most one selection,
/// and the effects side table. All mutation goes through this API; both the
/// pointer controllers and the discrete controls are layered on top of it.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Stage {
    items: Vec<PlacedItem>,
    effects: BTreeMap<InstanceId, ItemEffects>,
    selected: Option<InstanceId>,
    next_instance: u64,
}

impl Stage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in insertion order. Use [`Stage::render_order`] for paint order.
    pub fn items(&self) -> &[PlacedItem] {
        &self.items
    }

    pub fn get(&self, instance: InstanceId) -> Option<&PlacedItem> {
        self.items.iter().find(|item| item.instance == instance)
    }

    fn get_mut(&mut self, instance: InstanceId) -> Option<&mut PlacedItem> {
        self.items.iter_mut().find(|item| item.instance == instance)
    }

    pub fn selected(&self) -> Option<InstanceId> {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&PlacedItem> {
        self.selected.and_then(|id| self.get(id))
    }

    /// Appends a new item above everything placed so far (`z = count + 1`).
    pub fn place(&mut self, placement: Placement) -> InstanceId {
        self.next_instance += 1;
        let instance = InstanceId(self.next_instance);
        let z = self.items.len() as u32 + 1;
        self.items.push(PlacedItem {
            instance,
            asset_id: placement.asset_id,
            category: placement.category,
            display_name: placement.display_name,
            image: placement.image,
            x: placement.at.x,
            y: placement.at.y,
            width_percent: placement.width_percent.max(MIN_SIZE_PERCENT),
            height_percent: placement.height_percent.max(MIN_SIZE_PERCENT),
            z,
        });
        tracing::debug!(?instance, z, "placed item");
        instance
    }

    /// Moves an item's center. Returns false when the instance is gone.
    pub fn reposition(&mut self, instance: InstanceId, at: StagePoint) -> bool {
        match self.get_mut(instance) {
            Some(item) => {
                item.x = at.x;
                item.y = at.y;
                true
            }
            None => false,
        }
    }

    /// Sets an absolute size, flooring at the minimum. The continuous resize
    /// path has no ceiling.
    pub fn set_size(&mut self, instance: InstanceId, width: f64, height: f64) -> bool {
        match self.get_mut(instance) {
            Some(item) => {
                item.width_percent = width.max(MIN_SIZE_PERCENT);
                item.height_percent = height.max(MIN_SIZE_PERCENT);
                true
            }
            None => false,
        }
    }

    /// Offsets an item's center, clamping to the stage bounds. Used by the
    /// discrete movement controls.
    pub fn nudge(&mut self, instance: InstanceId, dx: f64, dy: f64) -> bool {
        match self.get_mut(instance) {
            Some(item) => {
                item.x = (item.x + dx).clamp(0.0, 100.0);
                item.y = (item.y + dy).clamp(0.0, 100.0);
                true
            }
            None => false,
        }
    }

    /// Offsets an item's size, clamping to the discrete-control range.
    pub fn adjust_size(&mut self, instance: InstanceId, dw: f64, dh: f64) -> bool {
        match self.get_mut(instance) {
            Some(item) => {
                item.width_percent =
                    (item.width_percent + dw).clamp(MIN_SIZE_PERCENT, MAX_SIZE_PERCENT);
                item.height_percent =
                    (item.height_percent + dh).clamp(MIN_SIZE_PERCENT, MAX_SIZE_PERCENT);
                true
            }
            None => false,
        }
    }

    /// Effects for an instance, identity defaults when none were ever set.
    pub fn effects(&self, instance: InstanceId) -> ItemEffects {
        self.effects.get(&instance).copied().unwrap_or_default()
    }

    /// Whether a side-table entry exists for this instance.
    pub fn effects_overridden(&self, instance: InstanceId) -> bool {
        self.effects.contains_key(&instance)
    }

    /// Drops the side-table entry, restoring identity effects. Placement
    /// state is untouched.
    pub fn reset_effects(&mut self, instance: InstanceId) {
        self.effects.remove(&instance);
    }

    pub fn rotate_by(&mut self, instance: InstanceId, degrees: f64) -> bool {
        if self.get(instance).is_none() {
            return false;
        }
        let entry = self.effects.entry(instance).or_default();
        entry.rotation_degrees += degrees;
        true
    }

    pub fn toggle_flip(&mut self, instance: InstanceId) -> bool {
        if self.get(instance).is_none() {
            return false;
        }
        let entry = self.effects.entry(instance).or_default();
        entry.flipped = !entry.flipped;
        true
    }

    pub fn adjust_opacity(&mut self, instance: InstanceId, delta: f64) -> bool {
        if self.get(instance).is_none() {
            return false;
        }
        let entry = self.effects.entry(instance).or_default();
        entry.opacity = (entry.opacity + delta).clamp(0.1, 1.0);
        true
    }

    pub fn select(&mut self, instance: InstanceId) -> bool {
        if self.get(instance).is_none() {
            return false;
        }
        self.selected = Some(instance);
        true
    }

    /// Tap semantics: selects the item, or deselects it when it already was
    /// selected. Returns false for unknown instances.
    pub fn toggle_select(&mut self, instance: InstanceId) -> bool {
        if self.get(instance).is_none() {
            return false;
        }
        self.selected = if self.selected == Some(instance) {
            None
        } else {
            Some(instance)
        };
        true
    }

    /// Tap on empty stage.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Copies placement and effects into a new instance offset by +5/+5, on
    /// top of the current count, and selects the copy.
    pub fn duplicate(&mut self, instance: InstanceId) -> Option<InstanceId> {
        let source = self.get(instance)?.clone();
        let effects = self.effects.get(&instance).copied();

        self.next_instance += 1;
        let copy_id = InstanceId(self.next_instance);
        let z = self.items.len() as u32 + 1;
        self.items.push(PlacedItem {
            instance: copy_id,
            x: source.x + DUPLICATE_OFFSET_PERCENT,
            y: source.y + DUPLICATE_OFFSET_PERCENT,
            z,
            ..source
        });
        if let Some(effects) = effects {
            self.effects.insert(copy_id, effects);
        }
        self.selected = Some(copy_id);
        tracing::debug!(?instance, ?copy_id, "duplicated item");
        Some(copy_id)
    }

    /// Removes an item. Remaining z values are left as they are, so gaps
    /// appear; ordering stays well defined through the stable render sort.
    pub fn remove(&mut self, instance: InstanceId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.instance != instance);
        if self.items.len() == before {
            return false;
        }
        self.effects.remove(&instance);
        if self.selected == Some(instance) {
            self.selected = None;
        }
        tracing::debug!(?instance, "removed item");
        true
    }

    /// Items in paint order: ascending z, insertion order breaking ties.
    pub fn render_order(&self) -> Vec<&PlacedItem> {
        let mut ordered: Vec<&PlacedItem> = self.items.iter().collect();
        ordered.sort_by_key(|item| item.z);
        ordered
    }
}
