use crate::{
    catalog::{Category, DEFAULT_SIZE_PERCENT, ImageSource, OverlayAsset},
    error::{OutfitterError, OutfitterResult},
    geom::StagePoint,
    stage::{InstanceId, PlacedItem, Placement},
};

/// The JSON record attached to a drag or tap. Catalog entries produce
/// creation payloads; dragging an item already on the stage produces a
/// reposition payload carrying the instance id and the `existing` marker.
/// Unknown fields are ignored on input.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TransferPayload {
    pub id: String,
    pub category: Category,
    pub image: ImageSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_percent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<InstanceId>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub existing: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl TransferPayload {
    /// Creation payload for a catalog entry.
    pub fn for_asset(asset: &OverlayAsset) -> Self {
        Self {
            id: asset.id.clone(),
            category: asset.category,
            image: asset.image.clone(),
            display_name: Some(asset.display_name.clone()),
            width_percent: Some(asset.default_width_percent),
            height_percent: Some(asset.default_height_percent),
            instance: None,
            existing: false,
        }
    }

    /// Reposition payload for an item already on the stage.
    pub fn for_existing(item: &PlacedItem) -> Self {
        Self {
            id: item.asset_id.clone(),
            category: item.category,
            image: item.image.clone(),
            display_name: Some(item.display_name.clone()),
            width_percent: Some(item.width_percent),
            height_percent: Some(item.height_percent),
            instance: Some(item.instance),
            existing: true,
        }
    }

    pub fn from_json(s: &str) -> OutfitterResult<Self> {
        serde_json::from_str(s)
            .map_err(|e| OutfitterError::payload(format!("undecodable transfer payload: {e}")))
    }

    pub fn to_json(&self) -> OutfitterResult<String> {
        serde_json::to_string(self)
            .map_err(|e| OutfitterError::payload(format!("unencodable transfer payload: {e}")))
    }

    /// The create/reposition branch. The marker or a present instance id is
    /// authoritative; a reposition payload must never create a second item.
    pub fn is_reposition(&self) -> bool {
        self.existing || self.instance.is_some()
    }

    /// Resolves this payload into a placement at the given stage position,
    /// applying the default size where the payload carries none.
    pub fn placement_at(&self, at: StagePoint) -> Placement {
        Placement {
            asset_id: self.id.clone(),
            category: self.category,
            display_name: self
                .display_name
                .clone()
                .unwrap_or_else(|| self.id.clone()),
            image: self.image.clone(),
            at,
            width_percent: self.width_percent.unwrap_or(DEFAULT_SIZE_PERCENT),
            height_percent: self.height_percent.unwrap_or(DEFAULT_SIZE_PERCENT),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn asset() -> OverlayAsset {
        OverlayAsset::new(
            "m-shirt-1",
            Category::Top,
            "Shirt",
            ImageSource::Path(PathBuf::from("assets/m-shirt-1.png")),
        )
    }

    #[test]
    fn catalog_payload_roundtrips_and_is_a_creation() {
        let payload = TransferPayload::for_asset(&asset());
        let json = payload.to_json().unwrap();
        let back = TransferPayload::from_json(&json).unwrap();
        assert!(!back.is_reposition());
        assert_eq!(back.id, "m-shirt-1");
        assert_eq!(back.width_percent, Some(25.0));
    }

    #[test]
    fn marker_or_instance_forces_reposition() {
        let mut payload = TransferPayload::for_asset(&asset());
        payload.existing = true;
        assert!(payload.is_reposition());

        let mut payload = TransferPayload::for_asset(&asset());
        payload.instance = Some(InstanceId(7));
        assert!(payload.is_reposition());
    }

    #[test]
    fn unknown_fields_and_field_order_are_tolerated() {
        let json = r#"{
            "existing": true,
            "instance": 3,
            "image": { "Path": "assets/m-shirt-1.png" },
            "hint": "ignored",
            "category": "top",
            "id": "m-shirt-1"
        }"#;
        let payload = TransferPayload::from_json(json).unwrap();
        assert!(payload.is_reposition());
        assert_eq!(payload.instance, Some(InstanceId(3)));
    }

    #[test]
    fn garbage_is_a_payload_error() {
        let err = TransferPayload::from_json("{not json").unwrap_err();
        assert!(err.to_string().contains("payload error:"));
    }

    #[test]
    fn missing_size_falls_back_to_default() {
        let json = r#"{
            "id": "m-shirt-1",
            "category": "top",
            "image": { "Path": "assets/m-shirt-1.png" }
        }"#;
        let payload = TransferPayload::from_json(json).unwrap();
        let placement = payload.placement_at(StagePoint::new(40.0, 30.0));
        assert_eq!(placement.width_percent, DEFAULT_SIZE_PERCENT);
        assert_eq!(placement.height_percent, DEFAULT_SIZE_PERCENT);
        assert_eq!(placement.display_name, "m-shirt-1");
    }
}
