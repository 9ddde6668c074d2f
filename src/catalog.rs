use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::error::{OutfitterError, OutfitterResult};

/// Size in stage percent applied when an asset does not declare one.
pub const DEFAULT_SIZE_PERCENT: f64 = 25.0;

/// Slot a wearable occupies. `Custom` is the group designer-made assets land
/// in; the asset's own slot is kept separately so a custom shirt still counts
/// as a top.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Top,
    Bottom,
    Headwear,
    Footwear,
    Custom,
}

/// Base character the catalog is grouped under.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Archetype {
    Male,
    Female,
    Boy,
    Girl,
}

/// Where an asset's pixels come from: a file on disk for stock art, or
/// embedded encoded bytes for designs saved out of the paint surface.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum ImageSource {
    Path(PathBuf),
    Encoded(Vec<u8>),
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct OverlayAsset {
    pub id: String,
    pub category: Category,
    pub display_name: String,
    pub image: ImageSource,
    pub default_width_percent: f64,
    pub default_height_percent: f64,
    pub custom: bool,
}

impl OverlayAsset {
    pub fn new(
        id: impl Into<String>,
        category: Category,
        display_name: impl Into<String>,
        image: ImageSource,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            display_name: display_name.into(),
            image,
            default_width_percent: DEFAULT_SIZE_PERCENT,
            default_height_percent: DEFAULT_SIZE_PERCENT,
            custom: false,
        }
    }

    pub fn validate(&self) -> OutfitterResult<()> {
        if self.id.trim().is_empty() {
            return Err(OutfitterError::validation("asset id must be non-empty"));
        }
        if !(self.default_width_percent.is_finite() && self.default_width_percent > 0.0) {
            return Err(OutfitterError::validation(format!(
                "asset '{}' default width must be > 0",
                self.id
            )));
        }
        if !(self.default_height_percent.is_finite() && self.default_height_percent > 0.0) {
            return Err(OutfitterError::validation(format!(
                "asset '{}' default height must be > 0",
                self.id
            )));
        }
        Ok(())
    }
}

/// Asset catalog supplied by the embedder. Stock entries are grouped per
/// archetype; saved designs accumulate in a shared custom group.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Catalog {
    assets: BTreeMap<String, OverlayAsset>,
    stock: BTreeMap<Archetype, Vec<String>>,
    custom: Vec<String>,
}

impl Catalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn get(&self, id: &str) -> Option<&OverlayAsset> {
        self.assets.get(id)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Adds a saved design to the shared custom group.
    pub fn register_custom(&mut self, asset: OverlayAsset) -> OutfitterResult<()> {
        asset.validate()?;
        if self.assets.contains_key(&asset.id) {
            return Err(OutfitterError::validation(format!(
                "duplicate asset id '{}'",
                asset.id
            )));
        }
        self.custom.push(asset.id.clone());
        self.assets.insert(asset.id.clone(), asset);
        Ok(())
    }

    /// Entries shown for one archetype and category tab. The custom tab is
    /// shared across archetypes.
    pub fn menu(&self, archetype: Archetype, category: Category) -> Vec<&OverlayAsset> {
        let ids: &[String] = if category == Category::Custom {
            &self.custom
        } else {
            self.stock.get(&archetype).map(Vec::as_slice).unwrap_or(&[])
        };
        ids.iter()
            .filter_map(|id| self.assets.get(id))
            .filter(|asset| category == Category::Custom || asset.category == category)
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct CatalogBuilder {
    entries: Vec<(Archetype, OverlayAsset)>,
}

impl CatalogBuilder {
    pub fn asset(mut self, archetype: Archetype, asset: OverlayAsset) -> Self {
        self.entries.push((archetype, asset));
        self
    }

    pub fn build(self) -> OutfitterResult<Catalog> {
        let mut catalog = Catalog::default();
        for (archetype, asset) in self.entries {
            asset.validate()?;
            if catalog.assets.contains_key(&asset.id) {
                return Err(OutfitterError::validation(format!(
                    "duplicate asset id '{}'",
                    asset.id
                )));
            }
            if asset.custom {
                catalog.custom.push(asset.id.clone());
            } else {
                catalog
                    .stock
                    .entry(archetype)
                    .or_default()
                    .push(asset.id.clone());
            }
            catalog.assets.insert(asset.id.clone(), asset);
        }
        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shirt(id: &str) -> OverlayAsset {
        OverlayAsset::new(
            id,
            Category::Top,
            "Shirt",
            ImageSource::Path(PathBuf::from(format!("assets/{id}.png"))),
        )
    }

    #[test]
    fn builder_rejects_duplicate_ids() {
        let err = Catalog::builder()
            .asset(Archetype::Male, shirt("m-shirt-1"))
            .asset(Archetype::Female, shirt("m-shirt-1"))
            .build();
        assert!(err.is_err());
    }

    #[test]
    fn menu_filters_by_archetype_and_category() {
        let mut pants = shirt("m-pants-1");
        pants.category = Category::Bottom;
        let catalog = Catalog::builder()
            .asset(Archetype::Male, shirt("m-shirt-1"))
            .asset(Archetype::Male, pants)
            .asset(Archetype::Female, shirt("f-shirt-1"))
            .build()
            .unwrap();

        let tops = catalog.menu(Archetype::Male, Category::Top);
        assert_eq!(tops.len(), 1);
        assert_eq!(tops[0].id, "m-shirt-1");
        assert!(catalog.menu(Archetype::Boy, Category::Top).is_empty());
    }

    #[test]
    fn custom_group_is_shared_across_archetypes() {
        let mut catalog = Catalog::builder()
            .asset(Archetype::Male, shirt("m-shirt-1"))
            .build()
            .unwrap();

        let mut design = shirt("custom-1");
        design.custom = true;
        design.image = ImageSource::Encoded(vec![1, 2, 3]);
        catalog.register_custom(design).unwrap();

        assert_eq!(catalog.menu(Archetype::Male, Category::Custom).len(), 1);
        assert_eq!(catalog.menu(Archetype::Girl, Category::Custom).len(), 1);
        assert!(catalog.register_custom(shirt("custom-1")).is_err());
    }

    #[test]
    fn json_roundtrip() {
        let catalog = Catalog::builder()
            .asset(Archetype::Male, shirt("m-shirt-1"))
            .build()
            .unwrap();
        let s = serde_json::to_string(&catalog).unwrap();
        let de: Catalog = serde_json::from_str(&s).unwrap();
        assert_eq!(de.len(), 1);
        assert!(de.get("m-shirt-1").is_some());
    }
}
