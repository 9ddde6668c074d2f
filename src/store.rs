//! Decoded-image cache backing the snapshot compositor.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Context;

use crate::catalog::ImageSource;
use crate::compose;
use crate::error::OutfitterResult;

const PLACEHOLDER_SIZE: u32 = 64;
const PLACEHOLDER_GRAY: u8 = 0xdd;

/// Decoded raster in premultiplied RGBA8 form.
#[derive(Clone, Debug)]
pub struct StoredImage {
    pub width: u32,
    pub height: u32,
    /// Row-major premultiplied RGBA8, tightly packed.
    pub rgba8_premul: Arc<Vec<u8>>,
}

impl StoredImage {
    /// Texel fetch, zero outside the image.
    pub(crate) fn texel(&self, x: i64, y: i64) -> [u8; 4] {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return [0, 0, 0, 0];
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.rgba8_premul[idx..idx + 4];
        [px[0], px[1], px[2], px[3]]
    }
}

/// Decodes encoded image bytes into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> OutfitterResult<StoredImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    for px in rgba8_premul.chunks_exact_mut(4) {
        let premul = compose::premultiply([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&premul);
    }

    Ok(StoredImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn decode_source(source: &ImageSource) -> OutfitterResult<StoredImage> {
    let bytes = match source {
        ImageSource::Path(path) => std::fs::read(path)
            .with_context(|| format!("read asset file '{}'", path.display()))?,
        ImageSource::Encoded(bytes) => bytes.clone(),
    };
    decode_image(&bytes)
}

/// Per-asset decode cache. A failed load substitutes a neutral placeholder
/// tile so a single broken asset never fails the whole composite.
pub struct ImageStore {
    cache: HashMap<String, StoredImage>,
    placeholder: StoredImage,
}

impl Default for ImageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageStore {
    pub fn new() -> Self {
        Self {
            cache: HashMap::new(),
            placeholder: placeholder_tile(),
        }
    }

    /// Cached decode keyed by asset id. Failures log a warning and cache the
    /// placeholder, so each broken asset logs once.
    #[tracing::instrument(skip(self, source))]
    pub fn fetch(&mut self, asset_id: &str, source: &ImageSource) -> StoredImage {
        if let Some(hit) = self.cache.get(asset_id) {
            return hit.clone();
        }
        let stored = match decode_source(source) {
            Ok(img) => img,
            Err(err) => {
                tracing::warn!(asset_id, %err, "asset decode failed, substituting placeholder");
                self.placeholder.clone()
            }
        };
        self.cache.insert(asset_id.to_owned(), stored.clone());
        stored
    }

    pub fn placeholder(&self) -> &StoredImage {
        &self.placeholder
    }
}

fn placeholder_tile() -> StoredImage {
    let g = PLACEHOLDER_GRAY;
    let px = [g, g, g, 255];
    let n = (PLACEHOLDER_SIZE * PLACEHOLDER_SIZE) as usize;
    let mut data = Vec::with_capacity(n * 4);
    for _ in 0..n {
        data.extend_from_slice(&px);
    }
    StoredImage {
        width: PLACEHOLDER_SIZE,
        height: PLACEHOLDER_SIZE,
        rgba8_premul: Arc::new(data),
    }
}
