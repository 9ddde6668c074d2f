//! Snapshot compositor: flattens the base figure and every placed item into
//! one RGBA image at the requested output resolution.
//!
//! Items draw ascending by z (insertion order breaks ties). Each item's box
//! is centered at its stage-percent position, the asset image is fitted
//! object-contain inside the box, then rotated, mirrored, and faded per the
//! item's effects. Sampling is inverse-affine bilinear in premultiplied
//! alpha; blending matches the integer `over` in [`crate::compose`].

use std::path::Path;

use anyhow::Context;
use kurbo::{Affine, Point};

use crate::catalog::ImageSource;
use crate::compose;
use crate::error::{OutfitterError, OutfitterResult};
use crate::stage::Stage;
use crate::store::{ImageStore, StoredImage};

/// The base figure never exceeds this fraction of the output height.
pub const FIGURE_MAX_HEIGHT_FRAC: f64 = 0.9;

/// Output resolution and backdrop for one snapshot.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SnapshotOptions {
    pub width: u32,
    pub height: u32,
    /// Straight-alpha backdrop fill. `None` leaves the canvas transparent.
    pub background: Option<[u8; 4]>,
}

impl SnapshotOptions {
    pub fn new(width: u32, height: u32) -> OutfitterResult<Self> {
        if width == 0 || height == 0 {
            return Err(OutfitterError::validation(format!(
                "snapshot dimensions must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self {
            width,
            height,
            background: None,
        })
    }

    pub fn with_background(mut self, rgba: [u8; 4]) -> Self {
        self.background = Some(rgba);
        self
    }
}

/// The character art drawn behind the placed items.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct BaseFigure {
    pub id: String,
    pub image: ImageSource,
}

impl BaseFigure {
    pub fn new(id: impl Into<String>, image: ImageSource) -> Self {
        Self {
            id: id.into(),
            image,
        }
    }
}

/// Finished composite in straight-alpha RGBA8.
#[derive(Clone, Debug, PartialEq)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    /// Row-major straight-alpha RGBA8, tightly packed.
    pub data: Vec<u8>,
}

impl Snapshot {
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        [
            self.data[idx],
            self.data[idx + 1],
            self.data[idx + 2],
            self.data[idx + 3],
        ]
    }

    pub fn encode_png(&self) -> OutfitterResult<Vec<u8>> {
        let img = image::RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .ok_or_else(|| OutfitterError::export("snapshot buffer size mismatch"))?;
        let mut bytes = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }

    pub fn write_png(&self, path: &Path) -> OutfitterResult<()> {
        let bytes = self.encode_png()?;
        std::fs::write(path, bytes)
            .with_context(|| format!("write snapshot to '{}'", path.display()))?;
        Ok(())
    }
}

/// Composites the stage. Asset decode failures substitute the store's
/// placeholder and keep going; only output encoding can fail, and the stage
/// is left untouched either way so the caller can retry.
#[tracing::instrument(skip(stage, store, figure))]
pub fn render_snapshot(
    stage: &Stage,
    store: &mut ImageStore,
    figure: Option<&BaseFigure>,
    options: SnapshotOptions,
) -> OutfitterResult<Snapshot> {
    let (out_w, out_h) = (options.width, options.height);
    let mut canvas = vec![0u8; out_w as usize * out_h as usize * 4];

    if let Some(bg) = options.background {
        let premul = compose::premultiply(bg);
        for px in canvas.chunks_exact_mut(4) {
            px.copy_from_slice(&premul);
        }
    }

    if let Some(figure) = figure {
        let img = store.fetch(&figure.id, &figure.image);
        draw_figure(&mut canvas, out_w, out_h, &img);
    }

    for item in stage.render_order() {
        let effects = stage.effects(item.instance);
        let img = store.fetch(&item.asset_id, &item.image);
        if img.width == 0 || img.height == 0 {
            continue;
        }

        let cx = item.x / 100.0 * f64::from(out_w);
        let cy = item.y / 100.0 * f64::from(out_h);
        let box_w = item.width_percent / 100.0 * f64::from(out_w);
        let box_h = item.height_percent / 100.0 * f64::from(out_h);
        let fit = contain_scale(img.width, img.height, box_w, box_h);

        let sx = if effects.flipped { -fit } else { fit };
        let theta = effects.rotation_degrees.rem_euclid(360.0).to_radians();
        let place = place_affine((cx, cy), theta, (sx, fit), (img.width, img.height));

        draw_image(&mut canvas, out_w, out_h, &img, place, effects.opacity as f32);
    }

    for px in canvas.chunks_exact_mut(4) {
        let straight = compose::unpremultiply([px[0], px[1], px[2], px[3]]);
        px.copy_from_slice(&straight);
    }

    Ok(Snapshot {
        width: out_w,
        height: out_h,
        data: canvas,
    })
}

/// Object-contain: the scale that fits `iw`x`ih` inside the box.
fn contain_scale(iw: u32, ih: u32, box_w: f64, box_h: f64) -> f64 {
    (box_w / f64::from(iw)).min(box_h / f64::from(ih))
}

/// Canonical order: T(center) * R(rot) * S(scale) * T(-image center).
fn place_affine(center: (f64, f64), theta: f64, scale: (f64, f64), size: (u32, u32)) -> Affine {
    let t_center = Affine::translate(center);
    let t_rotate = Affine::rotate(theta);
    let t_scale = Affine::scale_non_uniform(scale.0, scale.1);
    let t_anchor = Affine::translate((-f64::from(size.0) / 2.0, -f64::from(size.1) / 2.0));
    t_center * t_rotate * t_scale * t_anchor
}

fn draw_figure(canvas: &mut [u8], out_w: u32, out_h: u32, img: &StoredImage) {
    if img.width == 0 || img.height == 0 {
        return;
    }
    let box_w = f64::from(out_w);
    let box_h = f64::from(out_h) * FIGURE_MAX_HEIGHT_FRAC;
    let fit = contain_scale(img.width, img.height, box_w, box_h);
    let center = (f64::from(out_w) / 2.0, f64::from(out_h) / 2.0);
    let place = place_affine(center, 0.0, (fit, fit), (img.width, img.height));
    draw_image(canvas, out_w, out_h, img, place, 1.0);
}

/// Draws `img` through `place` with inverse-affine bilinear sampling,
/// blending premultiplied source-over at `opacity`.
fn draw_image(
    canvas: &mut [u8],
    out_w: u32,
    out_h: u32,
    img: &StoredImage,
    place: Affine,
    opacity: f32,
) {
    if place.determinant().abs() < 1e-12 {
        tracing::warn!("degenerate placement transform, skipping draw");
        return;
    }
    let inv = place.inverse();

    // Clamp the iteration to the transformed image bounds.
    let corners = [
        place * Point::new(0.0, 0.0),
        place * Point::new(f64::from(img.width), 0.0),
        place * Point::new(0.0, f64::from(img.height)),
        place * Point::new(f64::from(img.width), f64::from(img.height)),
    ];
    let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    let x0 = min_x.floor().max(0.0) as u32;
    let y0 = min_y.floor().max(0.0) as u32;
    let x1 = (max_x.ceil().max(0.0) as u32).min(out_w);
    let y1 = (max_y.ceil().max(0.0) as u32).min(out_h);

    for y in y0..y1 {
        for x in x0..x1 {
            let src_pt = inv * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let src = sample_bilinear(img, src_pt.x - 0.5, src_pt.y - 0.5);
            if src[3] == 0 {
                continue;
            }
            let idx = (y as usize * out_w as usize + x as usize) * 4;
            let dst = [canvas[idx], canvas[idx + 1], canvas[idx + 2], canvas[idx + 3]];
            let blended = compose::over(dst, src, opacity);
            canvas[idx..idx + 4].copy_from_slice(&blended);
        }
    }
}

/// Bilinear fetch in premultiplied space, zero outside the image.
fn sample_bilinear(img: &StoredImage, x: f64, y: f64) -> [u8; 4] {
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let t00 = img.texel(x0, y0);
    let t10 = img.texel(x0 + 1, y0);
    let t01 = img.texel(x0, y0 + 1);
    let t11 = img.texel(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = f64::from(t00[c]) * (1.0 - fx) + f64::from(t10[c]) * fx;
        let bottom = f64::from(t01[c]) * (1.0 - fx) + f64::from(t11[c]) * fx;
        out[c] = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
    }
    out
}
