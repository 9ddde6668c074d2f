//! Single-line text stamping for the paint surface, rasterized with
//! [`ab_glyph`] and blended straight-alpha over the doodle buffer.

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use image::RgbaImage;

use crate::geom::Rgb;

/// Stamps one line of text. `baseline` is the canvas position of the first
/// glyph's baseline origin; glyphs without outlines (spaces, missing chars)
/// still advance the caret.
pub fn stamp_text(
    img: &mut RgbaImage,
    font: &FontArc,
    text: &str,
    baseline: (i32, i32),
    px: f32,
    color: Rgb,
) {
    let scale = PxScale::from(px);
    let scaled = font.as_scaled(scale);

    let mut caret = point(baseline.0 as f32, baseline.1 as f32);
    let mut last_glyph = None;

    for ch in text.chars() {
        if ch.is_control() {
            continue;
        }
        let id = font.glyph_id(ch);
        if let Some(prev) = last_glyph {
            caret.x += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, caret);
        caret.x += scaled.h_advance(id);
        last_glyph = Some(id);

        if let Some(outlined) = font.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, cov| {
                let x = bounds.min.x as i32 + gx as i32;
                let y = bounds.min.y as i32 + gy as i32;
                blend_coverage(img, x, y, color, cov);
            });
        }
    }
}

/// Source-over with the glyph coverage as source alpha, in straight alpha.
fn blend_coverage(img: &mut RgbaImage, x: i32, y: i32, color: Rgb, cov: f32) {
    if cov <= 0.0 || x < 0 || y < 0 || (x as u32) >= img.width() || (y as u32) >= img.height() {
        return;
    }
    let sa = cov.min(1.0);
    let dst = img.get_pixel_mut(x as u32, y as u32);
    let da = f32::from(dst[3]) / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return;
    }

    let src = [f32::from(color.r), f32::from(color.g), f32::from(color.b)];
    for c in 0..3 {
        let d = f32::from(dst[c]);
        let blended = (src[c] * sa + d * da * (1.0 - sa)) / out_a;
        dst[c] = blended.round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
