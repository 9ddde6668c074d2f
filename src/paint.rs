//! Raster paint surface: a straight-alpha RGBA doodle buffer driven by a
//! small tool state machine. Continuous tools paint while the pointer moves,
//! shape tools commit once on release, fill runs immediately on press, and
//! finished designs are exported as custom overlay assets.

use ab_glyph::FontArc;
use image::{Rgba, RgbaImage};

use crate::catalog::{Category, DEFAULT_SIZE_PERCENT, ImageSource, OverlayAsset};
use crate::error::{OutfitterError, OutfitterResult};
use crate::geom::Rgb;
use crate::{glyph, raster};

pub const MIN_STROKE_WIDTH: u32 = 1;
pub const MAX_STROKE_WIDTH: u32 = 20;
pub const DEFAULT_STROKE_WIDTH: u32 = 5;

/// Text stamps at three times the current stroke width.
pub const TEXT_SIZE_FACTOR: u32 = 3;

/// Border color stroked onto a cleared surface to mark the drawable bounds.
pub const CLEAR_BORDER: Rgb = Rgb::new(0xdd, 0xdd, 0xdd);

const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tool {
    Brush,
    Eraser,
    Line,
    Rectangle,
    Circle,
    Text,
    Fill,
}

impl Tool {
    /// Paints on every pointer move between press and release.
    pub fn is_continuous(self) -> bool {
        matches!(self, Tool::Brush | Tool::Eraser)
    }

    /// Captures an origin on press and commits once on release.
    pub fn is_shape(self) -> bool {
        matches!(self, Tool::Line | Tool::Rectangle | Tool::Circle)
    }
}

/// The doodle canvas. Pointer positions are buffer-pixel coordinates; events
/// outside the buffer are fine, all drawing clips.
pub struct PaintSurface {
    buffer: RgbaImage,
    tool: Tool,
    stroke_color: Rgb,
    stroke_width: u32,
    last_point: Option<(i32, i32)>,
    shape_origin: Option<(i32, i32)>,
    pending_text: Option<(i32, i32)>,
    font: Option<FontArc>,
    custom_seq: u32,
}

impl PaintSurface {
    pub fn new(width: u32, height: u32) -> OutfitterResult<Self> {
        if width == 0 || height == 0 {
            return Err(OutfitterError::validation(format!(
                "paint surface dimensions must be non-zero, got {width}x{height}"
            )));
        }
        let mut surface = Self {
            buffer: RgbaImage::new(width, height),
            tool: Tool::Brush,
            stroke_color: Rgb::BLACK,
            stroke_width: DEFAULT_STROKE_WIDTH,
            last_point: None,
            shape_origin: None,
            pending_text: None,
            font: None,
            custom_seq: 0,
        };
        surface.clear();
        Ok(surface)
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switching tools abandons any in-flight stroke, shape origin, or
    /// pending text position.
    pub fn set_tool(&mut self, tool: Tool) {
        if tool != self.tool {
            self.reset_transient();
        }
        self.tool = tool;
    }

    pub fn stroke_color(&self) -> Rgb {
        self.stroke_color
    }

    pub fn set_stroke_color(&mut self, color: Rgb) {
        self.stroke_color = color;
    }

    pub fn stroke_width(&self) -> u32 {
        self.stroke_width
    }

    pub fn set_stroke_width(&mut self, width: u32) {
        self.stroke_width = width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
    }

    /// Installs the font the text tool stamps with.
    pub fn set_font(&mut self, font_bytes: Vec<u8>) -> OutfitterResult<()> {
        let font = FontArc::try_from_vec(font_bytes)
            .map_err(|err| OutfitterError::paint(format!("invalid font data: {err}")))?;
        self.font = Some(font);
        Ok(())
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    pub fn pointer_down(&mut self, x: i32, y: i32) {
        match self.tool {
            Tool::Brush | Tool::Eraser => {
                let ink = self.ink();
                raster::stamp_disc(&mut self.buffer, x, y, self.stroke_width, ink);
                self.last_point = Some((x, y));
            }
            Tool::Line | Tool::Rectangle | Tool::Circle => {
                self.shape_origin = Some((x, y));
            }
            Tool::Text => {
                self.pending_text = Some((x, y));
            }
            Tool::Fill => {
                raster::flood_fill(&mut self.buffer, (x, y), Rgba(self.stroke_color.rgba(255)));
            }
        }
    }

    pub fn pointer_move(&mut self, x: i32, y: i32) {
        if !self.tool.is_continuous() {
            return;
        }
        if let Some(last) = self.last_point {
            let ink = self.ink();
            raster::draw_line(&mut self.buffer, last, (x, y), self.stroke_width, ink);
            self.last_point = Some((x, y));
        }
    }

    pub fn pointer_up(&mut self, x: i32, y: i32) {
        if self.tool.is_continuous() {
            self.last_point = None;
            return;
        }
        let Some(origin) = self.shape_origin.take() else {
            return;
        };
        let color = Rgba(self.stroke_color.rgba(255));
        match self.tool {
            Tool::Line => {
                raster::draw_line(&mut self.buffer, origin, (x, y), self.stroke_width, color);
            }
            Tool::Rectangle => {
                raster::draw_rect_outline(
                    &mut self.buffer,
                    origin,
                    (x, y),
                    self.stroke_width,
                    color,
                );
            }
            Tool::Circle => {
                let dx = f64::from(x - origin.0);
                let dy = f64::from(y - origin.1);
                let radius = (dx * dx + dy * dy).sqrt().round() as u32;
                raster::draw_circle_outline(
                    &mut self.buffer,
                    origin,
                    radius,
                    self.stroke_width,
                    color,
                );
            }
            _ => {}
        }
    }

    /// Position waiting for text entry, set by a press with the text tool.
    pub fn pending_text(&self) -> Option<(i32, i32)> {
        self.pending_text
    }

    /// Stamps `text` at the pending position. Confirming whitespace-only text
    /// clears the pending position without touching pixels. Confirming with
    /// no font installed fails and keeps the position so the caller can
    /// install one and retry.
    pub fn confirm_text(&mut self, text: &str) -> OutfitterResult<()> {
        let Some(at) = self.pending_text else {
            return Err(OutfitterError::paint("no pending text position"));
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            self.pending_text = None;
            return Ok(());
        }
        let Some(font) = self.font.clone() else {
            return Err(OutfitterError::paint("no font installed for the text tool"));
        };
        let px = (self.stroke_width * TEXT_SIZE_FACTOR) as f32;
        glyph::stamp_text(&mut self.buffer, &font, trimmed, at, px, self.stroke_color);
        self.pending_text = None;
        Ok(())
    }

    pub fn cancel_text(&mut self) {
        self.pending_text = None;
    }

    /// Resets to fully transparent with a 1-px neutral border, and drops any
    /// in-flight tool state.
    pub fn clear(&mut self) {
        for px in self.buffer.pixels_mut() {
            *px = TRANSPARENT;
        }
        raster::stroke_border(&mut self.buffer, Rgba(CLEAR_BORDER.rgba(255)));
        self.reset_transient();
    }

    /// Encodes the buffer as a PNG, wraps it as a custom overlay asset with a
    /// generated `custom-<n>` id, then clears the surface for the next
    /// design. The caller registers the asset with its catalog.
    pub fn save_custom(
        &mut self,
        display_name: &str,
        category: Category,
    ) -> OutfitterResult<OverlayAsset> {
        let name = display_name.trim();
        if name.is_empty() {
            return Err(OutfitterError::validation(
                "custom design name must not be empty",
            ));
        }
        let png = self.encode_png()?;
        self.custom_seq += 1;
        let id = format!("custom-{}", self.custom_seq);
        tracing::debug!(%id, name, bytes = png.len(), "saved custom design");

        let asset = OverlayAsset {
            id,
            category,
            display_name: name.to_owned(),
            image: ImageSource::Encoded(png),
            default_width_percent: DEFAULT_SIZE_PERCENT,
            default_height_percent: DEFAULT_SIZE_PERCENT,
            custom: true,
        };
        self.clear();
        Ok(asset)
    }

    pub fn buffer(&self) -> &RgbaImage {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut RgbaImage {
        &mut self.buffer
    }

    fn ink(&self) -> Rgba<u8> {
        match self.tool {
            Tool::Eraser => TRANSPARENT,
            _ => Rgba(self.stroke_color.rgba(255)),
        }
    }

    fn reset_transient(&mut self) {
        self.last_point = None;
        self.shape_origin = None;
        self.pending_text = None;
    }

    fn encode_png(&self) -> OutfitterResult<Vec<u8>> {
        let mut bytes = Vec::new();
        let img = image::DynamicImage::ImageRgba8(self.buffer.clone());
        img.write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> PaintSurface {
        PaintSurface::new(64, 64).unwrap()
    }

    #[test]
    fn brush_paints_on_press_and_move() {
        let mut s = surface();
        s.pointer_down(10, 10);
        s.pointer_move(20, 10);
        s.pointer_up(20, 10);
        assert_eq!(*s.buffer().get_pixel(10, 10), Rgba([0, 0, 0, 255]));
        assert_eq!(*s.buffer().get_pixel(15, 10), Rgba([0, 0, 0, 255]));
        assert_eq!(*s.buffer().get_pixel(20, 10), Rgba([0, 0, 0, 255]));
    }

    #[test]
    fn eraser_writes_transparency() {
        let mut s = surface();
        s.pointer_down(10, 10);
        s.pointer_up(10, 10);
        s.set_tool(Tool::Eraser);
        s.pointer_down(10, 10);
        s.pointer_up(10, 10);
        assert_eq!(*s.buffer().get_pixel(10, 10), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn shapes_commit_on_release_only() {
        let mut s = surface();
        s.set_tool(Tool::Rectangle);
        s.pointer_down(5, 5);
        s.pointer_move(30, 30);
        assert_eq!(*s.buffer().get_pixel(5, 5), Rgba([0, 0, 0, 0]));
        s.pointer_up(30, 30);
        assert_eq!(*s.buffer().get_pixel(5, 5), Rgba([0, 0, 0, 255]));
        assert_eq!(*s.buffer().get_pixel(30, 5), Rgba([0, 0, 0, 255]));
        assert_eq!(*s.buffer().get_pixel(17, 17), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn fill_runs_on_press() {
        let mut s = surface();
        s.set_stroke_color(Rgb::new(255, 0, 0));
        s.set_tool(Tool::Fill);
        s.pointer_down(32, 32);
        assert_eq!(*s.buffer().get_pixel(32, 32), Rgba([255, 0, 0, 255]));
        assert_eq!(*s.buffer().get_pixel(2, 2), Rgba([255, 0, 0, 255]));
        // The border is a different color and stays.
        assert_eq!(*s.buffer().get_pixel(0, 0), Rgba([0xdd, 0xdd, 0xdd, 255]));
    }

    #[test]
    fn clear_leaves_border_and_transparent_interior() {
        let mut s = surface();
        s.pointer_down(10, 10);
        s.pointer_up(10, 10);
        s.clear();
        assert_eq!(*s.buffer().get_pixel(10, 10), Rgba([0, 0, 0, 0]));
        assert_eq!(*s.buffer().get_pixel(0, 0), Rgba([0xdd, 0xdd, 0xdd, 255]));
        assert_eq!(*s.buffer().get_pixel(63, 63), Rgba([0xdd, 0xdd, 0xdd, 255]));
    }

    #[test]
    fn text_requires_a_pending_position_and_a_font() {
        let mut s = surface();
        assert!(s.confirm_text("hi").is_err());

        s.set_tool(Tool::Text);
        s.pointer_down(20, 20);
        assert_eq!(s.pending_text(), Some((20, 20)));

        // No font installed: error, position kept for a retry.
        assert!(s.confirm_text("hi").is_err());
        assert_eq!(s.pending_text(), Some((20, 20)));

        // Whitespace-only confirm clears the position without drawing.
        let before = s.buffer().clone();
        s.confirm_text("   ").unwrap();
        assert_eq!(s.pending_text(), None);
        assert_eq!(s.buffer().as_raw(), before.as_raw());
    }

    #[test]
    fn cancel_drops_the_pending_position() {
        let mut s = surface();
        s.set_tool(Tool::Text);
        s.pointer_down(8, 8);
        s.cancel_text();
        assert_eq!(s.pending_text(), None);
    }

    #[test]
    fn tool_switch_abandons_shape_origin() {
        let mut s = surface();
        s.set_tool(Tool::Line);
        s.pointer_down(5, 5);
        s.set_tool(Tool::Brush);
        s.set_tool(Tool::Line);
        s.pointer_up(40, 40);
        // No origin survived the switches, so the release drew nothing.
        assert_eq!(*s.buffer().get_pixel(22, 22), Rgba([0, 0, 0, 0]));
        assert_eq!(*s.buffer().get_pixel(40, 40), Rgba([0, 0, 0, 0]));
    }

    #[test]
    fn stroke_width_clamps_to_range() {
        let mut s = surface();
        s.set_stroke_width(0);
        assert_eq!(s.stroke_width(), MIN_STROKE_WIDTH);
        s.set_stroke_width(99);
        assert_eq!(s.stroke_width(), MAX_STROKE_WIDTH);
    }

    #[test]
    fn save_custom_generates_sequential_ids_and_clears() {
        let mut s = surface();
        s.pointer_down(10, 10);
        s.pointer_up(10, 10);

        assert!(s.save_custom("   ", Category::Custom).is_err());

        let first = s.save_custom("scribble", Category::Custom).unwrap();
        assert_eq!(first.id, "custom-1");
        assert!(first.custom);
        assert_eq!(first.default_width_percent, DEFAULT_SIZE_PERCENT);
        assert_eq!(*s.buffer().get_pixel(10, 10), Rgba([0, 0, 0, 0]));

        let second = s.save_custom("again", Category::Top).unwrap();
        assert_eq!(second.id, "custom-2");
        assert_eq!(second.category, Category::Top);

        let ImageSource::Encoded(png) = &first.image else {
            panic!("saved design should embed its pixels");
        };
        let decoded = image::load_from_memory(png).unwrap().to_rgba8();
        assert_eq!(decoded.dimensions(), (64, 64));
        assert_eq!(*decoded.get_pixel(10, 10), Rgba([0, 0, 0, 255]));
    }
}
