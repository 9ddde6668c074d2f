use crate::error::{OutfitterError, OutfitterResult};

/// Pointer position in device pixels, in the same coordinate space as the
/// rect it is interpreted against.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DevicePoint {
    pub x: f64,
    pub y: f64,
}

impl DevicePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Position on the stage in percent of stage size. Values inside the stage
/// fall in 0..100; the type itself does not clamp.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StagePoint {
    pub x: f64,
    pub y: f64,
}

impl StagePoint {
    pub const CENTER: StagePoint = StagePoint { x: 50.0, y: 50.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Live bounding box of the stage in device pixels, captured by the caller at
/// event time. Conversions always go through a fresh rect so a resized or
/// scrolled stage never leaves stale dimensions behind.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StageRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl StageRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> OutfitterResult<Self> {
        if !left.is_finite() || !top.is_finite() || !width.is_finite() || !height.is_finite() {
            return Err(OutfitterError::validation(
                "stage rect coordinates must be finite",
            ));
        }
        if width <= 0.0 || height <= 0.0 {
            return Err(OutfitterError::validation(
                "stage rect width/height must be > 0",
            ));
        }
        Ok(Self {
            left,
            top,
            width,
            height,
        })
    }

    /// True when conversions through this rect would divide by zero. `new`
    /// rejects these, but hand-built or deserialized values can still carry
    /// zero or non-finite sizes.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Maps a device position to stage percentages.
    pub fn to_stage(&self, p: DevicePoint) -> StagePoint {
        StagePoint {
            x: (p.x - self.left) / self.width * 100.0,
            y: (p.y - self.top) / self.height * 100.0,
        }
    }

    /// Maps a device-pixel delta to a percentage delta of this rect.
    pub fn delta_to_percent(&self, dx: f64, dy: f64) -> (f64, f64) {
        (dx / self.width * 100.0, dy / self.height * 100.0)
    }
}

/// Opaque 24-bit color for strokes and borders.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses a `#rrggbb` hex string, the form color inputs emit.
    pub fn from_hex(s: &str) -> OutfitterResult<Self> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(OutfitterError::validation(format!(
                "expected a #rrggbb color, got '{s}'"
            )));
        }
        let channel = |range: std::ops::Range<usize>| -> OutfitterResult<u8> {
            u8::from_str_radix(&hex[range], 16)
                .map_err(|e| OutfitterError::validation(format!("bad color channel: {e}")))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn rgba(self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }
}
