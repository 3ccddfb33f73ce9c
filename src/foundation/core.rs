use crate::foundation::error::{VeilError, VeilResult};

pub use kurbo::Rect;

/// Host-supplied monotonic timestamp in milliseconds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    /// Return `self + ms` using saturating arithmetic.
    pub fn after(self, ms: u64) -> Self {
        Self(self.0.saturating_add(ms))
    }
}

/// Index of a rendered frame within one playback.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Page surface dimensions reported by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Page client width in pixels.
    pub width: u32,
    /// Height of the visible window in pixels.
    pub viewport_height: u32,
    /// Full scrollable document height in pixels.
    pub document_height: u32,
}

impl Viewport {
    /// Create a viewport; `document_height` is raised to at least `viewport_height`.
    pub fn new(width: u32, viewport_height: u32, document_height: u32) -> Self {
        Self {
            width,
            viewport_height,
            document_height: document_height.max(viewport_height),
        }
    }

    /// Return `true` when the surface has no drawable area yet (not mounted or collapsed).
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.viewport_height == 0
    }

    /// Pixel bounds covering the whole document.
    pub fn page_bounds(self) -> Bounds {
        Bounds {
            width: i64::from(self.width),
            height: i64::from(self.document_height),
        }
    }

    /// Validate that the viewport fits the `u16` surfaces used by the CPU adapters.
    pub fn validate_surface(self) -> VeilResult<()> {
        if self.is_empty() {
            return Err(VeilError::validation("viewport must have non-zero size"));
        }
        if self.width > u32::from(u16::MAX) || self.document_height > u32::from(u16::MAX) {
            return Err(VeilError::validation(format!(
                "surface {}x{} exceeds the 65535 px limit",
                self.width, self.document_height
            )));
        }
        Ok(())
    }
}

/// Half-open pixel rectangle `[0, width) x [0, height)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Exclusive horizontal limit.
    pub width: i64,
    /// Exclusive vertical limit.
    pub height: i64,
}

impl Bounds {
    /// Return `true` when `(x, y)` lies inside the bounds.
    pub fn contains(self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < self.width && y < self.height
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Scale all channels by `coverage` in `[0, 1]`.
    pub fn with_coverage(self, coverage: f32) -> Self {
        let k = coverage.clamp(0.0, 1.0);
        let scale = |c: u8| (f32::from(c) * k).round() as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
            a: scale(self.a),
        }
    }

    /// Packed `[r, g, b, a]` bytes.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Straight-alpha color as written in configuration (`"#rrggbb"` or `"#rrggbbaa"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorHex {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Straight alpha.
    pub a: u8,
}

impl ColorHex {
    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color from straight RGBA components.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` / `#rrggbbaa`.
    pub fn parse(s: &str) -> VeilResult<Self> {
        let hex = s
            .strip_prefix('#')
            .ok_or_else(|| VeilError::validation(format!("color '{s}' must start with '#'")))?;
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(VeilError::validation(format!(
                "color '{s}' must be #rrggbb or #rrggbbaa"
            )));
        }
        let byte = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|_| VeilError::validation(format!("color '{s}' has non-hex digits")))
        };
        let a = if hex.len() == 8 { byte(6)? } else { 255 };
        Ok(Self {
            r: byte(0)?,
            g: byte(2)?,
            b: byte(4)?,
            a,
        })
    }

    /// Premultiplied form.
    pub fn premul(self) -> Rgba8Premul {
        Rgba8Premul::from_straight_rgba(self.r, self.g, self.b, self.a)
    }

    /// Linear interpolation in straight space, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }
}

impl std::fmt::Display for ColorHex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl serde::Serialize for ColorHex {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for ColorHex {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
