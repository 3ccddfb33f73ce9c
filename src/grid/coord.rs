use std::fmt;
use std::str::FromStr;

use crate::foundation::core::{Bounds, Rect};
use crate::foundation::error::{VeilError, VeilResult};

/// Separator between the x and y numerals of a [`TileKey`].
///
/// It can never appear inside a decimal numeral, so keys are unambiguous for every tile size.
pub const KEY_SEPARATOR: char = 'x';

/// Origin of a tile in pixel space.
///
/// Members of any tile set are multiples of the tile size. Intermediate neighbor candidates may
/// be negative before they are bounds-checked.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TileCoord {
    /// Left edge in pixels.
    pub x: i64,
    /// Top edge in pixels.
    pub y: i64,
}

impl TileCoord {
    /// Create a coordinate from pixel values.
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Pixel origin of grid cell `(row, col)`.
    pub fn from_cell(row: usize, col: usize, tile_size: u32) -> Self {
        let s = i64::from(tile_size);
        Self {
            x: col as i64 * s,
            y: row as i64 * s,
        }
    }

    /// Grid cell `(row, col)` of this coordinate, or `None` when negative or unaligned.
    pub fn to_cell(self, tile_size: u32) -> Option<(usize, usize)> {
        let s = i64::from(tile_size);
        if s == 0 || self.x < 0 || self.y < 0 || self.x % s != 0 || self.y % s != 0 {
            return None;
        }
        Some(((self.y / s) as usize, (self.x / s) as usize))
    }

    /// Move by `(dx, dy)` whole tiles.
    pub fn offset(self, dx: i32, dy: i32, tile_size: u32) -> Self {
        let s = i64::from(tile_size);
        Self {
            x: self.x + i64::from(dx) * s,
            y: self.y + i64::from(dy) * s,
        }
    }

    /// The tile directly above.
    pub fn above(self, tile_size: u32) -> Self {
        self.offset(0, -1, tile_size)
    }

    /// The tile directly below.
    pub fn below(self, tile_size: u32) -> Self {
        self.offset(0, 1, tile_size)
    }

    /// Pixel rectangle covered by the tile.
    pub fn rect(self, tile_size: u32) -> Rect {
        let s = f64::from(tile_size);
        Rect::new(
            self.x as f64,
            self.y as f64,
            self.x as f64 + s,
            self.y as f64 + s,
        )
    }

    /// Canonical key for this coordinate.
    pub fn key(self) -> TileKey {
        TileKey(format!("{}{KEY_SEPARATOR}{}", self.x, self.y))
    }
}

/// Canonical `"{x}x{y}"` encoding of a [`TileCoord`].
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileKey(String);

impl TileKey {
    /// Borrow the encoded key.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the key.
    ///
    /// Both components must be non-negative base-10 integers separated by exactly one
    /// [`KEY_SEPARATOR`]. Anything else is a [`VeilError::Coord`].
    pub fn parse(&self) -> VeilResult<TileCoord> {
        parse_key(&self.0)
    }

    /// Decode the key and check it names an aligned tile inside `bounds`.
    pub fn parse_within(&self, bounds: Bounds, tile_size: u32) -> VeilResult<TileCoord> {
        let c = self.parse()?;
        if !bounds.contains(c.x, c.y) {
            return Err(VeilError::coord(format!(
                "tile '{}' lies outside {}x{}",
                self.0, bounds.width, bounds.height
            )));
        }
        if c.to_cell(tile_size).is_none() {
            return Err(VeilError::coord(format!(
                "tile '{}' is not aligned to tile size {tile_size}",
                self.0
            )));
        }
        Ok(c)
    }
}

fn parse_key(s: &str) -> VeilResult<TileCoord> {
    let (xs, ys) = s
        .split_once(KEY_SEPARATOR)
        .ok_or_else(|| VeilError::coord(format!("tile key '{s}' has no separator")))?;
    Ok(TileCoord {
        x: parse_component(s, xs)?,
        y: parse_component(s, ys)?,
    })
}

fn parse_component(key: &str, part: &str) -> VeilResult<i64> {
    // One spelling per tile: no sign, no leading zeros.
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(VeilError::coord(format!(
            "tile key '{key}' has a non-integer component '{part}'"
        )));
    }
    if part.len() > 1 && part.starts_with('0') {
        return Err(VeilError::coord(format!(
            "tile key '{key}' has a zero-padded component '{part}'"
        )));
    }
    part.parse::<i64>()
        .map_err(|e| VeilError::coord(format!("tile key '{key}': {e}")))
}

impl From<TileCoord> for TileKey {
    fn from(c: TileCoord) -> Self {
        c.key()
    }
}

impl fmt::Display for TileKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{KEY_SEPARATOR}{}", self.x, self.y)
    }
}

impl FromStr for TileKey {
    type Err = VeilError;

    fn from_str(s: &str) -> VeilResult<Self> {
        parse_key(s)?;
        Ok(Self(s.to_owned()))
    }
}

impl FromStr for TileCoord {
    type Err = VeilError;

    fn from_str(s: &str) -> VeilResult<Self> {
        parse_key(s)
    }
}

impl serde::Serialize for TileKey {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for TileKey {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let s = String::deserialize(d)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/grid/coord.rs"]
mod tests;
