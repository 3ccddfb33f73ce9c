use crate::foundation::error::VeilResult;
use crate::grid::coord::TileCoord;

/// One of the two stacked surfaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    /// Opaque cover that starts fully painted and is punched out tile by tile.
    Overlay,
    /// Layer under the overlay that carries committed tiles and their borders.
    Background,
}

/// Horizontal tile edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edge {
    /// Edge at the tile's `y`.
    Top,
    /// Edge at the tile's `y + size`.
    Bottom,
}

/// How an edge is painted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePaint {
    /// Light line on the outer top boundary of a revealed region.
    Light,
    /// Dark line on the outer bottom boundary of a revealed region.
    Dark,
    /// Clear a thin strip over a seam shared by two committed tiles.
    Erase,
}

/// Edge operation on the background layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct EdgeStroke {
    /// Left end of the edge.
    pub x: i64,
    /// Vertical position of the edge line.
    pub y: i64,
    /// Edge length in pixels.
    pub width: u32,
    /// Paint to apply.
    pub paint: EdgePaint,
    /// Which edge of the owning tile this is.
    pub edge: Edge,
}

/// A render-agnostic change produced by the spread core.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileDelta {
    /// Make a tile fully transparent on `layer`.
    Clear {
        /// Target layer.
        layer: Layer,
        /// Tile origin.
        tile: TileCoord,
        /// Tile edge length in pixels.
        size: u32,
    },
    /// Paint or erase a background edge.
    Edge(EdgeStroke),
}

/// Surface that paints tile deltas.
///
/// Deltas must be applied in the order they are issued; a later erase may undo part of an
/// earlier line.
pub trait RenderAdapter {
    /// Clear one tile on `layer`.
    fn clear_tile(&mut self, layer: Layer, tile: TileCoord, size: u32) -> VeilResult<()>;

    /// Paint or erase one background edge.
    fn draw_edge(&mut self, stroke: EdgeStroke) -> VeilResult<()>;

    /// Apply `deltas` in order.
    fn apply(&mut self, deltas: &[TileDelta]) -> VeilResult<()> {
        for d in deltas {
            match *d {
                TileDelta::Clear { layer, tile, size } => self.clear_tile(layer, tile, size)?,
                TileDelta::Edge(stroke) => self.draw_edge(stroke)?,
            }
        }
        Ok(())
    }
}

/// Adapter that records deltas, for tests and diagnostics.
#[derive(Debug, Default)]
pub struct RecordingAdapter {
    deltas: Vec<TileDelta>,
}

impl RecordingAdapter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the recorded deltas in application order.
    pub fn deltas(&self) -> &[TileDelta] {
        &self.deltas
    }

    /// Take the recorded deltas, leaving the recorder empty.
    pub fn take(&mut self) -> Vec<TileDelta> {
        std::mem::take(&mut self.deltas)
    }
}

impl RenderAdapter for RecordingAdapter {
    fn clear_tile(&mut self, layer: Layer, tile: TileCoord, size: u32) -> VeilResult<()> {
        self.deltas.push(TileDelta::Clear { layer, tile, size });
        Ok(())
    }

    fn draw_edge(&mut self, stroke: EdgeStroke) -> VeilResult<()> {
        self.deltas.push(TileDelta::Edge(stroke));
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/delta.rs"]
mod tests;
