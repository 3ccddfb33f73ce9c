use crate::grid::coord::TileCoord;
use crate::render::delta::{Edge, EdgePaint, EdgeStroke, Layer, TileDelta};
use crate::reveal::ledger::RevealLedger;
use crate::spread::frontier::TileSet;

/// Incremental border painter for committed tiles.
///
/// Keeps the set of tiles already painted so each committed tile is processed exactly once.
/// A contiguous committed region ends up with a light top edge and a dark bottom edge along
/// its outer boundary only; seams between vertically adjacent committed tiles are erased.
#[derive(Clone, Debug)]
pub struct BorderSync {
    tile_size: u32,
    processed: TileSet,
}

impl BorderSync {
    /// Create a synchronizer for tiles of `tile_size` pixels.
    pub fn new(tile_size: u32) -> Self {
        Self {
            tile_size,
            processed: TileSet::new(),
        }
    }

    /// Tiles already painted by earlier passes.
    pub fn processed(&self) -> &TileSet {
        &self.processed
    }

    /// Emit background deltas for every tile committed since the previous pass.
    ///
    /// A pass over an unchanged ledger emits nothing.
    pub fn sync(&mut self, ledger: &RevealLedger) -> Vec<TileDelta> {
        let mut out = Vec::new();
        let fresh: Vec<TileCoord> = ledger
            .tiles()
            .difference(&self.processed)
            .copied()
            .collect();
        for tile in &fresh {
            self.paint_tile(*tile, ledger, &mut out);
        }
        self.processed.extend(fresh);
        out
    }

    fn paint_tile(&self, tile: TileCoord, ledger: &RevealLedger, out: &mut Vec<TileDelta>) {
        let size = self.tile_size;
        out.push(TileDelta::Clear {
            layer: Layer::Background,
            tile,
            size,
        });

        let top = if ledger.contains(&tile.above(size)) {
            tracing::trace!(%tile, "top neighbor committed, erasing shared seam");
            EdgePaint::Erase
        } else {
            tracing::trace!(%tile, "drawing top border");
            EdgePaint::Light
        };
        out.push(TileDelta::Edge(EdgeStroke {
            x: tile.x,
            y: tile.y,
            width: size,
            paint: top,
            edge: Edge::Top,
        }));

        let bottom = if ledger.contains(&tile.below(size)) {
            tracing::trace!(%tile, "bottom neighbor committed, erasing shared seam");
            EdgePaint::Erase
        } else {
            tracing::trace!(%tile, "drawing bottom border");
            EdgePaint::Dark
        };
        out.push(TileDelta::Edge(EdgeStroke {
            x: tile.x,
            y: tile.y + i64::from(size),
            width: size,
            paint: bottom,
            edge: Edge::Bottom,
        }));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/border.rs"]
mod tests;
