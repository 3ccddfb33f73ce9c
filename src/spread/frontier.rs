use std::collections::BTreeSet;

use rand::Rng;

use crate::foundation::core::{Bounds, Viewport};
use crate::grid::coord::TileCoord;
use crate::spread::dirs::DirectionSampler;

/// Ordered tile set. Ordering keeps random-number consumption stable under a seeded RNG.
pub type TileSet = BTreeSet<TileCoord>;

/// Tiles whose overlay mask has been cleared.
///
/// Growth is strictly additive: no operation removes a member.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Frontier {
    tiles: TileSet,
}

/// Result of one spread step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrontierStep {
    /// Previous members plus everything accepted this step.
    pub next: Frontier,
    /// Newly accepted tiles in acceptance order, each listed once.
    pub added: Vec<TileCoord>,
}

impl Frontier {
    /// An empty frontier.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a frontier from explicit members.
    pub fn from_tiles(tiles: impl IntoIterator<Item = TileCoord>) -> Self {
        Self {
            tiles: tiles.into_iter().collect(),
        }
    }

    /// Pick `count` random tiles from the top `band_rows` rows of the page.
    ///
    /// Picks may coincide, so the result can hold fewer than `count` tiles. A band or page too
    /// small to hold one whole tile yields an empty frontier.
    pub fn seeded<R: Rng + ?Sized>(
        viewport: Viewport,
        tile_size: u32,
        band_fraction: f64,
        count: usize,
        rng: &mut R,
    ) -> Self {
        if tile_size == 0 {
            return Self::new();
        }
        let cols = (viewport.width / tile_size) as usize;
        let band_px = (f64::from(viewport.viewport_height) * band_fraction).floor() as u32;
        let rows = (band_px / tile_size) as usize;
        if cols == 0 || rows == 0 {
            return Self::new();
        }
        let tiles = (0..count)
            .map(|_| {
                let row = rng.gen_range(0..rows);
                let col = rng.gen_range(0..cols);
                TileCoord::from_cell(row, col, tile_size)
            })
            .collect();
        Self { tiles }
    }

    /// Borrow the members.
    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    /// Return `true` if `tile` is a member.
    pub fn contains(&self, tile: &TileCoord) -> bool {
        self.tiles.contains(tile)
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Return `true` when there are no members.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Fan out from every member once.
    ///
    /// Each member draws offsets from `sampler`; a candidate is accepted when it lies inside
    /// `bounds` and is neither a member nor already accepted. All candidates are resolved before
    /// the result is returned, so callers only ever see fully expanded frontiers.
    pub fn step<R: Rng + ?Sized>(
        &self,
        bounds: Bounds,
        tile_size: u32,
        sampler: &DirectionSampler,
        rng: &mut R,
    ) -> FrontierStep {
        let mut next = self.tiles.clone();
        let mut added = Vec::new();
        for &tile in &self.tiles {
            for dir in sampler.sample(rng) {
                let candidate = tile.offset(dir.dx, dir.dy, tile_size);
                if bounds.contains(candidate.x, candidate.y) && next.insert(candidate) {
                    added.push(candidate);
                }
            }
        }
        FrontierStep {
            next: Self { tiles: next },
            added,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spread/frontier.rs"]
mod tests;
