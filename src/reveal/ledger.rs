use crate::grid::coord::TileCoord;
use crate::spread::frontier::{Frontier, TileSet};

/// Tiles committed to the background layer.
///
/// Grows only by absorbing frontier snapshots, so it is always a subset of the frontier that
/// produced them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RevealLedger {
    tiles: TileSet,
}

impl RevealLedger {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Union every member of `snapshot` into the ledger.
    ///
    /// `snapshot` is the whole frontier as it stood, not only its latest additions, so any
    /// member missed by an earlier commit is picked up here.
    pub fn commit(mut self, snapshot: &Frontier) -> Self {
        self.tiles.extend(snapshot.tiles().iter().copied());
        self
    }

    /// Borrow the committed tiles.
    pub fn tiles(&self) -> &TileSet {
        &self.tiles
    }

    /// Return `true` if `tile` is committed.
    pub fn contains(&self, tile: &TileCoord) -> bool {
        self.tiles.contains(tile)
    }

    /// Number of committed tiles.
    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    /// Return `true` when nothing is committed.
    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Return `true` when every committed tile is also in `frontier`.
    pub fn is_subset_of(&self, frontier: &Frontier) -> bool {
        self.tiles.is_subset(frontier.tiles())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/reveal/ledger.rs"]
mod tests;
