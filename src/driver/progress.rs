use std::collections::BTreeSet;

use rand::Rng;
use rand::rngs::StdRng;

use crate::driver::{DriverStats, ScrollPosition, SpreadDriver, SpreadState};
use crate::foundation::core::{Millis, Viewport};
use crate::foundation::error::{VeilError, VeilResult};
use crate::grid::coord::TileCoord;
use crate::render::delta::{Layer, TileDelta};
use crate::session::config::RevealConfig;

/// Progress driver: the claimed share of the page follows the scroll position.
///
/// Each scroll event claims random unclaimed tiles until `floor(progress * total)` tiles are
/// claimed. Claims are never released, so scrolling back up reveals nothing new and hides
/// nothing.
pub struct ProgressDriver<R: Rng = StdRng> {
    tile_size: u32,
    rng: R,
    viewport: Viewport,
    claimed: Vec<TileCoord>,
    pool: Vec<TileCoord>,
}

impl ProgressDriver<StdRng> {
    /// Create an unseeded driver using the RNG described by `cfg`.
    pub fn new(cfg: &RevealConfig, viewport: Viewport) -> VeilResult<Self> {
        Self::with_rng(cfg, viewport, cfg.rng())
    }
}

impl<R: Rng> ProgressDriver<R> {
    /// Create an unseeded driver with an injected random source.
    pub fn with_rng(cfg: &RevealConfig, viewport: Viewport, rng: R) -> VeilResult<Self> {
        cfg.validate()?;
        Ok(Self {
            tile_size: cfg.tile_size,
            rng,
            viewport,
            claimed: Vec::new(),
            pool: Vec::new(),
        })
    }

    /// Claimed tiles, in claim order.
    pub fn claimed(&self) -> &[TileCoord] {
        &self.claimed
    }

    /// Claimed tile count that `progress` asks for.
    pub fn target(&self, progress: f64) -> usize {
        let total = self.total();
        ((progress.clamp(0.0, 1.0) * total as f64).floor() as usize).min(total)
    }

    fn total(&self) -> usize {
        self.claimed.len() + self.pool.len()
    }

    fn page_tiles(&self) -> Vec<TileCoord> {
        if self.viewport.is_empty() {
            return Vec::new();
        }
        let s = self.tile_size;
        let cols = self.viewport.width.div_ceil(s) as usize;
        let rows = self.viewport.document_height.div_ceil(s) as usize;
        (0..rows)
            .flat_map(|row| (0..cols).map(move |col| TileCoord::from_cell(row, col, s)))
            .collect()
    }

    fn clears(&self, tiles: &[TileCoord]) -> Vec<TileDelta> {
        tiles
            .iter()
            .map(|&tile| TileDelta::Clear {
                layer: Layer::Overlay,
                tile,
                size: self.tile_size,
            })
            .collect()
    }

    fn claim_up_to(&mut self, target: usize) -> Vec<TileDelta> {
        let start = self.claimed.len();
        while self.claimed.len() < target && !self.pool.is_empty() {
            let i = self.rng.gen_range(0..self.pool.len());
            self.claimed.push(self.pool.swap_remove(i));
        }
        if self.claimed.len() > start {
            tracing::debug!(
                claimed = self.claimed.len(),
                total = self.total(),
                "claimed tiles for scroll progress"
            );
        }
        self.clears(&self.claimed[start..])
    }
}

impl<R: Rng> SpreadDriver for ProgressDriver<R> {
    fn seed(&mut self) -> Vec<TileDelta> {
        self.claimed.clear();
        self.pool = self.page_tiles();
        tracing::debug!(total = self.pool.len(), "reset claim pool");
        Vec::new()
    }

    fn on_scroll(&mut self, _now: Millis, position: Option<ScrollPosition>) -> Vec<TileDelta> {
        let Some(position) = position else {
            return Vec::new();
        };
        let target = self.target(position.progress());
        self.claim_up_to(target)
    }

    fn frame(&mut self, _now: Millis) -> Vec<TileDelta> {
        Vec::new()
    }

    fn on_resize(&mut self, viewport: Viewport) -> Vec<TileDelta> {
        tracing::debug!(
            width = viewport.width,
            height = viewport.document_height,
            "resize, discarding claims"
        );
        self.viewport = viewport;
        self.seed()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn is_terminated(&self) -> bool {
        !self.claimed.is_empty() && self.pool.is_empty()
    }

    fn tile_size(&self) -> u32 {
        self.tile_size
    }

    fn stats(&self) -> DriverStats {
        DriverStats {
            infected: self.claimed.len(),
            committed: 0,
            total: self.total(),
            terminated: self.is_terminated(),
        }
    }

    fn state(&self) -> SpreadState {
        let mut revealed = self.claimed.clone();
        revealed.sort_unstable();
        SpreadState {
            revealed,
            committed: Vec::new(),
            queued: Vec::new(),
        }
    }

    fn restore(&mut self, state: SpreadState) -> VeilResult<Vec<TileDelta>> {
        if !state.committed.is_empty() || !state.queued.is_empty() {
            return Err(VeilError::validation(
                "progress variant has no committed or queued tiles",
            ));
        }
        let page = self.page_tiles();
        let on_page: BTreeSet<TileCoord> = page.iter().copied().collect();
        if let Some(tile) = state.revealed.iter().find(|t| !on_page.contains(*t)) {
            return Err(VeilError::coord(format!(
                "tile '{tile}' is not a tile of the current page"
            )));
        }
        let claimed: BTreeSet<TileCoord> = state.revealed.into_iter().collect();
        let pool = page.into_iter().filter(|t| !claimed.contains(t)).collect();
        let claimed: Vec<TileCoord> = claimed.into_iter().collect();
        self.pool = pool;
        self.claimed = claimed;
        Ok(self.clears(&self.claimed))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/driver/progress.rs"]
mod tests;
