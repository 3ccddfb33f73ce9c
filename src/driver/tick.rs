use rand::Rng;
use rand::rngs::StdRng;

use crate::driver::{DriverStats, ScrollPosition, SpreadDriver, SpreadState};
use crate::foundation::core::{Millis, Viewport};
use crate::foundation::error::{VeilError, VeilResult};
use crate::grid::coord::TileCoord;
use crate::render::delta::{Layer, TileDelta};
use crate::reveal::border::BorderSync;
use crate::reveal::ledger::RevealLedger;
use crate::session::config::RevealConfig;
use crate::spread::dirs::DirectionSampler;
use crate::spread::frontier::Frontier;

/// Set-based driver: every scroll tick fans the frontier out once.
///
/// Each tick runs, in order: snapshot the frontier, grow it, commit the snapshot to the
/// ledger, then synchronize borders for newly committed tiles. The ledger therefore trails the
/// frontier by one tick and is always a subset of it.
pub struct TickDriver<R: Rng = StdRng> {
    tile_size: u32,
    seed_count: usize,
    seed_band: f64,
    sampler: DirectionSampler,
    rng: R,

    viewport: Viewport,
    frontier: Frontier,
    ledger: RevealLedger,
    borders: BorderSync,
    ticks: u64,
}

impl TickDriver<StdRng> {
    /// Create an unseeded driver using the RNG described by `cfg`.
    pub fn new(cfg: &RevealConfig, viewport: Viewport) -> VeilResult<Self> {
        Self::with_rng(cfg, viewport, cfg.rng())
    }
}

impl<R: Rng> TickDriver<R> {
    /// Create an unseeded driver with an injected random source.
    pub fn with_rng(cfg: &RevealConfig, viewport: Viewport, rng: R) -> VeilResult<Self> {
        cfg.validate()?;
        Ok(Self {
            tile_size: cfg.tile_size,
            seed_count: cfg.seed_count,
            seed_band: cfg.seed_band,
            sampler: cfg.direction_sampler()?,
            rng,
            viewport,
            frontier: Frontier::new(),
            ledger: RevealLedger::new(),
            borders: BorderSync::new(cfg.tile_size),
            ticks: 0,
        })
    }

    /// Current frontier.
    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Current ledger.
    pub fn ledger(&self) -> &RevealLedger {
        &self.ledger
    }

    /// Scroll ticks handled since the last seed.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    fn overlay_clears(&self, tiles: impl IntoIterator<Item = TileCoord>) -> Vec<TileDelta> {
        tiles
            .into_iter()
            .map(|tile| TileDelta::Clear {
                layer: Layer::Overlay,
                tile,
                size: self.tile_size,
            })
            .collect()
    }

    #[tracing::instrument(level = "debug", skip_all)]
    fn tick(&mut self) -> Vec<TileDelta> {
        let snapshot = self.frontier.clone();
        let grown = snapshot.step(
            self.viewport.page_bounds(),
            self.tile_size,
            &self.sampler,
            &mut self.rng,
        );
        let mut deltas = self.overlay_clears(grown.added.iter().copied());
        self.frontier = grown.next;

        self.ledger = std::mem::take(&mut self.ledger).commit(&snapshot);
        deltas.extend(self.borders.sync(&self.ledger));

        self.ticks += 1;
        tracing::debug!(
            added = grown.added.len(),
            committed = self.ledger.len(),
            "tick spread"
        );
        deltas
    }
}

impl<R: Rng> SpreadDriver for TickDriver<R> {
    fn seed(&mut self) -> Vec<TileDelta> {
        self.frontier = Frontier::new();
        self.ledger = RevealLedger::new();
        self.borders = BorderSync::new(self.tile_size);
        self.ticks = 0;
        if self.viewport.is_empty() {
            tracing::debug!("viewport empty, skipping seed");
            return Vec::new();
        }
        self.frontier = Frontier::seeded(
            self.viewport,
            self.tile_size,
            self.seed_band,
            self.seed_count,
            &mut self.rng,
        );
        tracing::debug!(seeds = self.frontier.len(), "seeded frontier");
        self.overlay_clears(self.frontier.tiles().iter().copied())
    }

    fn on_scroll(&mut self, _now: Millis, _position: Option<ScrollPosition>) -> Vec<TileDelta> {
        if self.viewport.is_empty() {
            return Vec::new();
        }
        self.tick()
    }

    fn frame(&mut self, _now: Millis) -> Vec<TileDelta> {
        Vec::new()
    }

    fn on_resize(&mut self, viewport: Viewport) -> Vec<TileDelta> {
        tracing::debug!(
            width = viewport.width,
            height = viewport.document_height,
            "resize, discarding spread state"
        );
        self.viewport = viewport;
        self.seed()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn is_terminated(&self) -> bool {
        false
    }

    fn tile_size(&self) -> u32 {
        self.tile_size
    }

    fn stats(&self) -> DriverStats {
        let page = self.viewport.page_bounds();
        let s = i64::from(self.tile_size);
        DriverStats {
            infected: self.frontier.len(),
            committed: self.ledger.len(),
            total: (((page.width + s - 1) / s) * ((page.height + s - 1) / s)) as usize,
            terminated: false,
        }
    }

    fn state(&self) -> SpreadState {
        SpreadState {
            revealed: self.frontier.tiles().iter().copied().collect(),
            committed: self.ledger.tiles().iter().copied().collect(),
            queued: Vec::new(),
        }
    }

    fn restore(&mut self, state: SpreadState) -> VeilResult<Vec<TileDelta>> {
        if !state.queued.is_empty() {
            return Err(VeilError::validation("set variant has no queued tiles"));
        }
        let frontier = Frontier::from_tiles(state.revealed);
        let ledger = RevealLedger::new().commit(&Frontier::from_tiles(state.committed));
        if !ledger.is_subset_of(&frontier) {
            return Err(VeilError::validation(
                "committed tiles must all be revealed tiles",
            ));
        }
        self.frontier = frontier;
        self.ledger = ledger;
        self.borders = BorderSync::new(self.tile_size);
        self.ticks = 0;
        let mut deltas = self.overlay_clears(self.frontier.tiles().iter().copied());
        deltas.extend(self.borders.sync(&self.ledger));
        tracing::debug!(
            revealed = self.frontier.len(),
            committed = self.ledger.len(),
            "restored spread state"
        );
        Ok(deltas)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/driver/tick.rs"]
mod tests;
