use rand::Rng;
use rand::rngs::StdRng;

use crate::driver::activity::{Activity, ScrollActivity};
use crate::driver::{DriverStats, ScrollPosition, SpreadDriver, SpreadState};
use crate::foundation::core::{Millis, Viewport};
use crate::foundation::error::{VeilError, VeilResult};
use crate::grid::cells::{Cell, CellGrid};
use crate::grid::coord::TileCoord;
use crate::render::delta::{Layer, TileDelta};
use crate::session::config::RevealConfig;
use crate::spread::dirs::RadiusSampler;
use crate::spread::queue::{FinishThreshold, finish_if_sparse, propagate};

/// Lifecycle of a [`QueueDriver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepperState {
    /// No surface or no seed yet.
    Unseeded,
    /// Seeded; steps run on frames while scrolling is active.
    Running,
    /// Queue exhausted or everything revealed. Only a re-seed leaves this state.
    Terminated,
}

/// Queue-based driver: propagation runs on the frame clock, gated by scroll activity.
///
/// The grid spans the whole document and never fewer than `grid_viewports` viewport heights. A
/// single seed is placed in the first viewport; every active frame spreads the whole queue once.
pub struct QueueDriver<R: Rng = StdRng> {
    tile_size: u32,
    grid_viewports: f64,
    sampler: RadiusSampler,
    threshold: FinishThreshold,
    rng: R,

    viewport: Viewport,
    grid: Option<CellGrid>,
    queue: Vec<Cell>,
    activity: ScrollActivity,
    state: StepperState,
    steps: u64,
}

impl QueueDriver<StdRng> {
    /// Create an unseeded driver using the RNG described by `cfg`.
    pub fn new(cfg: &RevealConfig, viewport: Viewport) -> VeilResult<Self> {
        Self::with_rng(cfg, viewport, cfg.rng())
    }
}

impl<R: Rng> QueueDriver<R> {
    /// Create an unseeded driver with an injected random source.
    pub fn with_rng(cfg: &RevealConfig, viewport: Viewport, rng: R) -> VeilResult<Self> {
        cfg.validate()?;
        Ok(Self {
            tile_size: cfg.queue.tile_size,
            grid_viewports: cfg.queue.grid_viewports,
            sampler: cfg.radius_sampler()?,
            threshold: cfg.queue.finish_threshold,
            rng,
            viewport,
            grid: None,
            queue: Vec::new(),
            activity: ScrollActivity::new(cfg.idle_after_ms),
            state: StepperState::Unseeded,
            steps: 0,
        })
    }

    /// Current lifecycle state.
    pub fn stepper_state(&self) -> StepperState {
        self.state
    }

    /// Scroll activity as of the last event or frame.
    pub fn activity(&self) -> Activity {
        self.activity.state()
    }

    /// Infection matrix, once seeded.
    pub fn grid(&self) -> Option<&CellGrid> {
        self.grid.as_ref()
    }

    /// Cells that spread on the next active frame.
    pub fn queue(&self) -> &[Cell] {
        &self.queue
    }

    /// Propagation steps run since the last seed.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    /// `(rows, cols)` for the current viewport.
    ///
    /// Rows cover the whole document, and at least `grid_viewports` viewport heights.
    fn grid_dims(&self) -> (usize, usize) {
        let s = f64::from(self.tile_size);
        let cols = (f64::from(self.viewport.width) / s).ceil() as usize;
        let span = (f64::from(self.viewport.viewport_height) * self.grid_viewports)
            .max(f64::from(self.viewport.document_height));
        ((span / s).ceil() as usize, cols)
    }

    fn clears(&self, cells: &[Cell]) -> Vec<TileDelta> {
        cells
            .iter()
            .map(|c| TileDelta::Clear {
                layer: Layer::Overlay,
                tile: TileCoord::from_cell(c.row, c.col, self.tile_size),
                size: self.tile_size,
            })
            .collect()
    }

    fn terminate(&mut self, reason: &'static str) {
        self.queue.clear();
        self.activity.cancel();
        self.state = StepperState::Terminated;
        tracing::debug!(steps = self.steps, reason, "spread terminated");
    }

    fn reset(&mut self) {
        self.grid = None;
        self.queue.clear();
        self.activity.cancel();
        self.state = StepperState::Unseeded;
        self.steps = 0;
    }

    #[tracing::instrument(level = "debug", skip_all)]
    fn step(&mut self) -> Vec<TileDelta> {
        let Some(grid) = self.grid.as_mut() else {
            return Vec::new();
        };
        let mut infected = propagate(&self.queue, grid, &self.sampler, &mut self.rng);
        self.queue = infected.clone();
        infected.extend(finish_if_sparse(grid, self.threshold));
        let full = grid.is_full();
        self.steps += 1;
        tracing::trace!(
            infected = infected.len(),
            remaining = grid.uninfected(),
            "propagation step"
        );

        let deltas = self.clears(&infected);
        if full {
            self.terminate("grid full");
        } else if self.queue.is_empty() {
            self.terminate("queue exhausted");
        }
        deltas
    }
}

impl<R: Rng> SpreadDriver for QueueDriver<R> {
    fn seed(&mut self) -> Vec<TileDelta> {
        self.reset();
        if self.viewport.is_empty() {
            tracing::debug!("viewport empty, skipping seed");
            return Vec::new();
        }
        let (rows, cols) = self.grid_dims();
        let mut grid = match CellGrid::new(rows, cols) {
            Ok(g) => g,
            Err(err) => {
                tracing::debug!(%err, "cannot allocate cell grid");
                return Vec::new();
            }
        };
        let seed_rows = ((self.viewport.viewport_height / self.tile_size) as usize).clamp(1, rows);
        let seed = Cell::new(
            self.rng.gen_range(0..seed_rows),
            self.rng.gen_range(0..cols),
        );
        grid.infect(seed);
        self.grid = Some(grid);
        self.queue = vec![seed];
        self.state = StepperState::Running;
        tracing::debug!(rows, cols, row = seed.row, col = seed.col, "seeded cell grid");
        self.clears(&[seed])
    }

    fn on_scroll(&mut self, now: Millis, position: Option<ScrollPosition>) -> Vec<TileDelta> {
        if self.state == StepperState::Running {
            self.activity.tick(now);
        }
        if !position.is_some_and(ScrollPosition::at_bottom) {
            return Vec::new();
        }
        // Reaching the bottom reveals everything, even after the queue ran dry.
        let Some(grid) = self.grid.as_mut().filter(|g| !g.is_full()) else {
            return Vec::new();
        };
        let rest = grid.infect_all();
        let deltas = self.clears(&rest);
        self.terminate("scrolled to bottom");
        deltas
    }

    fn frame(&mut self, now: Millis) -> Vec<TileDelta> {
        if self.state != StepperState::Running {
            return Vec::new();
        }
        match self.activity.poll(now) {
            Activity::Idle => Vec::new(),
            Activity::Active => self.step(),
        }
    }

    fn on_resize(&mut self, viewport: Viewport) -> Vec<TileDelta> {
        tracing::debug!(
            width = viewport.width,
            height = viewport.viewport_height,
            "resize, allocating a fresh grid"
        );
        self.viewport = viewport;
        self.seed()
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn is_terminated(&self) -> bool {
        self.state == StepperState::Terminated
    }

    fn tile_size(&self) -> u32 {
        self.tile_size
    }

    fn stats(&self) -> DriverStats {
        let (infected, total) = self
            .grid
            .as_ref()
            .map_or((0, 0), |g| (g.len() - g.uninfected(), g.len()));
        DriverStats {
            infected,
            committed: 0,
            total,
            terminated: self.is_terminated(),
        }
    }

    fn state(&self) -> SpreadState {
        let tile = |c: &Cell| TileCoord::from_cell(c.row, c.col, self.tile_size);
        let revealed = self
            .grid
            .iter()
            .flat_map(|g| g.infected_cells())
            .map(|c| tile(&c))
            .collect();
        let mut queued: Vec<TileCoord> = self.queue.iter().map(tile).collect();
        queued.sort_unstable();
        SpreadState {
            revealed,
            committed: Vec::new(),
            queued,
        }
    }

    /// Rebuild the grid from `state.revealed` and resume spreading from `state.queued`.
    ///
    /// An empty `queued` list restores a finished spread; only a bottom scroll or a re-seed
    /// changes it afterwards.
    fn restore(&mut self, state: SpreadState) -> VeilResult<Vec<TileDelta>> {
        if !state.committed.is_empty() {
            return Err(VeilError::validation(
                "queue variant has no committed tiles",
            ));
        }
        self.reset();
        if self.viewport.is_empty() {
            return Err(VeilError::validation("cannot restore onto an empty viewport"));
        }
        let (rows, cols) = self.grid_dims();
        let tile_size = self.tile_size;
        let to_cell = |tile: TileCoord| {
            tile.to_cell(tile_size)
                .map(|(row, col)| Cell::new(row, col))
                .filter(|c| c.row < rows && c.col < cols)
                .ok_or_else(|| {
                    VeilError::coord(format!("tile '{tile}' is outside the {rows}x{cols} grid"))
                })
        };

        let mut grid = CellGrid::new(rows, cols)?;
        let mut cells = Vec::with_capacity(state.revealed.len());
        for tile in state.revealed {
            let cell = to_cell(tile)?;
            if grid.infect(cell) {
                cells.push(cell);
            }
        }
        let mut queue = Vec::with_capacity(state.queued.len());
        for tile in state.queued {
            let cell = to_cell(tile)?;
            if !grid.is_infected(cell) {
                return Err(VeilError::validation(format!(
                    "queued tile '{tile}' is not revealed"
                )));
            }
            queue.push(cell);
        }
        queue.dedup();

        let full = grid.is_full();
        self.grid = Some(grid);
        self.queue = queue;
        self.state = StepperState::Running;
        if full {
            self.terminate("grid full");
        } else if self.queue.is_empty() {
            self.terminate("queue exhausted");
        }
        Ok(self.clears(&cells))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/driver/stepper.rs"]
mod tests;
