use rand::Rng;

use crate::foundation::error::{VeilError, VeilResult};
use crate::grid::cells::{Cell, CellGrid};
use crate::spread::dirs::RadiusSampler;

/// When the remaining uninfected cells are few enough to reveal in one pass.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinishThreshold {
    /// Finish once fewer than this many cells remain.
    Cells(usize),
    /// Finish once fewer than this fraction of the grid remains.
    Fraction(f64),
}

impl Default for FinishThreshold {
    fn default() -> Self {
        Self::Cells(30)
    }
}

impl FinishThreshold {
    /// Validate the threshold value.
    pub fn validate(self) -> VeilResult<()> {
        match self {
            Self::Cells(_) => Ok(()),
            Self::Fraction(f) if (0.0..=1.0).contains(&f) => Ok(()),
            Self::Fraction(f) => Err(VeilError::validation(format!(
                "finish fraction must be within [0, 1], got {f}"
            ))),
        }
    }

    /// Absolute cell limit for a grid of `total` cells.
    pub fn limit(self, total: usize) -> usize {
        match self {
            Self::Cells(n) => n,
            Self::Fraction(f) => (total as f64 * f.clamp(0.0, 1.0)).ceil() as usize,
        }
    }

    /// Return `true` when `grid` has dropped below the threshold.
    pub fn reached(self, grid: &CellGrid) -> bool {
        grid.uninfected() < self.limit(grid.len())
    }
}

/// Spread every queued cell once and return the next queue.
///
/// Each queued cell draws offsets from `sampler`; every in-bounds target that is not yet
/// infected is infected and appended to the result. An empty result is terminal.
pub fn propagate<R: Rng + ?Sized>(
    queue: &[Cell],
    grid: &mut CellGrid,
    sampler: &RadiusSampler,
    rng: &mut R,
) -> Vec<Cell> {
    let mut next = Vec::new();
    for &cell in queue {
        for dir in sampler.sample(rng) {
            let Some(target) = grid.shifted(cell, dir.dy, dir.dx) else {
                continue;
            };
            if grid.infect(target) {
                next.push(target);
            }
        }
    }
    next
}

/// Infect everything left once the grid drops below `threshold`.
///
/// Returns the cells infected by this call; empty when the threshold was not reached.
pub fn finish_if_sparse(grid: &mut CellGrid, threshold: FinishThreshold) -> Vec<Cell> {
    if grid.is_full() || !threshold.reached(grid) {
        return Vec::new();
    }
    tracing::debug!(
        remaining = grid.uninfected(),
        "finishing reveal below threshold"
    );
    grid.infect_all()
}

#[cfg(test)]
#[path = "../../tests/unit/spread/queue.rs"]
mod tests;
