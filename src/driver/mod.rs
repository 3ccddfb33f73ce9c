//! Spread drivers: own the spread state and turn host events into tile deltas.
//!
//! [`tick::TickDriver`] advances the set-based frontier once per scroll tick.
//! [`stepper::QueueDriver`] runs queue propagation on the frame clock while scrolling is active.
//! [`progress::ProgressDriver`] claims random tiles until the claimed share matches scroll progress.

/// Scroll activity tracking.
pub mod activity;
/// Scroll-progress driver.
pub mod progress;
/// Queue-based driver.
pub mod stepper;
/// Set-based driver.
pub mod tick;

use crate::foundation::core::{Millis, Viewport};
use crate::foundation::error::VeilResult;
use crate::grid::coord::TileCoord;
use crate::render::delta::TileDelta;

/// Scroll geometry reported with a scroll event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScrollPosition {
    /// Vertical scroll offset in pixels.
    pub offset: u32,
    /// Height of the visible window in pixels.
    pub viewport_height: u32,
    /// Full scrollable document height in pixels.
    pub document_height: u32,
}

impl ScrollPosition {
    /// Return `true` once the bottom of the window has reached the end of the document.
    pub fn at_bottom(self) -> bool {
        u64::from(self.offset) + u64::from(self.viewport_height) >= u64::from(self.document_height)
    }

    /// Fraction of the scroll range covered, in `[0, 1]`.
    ///
    /// A document that cannot scroll counts as fully scrolled.
    pub fn progress(self) -> f64 {
        let range = self.document_height.saturating_sub(self.viewport_height);
        if range == 0 {
            return 1.0;
        }
        (f64::from(self.offset) / f64::from(range)).min(1.0)
    }
}

/// Progress counters for logs and tooling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DriverStats {
    /// Tiles or cells revealed on the overlay.
    pub infected: usize,
    /// Tiles committed to the background ledger (set variant only).
    pub committed: usize,
    /// Total tiles or cells on the page.
    pub total: usize,
    /// Whether the driver has entered its terminal state.
    pub terminated: bool,
}

/// Exported spread membership, in ascending tile order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpreadState {
    /// Tiles cleared on the overlay.
    pub revealed: Vec<TileCoord>,
    /// Tiles committed to the background ledger.
    pub committed: Vec<TileCoord>,
    /// Tiles still spreading on the next step (queue variant).
    pub queued: Vec<TileCoord>,
}

/// Event-driven owner of one spread variant.
///
/// Every method returns the deltas to apply, in order, to the mounted render adapter.
pub trait SpreadDriver {
    /// Discard all state and place the initial seeds.
    fn seed(&mut self) -> Vec<TileDelta>;

    /// Handle one scroll tick at `now`.
    fn on_scroll(&mut self, now: Millis, position: Option<ScrollPosition>) -> Vec<TileDelta>;

    /// Advance frame-clock work at `now`.
    fn frame(&mut self, now: Millis) -> Vec<TileDelta>;

    /// Adopt new surface dimensions, discarding state and re-seeding.
    fn on_resize(&mut self, viewport: Viewport) -> Vec<TileDelta>;

    /// Current surface dimensions.
    fn viewport(&self) -> Viewport;

    /// Return `true` once no further deltas can be produced until the next re-seed.
    fn is_terminated(&self) -> bool;

    /// Tile edge in pixels.
    fn tile_size(&self) -> u32;

    /// Progress counters.
    fn stats(&self) -> DriverStats;

    /// Export the current membership.
    fn state(&self) -> SpreadState;

    /// Replace all state with `state` and return the deltas that repaint it on a fresh surface.
    fn restore(&mut self, state: SpreadState) -> VeilResult<Vec<TileDelta>>;
}
