use crate::driver::SpreadState;
use crate::foundation::core::{Bounds, Viewport};
use crate::foundation::error::{VeilError, VeilResult};
use crate::grid::coord::{TileCoord, TileKey};
use crate::session::render_session::Variant;

/// Serializable spread state, keyed by canonical tile keys.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RevealSnapshot {
    /// Spread variant that produced the state.
    pub variant: Variant,
    /// Tile edge in pixels.
    pub tile_size: u32,
    /// Surface the keys refer to.
    pub viewport: Viewport,
    /// Tiles cleared on the overlay.
    pub revealed: Vec<TileKey>,
    /// Tiles committed to the background.
    #[serde(default)]
    pub committed: Vec<TileKey>,
    /// Tiles still spreading (queue variant).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub queued: Vec<TileKey>,
}

impl RevealSnapshot {
    /// Capture `state` for `viewport`.
    pub fn capture(
        variant: Variant,
        tile_size: u32,
        viewport: Viewport,
        state: &SpreadState,
    ) -> Self {
        let keys =
            |tiles: &[TileCoord]| -> Vec<TileKey> { tiles.iter().map(|t| t.key()).collect() };
        Self {
            variant,
            tile_size,
            viewport,
            revealed: keys(&state.revealed),
            committed: keys(&state.committed),
            queued: keys(&state.queued),
        }
    }

    /// Decode every key back into a spread state.
    ///
    /// Malformed keys, keys outside the page and keys not aligned to `tile_size` are
    /// [`VeilError::Coord`] errors; nothing is coerced. Queue snapshots may hold rows below the
    /// page, since their grid spans several viewports; the driver checks those against its grid.
    pub fn restore(&self) -> VeilResult<SpreadState> {
        if self.tile_size == 0 {
            return Err(VeilError::validation("snapshot tile_size must be > 0"));
        }
        let page = self.viewport.page_bounds();
        let bounds = match self.variant {
            Variant::Set | Variant::Progress => page,
            Variant::Queue => Bounds {
                height: i64::MAX,
                ..page
            },
        };
        let decode = |keys: &[TileKey]| {
            keys.iter()
                .map(|k| k.parse_within(bounds, self.tile_size))
                .collect::<VeilResult<Vec<_>>>()
        };
        let mut revealed = decode(&self.revealed)?;
        let mut committed = decode(&self.committed)?;
        let mut queued = decode(&self.queued)?;
        for tiles in [&mut revealed, &mut committed, &mut queued] {
            tiles.sort_unstable();
            tiles.dedup();
        }
        Ok(SpreadState {
            revealed,
            committed,
            queued,
        })
    }

    /// Parse a snapshot from JSON.
    pub fn from_reader<R: std::io::Read>(r: R) -> VeilResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| VeilError::serde(format!("parse reveal snapshot JSON: {e}")))
    }

    /// Serialize to pretty JSON.
    pub fn to_json_pretty(&self) -> VeilResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| VeilError::serde(format!("serialize reveal snapshot: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/snapshot.rs"]
mod tests;
