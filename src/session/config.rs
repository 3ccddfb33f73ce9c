use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::foundation::core::ColorHex;
use crate::foundation::error::{VeilError, VeilResult};
use crate::spread::dirs::{DirectionSampler, RadiusSampler};
use crate::spread::queue::FinishThreshold;

/// Effect configuration, usually loaded from JSON.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealConfig {
    /// Tile edge in pixels for the set-based variant.
    pub tile_size: u32,
    /// Number of initial seed picks.
    pub seed_count: usize,
    /// Height of the seed band as a fraction of the viewport height.
    pub seed_band: f64,
    /// Set-based fan-out.
    pub spread: SpreadConfig,
    /// Queue-based propagation.
    pub queue: QueueConfig,
    /// Quiet period after the last scroll tick before spreading pauses.
    pub idle_after_ms: u64,
    /// Fixed RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    /// Layer colors.
    pub colors: Palette,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            tile_size: 18,
            seed_count: 3,
            seed_band: 0.5,
            spread: SpreadConfig::default(),
            queue: QueueConfig::default(),
            idle_after_ms: 150,
            seed: None,
            colors: Palette::default(),
        }
    }
}

/// Fan-out range of the set-based variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpreadConfig {
    /// Fewest neighbors sampled per frontier tile per step.
    pub min_fanout: usize,
    /// Most neighbors sampled per frontier tile per step.
    pub max_fanout: usize,
}

impl Default for SpreadConfig {
    fn default() -> Self {
        Self {
            min_fanout: 4,
            max_fanout: 5,
        }
    }
}

/// Parameters of the queue-based variant.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QueueConfig {
    /// Cell edge in pixels.
    pub tile_size: u32,
    /// Maximum offset per axis, in cells.
    pub radius: i32,
    /// Offsets sampled per queued cell.
    pub samples: usize,
    /// Grid height in viewport heights.
    pub grid_viewports: f64,
    /// Remaining-cell count below which the reveal is finished in one pass.
    pub finish_threshold: FinishThreshold,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            tile_size: 20,
            radius: 5,
            samples: 5,
            grid_viewports: 4.0,
            finish_threshold: FinishThreshold::default(),
        }
    }
}

/// Layer colors (straight alpha, `#rrggbb[aa]`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    /// Page color under both layers.
    pub backdrop: ColorHex,
    /// Overlay fill.
    pub overlay: ColorHex,
    /// Horizontal rules on both layers.
    pub rule: ColorHex,
    /// Background gradient at the top of the page.
    pub gradient_top: ColorHex,
    /// Background gradient at the bottom of the page.
    pub gradient_bottom: ColorHex,
    /// Outer top edge of revealed regions.
    pub light_edge: ColorHex,
    /// Outer bottom edge of revealed regions.
    pub dark_edge: ColorHex,
    /// Covered tile color (retained scene).
    pub cover: ColorHex,
    /// Revealed tile color at the top of each viewport band (retained scene).
    pub revealed_top: ColorHex,
    /// Revealed tile color at the bottom of each viewport band (retained scene).
    pub revealed_bottom: ColorHex,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            backdrop: ColorHex::rgb(0xee, 0xee, 0xee),
            overlay: ColorHex::rgb(0xff, 0xff, 0xff),
            rule: ColorHex::rgb(0x00, 0x00, 0x00),
            gradient_top: ColorHex::rgba(90, 104, 134, 128),
            gradient_bottom: ColorHex::rgba(145, 223, 160, 204),
            light_edge: ColorHex::rgb(0xff, 0xff, 0xff),
            dark_edge: ColorHex::rgb(0x00, 0x00, 0x00),
            cover: ColorHex::rgb(0x00, 0xff, 0x00),
            revealed_top: ColorHex::rgb(0x65, 0x97, 0xe6),
            revealed_bottom: ColorHex::rgb(0x75, 0xd6, 0x8c),
        }
    }
}

impl RevealConfig {
    /// Parse a configuration from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> VeilResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| VeilError::serde(format!("parse reveal config JSON: {e}")))
    }

    /// Parse a configuration from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> VeilResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            VeilError::validation(format!("open reveal config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check value ranges.
    pub fn validate(&self) -> VeilResult<()> {
        if self.tile_size == 0 || self.queue.tile_size == 0 {
            return Err(VeilError::validation("tile_size must be > 0"));
        }
        if !(self.seed_band > 0.0 && self.seed_band <= 1.0) {
            return Err(VeilError::validation(format!(
                "seed_band must be within (0, 1], got {}",
                self.seed_band
            )));
        }
        if !(self.queue.grid_viewports.is_finite() && self.queue.grid_viewports >= 1.0) {
            return Err(VeilError::validation(format!(
                "queue.grid_viewports must be >= 1, got {}",
                self.queue.grid_viewports
            )));
        }
        self.queue.finish_threshold.validate()?;
        self.direction_sampler()?;
        self.radius_sampler()?;
        Ok(())
    }

    /// Sampler for the set-based variant.
    pub fn direction_sampler(&self) -> VeilResult<DirectionSampler> {
        DirectionSampler::with_counts(self.spread.min_fanout, self.spread.max_fanout)
    }

    /// Sampler for the queue-based variant.
    pub fn radius_sampler(&self) -> VeilResult<RadiusSampler> {
        RadiusSampler::new(self.queue.radius, self.queue.samples)
    }

    /// Random source: seeded when `seed` is set, OS entropy otherwise.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/config.rs"]
mod tests;
