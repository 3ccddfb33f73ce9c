use rand::Rng;
use rand::seq::SliceRandom;
use smallvec::SmallVec;

use crate::foundation::error::{VeilError, VeilResult};

/// Neighbor offset in whole tiles (`dx` columns, `dy` rows; positive `dy` is down).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Offset {
    /// Column delta.
    pub dx: i32,
    /// Row delta.
    pub dy: i32,
}

impl Offset {
    /// Create an offset.
    pub const fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    /// Return `true` for the `(0, 0)` offset.
    pub fn is_zero(self) -> bool {
        self.dx == 0 && self.dy == 0
    }
}

/// Offsets produced by one sampling call.
pub type Offsets = SmallVec<[Offset; 8]>;

/// Weighted candidate table: repeated entries carry extra weight.
///
/// Straight-down entries make up a third of the table: twice the upward share and four times
/// the share of any single lateral entry.
pub const WEIGHTED_DIRECTIONS: [Offset; 12] = [
    // down
    Offset::new(0, 1),
    Offset::new(0, 2),
    Offset::new(0, 1),
    Offset::new(0, 1),
    // up
    Offset::new(0, -1),
    Offset::new(0, -1),
    // left / right
    Offset::new(-1, 0),
    Offset::new(1, 0),
    Offset::new(2, 0),
    Offset::new(-2, 0),
    // down-left, down-right
    Offset::new(-1, 1),
    Offset::new(1, 1),
];

/// Shuffled, size-limited draws from a weighted direction table.
#[derive(Clone, Debug)]
pub struct DirectionSampler {
    table: SmallVec<[Offset; 16]>,
    min_count: usize,
    max_count: usize,
}

impl Default for DirectionSampler {
    fn default() -> Self {
        Self {
            table: SmallVec::from_slice(&WEIGHTED_DIRECTIONS),
            min_count: 4,
            max_count: 5,
        }
    }
}

impl DirectionSampler {
    /// Build a sampler over a custom table with a per-call count range `min..=max`.
    pub fn new(table: &[Offset], min_count: usize, max_count: usize) -> VeilResult<Self> {
        if table.is_empty() {
            return Err(VeilError::validation("direction table must not be empty"));
        }
        if table.iter().any(|o| o.is_zero()) {
            return Err(VeilError::validation(
                "direction table must not contain the (0, 0) offset",
            ));
        }
        if min_count == 0 || min_count > max_count {
            return Err(VeilError::validation(format!(
                "direction count range {min_count}..={max_count} is invalid"
            )));
        }
        if max_count > table.len() {
            return Err(VeilError::validation(format!(
                "direction count {max_count} exceeds table size {}",
                table.len()
            )));
        }
        Ok(Self {
            table: SmallVec::from_slice(table),
            min_count,
            max_count,
        })
    }

    /// Default table with a custom count range.
    pub fn with_counts(min_count: usize, max_count: usize) -> VeilResult<Self> {
        Self::new(&WEIGHTED_DIRECTIONS, min_count, max_count)
    }

    /// The candidate table.
    pub fn table(&self) -> &[Offset] {
        &self.table
    }

    /// Inclusive per-call count range.
    pub fn count_range(&self) -> (usize, usize) {
        (self.min_count, self.max_count)
    }

    /// Draw a count uniformly from the configured range, then sample that many offsets.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Offsets {
        let count = rng.gen_range(self.min_count..=self.max_count);
        self.sample_n(rng, count)
    }

    /// Shuffle the whole table and return its first `count` entries.
    ///
    /// No table entry is returned twice within one call. `count` is clamped to the table size.
    pub fn sample_n<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Offsets {
        let mut shuffled = self.table.clone();
        shuffled.shuffle(rng);
        shuffled.truncate(count.min(self.table.len()));
        shuffled.into_iter().collect()
    }
}

/// Uniform offsets within a square radius, excluding `(0, 0)`.
#[derive(Clone, Copy, Debug)]
pub struct RadiusSampler {
    radius: i32,
    samples: usize,
}

impl Default for RadiusSampler {
    fn default() -> Self {
        Self {
            radius: 5,
            samples: 5,
        }
    }
}

impl RadiusSampler {
    /// Create a sampler drawing `samples` offsets per call, each axis in `[-radius, radius]`.
    pub fn new(radius: i32, samples: usize) -> VeilResult<Self> {
        if radius < 1 {
            return Err(VeilError::validation("spread radius must be >= 1"));
        }
        if samples == 0 {
            return Err(VeilError::validation("spread samples must be >= 1"));
        }
        Ok(Self { radius, samples })
    }

    /// Radius in cells.
    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Draw `samples` offsets; a zero draw is redrawn. Repeats across draws are allowed.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Offsets {
        let mut out = Offsets::new();
        while out.len() < self.samples {
            let o = Offset::new(
                rng.gen_range(-self.radius..=self.radius),
                rng.gen_range(-self.radius..=self.radius),
            );
            if !o.is_zero() {
                out.push(o);
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/spread/dirs.rs"]
mod tests;
