//! Tile addressing: pixel-space coordinates with canonical keys, and the row/column infection
//! matrix used by queue-driven propagation.

/// Boolean infection matrix.
pub mod cells;
/// Pixel-space tile coordinates and keys.
pub mod coord;
