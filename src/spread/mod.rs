//! Spread rules: weighted direction sampling, set-based frontier growth, and queue-based
//! propagation over a [`crate::grid::cells::CellGrid`].

/// Direction samplers.
pub mod dirs;
/// Set-based frontier.
pub mod frontier;
/// Queue-based propagation.
pub mod queue;
