//! Session layer: configuration, the event-facing [`RevealSession`] and state snapshots.

/// Effect configuration.
pub mod config;
/// Event-facing session.
pub mod render_session;
/// Serializable spread state.
pub mod snapshot;

pub use render_session::{PlaybackStats, RevealSession, RevealSessionOpts, Variant};
