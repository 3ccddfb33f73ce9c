//! Frame sinks.
//!
//! Sinks consume composed frames in playback order and are fed by
//! [`crate::session::RevealSession::play`].

/// Frame sink trait and built-in sinks.
pub mod sink;
