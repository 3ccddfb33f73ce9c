//! Tileveil is a scroll-driven reveal effect: an opaque overlay is eaten away tile by tile as the
//! page scrolls, uncovering a gradient background.
//!
//! The crate is split into a render-agnostic core and pluggable render adapters:
//!
//! - [`spread`] grows the infected region, either as a set-based frontier or a cell queue; a
//!   third driver claims random tiles in step with scroll progress
//! - [`reveal`] keeps the committed-tile ledger and the border lines around it in sync
//! - [`driver`] maps scroll, frame and resize events onto the spread rules
//! - [`render`] turns the resulting [`TileDelta`] stream into pixels
//! - [`session`] ties a driver to a mounted surface and plays scroll sequences into a [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Spread drivers.
pub mod driver;
/// Frame sinks.
pub mod encode;
/// Tile addressing.
pub mod grid;
/// Render adapters.
pub mod render;
/// Committed tiles and border lines.
pub mod reveal;
/// Event-facing session API.
pub mod session;
/// Spread rules.
pub mod spread;

pub use crate::foundation::core::{
    Bounds, ColorHex, FrameIndex, Millis, Rect, Rgba8Premul, Viewport,
};
pub use crate::foundation::error::{VeilError, VeilResult};

pub use crate::driver::{DriverStats, ScrollPosition, SpreadDriver, SpreadState};
pub use crate::encode::sink::{FrameSink, InMemorySink, PngSequenceSink, SinkConfig};
pub use crate::grid::coord::{TileCoord, TileKey};
pub use crate::render::backend::{BackendKind, FrameRGBA, RenderSurface, create_surface};
pub use crate::render::delta::{RenderAdapter, TileDelta};
pub use crate::session::config::RevealConfig;
pub use crate::session::render_session::{
    PlaybackStats, RevealSession, RevealSessionOpts, Variant,
};
pub use crate::session::snapshot::RevealSnapshot;
