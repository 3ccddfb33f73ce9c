//! Rendering adapters that turn tile deltas into pixels.
//!
//! [`delta`] defines the render-agnostic change stream and the [`delta::RenderAdapter`] seam.
//! [`cpu::CpuLayers`] paints deltas immediately into two pixel layers; [`scene::SceneAdapter`]
//! retains a node per tile and redraws the page on demand.

/// Frames and render surfaces.
pub mod backend;
/// Immediate-mode pixel layers.
pub mod cpu;
/// Tile deltas and the adapter trait.
pub mod delta;
/// Retained-mode scene adapter.
pub mod scene;
