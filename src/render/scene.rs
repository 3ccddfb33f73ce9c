use std::collections::BTreeMap;

use crate::foundation::core::{ColorHex, Rect, Viewport};
use crate::foundation::error::VeilResult;
use crate::grid::coord::TileCoord;
use crate::render::backend::{FrameRGBA, RenderSurface};
use crate::render::cpu::{color_to_cpu, rect_to_cpu, surface_size};
use crate::render::delta::{EdgePaint, EdgeStroke, Layer, RenderAdapter};
use crate::session::config::Palette;

/// Stroke width of a visible tile edge.
pub const EDGE_WIDTH: f64 = 0.5;

/// Retained state of one tile.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TileNode {
    /// Tile edge length in pixels.
    pub size: u32,
    /// Cleared on the overlay.
    pub revealed: bool,
    /// Cleared on the background.
    pub committed: bool,
}

/// Retained-mode surface: one node per touched tile, redrawn from scratch on every render.
///
/// Covered area shows the cover colour. Revealed tiles, committed or not, take their colour from
/// a vertical gradient sampled at the tile's top row, repeating every viewport height.
pub struct SceneAdapter {
    viewport: Viewport,
    width: u16,
    height: u16,
    palette: Palette,
    nodes: BTreeMap<TileCoord, TileNode>,
    lines: BTreeMap<(i64, i64, u32), EdgePaint>,
    ctx: Option<vello_cpu::RenderContext>,
}

impl SceneAdapter {
    /// Create an empty scene for `viewport`.
    pub fn new(viewport: Viewport, palette: Palette) -> VeilResult<Self> {
        let (width, height) = surface_size(viewport)?;
        Ok(Self {
            viewport,
            width,
            height,
            palette,
            nodes: BTreeMap::new(),
            lines: BTreeMap::new(),
            ctx: None,
        })
    }

    /// Node for `tile`, if any delta touched it.
    pub fn node(&self, tile: TileCoord) -> Option<&TileNode> {
        self.nodes.get(&tile)
    }

    /// Number of retained tile nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Visible edge at `(x, y)` with length `width`, if any.
    pub fn line(&self, x: i64, y: i64, width: u32) -> Option<EdgePaint> {
        self.lines.get(&(x, y, width)).copied()
    }

    /// Revealed colour for a tile whose top row is `y`.
    pub fn revealed_color(&self, y: i64) -> ColorHex {
        let band = i64::from(self.viewport.viewport_height.max(1));
        let t = y.rem_euclid(band) as f64 / band as f64;
        self.palette
            .revealed_top
            .lerp(self.palette.revealed_bottom, t)
    }

    fn node_mut(&mut self, tile: TileCoord, size: u32) -> &mut TileNode {
        let node = self.nodes.entry(tile).or_default();
        node.size = size;
        node
    }

    fn draw(&self, ctx: &mut vello_cpu::RenderContext) {
        let (wf, hf) = (f64::from(self.width), f64::from(self.height));
        ctx.set_paint(color_to_cpu(self.palette.cover));
        ctx.fill_rect(&rect_to_cpu(Rect::new(0.0, 0.0, wf, hf)));

        for (tile, node) in &self.nodes {
            if !node.revealed {
                continue;
            }
            ctx.set_paint(color_to_cpu(self.revealed_color(tile.y)));
            ctx.fill_rect(&rect_to_cpu(tile.rect(node.size)));
        }

        let half = EDGE_WIDTH / 2.0;
        for (&(x, y, width), paint) in &self.lines {
            let color = match paint {
                EdgePaint::Light => self.palette.light_edge,
                EdgePaint::Dark => self.palette.dark_edge,
                EdgePaint::Erase => continue,
            };
            let (x, y) = (x as f64, y as f64);
            ctx.set_paint(color_to_cpu(color));
            ctx.fill_rect(&rect_to_cpu(Rect::new(
                x,
                y - half,
                x + f64::from(width),
                y + half,
            )));
        }
    }
}

impl RenderAdapter for SceneAdapter {
    fn clear_tile(&mut self, layer: Layer, tile: TileCoord, size: u32) -> VeilResult<()> {
        let node = self.node_mut(tile, size);
        match layer {
            Layer::Overlay => node.revealed = true,
            Layer::Background => node.committed = true,
        }
        Ok(())
    }

    fn draw_edge(&mut self, stroke: EdgeStroke) -> VeilResult<()> {
        let key = (stroke.x, stroke.y, stroke.width);
        match stroke.paint {
            EdgePaint::Erase => {
                self.lines.remove(&key);
            }
            paint => {
                self.lines.insert(key, paint);
            }
        }
        Ok(())
    }
}

impl RenderSurface for SceneAdapter {
    fn resize(&mut self, viewport: Viewport) -> VeilResult<()> {
        let (width, height) = surface_size(viewport)?;
        self.viewport = viewport;
        self.width = width;
        self.height = height;
        self.nodes.clear();
        self.lines.clear();
        self.ctx = None;
        Ok(())
    }

    #[tracing::instrument(level = "debug", skip_all)]
    fn render(&mut self) -> VeilResult<FrameRGBA> {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == self.width && ctx.height() == self.height => ctx,
            _ => vello_cpu::RenderContext::new(self.width, self.height),
        };
        ctx.reset();
        self.draw(&mut ctx);
        ctx.flush();

        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.render_to_pixmap(&mut pixmap);
        self.ctx = Some(ctx);
        Ok(FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;
