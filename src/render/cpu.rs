use crate::foundation::core::{Rect, Rgba8Premul, Viewport};
use crate::foundation::error::{VeilError, VeilResult};
use crate::foundation::math::{blend_rect_px, fill_rect_px, src_over_buf};
use crate::grid::coord::TileCoord;
use crate::render::backend::{FrameRGBA, RenderSurface};
use crate::render::delta::{EdgePaint, EdgeStroke, Layer, RenderAdapter};
use crate::session::config::Palette;

/// Vertical spacing of the horizontal rules, in pixels.
pub const RULE_SPACING: u32 = 3;
/// Stroke width of the horizontal rules.
pub const RULE_WIDTH: f64 = 1.2;
/// Coverage of a tile edge line (a 0.5 px line over one pixel row).
pub const EDGE_COVERAGE: f32 = 0.5;
/// Rows cleared by an erase stroke, starting one row above the edge.
pub const ERASE_BAND: i64 = 2;

struct CpuLayer {
    pixmap: vello_cpu::Pixmap,
}

impl CpuLayer {
    fn new(width: u16, height: u16) -> Self {
        Self {
            pixmap: vello_cpu::Pixmap::new(width, height),
        }
    }

    fn bytes(&self) -> &[u8] {
        self.pixmap.data_as_u8_slice()
    }

    fn bytes_mut(&mut self) -> &mut [u8] {
        self.pixmap.data_as_u8_slice_mut()
    }
}

/// Immediate-mode surface: two premultiplied pixel layers over an opaque backdrop.
///
/// The overlay starts as a ruled white sheet and the background as the same sheet under a
/// vertical gradient. Clearing a tile punches a transparent hole in one layer; edges are drawn
/// into the background only.
pub struct CpuLayers {
    width: u16,
    height: u16,
    palette: Palette,
    overlay: CpuLayer,
    background: CpuLayer,
    ctx: Option<vello_cpu::RenderContext>,
}

impl CpuLayers {
    /// Allocate layers covering the whole page of `viewport` and paint their static content.
    pub fn new(viewport: Viewport, palette: Palette) -> VeilResult<Self> {
        let (width, height) = surface_size(viewport)?;
        let mut layers = Self {
            width,
            height,
            palette,
            overlay: CpuLayer::new(width, height),
            background: CpuLayer::new(width, height),
            ctx: None,
        };
        layers.paint_static_layers();
        Ok(layers)
    }

    /// Surface width in pixels.
    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    /// Surface height in pixels.
    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Premultiplied RGBA8 bytes of `layer`.
    pub fn layer_bytes(&self, layer: Layer) -> &[u8] {
        self.layer(layer).bytes()
    }

    /// Pixel of `layer` at `(x, y)`, or `None` outside the surface.
    pub fn pixel(&self, layer: Layer, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.layer_bytes(layer).get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Repaint both layers to their unrevealed look.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn paint_static_layers(&mut self) {
        let palette = self.palette;
        let (w, h) = (self.width, self.height);
        let mut ctx = self.take_ctx();

        paint_sheet(&mut ctx, w, h, palette);
        ctx.flush();
        ctx.render_to_pixmap(&mut self.overlay.pixmap);

        ctx.reset();
        paint_sheet(&mut ctx, w, h, palette);
        paint_gradient(&mut ctx, w, h, palette);
        ctx.flush();
        ctx.render_to_pixmap(&mut self.background.pixmap);

        self.ctx = Some(ctx);
        tracing::debug!(width = w, height = h, "painted static layers");
    }

    /// Stack backdrop, background and overlay into one frame.
    pub fn compose(&self) -> FrameRGBA {
        let (w, h) = (self.width(), self.height());
        let mut data = vec![0u8; w as usize * h as usize * 4];
        fill_rect_px(
            &mut data,
            w,
            h,
            (0, 0, i64::from(w), i64::from(h)),
            self.palette.backdrop.premul(),
        );
        src_over_buf(&mut data, self.background.bytes());
        src_over_buf(&mut data, self.overlay.bytes());
        FrameRGBA {
            width: w,
            height: h,
            data,
            premultiplied: true,
        }
    }

    fn layer(&self, layer: Layer) -> &CpuLayer {
        match layer {
            Layer::Overlay => &self.overlay,
            Layer::Background => &self.background,
        }
    }

    fn layer_mut(&mut self, layer: Layer) -> &mut CpuLayer {
        match layer {
            Layer::Overlay => &mut self.overlay,
            Layer::Background => &mut self.background,
        }
    }

    fn take_ctx(&mut self) -> vello_cpu::RenderContext {
        let mut ctx = match self.ctx.take() {
            Some(ctx) if ctx.width() == self.width && ctx.height() == self.height => ctx,
            _ => vello_cpu::RenderContext::new(self.width, self.height),
        };
        ctx.reset();
        ctx
    }
}

impl RenderAdapter for CpuLayers {
    fn clear_tile(&mut self, layer: Layer, tile: TileCoord, size: u32) -> VeilResult<()> {
        let (w, h) = (self.width(), self.height());
        let s = i64::from(size);
        let span = (tile.x, tile.y, tile.x + s, tile.y + s);
        fill_rect_px(
            self.layer_mut(layer).bytes_mut(),
            w,
            h,
            span,
            Rgba8Premul::transparent(),
        );
        Ok(())
    }

    fn draw_edge(&mut self, stroke: EdgeStroke) -> VeilResult<()> {
        let (w, h) = (self.width(), self.height());
        let x1 = stroke.x + i64::from(stroke.width);
        let palette = self.palette;
        let buf = self.background.bytes_mut();
        match stroke.paint {
            EdgePaint::Light | EdgePaint::Dark => {
                let color = if stroke.paint == EdgePaint::Light {
                    palette.light_edge
                } else {
                    palette.dark_edge
                };
                let px = color.premul().with_coverage(EDGE_COVERAGE);
                blend_rect_px(buf, w, h, (stroke.x, stroke.y, x1, stroke.y + 1), px);
            }
            EdgePaint::Erase => {
                let y0 = stroke.y - ERASE_BAND / 2;
                fill_rect_px(
                    buf,
                    w,
                    h,
                    (stroke.x, y0, x1, y0 + ERASE_BAND),
                    Rgba8Premul::transparent(),
                );
            }
        }
        Ok(())
    }
}

impl RenderSurface for CpuLayers {
    fn resize(&mut self, viewport: Viewport) -> VeilResult<()> {
        let (width, height) = surface_size(viewport)?;
        self.width = width;
        self.height = height;
        self.overlay = CpuLayer::new(width, height);
        self.background = CpuLayer::new(width, height);
        self.paint_static_layers();
        Ok(())
    }

    fn render(&mut self) -> VeilResult<FrameRGBA> {
        Ok(self.compose())
    }
}

pub(crate) fn surface_size(viewport: Viewport) -> VeilResult<(u16, u16)> {
    viewport.validate_surface()?;
    let w: u16 = viewport
        .width
        .try_into()
        .map_err(|_| VeilError::render("surface width exceeds u16"))?;
    let h: u16 = viewport
        .document_height
        .try_into()
        .map_err(|_| VeilError::render("surface height exceeds u16"))?;
    Ok((w, h))
}

pub(crate) fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

pub(crate) fn color_to_cpu(c: crate::foundation::core::ColorHex) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a)
}

/// Opaque overlay fill with horizontal rules every [`RULE_SPACING`] pixels.
pub(crate) fn paint_sheet(ctx: &mut vello_cpu::RenderContext, w: u16, h: u16, palette: Palette) {
    let (wf, hf) = (f64::from(w), f64::from(h));
    ctx.set_paint(color_to_cpu(palette.overlay));
    ctx.fill_rect(&rect_to_cpu(Rect::new(0.0, 0.0, wf, hf)));

    ctx.set_paint(color_to_cpu(palette.rule));
    let half = RULE_WIDTH / 2.0;
    for y in (0..=u32::from(h)).step_by(RULE_SPACING as usize) {
        let y = f64::from(y);
        ctx.fill_rect(&rect_to_cpu(Rect::new(0.0, y - half, wf, y + half)));
    }
}

/// Vertical gradient over the full page, one row at a time.
fn paint_gradient(ctx: &mut vello_cpu::RenderContext, w: u16, h: u16, palette: Palette) {
    let wf = f64::from(w);
    let last = f64::from(h.max(1) - 1);
    for y in 0..h {
        let t = if last <= 0.0 { 0.0 } else { f64::from(y) / last };
        let c = palette.gradient_top.lerp(palette.gradient_bottom, t);
        ctx.set_paint(color_to_cpu(c));
        let y = f64::from(y);
        ctx.fill_rect(&rect_to_cpu(Rect::new(0.0, y, wf, y + 1.0)));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
