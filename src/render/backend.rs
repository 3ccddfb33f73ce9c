use crate::foundation::core::Viewport;
use crate::foundation::error::VeilResult;
use crate::render::delta::RenderAdapter;
use crate::session::config::Palette;

/// A composed frame as RGBA8 pixels.
///
/// Frames produced by this crate are premultiplied; the flag makes that explicit at API
/// boundaries such as PNG output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Pixel at `(x, y)`, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Straight-alpha copy of the pixel data.
    pub fn to_straight_rgba(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.premultiplied {
            unpremultiply_in_place(&mut out);
        }
        out
    }
}

fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

/// A render adapter that owns pixels and can produce composed frames.
pub trait RenderSurface: RenderAdapter {
    /// Reallocate for `viewport` and repaint the unrevealed look.
    fn resize(&mut self, viewport: Viewport) -> VeilResult<()>;

    /// Compose the current state into a frame covering the whole page.
    fn render(&mut self) -> VeilResult<FrameRGBA>;
}

/// Available surface kinds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Immediate-mode pixel layers ([`crate::render::cpu::CpuLayers`]).
    #[default]
    Cpu,
    /// Retained scene redrawn every frame ([`crate::render::scene::SceneAdapter`]).
    Scene,
}

/// Create a render surface of the given kind.
pub fn create_surface(
    kind: BackendKind,
    viewport: Viewport,
    palette: Palette,
) -> VeilResult<Box<dyn RenderSurface>> {
    match kind {
        BackendKind::Cpu => Ok(Box::new(crate::render::cpu::CpuLayers::new(
            viewport, palette,
        )?)),
        BackendKind::Scene => Ok(Box::new(crate::render::scene::SceneAdapter::new(
            viewport, palette,
        )?)),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/backend.rs"]
mod tests;
