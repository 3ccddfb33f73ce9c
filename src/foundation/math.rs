use crate::foundation::core::Rgba8Premul;

pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

/// Premultiplied source-over for one RGBA8 pixel.
pub(crate) fn src_over_px(dst: &mut [u8], src: [u8; 4]) {
    let inv = 255u16 - u16::from(src[3]);
    for c in 0..4 {
        let d = mul_div255_u16(u16::from(dst[c]), inv);
        dst[c] = (u16::from(src[c]) + d).min(255) as u8;
    }
}

/// Source-over blend `src` onto `dst`, both tightly packed premultiplied RGBA8 of equal length.
pub(crate) fn src_over_buf(dst: &mut [u8], src: &[u8]) {
    debug_assert_eq!(dst.len(), src.len());
    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        match s[3] {
            0 => {}
            255 => d.copy_from_slice(s),
            _ => src_over_px(d, [s[0], s[1], s[2], s[3]]),
        }
    }
}

/// Clip `[x0, x1) x [y0, y1)` to a `width x height` surface.
pub(crate) fn clip_span(
    x0: i64,
    y0: i64,
    x1: i64,
    y1: i64,
    width: u32,
    height: u32,
) -> Option<(usize, usize, usize, usize)> {
    let cx0 = x0.clamp(0, i64::from(width));
    let cy0 = y0.clamp(0, i64::from(height));
    let cx1 = x1.clamp(0, i64::from(width));
    let cy1 = y1.clamp(0, i64::from(height));
    if cx0 >= cx1 || cy0 >= cy1 {
        return None;
    }
    Some((cx0 as usize, cy0 as usize, cx1 as usize, cy1 as usize))
}

/// Set every pixel of the clipped rect to `px`.
pub(crate) fn fill_rect_px(
    buf: &mut [u8],
    width: u32,
    height: u32,
    (x0, y0, x1, y1): (i64, i64, i64, i64),
    px: Rgba8Premul,
) {
    let Some((cx0, cy0, cx1, cy1)) = clip_span(x0, y0, x1, y1, width, height) else {
        return;
    };
    let stride = width as usize * 4;
    let bytes = px.to_array();
    for y in cy0..cy1 {
        let row = &mut buf[y * stride + cx0 * 4..y * stride + cx1 * 4];
        for d in row.chunks_exact_mut(4) {
            d.copy_from_slice(&bytes);
        }
    }
}

/// Source-over `px` onto every pixel of the clipped rect.
pub(crate) fn blend_rect_px(
    buf: &mut [u8],
    width: u32,
    height: u32,
    (x0, y0, x1, y1): (i64, i64, i64, i64),
    px: Rgba8Premul,
) {
    let Some((cx0, cy0, cx1, cy1)) = clip_span(x0, y0, x1, y1, width, height) else {
        return;
    };
    let stride = width as usize * 4;
    let bytes = px.to_array();
    for y in cy0..cy1 {
        let row = &mut buf[y * stride + cx0 * 4..y * stride + cx1 * 4];
        for d in row.chunks_exact_mut(4) {
            src_over_px(d, bytes);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
