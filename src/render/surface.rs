use crate::foundation::core::{Rect, Rgb};
use crate::foundation::error::{QuoteError, QuoteResult};

/// A rendered image as RGBA8 pixels.
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
    /// RGBA8 value of pixel `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }
}

/// Raster surface for one quote.
///
/// Created by the composer with the background already painted. Drawing commands accumulate in
/// the `vello_cpu` context; [`QuoteSurface::snapshot`] rasterizes everything drawn so far. The
/// surface is dropped once both exports for its quote are taken.
pub struct QuoteSurface {
    ctx: vello_cpu::RenderContext,
    width: u16,
    height: u16,
}

impl QuoteSurface {
    /// Allocate a surface filled with `background`.
    pub fn new(width: u32, height: u32, background: Rgb) -> QuoteResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| QuoteError::validation("surface width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| QuoteError::validation("surface height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(QuoteError::validation("surface must be at least 1x1"));
        }

        let mut surface = Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            width: w,
            height: h,
        };
        surface.fill_rect(
            Rect::new(0.0, 0.0, f64::from(w), f64::from(h)),
            background.to_rgba8(),
        );
        Ok(surface)
    }

    pub fn width(&self) -> u32 {
        u32::from(self.width)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.height)
    }

    /// Underlying render context, for text engines that emit glyph runs.
    pub fn context_mut(&mut self) -> &mut vello_cpu::RenderContext {
        &mut self.ctx
    }

    /// Fill `rect` (device pixels) with a straight RGBA8 color.
    pub fn fill_rect(&mut self, rect: Rect, rgba: [u8; 4]) {
        let [r, g, b, a] = rgba;
        self.ctx
            .set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(r, g, b, a));
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Rasterize everything drawn so far into a fresh straight-alpha frame.
    pub fn snapshot(&mut self) -> FrameRGBA {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);

        let mut data = pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut data);
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data,
            premultiplied: false,
        }
    }
}

pub(crate) fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 || a == 255 {
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
