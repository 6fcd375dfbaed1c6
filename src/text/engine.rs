use crate::foundation::core::{Extent, Point};
use crate::foundation::error::QuoteResult;
use crate::render::surface::QuoteSurface;

/// Measures styled text at a fixed wrap width.
///
/// Implementations must be deterministic: the same markup and size always produce the same
/// extents. Any failure (malformed markup, unknown font) is reported, never papered over with a
/// fallback size.
pub trait LayoutMeasurer {
    /// Height and width in device pixels of `markup` laid out at `font_size`.
    fn measure(&mut self, markup: &str, font_size: f32) -> QuoteResult<Extent>;
}

/// Horizontal placement of wrapped lines inside the wrap width.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Start,
    End,
}

/// Wrap width and alignment for one layout.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextWrap {
    pub width: f32,
    pub align: TextAlign,
}

impl TextWrap {
    pub fn start(width: f32) -> Self {
        Self {
            width,
            align: TextAlign::Start,
        }
    }

    pub fn end(width: f32) -> Self {
        Self {
            width,
            align: TextAlign::End,
        }
    }
}

/// Shapes span markup and draws it onto a [`QuoteSurface`].
///
/// `base_size` applies wherever the markup does not set `size` itself.
pub trait TextEngine {
    /// Extents of the laid-out block.
    fn extent(&mut self, markup: &str, base_size: f32, wrap: TextWrap) -> QuoteResult<Extent>;

    /// Draw the block with its top-left corner at `origin` and return its extents.
    fn draw(
        &mut self,
        surface: &mut QuoteSurface,
        markup: &str,
        base_size: f32,
        wrap: TextWrap,
        origin: Point,
    ) -> QuoteResult<Extent>;
}

/// [`LayoutMeasurer`] over a [`TextEngine`] with the wrap width pinned.
pub struct WrapMeasurer<'e, E: ?Sized> {
    engine: &'e mut E,
    wrap: TextWrap,
}

impl<'e, E: TextEngine + ?Sized> WrapMeasurer<'e, E> {
    pub fn new(engine: &'e mut E, wrap_width: f32) -> Self {
        Self {
            engine,
            wrap: TextWrap::start(wrap_width),
        }
    }
}

impl<E: TextEngine + ?Sized> LayoutMeasurer for WrapMeasurer<'_, E> {
    fn measure(&mut self, markup: &str, font_size: f32) -> QuoteResult<Extent> {
        self.engine.extent(markup, font_size, self.wrap)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/engine.rs"]
mod tests;
