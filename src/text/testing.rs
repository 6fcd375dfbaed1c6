//! Font-free text engine for tests.
//!
//! Every character is a box `0.5 * size` wide; lines are `1.2 * size` tall and wrap greedily at
//! spaces. Drawing paints the block's bounding box in the color of its first span.

use crate::foundation::core::{Extent, Point, Rect};
use crate::foundation::error::QuoteResult;
use crate::render::surface::QuoteSurface;
use crate::text::engine::{TextAlign, TextEngine, TextWrap};
use crate::text::markup;

pub(crate) const ADVANCE: f32 = 0.5;
pub(crate) const LINE_HEIGHT: f32 = 1.2;

#[derive(Debug, Default)]
pub(crate) struct BoxEngine {
    /// Sizes passed to `extent`, in call order.
    pub(crate) measured: Vec<f32>,
    /// Markup passed to `draw`, in call order.
    pub(crate) drawn: Vec<String>,
}

impl BoxEngine {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn block(markup: &str, base_size: f32, wrap: TextWrap) -> QuoteResult<(Extent, [u8; 4])> {
        let styled = markup::parse(markup)?;
        let size = styled
            .spans
            .iter()
            .find_map(|s| s.style.size)
            .unwrap_or(base_size);
        let color = styled
            .spans
            .first()
            .and_then(|s| s.style.color)
            .map_or([0, 0, 0, 255], |c| c.to_rgba8());

        let advance = ADVANCE * size;
        let mut widest = 0.0f32;
        let mut lines = 0usize;
        for para in styled.text.split('\n') {
            let mut line_w = 0.0f32;
            lines += 1;
            for word in para.split(' ').filter(|w| !w.is_empty()) {
                let word_w = word.chars().count() as f32 * advance;
                if line_w > 0.0 && line_w + advance + word_w > wrap.width {
                    widest = widest.max(line_w);
                    lines += 1;
                    line_w = word_w;
                } else if line_w > 0.0 {
                    line_w += advance + word_w;
                } else {
                    line_w = word_w;
                }
            }
            widest = widest.max(line_w);
        }
        Ok((
            Extent::new(widest, lines as f32 * LINE_HEIGHT * size),
            color,
        ))
    }
}

impl TextEngine for BoxEngine {
    fn extent(&mut self, markup: &str, base_size: f32, wrap: TextWrap) -> QuoteResult<Extent> {
        self.measured.push(base_size);
        Ok(Self::block(markup, base_size, wrap)?.0)
    }

    fn draw(
        &mut self,
        surface: &mut QuoteSurface,
        markup: &str,
        base_size: f32,
        wrap: TextWrap,
        origin: Point,
    ) -> QuoteResult<Extent> {
        let (extent, color) = Self::block(markup, base_size, wrap)?;
        self.drawn.push(markup.to_string());
        let x0 = match wrap.align {
            TextAlign::Start => origin.x,
            TextAlign::End => origin.x + f64::from(wrap.width - extent.width),
        };
        surface.fill_rect(
            Rect::new(
                x0,
                origin.y,
                x0 + f64::from(extent.width),
                origin.y + f64::from(extent.height),
            ),
            color,
        );
        Ok(extent)
    }
}
