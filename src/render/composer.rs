//! Quote image composition.
//!
//! [`ImageComposer::add_quote`] turns a record into span markup, fits it to the quote area and
//! draws it on a fresh [`QuoteSurface`]. [`ImageComposer::add_annotations`] then draws the
//! right-aligned credit line onto the same surface, so a snapshot taken between the two calls is
//! the quote-only export and a snapshot after both is the credits export.

use crate::config::run::{FitConfig, RenderBox};
use crate::config::style::StyleConfig;
use crate::fit::{FitCaps, FitResult, FontSizeFitter, SeedTable};
use crate::foundation::core::{Extent, Point};
use crate::foundation::error::QuoteResult;
use crate::render::surface::QuoteSurface;
use crate::text::engine::{TextEngine, TextWrap, WrapMeasurer};
use crate::text::markup::{self, SpanStyle};

/// Em dash that opens the credit line.
pub const CREDITS_DASH: char = '\u{2014}';

/// A quote drawn onto its surface, ready for export.
pub struct ComposedQuote {
    pub surface: QuoteSurface,
    /// Span markup that was drawn.
    pub markup: String,
    pub fit: FitResult,
    /// Extents of the drawn quote block.
    pub extent: Extent,
    /// Credit line markup, once annotated.
    pub credits: Option<String>,
}

/// Draws quotes and credits with one text engine and one immutable style.
pub struct ImageComposer<E> {
    engine: E,
    render_box: RenderBox,
    style: StyleConfig,
    fitter: FontSizeFitter,
    seeds: SeedTable,
}

impl<E: TextEngine> ImageComposer<E> {
    pub fn new(engine: E, render_box: RenderBox, style: StyleConfig, fit: FitConfig) -> Self {
        Self {
            engine,
            render_box,
            style,
            fitter: FontSizeFitter::new(fit),
            seeds: SeedTable::default(),
        }
    }

    pub fn with_seeds(mut self, seeds: SeedTable) -> Self {
        self.seeds = seeds;
        self
    }

    pub fn render_box(&self) -> &RenderBox {
        &self.render_box
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Span markup for `quote` with the first occurrence of `timestring` highlighted.
    ///
    /// Line-break markers become real line breaks, then the timestring is located in the plain
    /// text and every piece is escaped. A timestring that does not occur in the normalized quote
    /// leaves the quote unhighlighted.
    pub fn quote_markup(&self, quote: &str, timestring: &str) -> String {
        let body = SpanStyle::from_font(&self.style.body.font, self.style.body.color);
        let time = SpanStyle::from_font(&self.style.time.font, self.style.time.color);

        let text = markup::normalize_line_breaks(quote);
        let needle = markup::normalize_line_breaks(timestring);
        let inner = markup::highlight_first(&text, &needle, &time).unwrap_or_else(|| {
            tracing::warn!(timestring, "timestring not found in quote, drawing without highlight");
            markup::escape(&text)
        });
        body.wrap(&inner)
    }

    /// Credit line markup: `"—{title}, {author}"` in the metadata style.
    pub fn credits_markup(&self, title: &str, author: &str) -> String {
        let meta = SpanStyle::from_font(&self.style.metadata.font, self.style.metadata.color)
            .with_size(self.style.metadata_size);
        meta.wrap(&format!(
            "{CREDITS_DASH}{}, {}",
            markup::escape(title),
            markup::escape(author)
        ))
    }

    /// Build the quote markup and search its font size without drawing anything.
    pub fn fit_quote(
        &mut self,
        quote: &str,
        timestring: &str,
    ) -> QuoteResult<(String, FitResult)> {
        let rb = self.render_box;
        let markup = self.quote_markup(quote, timestring);
        let caps = FitCaps {
            max_width: rb.max_text_width(),
            max_height: rb.max_text_height(),
        };
        let seed = self
            .seeds
            .seed(rb.width, rb.height, quote.chars().count());

        let mut measurer = WrapMeasurer::new(&mut self.engine, caps.max_width);
        let fit = self.fitter.fit(&mut measurer, &markup, caps, seed)?;
        Ok((markup, fit))
    }

    /// Fit and draw `quote` on a new surface filled with the background color.
    ///
    /// Nothing is allocated when the fit fails.
    pub fn add_quote(&mut self, quote: &str, timestring: &str) -> QuoteResult<ComposedQuote> {
        let rb = self.render_box;
        let (markup, fit) = self.fit_quote(quote, timestring)?;

        let mut surface = QuoteSurface::new(rb.width, rb.height, self.style.background)?;
        let area = rb.quote_area();
        let origin = Point::new(area.x0, area.y0);
        let extent = self.engine.draw(
            &mut surface,
            &markup,
            fit.size,
            TextWrap::start(rb.max_text_width()),
            origin,
        )?;
        tracing::debug!(size = fit.size, probes = fit.probes, "quote drawn");

        Ok(ComposedQuote {
            surface,
            markup,
            fit,
            extent,
            credits: None,
        })
    }

    /// Draw the credit line onto `composed`.
    ///
    /// The line wraps inside the metadata column, its right edge one margin from the image's
    /// right edge and its last line one margin above the bottom.
    pub fn add_annotations(
        &mut self,
        composed: &mut ComposedQuote,
        title: &str,
        author: &str,
    ) -> QuoteResult<Extent> {
        let rb = self.render_box;
        let markup = self.credits_markup(title, author);
        let wrap = TextWrap::end(rb.meta_column_width());
        let size = self.style.metadata_size;

        let extent = self.engine.extent(&markup, size, wrap)?;
        let column = rb.meta_column();
        let origin = Point::new(column.x0, column.y1 - f64::from(extent.height));
        self.engine
            .draw(&mut composed.surface, &markup, size, wrap, origin)?;

        composed.credits = Some(markup);
        Ok(extent)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/composer.rs"]
mod tests;
