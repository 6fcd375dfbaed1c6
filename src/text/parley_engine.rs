use std::borrow::Cow;
use std::collections::HashSet;
use std::path::Path;

use anyhow::Context as _;

use crate::config::style::GENERIC_FAMILIES;
use crate::foundation::core::{Extent, Point};
use crate::foundation::error::{QuoteError, QuoteResult};
use crate::render::surface::QuoteSurface;
use crate::text::engine::{TextAlign, TextEngine, TextWrap};
use crate::text::markup::{self, SpanStyle};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl TextBrushRgba8 {
    const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };
}

/// Text engine backed by Parley shaping and `vello_cpu` glyph rasterization.
///
/// Fonts come from the system collection plus any files registered with
/// [`ParleyEngine::register_font_file`]. Families named in markup must exist in that collection;
/// generic CSS families always resolve.
pub struct ParleyEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    known_families: HashSet<String>,
}

impl Default for ParleyEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ParleyEngine {
    /// Construct an engine over the system font collection.
    pub fn new() -> Self {
        Self::with_system_fonts(true)
    }

    /// Construct an engine that only sees system fonts when `system_fonts` is set.
    ///
    /// Without system fonts, only files added with [`ParleyEngine::register_font_file`] resolve.
    pub fn with_system_fonts(system_fonts: bool) -> Self {
        let collection = parley::fontique::Collection::new(parley::fontique::CollectionOptions {
            shared: false,
            system_fonts,
        });
        Self {
            font_ctx: parley::FontContext {
                collection,
                source_cache: parley::fontique::SourceCache::default(),
            },
            layout_ctx: parley::LayoutContext::new(),
            known_families: HashSet::new(),
        }
    }

    /// Register every face in a font file and return the family names it provides.
    pub fn register_font_file(&mut self, path: &Path) -> QuoteResult<Vec<String>> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(bytes), None);
        if families.is_empty() {
            return Err(QuoteError::layout(format!(
                "no font families registered from '{}'",
                path.display()
            )));
        }

        let mut names = Vec::with_capacity(families.len());
        for (id, _) in families {
            let name = self
                .font_ctx
                .collection
                .family_name(id)
                .ok_or_else(|| QuoteError::layout("registered font family has no name"))?
                .to_string();
            tracing::debug!(family = %name, path = %path.display(), "registered font");
            self.known_families.insert(name.clone());
            names.push(name);
        }
        Ok(names)
    }

    /// `true` when at least one font family is available for shaping.
    pub fn has_fonts(&mut self) -> bool {
        !self.known_families.is_empty()
            || self.font_ctx.collection.family_names().next().is_some()
    }

    fn check_family(&mut self, family: &str) -> QuoteResult<()> {
        if GENERIC_FAMILIES.contains(&family) || self.known_families.contains(family) {
            return Ok(());
        }
        if self.font_ctx.collection.family_by_name(family).is_none() {
            return Err(QuoteError::layout(format!(
                "unsupported font family '{family}'"
            )));
        }
        self.known_families.insert(family.to_string());
        Ok(())
    }

    /// Shape and wrap span markup.
    pub fn layout(
        &mut self,
        markup: &str,
        base_size: f32,
        wrap: TextWrap,
    ) -> QuoteResult<parley::Layout<TextBrushRgba8>> {
        if !base_size.is_finite() || base_size <= 0.0 {
            return Err(QuoteError::layout(format!(
                "font size must be finite and > 0, got {base_size}"
            )));
        }
        if !wrap.width.is_finite() || wrap.width <= 0.0 {
            return Err(QuoteError::layout("wrap width must be finite and > 0"));
        }

        let styled = markup::parse(markup)?;
        let visible = styled.text.chars().any(|c| !c.is_whitespace());
        if visible && !self.has_fonts() {
            return Err(QuoteError::layout("no fonts available to shape text"));
        }
        for span in &styled.spans {
            if let Some(family) = &span.style.family {
                self.check_family(family)?;
            }
        }

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, &styled.text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Borrowed("sans-serif")),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(base_size));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrushRgba8::BLACK));
        for span in &styled.spans {
            for prop in span_properties(&span.style) {
                builder.push(prop, span.range.clone());
            }
        }

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(&styled.text);
        layout.break_all_lines(Some(wrap.width));
        let alignment = match wrap.align {
            TextAlign::Start => parley::Alignment::Start,
            TextAlign::End => parley::Alignment::End,
        };
        layout.align(
            Some(wrap.width),
            alignment,
            parley::AlignmentOptions::default(),
        );
        if visible && layout.height() <= 0.0 {
            return Err(QuoteError::layout("no font resolved for text"));
        }
        Ok(layout)
    }
}

fn span_properties(
    style: &SpanStyle,
) -> Vec<parley::style::StyleProperty<'static, TextBrushRgba8>> {
    let mut props = Vec::with_capacity(5);
    if let Some(family) = &style.family {
        let source = if GENERIC_FAMILIES.contains(&family.as_str()) {
            family.clone()
        } else {
            format!("\"{}\"", family.replace('"', ""))
        };
        props.push(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(source)),
        ));
    }
    if let Some(weight) = style.weight {
        props.push(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(weight)),
        ));
    }
    if let Some(italic) = style.italic {
        props.push(parley::style::StyleProperty::FontStyle(if italic {
            parley::style::FontStyle::Italic
        } else {
            parley::style::FontStyle::Normal
        }));
    }
    if let Some(color) = style.color {
        let [r, g, b, a] = color.to_rgba8();
        props.push(parley::style::StyleProperty::Brush(TextBrushRgba8 { r, g, b, a }));
    }
    if let Some(size) = style.size {
        props.push(parley::style::StyleProperty::FontSize(size));
    }
    props
}

impl TextEngine for ParleyEngine {
    fn extent(&mut self, markup: &str, base_size: f32, wrap: TextWrap) -> QuoteResult<Extent> {
        let layout = self.layout(markup, base_size, wrap)?;
        Ok(Extent::new(layout.width(), layout.height()))
    }

    fn draw(
        &mut self,
        surface: &mut QuoteSurface,
        markup: &str,
        base_size: f32,
        wrap: TextWrap,
        origin: Point,
    ) -> QuoteResult<Extent> {
        let layout = self.layout(markup, base_size, wrap)?;
        let ctx = surface.context_mut();
        ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));
                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(run.run().font())
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Ok(Extent::new(layout.width(), layout.height()))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/text/parley_engine.rs"]
mod tests;
