//! Span markup for styled text.
//!
//! The composer describes a quote as plain text with nested `<span ...>` elements carrying
//! font and color attributes, the same shape Pango markup uses. Text engines turn it back into
//! plain text plus styled byte ranges with [`parse`].
//!
//! Supported attributes: `family`, `weight` (1..=1000), `style` (`normal` | `italic`),
//! `color` (`#rrggbb`) and `size` (pixels). Entities: `&amp; &lt; &gt; &quot; &apos;` and
//! numeric character references.

use std::fmt::Write as _;
use std::ops::Range;

use crate::config::style::FontDescriptor;
use crate::foundation::core::Rgb;
use crate::foundation::error::{QuoteError, QuoteResult};

/// Style attributes of one span. Unset fields inherit from the enclosing span.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SpanStyle {
    pub family: Option<String>,
    pub weight: Option<u16>,
    pub italic: Option<bool>,
    pub color: Option<Rgb>,
    pub size: Option<f32>,
}

impl SpanStyle {
    pub fn from_font(font: &FontDescriptor, color: Rgb) -> Self {
        Self {
            family: Some(font.family.clone()),
            weight: Some(font.weight),
            italic: Some(font.italic),
            color: Some(color),
            size: None,
        }
    }

    pub fn with_size(mut self, size: f32) -> Self {
        self.size = Some(size);
        self
    }

    /// Opening tag for this style.
    pub fn open_tag(&self) -> String {
        let mut tag = String::from("<span");
        if let Some(family) = &self.family {
            let _ = write!(tag, " family=\"{}\"", escape(family));
        }
        if let Some(weight) = self.weight {
            let _ = write!(tag, " weight=\"{weight}\"");
        }
        if let Some(italic) = self.italic {
            let _ = write!(tag, " style=\"{}\"", if italic { "italic" } else { "normal" });
        }
        if let Some(color) = self.color {
            let _ = write!(tag, " color=\"{}\"", color.to_hex());
        }
        if let Some(size) = self.size {
            let _ = write!(tag, " size=\"{size}\"");
        }
        tag.push('>');
        tag
    }

    /// Wrap already-escaped `inner` markup in this span.
    pub fn wrap(&self, inner: &str) -> String {
        format!("{}{inner}</span>", self.open_tag())
    }
}

/// A styled byte range of [`StyledText::text`].
#[derive(Clone, Debug, PartialEq)]
pub struct StyledSpan {
    pub range: Range<usize>,
    pub style: SpanStyle,
}

/// Parsed markup: plain text plus spans ordered outermost-first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyledText {
    pub text: String,
    pub spans: Vec<StyledSpan>,
}

impl StyledText {
    /// Plain text covered by the first span whose style matches `pred`.
    pub fn span_text(&self, pred: impl Fn(&SpanStyle) -> bool) -> Option<&str> {
        self.spans
            .iter()
            .find(|s| pred(&s.style))
            .map(|s| &self.text[s.range.clone()])
    }
}

/// Escape characters that would otherwise be read as markup.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Turn `<br>`, `<br/>`, `<br />` (any case) and literal `\n` sequences into newlines.
pub fn normalize_line_breaks(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find(['<', '\\']) {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(after) = tail.strip_prefix("\\n") {
            out.push('\n');
            rest = after;
            continue;
        }
        if let Some(len) = br_tag_len(tail) {
            out.push('\n');
            rest = &tail[len..];
            continue;
        }
        // not a marker; keep the character
        let c_len = tail.chars().next().map_or(1, char::len_utf8);
        out.push_str(&tail[..c_len]);
        rest = &tail[c_len..];
    }
    out.push_str(rest);
    out
}

fn br_tag_len(tail: &str) -> Option<usize> {
    let bytes = tail.as_bytes();
    if bytes.len() < 4 || bytes[0] != b'<' || !bytes[1..3].eq_ignore_ascii_case(b"br") {
        return None;
    }
    let mut i = 3;
    while i < bytes.len() && bytes[i] == b' ' {
        i += 1;
    }
    if i < bytes.len() && bytes[i] == b'/' {
        i += 1;
    }
    (i < bytes.len() && bytes[i] == b'>').then_some(i + 1)
}

/// Escape `text`, wrapping the first occurrence of `needle` in `style`.
///
/// Both arguments are plain text; the match is found before escaping so it never lands inside an
/// entity. Returns `None` when `needle` does not occur.
pub fn highlight_first(text: &str, needle: &str, style: &SpanStyle) -> Option<String> {
    if needle.is_empty() {
        return None;
    }
    let pos = text.find(needle)?;
    let mut out = String::with_capacity(text.len() + 96);
    out.push_str(&escape(&text[..pos]));
    out.push_str(&style.wrap(&escape(needle)));
    out.push_str(&escape(&text[pos + needle.len()..]));
    Some(out)
}

/// Parse span markup into plain text and styled ranges.
pub fn parse(markup: &str) -> QuoteResult<StyledText> {
    let mut text = String::with_capacity(markup.len());
    // (open order, start offset, style)
    let mut stack: Vec<(usize, usize, SpanStyle)> = Vec::new();
    let mut closed: Vec<(usize, StyledSpan)> = Vec::new();
    let mut opened = 0usize;

    let mut rest = markup;
    while let Some(pos) = rest.find(['<', '&']) {
        text.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if tail.starts_with('&') {
            let (c, len) = parse_entity(tail)?;
            text.push(c);
            rest = &tail[len..];
            continue;
        }

        let end = tail
            .find('>')
            .ok_or_else(|| QuoteError::markup("unterminated tag"))?;
        let tag = &tail[1..end];
        if let Some(name) = tag.strip_prefix('/') {
            if name.trim() != "span" {
                return Err(QuoteError::markup(format!("unknown closing tag </{name}>")));
            }
            let (order, start, style) = stack
                .pop()
                .ok_or_else(|| QuoteError::markup("closing </span> without opening tag"))?;
            closed.push((
                order,
                StyledSpan {
                    range: start..text.len(),
                    style,
                },
            ));
        } else {
            let style = parse_span_tag(tag)?;
            stack.push((opened, text.len(), style));
            opened += 1;
        }
        rest = &tail[end + 1..];
    }
    text.push_str(rest);

    if !stack.is_empty() {
        return Err(QuoteError::markup(format!(
            "{} unclosed <span> element(s)",
            stack.len()
        )));
    }

    closed.sort_by_key(|(order, _)| *order);
    Ok(StyledText {
        text,
        spans: closed.into_iter().map(|(_, s)| s).collect(),
    })
}

fn parse_entity(tail: &str) -> QuoteResult<(char, usize)> {
    let end = tail
        .find(';')
        .filter(|&e| e <= 10)
        .ok_or_else(|| QuoteError::markup("unterminated entity"))?;
    let name = &tail[1..end];
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or(name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()
            } else if let Some(dec) = name.strip_prefix('#') {
                dec.parse::<u32>().ok()
            } else {
                None
            };
            code.and_then(char::from_u32)
                .ok_or_else(|| QuoteError::markup(format!("unknown entity &{name};")))?
        }
    };
    Ok((c, end + 1))
}

fn unescape(value: &str) -> QuoteResult<String> {
    let mut out = String::with_capacity(value.len());
    let mut rest = value;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let (c, len) = parse_entity(&rest[pos..])?;
        out.push(c);
        rest = &rest[pos + len..];
    }
    out.push_str(rest);
    Ok(out)
}

fn parse_span_tag(tag: &str) -> QuoteResult<SpanStyle> {
    let attrs = tag
        .strip_prefix("span")
        .filter(|a| a.is_empty() || a.starts_with(char::is_whitespace))
        .ok_or_else(|| QuoteError::markup(format!("unknown tag <{tag}>")))?;
    if attrs.trim_end().ends_with('/') {
        return Err(QuoteError::markup("self-closing <span/> is not allowed"));
    }

    let mut style = SpanStyle::default();
    let mut rest = attrs.trim_start();
    while !rest.is_empty() {
        let eq = rest
            .find('=')
            .ok_or_else(|| QuoteError::markup(format!("attribute without value in <{tag}>")))?;
        let name = rest[..eq].trim();
        let after = rest[eq + 1..].trim_start();
        let quote = after
            .chars()
            .next()
            .filter(|q| *q == '"' || *q == '\'')
            .ok_or_else(|| QuoteError::markup(format!("unquoted value for '{name}'")))?;
        let close = after[1..]
            .find(quote)
            .ok_or_else(|| QuoteError::markup(format!("unterminated value for '{name}'")))?;
        let value = unescape(&after[1..1 + close])?;
        apply_attr(&mut style, name, &value)?;
        rest = after[close + 2..].trim_start();
    }
    Ok(style)
}

fn apply_attr(style: &mut SpanStyle, name: &str, value: &str) -> QuoteResult<()> {
    let bad = || QuoteError::markup(format!("invalid value {value:?} for '{name}'"));
    match name {
        "family" => {
            if value.trim().is_empty() {
                return Err(bad());
            }
            style.family = Some(value.trim().to_string());
        }
        "weight" => {
            let w: u16 = value.parse().map_err(|_| bad())?;
            if !(1..=1000).contains(&w) {
                return Err(bad());
            }
            style.weight = Some(w);
        }
        "style" => {
            style.italic = Some(match value {
                "italic" | "oblique" => true,
                "normal" => false,
                _ => return Err(bad()),
            });
        }
        "color" => style.color = Some(Rgb::from_hex(value).map_err(|_| bad())?),
        "size" => {
            let s: f32 = value.parse().map_err(|_| bad())?;
            if !s.is_finite() || s <= 0.0 {
                return Err(bad());
            }
            style.size = Some(s);
        }
        other => return Err(QuoteError::markup(format!("unknown attribute '{other}'"))),
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/text/markup.rs"]
mod tests;
