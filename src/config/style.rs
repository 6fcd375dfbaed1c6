//! Visual theme: background plus per-role font and color.
//!
//! A [`StyleConfig`] is an immutable value built once per run from a [`StylePreset`] and an
//! optional set of [`StyleOverrides`]. Nothing mutates it afterwards.

use std::fmt;
use std::str::FromStr;

use crate::foundation::core::Rgb;
use crate::foundation::error::{QuoteError, QuoteResult};

pub(crate) const GENERIC_FAMILIES: &[&str] = &[
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
    "system-ui",
];

/// Font family plus weight and slant.
///
/// Parsed from Pango-like descriptions such as `"Sans"`, `"Noto Serif Bold Italic"` or
/// `"Inconsolata 300"`. Trailing weight/style words are peeled off the end; the rest is the
/// family name. The desktop aliases `Sans`, `Serif` and `Monospace` map onto the CSS generic
/// families.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct FontDescriptor {
    pub family: String,
    /// CSS weight, `1..=1000`.
    pub weight: u16,
    pub italic: bool,
}

impl FontDescriptor {
    pub fn new(family: impl Into<String>) -> Self {
        Self {
            family: canonical_family(&family.into()),
            weight: 400,
            italic: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = 700;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }
}

fn canonical_family(name: &str) -> String {
    match name.trim().to_ascii_lowercase().as_str() {
        "sans" | "sans-serif" => "sans-serif".to_string(),
        "serif" => "serif".to_string(),
        "mono" | "monospace" => "monospace".to_string(),
        "cursive" | "fantasy" | "system-ui" => name.trim().to_ascii_lowercase(),
        _ => name.trim().to_string(),
    }
}

fn weight_word(word: &str) -> Option<u16> {
    let w = match word.to_ascii_lowercase().as_str() {
        "thin" => 100,
        "ultralight" | "extralight" => 200,
        "light" => 300,
        "regular" | "normal" | "book" => 400,
        "medium" => 500,
        "semibold" | "demibold" => 600,
        "bold" => 700,
        "ultrabold" | "extrabold" => 800,
        "heavy" | "black" => 900,
        other => return other.parse::<u16>().ok().filter(|w| (1..=1000).contains(w)),
    };
    Some(w)
}

impl FromStr for FontDescriptor {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut words: Vec<&str> = s.split_whitespace().collect();
        let mut weight = 400;
        let mut italic = false;
        while words.len() > 1 {
            let Some(last) = words.last().copied() else {
                break;
            };
            if last.eq_ignore_ascii_case("italic") || last.eq_ignore_ascii_case("oblique") {
                italic = true;
            } else if let Some(w) = weight_word(last) {
                weight = w;
            } else {
                break;
            }
            words.pop();
        }
        if words.is_empty() {
            return Err(QuoteError::validation("font description must name a family"));
        }
        Ok(Self {
            family: canonical_family(&words.join(" ")),
            weight,
            italic,
        })
    }
}

impl fmt::Display for FontDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.family)?;
        if self.weight != 400 {
            write!(f, " {}", self.weight)?;
        }
        if self.italic {
            write!(f, " Italic")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for FontDescriptor {
    type Error = QuoteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FontDescriptor> for String {
    fn from(value: FontDescriptor) -> Self {
        value.to_string()
    }
}

/// Font and color for one text role.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RoleStyle {
    pub font: FontDescriptor,
    pub color: Rgb,
}

/// Built-in base themes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[derive(clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum StylePreset {
    /// Dark text on white, suited to e-ink panels.
    #[default]
    Light,
    /// Light text on black.
    Dark,
}

/// Immutable per-run theme.
#[derive(Clone, Debug, PartialEq)]
pub struct StyleConfig {
    pub background: Rgb,
    /// Quote body.
    pub body: RoleStyle,
    /// Highlighted time phrase.
    pub time: RoleStyle,
    /// Title/author credit line.
    pub metadata: RoleStyle,
    /// Credit line size in pixels.
    pub metadata_size: f32,
}

impl StyleConfig {
    pub fn preset(preset: StylePreset) -> Self {
        let grey = |v: f32| Rgb { r: v, g: v, b: v };
        match preset {
            StylePreset::Light => Self {
                background: Rgb::WHITE,
                body: RoleStyle {
                    font: FontDescriptor::new("sans-serif"),
                    color: grey(0.45),
                },
                time: RoleStyle {
                    font: FontDescriptor::new("sans-serif").bold(),
                    color: Rgb::BLACK,
                },
                metadata: RoleStyle {
                    font: FontDescriptor::new("sans-serif").italic(),
                    color: grey(0.2),
                },
                metadata_size: 18.0,
            },
            StylePreset::Dark => Self {
                background: Rgb::BLACK,
                body: RoleStyle {
                    font: FontDescriptor::new("sans-serif"),
                    color: grey(0.6),
                },
                time: RoleStyle {
                    font: FontDescriptor::new("sans-serif").bold(),
                    color: Rgb::WHITE,
                },
                metadata: RoleStyle {
                    font: FontDescriptor::new("sans-serif").italic(),
                    color: grey(0.8),
                },
                metadata_size: 18.0,
            },
        }
    }

    /// Return a new config with every `Some` field of `overrides` applied.
    pub fn with_overrides(&self, overrides: &StyleOverrides) -> QuoteResult<Self> {
        let mut out = self.clone();
        if let Some(c) = overrides.background {
            out.background = c;
        }
        if let Some(f) = &overrides.body_font {
            out.body.font = f.clone();
        }
        if let Some(c) = overrides.body_color {
            out.body.color = c;
        }
        if let Some(f) = &overrides.time_font {
            out.time.font = f.clone();
        }
        if let Some(c) = overrides.time_color {
            out.time.color = c;
        }
        if let Some(f) = &overrides.metadata_font {
            out.metadata.font = f.clone();
        }
        if let Some(c) = overrides.metadata_color {
            out.metadata.color = c;
        }
        if let Some(s) = overrides.metadata_size {
            if !s.is_finite() || s <= 0.0 {
                return Err(QuoteError::validation(format!(
                    "metadata_size must be finite and > 0, got {s}"
                )));
            }
            out.metadata_size = s;
        }
        Ok(out)
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self::preset(StylePreset::default())
    }
}

/// Optional per-field replacements for a preset.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleOverrides {
    pub background: Option<Rgb>,
    pub body_font: Option<FontDescriptor>,
    pub body_color: Option<Rgb>,
    pub time_font: Option<FontDescriptor>,
    pub time_color: Option<Rgb>,
    pub metadata_font: Option<FontDescriptor>,
    pub metadata_color: Option<Rgb>,
    pub metadata_size: Option<f32>,
}

impl StyleOverrides {
    /// Merge two override sets; fields set in `other` win.
    pub fn merged(&self, other: &StyleOverrides) -> StyleOverrides {
        StyleOverrides {
            background: other.background.or(self.background),
            body_font: other.body_font.clone().or_else(|| self.body_font.clone()),
            body_color: other.body_color.or(self.body_color),
            time_font: other.time_font.clone().or_else(|| self.time_font.clone()),
            time_color: other.time_color.or(self.time_color),
            metadata_font: other
                .metadata_font
                .clone()
                .or_else(|| self.metadata_font.clone()),
            metadata_color: other.metadata_color.or(self.metadata_color),
            metadata_size: other.metadata_size.or(self.metadata_size),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/style.rs"]
mod tests;
