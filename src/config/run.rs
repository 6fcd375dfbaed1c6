use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::config::style::{StyleConfig, StyleOverrides, StylePreset};
use crate::foundation::core::{MinuteRange, Rect};
use crate::foundation::error::{QuoteError, QuoteResult};

/// Image geometry shared by every quote of a run.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderBox {
    /// Image width in pixels.
    pub width: u32,
    /// Image height in pixels.
    pub height: u32,
    /// Uniform margin in pixels.
    pub margin: f32,
    /// Height reserved at the bottom for the credit line.
    pub meta_band_height: f32,
    /// Fraction of the image width available to the right-aligned credits.
    pub meta_width_ratio: f32,
}

impl Default for RenderBox {
    fn default() -> Self {
        Self {
            width: 600,
            height: 800,
            margin: 26.0,
            meta_band_height: 100.0,
            meta_width_ratio: 0.7,
        }
    }
}

impl RenderBox {
    pub fn validate(&self) -> QuoteResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(QuoteError::validation("image width and height must be > 0"));
        }
        if self.width > u32::from(u16::MAX) || self.height > u32::from(u16::MAX) {
            return Err(QuoteError::validation(format!(
                "image dimensions must fit in u16, got {}x{}",
                self.width, self.height
            )));
        }
        if !self.margin.is_finite() || self.margin < 0.0 {
            return Err(QuoteError::validation("margin must be finite and >= 0"));
        }
        if !self.meta_band_height.is_finite() || self.meta_band_height < 0.0 {
            return Err(QuoteError::validation(
                "meta_band_height must be finite and >= 0",
            ));
        }
        if !(self.meta_width_ratio > 0.0 && self.meta_width_ratio <= 1.0) {
            return Err(QuoteError::validation(format!(
                "meta_width_ratio must be in (0, 1], got {}",
                self.meta_width_ratio
            )));
        }
        if self.max_text_width() <= 0.0 || self.max_text_height() <= 0.0 {
            return Err(QuoteError::validation(
                "margins and metadata band leave no room for the quote",
            ));
        }
        Ok(())
    }

    /// Wrap width and width cap for the quote: `width - 2 * margin`.
    pub fn max_text_width(&self) -> f32 {
        self.width as f32 - 2.0 * self.margin
    }

    /// Height cap for the quote: `height - margin - meta_band_height`.
    pub fn max_text_height(&self) -> f32 {
        self.height as f32 - self.margin - self.meta_band_height
    }

    /// Area the quote block may occupy, anchored at `(margin, margin)`.
    pub fn quote_area(&self) -> Rect {
        let m = f64::from(self.margin);
        Rect::new(
            m,
            m,
            m + f64::from(self.max_text_width()),
            m + f64::from(self.max_text_height()),
        )
    }

    /// Width of the credits column.
    pub fn meta_column_width(&self) -> f32 {
        self.width as f32 * self.meta_width_ratio
    }

    /// Credits column; its right and bottom edges sit one margin inside the image.
    pub fn meta_column(&self) -> Rect {
        let right = f64::from(self.width) - f64::from(self.margin);
        let bottom = f64::from(self.height) - f64::from(self.margin);
        Rect::new(
            right - f64::from(self.meta_column_width()),
            bottom - f64::from(self.meta_band_height),
            right,
            bottom,
        )
    }
}

/// Bounds and precision for the font-size search.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FitConfig {
    /// Smallest legible size; smaller fits are rejected.
    pub min_size: f32,
    /// Optional largest allowed size; larger fits are rejected.
    pub max_size: Option<f32>,
    /// Search resolution in pixels.
    pub precision: f32,
    /// Initial step is `precision * 2^steps`.
    pub steps: u32,
    /// Sizes above this are treated as not fitting without measuring.
    pub ceiling: f32,
}

impl Default for FitConfig {
    fn default() -> Self {
        Self {
            min_size: 12.0,
            max_size: None,
            precision: 0.5,
            steps: 3,
            ceiling: 400.0,
        }
    }
}

impl FitConfig {
    pub fn validate(&self) -> QuoteResult<()> {
        if !self.precision.is_finite() || self.precision <= 0.0 {
            return Err(QuoteError::validation("fit precision must be finite and > 0"));
        }
        if self.steps > 16 {
            return Err(QuoteError::validation("fit steps must be <= 16"));
        }
        if !self.min_size.is_finite() || self.min_size <= 0.0 {
            return Err(QuoteError::validation("min_size must be finite and > 0"));
        }
        if let Some(max) = self.max_size
            && !(max.is_finite() && max >= self.min_size)
        {
            return Err(QuoteError::validation(format!(
                "max_size ({max}) must be finite and >= min_size ({})",
                self.min_size
            )));
        }
        if !self.ceiling.is_finite() || self.ceiling < self.min_size {
            return Err(QuoteError::validation("ceiling must be finite and >= min_size"));
        }
        Ok(())
    }

    /// Initial step magnitude `precision * 2^steps`.
    pub fn initial_step(&self) -> f32 {
        self.precision * (1u32 << self.steps) as f32
    }
}

/// What the batch does with a record that cannot be rendered.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[derive(clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Report the record and continue with the next one.
    #[default]
    Skip,
    /// Stop the batch on the first failure.
    Abort,
}

/// Style section of the run file: a preset plus per-field overrides.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleSection {
    pub preset: StylePreset,
    pub overrides: StyleOverrides,
}

impl StyleSection {
    pub fn resolve(&self) -> QuoteResult<StyleConfig> {
        StyleConfig::preset(self.preset).with_overrides(&self.overrides)
    }
}

/// Everything that stays constant for one batch.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    pub render_box: RenderBox,
    pub style: StyleSection,
    pub fit: FitConfig,
    /// Convert finished PNGs to single-channel luminance.
    pub grayscale: bool,
    /// Restrict processing to these slots.
    pub minutes: Option<MinuteRange>,
    pub on_fit_error: FailurePolicy,
    /// Collect and report per-quote statistics.
    pub stats: bool,
    /// Extra font files registered with the text engine.
    pub fonts: Vec<PathBuf>,
    /// Also resolve families against installed system fonts.
    pub system_fonts: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            render_box: RenderBox::default(),
            style: StyleSection::default(),
            fit: FitConfig::default(),
            grayscale: false,
            minutes: None,
            on_fit_error: FailurePolicy::default(),
            stats: true,
            fonts: Vec::new(),
            system_fonts: true,
        }
    }
}

impl RunConfig {
    /// Read a JSON run file. Font paths are resolved relative to the file.
    pub fn from_path(path: &Path) -> QuoteResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read run config '{}'", path.display()))?;
        let mut cfg: RunConfig = serde_json::from_slice(&bytes).map_err(|e| {
            QuoteError::validation(format!("run config '{}': {e}", path.display()))
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        for font in &mut cfg.fonts {
            if font.is_relative() {
                *font = base.join(&*font);
            }
        }
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> QuoteResult<()> {
        self.render_box.validate()?;
        self.fit.validate()?;
        self.style.resolve()?;
        if let Some(r) = self.minutes {
            MinuteRange::new(r.first, r.last)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/run.rs"]
mod tests;
