//! litclock renders literature quotes that mention a clock time into PNG images.
//!
//! Each record of a [`QuoteBook`] becomes two images: the quote alone, with its time phrase
//! highlighted and the font size fitted to the image, and the same image with a right-aligned
//! `"—title, author"` credit line.
//!
//! - Load and validate a [`QuoteBook`]
//! - Build an [`ImageComposer`] over a [`TextEngine`] (normally [`ParleyEngine`])
//! - Run a [`BatchRunner`] into an [`ArtifactSink`] such as [`PngSink`]
#![forbid(unsafe_code)]

pub mod batch;
pub mod config;
pub mod fit;
mod foundation;
pub mod quotes;
pub mod render;
pub mod stats;
pub mod text;

pub use crate::foundation::core::{Extent, MINUTES_PER_DAY, MinuteRange, Point, Rect, Rgb, TimeSlot};
pub use crate::foundation::error::{FitError, QuoteError, QuoteResult};

pub use crate::batch::{ArtifactKind, ArtifactName, BatchOpts, BatchRunner, BatchSummary};
pub use crate::config::run::{FailurePolicy, FitConfig, RenderBox, RunConfig};
pub use crate::config::style::{FontDescriptor, StyleConfig, StyleOverrides, StylePreset};
pub use crate::fit::{FitCaps, FitResult, FontSizeFitter, SeedTable};
pub use crate::quotes::{LoadReport, QuoteBook, QuoteRecord};
pub use crate::render::{
    ArtifactSink, ComposedQuote, FrameRGBA, ImageComposer, InMemorySink, PngSink, QuoteSurface,
};
pub use crate::stats::{QuoteStat, StatisticsCollector, StatsReport};
pub use crate::text::{LayoutMeasurer, ParleyEngine, TextEngine, TextWrap, WrapMeasurer};
