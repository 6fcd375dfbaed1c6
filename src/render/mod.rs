//! Raster surfaces, quote composition and image export.

pub mod composer;
pub mod sink;
pub mod surface;

pub use composer::{ComposedQuote, ImageComposer};
pub use sink::{ArtifactSink, InMemorySink, PngSink};
pub use surface::{FrameRGBA, QuoteSurface};
