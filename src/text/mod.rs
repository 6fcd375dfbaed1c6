//! Styled text: span markup, the measurement capability, and the Parley-backed engine.

pub mod engine;
pub mod markup;
pub mod parley_engine;

#[cfg(test)]
pub(crate) mod testing;

pub use engine::{LayoutMeasurer, TextAlign, TextEngine, TextWrap, WrapMeasurer};
pub use parley_engine::{ParleyEngine, TextBrushRgba8};
