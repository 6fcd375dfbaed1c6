//! Font-size search.

pub mod fitter;
pub mod seed;

pub use fitter::{FitCaps, FitResult, FontSizeFitter};
pub use seed::SeedTable;
