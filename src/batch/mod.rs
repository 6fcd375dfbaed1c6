//! Orchestration: iterate time slots, render each record twice and report gaps.

pub mod naming;
pub mod runner;

pub use naming::{ArtifactKind, ArtifactName};
pub use runner::{BatchOpts, BatchRunner, BatchSummary, SkippedQuote};
