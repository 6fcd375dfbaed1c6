//! Quote records and the time-indexed collection they are loaded into.

pub mod book;

pub use book::{LoadReport, QuoteBook, QuoteRecord};
