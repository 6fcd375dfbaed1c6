//! Per-quote diagnostics.
//!
//! The collector only observes; nothing it records feeds back into rendering. The batch calls
//! [`StatisticsCollector::finalize`] after the last quote to obtain the report.

use std::fmt;

use crate::foundation::core::TimeSlot;

/// Measurements for one rendered quote.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct QuoteStat {
    pub slot: TimeSlot,
    pub ordinal: usize,
    /// Quote length in characters.
    pub text_len: usize,
    pub font_size: f32,
    /// Distinct sizes measured while fitting.
    pub probes: usize,
    pub rounds: u32,
    pub preview: String,
}

/// Append-only log of [`QuoteStat`]s.
#[derive(Debug, Default)]
pub struct StatisticsCollector {
    records: Vec<QuoteStat>,
}

impl StatisticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, stat: QuoteStat) {
        self.records.push(stat);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Consume the log and build the end-of-run report.
    pub fn finalize(self) -> StatsReport {
        let mut records = self.records;
        // Stable: equal sizes keep render order.
        records.sort_by(|a, b| a.font_size.total_cmp(&b.font_size));

        let mut histogram: Vec<(f32, usize)> = Vec::new();
        for r in &records {
            match histogram.last_mut() {
                Some((size, n)) if *size == r.font_size => *n += 1,
                _ => histogram.push((r.font_size, 1)),
            }
        }

        let total_probes = records.iter().map(|r| r.probes).sum();
        StatsReport {
            records,
            histogram,
            total_probes,
        }
    }
}

/// End-of-run summary.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct StatsReport {
    /// Records in ascending font-size order.
    pub records: Vec<QuoteStat>,
    /// `(font_size, count)` in ascending size order.
    pub histogram: Vec<(f32, usize)>,
    pub total_probes: usize,
}

impl StatsReport {
    /// Mean distinct sizes measured per quote; `0.0` for an empty run.
    pub fn average_probes(&self) -> f64 {
        if self.records.is_empty() {
            return 0.0;
        }
        self.total_probes as f64 / self.records.len() as f64
    }
}

impl fmt::Display for StatsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "quotes by font size:")?;
        for r in &self.records {
            writeln!(
                f,
                "  {:>6.1}px  {} #{}  {:>4} chars  {:>3} probes  \"{}\"",
                r.font_size, r.slot, r.ordinal, r.text_len, r.probes, r.preview
            )?;
        }
        writeln!(f, "font size histogram:")?;
        for (size, n) in &self.histogram {
            writeln!(f, "  {size:>6.1}px  {n}")?;
        }
        write!(
            f,
            "probes: {} total, {:.2} per quote",
            self.total_probes,
            self.average_probes()
        )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/stats/collector.rs"]
mod tests;
