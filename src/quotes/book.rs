use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context as _;

use crate::config::run::FailurePolicy;
use crate::foundation::core::{TimeSlot, text_preview};
use crate::foundation::error::{QuoteError, QuoteResult};

/// One literature quote naming a clock time.
///
/// `timestring` occurs verbatim in `quote`; [`QuoteBook`] checks this when loading and nothing
/// downstream re-checks it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct QuoteRecord {
    pub quote: String,
    pub timestring: String,
    pub title: String,
    pub author: String,
}

#[derive(Debug, Default, serde::Deserialize)]
struct RawRecord {
    quote: Option<String>,
    timestring: Option<String>,
    title: Option<String>,
    author: Option<String>,
}

impl RawRecord {
    fn into_record(self, slot: TimeSlot) -> QuoteResult<QuoteRecord> {
        let preview = text_preview(self.quote.as_deref().unwrap_or_default(), 40);
        let missing = |field: &str| {
            QuoteError::data_contract(format!(
                "{slot} \"{preview}\": missing field '{field}' \
                 (expected author, quote, timestring, title)"
            ))
        };
        let quote = self.quote.clone().ok_or_else(|| missing("quote"))?;
        let timestring = self.timestring.ok_or_else(|| missing("timestring"))?;
        let title = self.title.ok_or_else(|| missing("title"))?;
        let author = self.author.ok_or_else(|| missing("author"))?;
        if timestring.is_empty() || !quote.contains(&timestring) {
            return Err(QuoteError::data_contract(format!(
                "{slot} \"{preview}\": timestring '{timestring}' not found in quote"
            )));
        }
        Ok(QuoteRecord {
            quote,
            timestring,
            title,
            author,
        })
    }
}

/// Records grouped by time slot, in file order within each slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QuoteBook {
    slots: BTreeMap<TimeSlot, Vec<QuoteRecord>>,
}

/// Result of checking a raw collection against the data contract.
#[derive(Debug)]
pub struct LoadReport {
    pub book: QuoteBook,
    /// Violations of dropped records (empty under [`FailurePolicy::Abort`]).
    pub rejected: Vec<QuoteError>,
}

impl QuoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to a slot. The caller vouches for the data contract.
    pub fn push(&mut self, slot: TimeSlot, record: QuoteRecord) {
        self.slots.entry(slot).or_default().push(record);
    }

    /// Records for `slot`; empty when the slot has none.
    pub fn records(&self, slot: TimeSlot) -> &[QuoteRecord] {
        self.slots.get(&slot).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn slots(&self) -> impl Iterator<Item = (TimeSlot, &[QuoteRecord])> {
        self.slots.iter().map(|(s, r)| (*s, r.as_slice()))
    }

    /// Total number of records.
    pub fn len(&self) -> usize {
        self.slots.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Load `.json`, `.yaml` or `.yml` input.
    pub fn from_path(path: &Path, policy: FailurePolicy) -> QuoteResult<LoadReport> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read quotes '{}'", path.display()))?;
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("json") => Self::from_json_str(&text, policy),
            Some("yaml") | Some("yml") => Self::from_yaml_str(&text, policy),
            _ => Err(QuoteError::validation(format!(
                "unsupported quote file '{}' (expected .json, .yaml or .yml)",
                path.display()
            ))),
        }
    }

    pub fn from_json_str(text: &str, policy: FailurePolicy) -> QuoteResult<LoadReport> {
        let raw: BTreeMap<String, Vec<RawRecord>> = serde_json::from_str(text)
            .map_err(|e| QuoteError::data_contract(format!("quotes json: {e}")))?;
        Self::from_raw(raw, policy)
    }

    pub fn from_yaml_str(text: &str, policy: FailurePolicy) -> QuoteResult<LoadReport> {
        let raw: BTreeMap<String, Vec<RawRecord>> = serde_yaml::from_str(text)
            .map_err(|e| QuoteError::data_contract(format!("quotes yaml: {e}")))?;
        Self::from_raw(raw, policy)
    }

    fn from_raw(
        raw: BTreeMap<String, Vec<RawRecord>>,
        policy: FailurePolicy,
    ) -> QuoteResult<LoadReport> {
        let mut book = QuoteBook::new();
        let mut rejected = Vec::new();
        for (key, records) in raw {
            let slot: TimeSlot = key
                .parse()
                .map_err(|e| QuoteError::data_contract(format!("bad time key: {e}")))?;
            for raw in records {
                match raw.into_record(slot) {
                    Ok(record) => book.push(slot, record),
                    Err(e) if policy == FailurePolicy::Skip => {
                        tracing::warn!(%slot, error = %e, "dropping quote record");
                        rejected.push(e);
                    }
                    Err(e) => return Err(e),
                }
            }
        }
        Ok(LoadReport { book, rejected })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/quotes/book.rs"]
mod tests;
