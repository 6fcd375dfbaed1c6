use crate::batch::naming::{ArtifactKind, ArtifactName};
use crate::config::run::FailurePolicy;
use crate::fit::FitResult;
use crate::foundation::core::{MinuteRange, TimeSlot, text_preview};
use crate::foundation::error::{QuoteError, QuoteResult};
use crate::quotes::{QuoteBook, QuoteRecord};
use crate::render::composer::ImageComposer;
use crate::render::sink::ArtifactSink;
use crate::stats::{QuoteStat, StatisticsCollector, StatsReport};
use crate::text::engine::TextEngine;

/// Batch-level knobs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchOpts {
    /// Slots to process, inclusive.
    pub minutes: MinuteRange,
    /// Applies to failures confined to one quote; filesystem and encoding failures always abort.
    pub policy: FailurePolicy,
    pub collect_stats: bool,
}

impl Default for BatchOpts {
    fn default() -> Self {
        Self {
            minutes: MinuteRange::full_day(),
            policy: FailurePolicy::Skip,
            collect_stats: true,
        }
    }
}

/// A record that was not rendered under [`FailurePolicy::Skip`].
#[derive(Debug)]
pub struct SkippedQuote {
    pub name: ArtifactName,
    pub error: QuoteError,
}

/// Outcome of a completed batch.
#[derive(Debug)]
pub struct BatchSummary {
    /// Records written (two files each).
    pub rendered: usize,
    pub skipped: Vec<SkippedQuote>,
    /// Slots in the processed range without any record.
    pub missing: Vec<TimeSlot>,
    pub stats: Option<StatsReport>,
}

impl BatchSummary {
    /// Operator-facing missing-slot line, `None` when every slot had a quote.
    pub fn missing_report(&self) -> Option<String> {
        if self.missing.is_empty() {
            return None;
        }
        let list: Vec<String> = self.missing.iter().map(ToString::to_string).collect();
        Some(format!(
            "{} missing quotes: [{}]",
            self.missing.len(),
            list.join(", ")
        ))
    }
}

/// Renders every record of a [`QuoteBook`] in slot order, one quote at a time.
pub struct BatchRunner<E> {
    composer: ImageComposer<E>,
    opts: BatchOpts,
}

impl<E: TextEngine> BatchRunner<E> {
    pub fn new(composer: ImageComposer<E>, opts: BatchOpts) -> Self {
        Self { composer, opts }
    }

    pub fn composer_mut(&mut self) -> &mut ImageComposer<E> {
        &mut self.composer
    }

    /// Render the book into `sink`.
    ///
    /// Each record yields a primary export and a credits export. Both frames are rasterized
    /// before either is handed to the sink, so a record never leaves a lone primary file behind.
    #[tracing::instrument(skip_all, fields(records = book.len()))]
    pub fn run(
        &mut self,
        book: &QuoteBook,
        sink: &mut dyn ArtifactSink,
    ) -> QuoteResult<BatchSummary> {
        sink.begin()?;

        let mut stats = self.opts.collect_stats.then(StatisticsCollector::new);
        let mut rendered = 0usize;
        let mut skipped = Vec::new();
        let mut missing = Vec::new();

        for slot in self.opts.minutes.slots() {
            let records = book.records(slot);
            if records.is_empty() {
                missing.push(slot);
                continue;
            }
            for (ordinal, record) in records.iter().enumerate() {
                let name = ArtifactName::new(slot, ordinal);
                match self.render_record(&name, record, sink) {
                    Ok(fit) => {
                        rendered += 1;
                        tracing::info!(%name, size = fit.size, probes = fit.probes, "rendered");
                        if let Some(stats) = stats.as_mut() {
                            stats.add(QuoteStat {
                                slot,
                                ordinal,
                                text_len: record.quote.chars().count(),
                                font_size: fit.size,
                                probes: fit.probes,
                                rounds: fit.rounds,
                                preview: text_preview(&record.quote, 40),
                            });
                        }
                    }
                    Err(e) => {
                        let e = e.in_quote(slot, &record.quote);
                        if self.opts.policy == FailurePolicy::Abort || !e.is_quote_local() {
                            tracing::error!(%name, error = %e, "aborting batch");
                            return Err(e);
                        }
                        tracing::warn!(%name, error = %e, "skipping quote");
                        skipped.push(SkippedQuote { name, error: e });
                    }
                }
            }
        }

        sink.end()?;
        tracing::info!(
            rendered,
            skipped = skipped.len(),
            missing = missing.len(),
            "batch finished"
        );
        Ok(BatchSummary {
            rendered,
            skipped,
            missing,
            stats: stats.map(StatisticsCollector::finalize),
        })
    }

    fn render_record(
        &mut self,
        name: &ArtifactName,
        record: &QuoteRecord,
        sink: &mut dyn ArtifactSink,
    ) -> QuoteResult<FitResult> {
        let mut composed = self
            .composer
            .add_quote(&record.quote, &record.timestring)?;
        let primary = composed.surface.snapshot();
        self.composer
            .add_annotations(&mut composed, &record.title, &record.author)?;
        let credits = composed.surface.snapshot();

        sink.write(name, ArtifactKind::Primary, &primary)?;
        sink.write(name, ArtifactKind::Credits, &credits)?;
        Ok(composed.fit)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/batch/runner.rs"]
mod tests;
