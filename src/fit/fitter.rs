use std::collections::HashMap;

use crate::config::run::FitConfig;
use crate::foundation::error::{FitError, QuoteError, QuoteResult};
use crate::text::engine::LayoutMeasurer;

/// Width and height limits the laid-out quote must respect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitCaps {
    pub max_width: f32,
    pub max_height: f32,
}

/// Outcome of one successful search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitResult {
    /// Largest fitting size found.
    pub size: f32,
    /// Distinct sizes measured.
    pub probes: usize,
    /// Halving rounds performed.
    pub rounds: u32,
}

/// Seeded exponential search with halving refinement.
///
/// Candidate sizes lie on the grid `seed + k * precision`; `k` is the cache key, so a size is
/// measured at most once per [`FontSizeFitter::fit`] call. The cache is cleared when a new fit
/// starts.
///
/// The search assumes extents grow monotonically with the font size. Word-wrap reflow can break
/// that locally; such a quote still gets a fitting size, just not necessarily the largest one.
#[derive(Debug)]
pub struct FontSizeFitter {
    cfg: FitConfig,
    cache: HashMap<i64, bool>,
}

/// Walk state shared by the rounds of one search.
struct Search<'a, M: ?Sized> {
    measurer: &'a mut M,
    cache: &'a mut HashMap<i64, bool>,
    markup: &'a str,
    caps: FitCaps,
    seed: f32,
    precision: f32,
    ceiling: f32,
    smallest_probed: Option<f32>,
}

impl<M: LayoutMeasurer + ?Sized> Search<'_, M> {
    fn size(&self, tick: i64) -> f32 {
        self.seed + tick as f32 * self.precision
    }

    /// Whether the candidate at `tick` fits; `None` when the size is not positive.
    fn fits(&mut self, tick: i64) -> QuoteResult<Option<bool>> {
        let size = self.size(tick);
        if size <= 0.0 {
            return Ok(None);
        }
        if size > self.ceiling {
            return Ok(Some(false));
        }
        if let Some(&hit) = self.cache.get(&tick) {
            return Ok(Some(hit));
        }
        let extent = self.measurer.measure(self.markup, size)?;
        let ok = extent.fits_within(self.caps.max_width, self.caps.max_height);
        self.cache.insert(tick, ok);
        self.smallest_probed = Some(self.smallest_probed.map_or(size, |s| s.min(size)));
        Ok(Some(ok))
    }
}

impl FontSizeFitter {
    pub fn new(cfg: FitConfig) -> Self {
        Self {
            cfg,
            cache: HashMap::new(),
        }
    }

    pub fn config(&self) -> &FitConfig {
        &self.cfg
    }

    /// Largest size at which `markup` fits `caps`, to within one precision step.
    ///
    /// Fails with [`FitError::NoFeasibleSize`] when nothing fits and with
    /// [`FitError::OutOfBounds`] when the best size falls outside `[min_size, max_size]`.
    #[tracing::instrument(skip(self, measurer, markup), fields(chars = markup.len()))]
    pub fn fit<M: LayoutMeasurer + ?Sized>(
        &mut self,
        measurer: &mut M,
        markup: &str,
        caps: FitCaps,
        seed: f32,
    ) -> QuoteResult<FitResult> {
        self.cfg.validate()?;
        if !seed.is_finite() || seed <= 0.0 {
            return Err(QuoteError::validation(format!(
                "seed size must be finite and > 0, got {seed}"
            )));
        }
        if !(caps.max_width > 0.0 && caps.max_height > 0.0) {
            return Err(QuoteError::validation("fit caps must be > 0"));
        }

        self.cache.clear();
        let mut search = Search {
            measurer,
            cache: &mut self.cache,
            markup,
            caps,
            seed,
            precision: self.cfg.precision,
            ceiling: self.cfg.ceiling,
            smallest_probed: None,
        };

        let seed_fits = search.fits(0)? == Some(true);
        let grow = seed_fits;
        let mut best: Option<i64> = seed_fits.then_some(0);
        let mut pos: i64 = 0;
        let mut step: i64 = 1 << self.cfg.steps;
        let mut rounds = 0u32;

        while step >= 1 {
            rounds += 1;
            if grow {
                // Climb while candidates fit; `pos` stays on the last fitting one.
                loop {
                    let next = pos + step;
                    if search.fits(next)? != Some(true) {
                        break;
                    }
                    pos = next;
                    best = Some(best.map_or(next, |b| b.max(next)));
                }
            } else {
                // Descend until a candidate fits; `pos` returns to the last failing one.
                let mut next = pos;
                loop {
                    next -= step;
                    match search.fits(next)? {
                        None => break,
                        Some(true) => {
                            best = Some(best.map_or(next, |b| b.max(next)));
                            break;
                        }
                        Some(false) => pos = next,
                    }
                }
            }
            step /= 2;
        }

        let probes = search.cache.len();
        let smallest_probed = search.smallest_probed.unwrap_or(seed);
        let Some(best) = best else {
            tracing::debug!(probes, rounds, smallest_probed, "no feasible size");
            return Err(FitError::NoFeasibleSize { smallest_probed }.into());
        };
        let size = seed + best as f32 * self.cfg.precision;
        tracing::debug!(size, probes, rounds, "fitted");

        let too_big = self.cfg.max_size.is_some_and(|max| size > max);
        if size < self.cfg.min_size || too_big {
            return Err(FitError::OutOfBounds {
                size,
                min: self.cfg.min_size,
                max: self
                    .cfg
                    .max_size
                    .map_or_else(|| "inf".to_string(), |m| format!("{m:.2}")),
            }
            .into());
        }

        Ok(FitResult {
            size,
            probes,
            rounds,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fit/fitter.rs"]
mod tests;
