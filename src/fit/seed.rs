/// Starting sizes for the font-size search.
///
/// Rows are keyed by canonical image dimensions; each row maps quote-length thresholds (in
/// characters) to a starting size. Unknown dimensions fall back to a single constant. The seed only
/// picks the search direction, so a poor entry costs probes, never correctness.
#[derive(Clone, Debug, PartialEq)]
pub struct SeedTable {
    rows: Vec<SeedRow>,
    fallback: f32,
}

#[derive(Clone, Debug, PartialEq)]
struct SeedRow {
    width: u32,
    height: u32,
    /// `(max_chars, size)`, ascending by `max_chars`.
    thresholds: Vec<(usize, f32)>,
}

impl SeedTable {
    pub const FALLBACK: f32 = 32.0;

    /// Table with no rows: every lookup returns `fallback`.
    pub fn constant(fallback: f32) -> Self {
        Self {
            rows: Vec::new(),
            fallback,
        }
    }

    /// Add (or replace) the row for `width x height`.
    pub fn with_row(mut self, width: u32, height: u32, mut thresholds: Vec<(usize, f32)>) -> Self {
        thresholds.sort_by_key(|(n, _)| *n);
        self.rows.retain(|r| !(r.width == width && r.height == height));
        self.rows.push(SeedRow {
            width,
            height,
            thresholds,
        });
        self
    }

    /// Starting size for a quote of `quote_chars` characters on a `width x height` image.
    pub fn seed(&self, width: u32, height: u32, quote_chars: usize) -> f32 {
        let Some(row) = self
            .rows
            .iter()
            .find(|r| r.width == width && r.height == height)
        else {
            return self.fallback;
        };
        row.thresholds
            .iter()
            .find(|(max_chars, _)| quote_chars <= *max_chars)
            .or(row.thresholds.last())
            .map_or(self.fallback, |(_, size)| *size)
    }
}

impl Default for SeedTable {
    fn default() -> Self {
        Self::constant(Self::FALLBACK)
            .with_row(
                600,
                800,
                vec![
                    (40, 72.0),
                    (80, 56.0),
                    (160, 44.0),
                    (320, 34.0),
                    (640, 26.0),
                    (usize::MAX, 20.0),
                ],
            )
            .with_row(
                600,
                600,
                vec![
                    (40, 64.0),
                    (80, 48.0),
                    (160, 38.0),
                    (320, 28.0),
                    (640, 22.0),
                    (usize::MAX, 16.0),
                ],
            )
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fit/seed.rs"]
mod tests;
