use super::*;

use crate::foundation::core::Extent;

/// Extent proportional to the font size; records every size measured.
struct Linear {
    w_per_px: f32,
    h_per_px: f32,
    measured: Vec<f32>,
}

impl Linear {
    fn new(w_per_px: f32, h_per_px: f32) -> Self {
        Self {
            w_per_px,
            h_per_px,
            measured: Vec::new(),
        }
    }

    fn fits(&self, size: f32, caps: FitCaps) -> bool {
        size * self.w_per_px <= caps.max_width && size * self.h_per_px <= caps.max_height
    }
}

impl LayoutMeasurer for Linear {
    fn measure(&mut self, _markup: &str, font_size: f32) -> QuoteResult<Extent> {
        self.measured.push(font_size);
        Ok(Extent::new(font_size * self.w_per_px, font_size * self.h_per_px))
    }
}

struct Failing;

impl LayoutMeasurer for Failing {
    fn measure(&mut self, _markup: &str, _font_size: f32) -> QuoteResult<Extent> {
        Err(QuoteError::layout("unsupported font family 'Nope'"))
    }
}

const CAPS: FitCaps = FitCaps {
    max_width: 548.0,
    max_height: 674.0,
};

fn fitter() -> FontSizeFitter {
    FontSizeFitter::new(FitConfig::default())
}

#[test]
fn growing_search_finds_supremum_within_precision() {
    // Height binds at 674 / 10 = 67.4.
    let mut m = Linear::new(2.0, 10.0);
    let r = fitter().fit(&mut m, "x", CAPS, 32.0).unwrap();

    assert!(m.fits(r.size, CAPS));
    assert!(!m.fits(r.size + 0.5, CAPS));
    assert_eq!(r.size, 67.0);
    assert_eq!(r.rounds, 4);
}

#[test]
fn shrinking_search_finds_supremum_within_precision() {
    // Width binds at 548 / 20 = 27.4.
    let mut m = Linear::new(20.0, 1.0);
    let r = fitter().fit(&mut m, "x", CAPS, 72.0).unwrap();

    assert!(m.fits(r.size, CAPS));
    assert!(!m.fits(r.size + 0.5, CAPS));
    assert_eq!(r.size, 27.0);
    assert_eq!(r.rounds, 4);
}

#[test]
fn no_size_is_measured_twice() {
    for seed in [13.0, 32.0, 44.5, 120.0] {
        let mut m = Linear::new(7.0, 9.0);
        let r = fitter().fit(&mut m, "x", CAPS, seed).unwrap();

        let mut seen = m.measured.clone();
        seen.sort_by(f32::total_cmp);
        seen.dedup();
        assert_eq!(seen.len(), m.measured.len(), "seed {seed}: {:?}", m.measured);
        assert_eq!(r.probes, m.measured.len());
    }
}

#[test]
fn rounds_are_bounded_by_step_count() {
    let cfg = FitConfig {
        steps: 5,
        ..FitConfig::default()
    };
    let mut m = Linear::new(1.0, 1.0);
    let r = FontSizeFitter::new(cfg).fit(&mut m, "x", CAPS, 20.0).unwrap();
    assert_eq!(r.rounds, 6);
    // Unbounded growth stops at the ceiling.
    assert!(r.size <= cfg.ceiling);
    assert!(r.size > cfg.ceiling - cfg.precision);
}

#[test]
fn cache_is_reset_between_fits() {
    let mut f = fitter();
    let mut a = Linear::new(2.0, 10.0);
    let first = f.fit(&mut a, "x", CAPS, 32.0).unwrap();
    let mut b = Linear::new(2.0, 10.0);
    let second = f.fit(&mut b, "x", CAPS, 32.0).unwrap();

    assert_eq!(first, second);
    assert_eq!(a.measured, b.measured);
}

#[test]
fn text_too_tall_at_any_legible_size_is_rejected() {
    // Fits only below 674 / 100 = 6.74px, which is under the 12px minimum.
    let mut m = Linear::new(1.0, 100.0);
    let err = fitter().fit(&mut m, "x", CAPS, 32.0).unwrap_err();
    match err {
        QuoteError::Fit(FitError::OutOfBounds { size, min, max }) => {
            assert!(size < 12.0);
            assert_eq!(min, 12.0);
            assert_eq!(max, "inf");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn nothing_fitting_is_no_feasible_size() {
    let mut m = Linear::new(1.0, 1.0);
    let caps = FitCaps {
        max_width: 0.1,
        max_height: 0.1,
    };
    let err = fitter().fit(&mut m, "x", caps, 32.0).unwrap_err();
    let QuoteError::Fit(FitError::NoFeasibleSize { smallest_probed }) = err else {
        panic!("unexpected error: {err}");
    };
    assert!(smallest_probed > 0.0 && smallest_probed <= 0.5);
    assert!(m.measured.iter().all(|s| *s > 0.0));
}

#[test]
fn size_above_max_is_out_of_bounds() {
    let cfg = FitConfig {
        max_size: Some(40.0),
        ..FitConfig::default()
    };
    let mut m = Linear::new(2.0, 10.0);
    let err = FontSizeFitter::new(cfg)
        .fit(&mut m, "x", CAPS, 32.0)
        .unwrap_err();
    assert!(err.to_string().contains("out of bounds"), "{err}");
    assert!(err.to_string().contains("40.00"), "{err}");
}

#[test]
fn measurement_errors_propagate() {
    let err = fitter().fit(&mut Failing, "x", CAPS, 32.0).unwrap_err();
    assert!(matches!(err, QuoteError::Layout(_)));
}

#[test]
fn rejects_non_positive_seed() {
    let mut m = Linear::new(1.0, 1.0);
    assert!(fitter().fit(&mut m, "x", CAPS, 0.0).is_err());
    assert!(m.measured.is_empty());
}

#[test]
fn seed_only_changes_probe_count() {
    let mut near = Linear::new(3.0, 11.0);
    let mut far = Linear::new(3.0, 11.0);
    let a = fitter().fit(&mut near, "x", CAPS, 60.0).unwrap();
    let b = fitter().fit(&mut far, "x", CAPS, 14.0).unwrap();
    assert!(close(a.size, b.size, 0.5));
    assert!(a.probes <= b.probes);
}

fn close(a: f32, b: f32, eps: f32) -> bool {
    (a - b).abs() <= eps
}
