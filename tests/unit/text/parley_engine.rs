use super::*;

use crate::config::run::{FitConfig, RenderBox};
use crate::config::style::StyleConfig;
use crate::render::composer::ImageComposer;

#[test]
fn engine_without_fonts_refuses_to_measure() {
    let mut engine = ParleyEngine::with_system_fonts(false);
    assert!(!engine.has_fonts());

    for size in [12.0, 100.0, 399.0] {
        let err = engine
            .extent("<span>It was 10:42.</span>", size, TextWrap::start(548.0))
            .unwrap_err();
        assert!(matches!(err, QuoteError::Layout(_)), "{err}");
    }
}

#[test]
fn fontless_quote_is_a_layout_error_not_a_fit() {
    let mut c = ImageComposer::new(
        ParleyEngine::with_system_fonts(false),
        RenderBox::default(),
        StyleConfig::default(),
        FitConfig::default(),
    );
    let err = c.add_quote("It was 10:42 in the morning.", "10:42").err().unwrap();
    assert!(matches!(err, QuoteError::Layout(_)), "{err}");
    assert!(err.is_quote_local());
}

#[test]
fn invalid_size_and_width_are_rejected_before_shaping() {
    let mut engine = ParleyEngine::with_system_fonts(false);
    assert!(engine.extent("x", 0.0, TextWrap::start(100.0)).is_err());
    assert!(engine.extent("x", 12.0, TextWrap::start(f32::NAN)).is_err());
}

#[test]
fn registering_a_missing_font_file_fails() {
    let mut engine = ParleyEngine::with_system_fonts(false);
    let dir = tempfile::tempdir().unwrap();
    assert!(engine.register_font_file(&dir.path().join("none.ttf")).is_err());
    assert!(!engine.has_fonts());
}
