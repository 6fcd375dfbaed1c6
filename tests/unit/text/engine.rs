use super::*;

use crate::text::testing::BoxEngine;

#[test]
fn wrap_measurer_pins_the_wrap_width() {
    let mut engine = BoxEngine::new();
    let text = "<span>aaaa bbbb cccc</span>";

    // 4 chars at 5px advance = 20px per word, 5px spaces.
    let wide = WrapMeasurer::new(&mut engine, 1000.0)
        .measure(text, 10.0)
        .unwrap();
    assert_eq!(wide.width, 70.0);
    assert!((wide.height - 12.0).abs() < 1e-4);

    let narrow = WrapMeasurer::new(&mut engine, 45.0)
        .measure(text, 10.0)
        .unwrap();
    assert_eq!(narrow.width, 45.0);
    assert!((narrow.height - 24.0).abs() < 1e-4);
    assert_eq!(engine.measured, [10.0, 10.0]);
}

#[test]
fn wrap_constructors_set_alignment() {
    assert_eq!(TextWrap::start(10.0).align, TextAlign::Start);
    assert_eq!(TextWrap::end(10.0).align, TextAlign::End);
    assert_eq!(TextAlign::default(), TextAlign::Start);
}
