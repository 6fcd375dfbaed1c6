use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        QuoteError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        QuoteError::data_contract("x")
            .to_string()
            .contains("data contract error:")
    );
    assert!(QuoteError::markup("x").to_string().contains("markup error:"));
    assert!(QuoteError::layout("x").to_string().contains("layout error:"));
    let fit = QuoteError::from(FitError::NoFeasibleSize {
        smallest_probed: 0.5,
    });
    assert!(fit.to_string().contains("fit error: no feasible font size"));
}

#[test]
fn in_quote_reports_slot_and_preview() {
    let slot: TimeSlot = "10:42".parse().unwrap();
    let err = QuoteError::from(FitError::OutOfBounds {
        size: 4.0,
        min: 12.0,
        max: "inf".to_string(),
    })
    .in_quote(slot, "It was 10:42 in the morning.");

    let msg = err.to_string();
    assert!(msg.starts_with("10:42"));
    assert!(msg.contains("It was 10:42 in the morning."));
    assert!(msg.contains("font size out of bounds"));
}

#[test]
fn quote_local_classification() {
    assert!(QuoteError::markup("x").is_quote_local());
    assert!(
        QuoteError::from(FitError::NoFeasibleSize {
            smallest_probed: 1.0
        })
        .is_quote_local()
    );
    let io = QuoteError::from(std::io::Error::other("disk full"));
    assert!(!io.is_quote_local());

    let slot: TimeSlot = "00:00".parse().unwrap();
    assert!(QuoteError::layout("x").in_quote(slot, "q").is_quote_local());
    assert!(
        !QuoteError::from(std::io::Error::other("boom"))
            .in_quote(slot, "q")
            .is_quote_local()
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = QuoteError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
