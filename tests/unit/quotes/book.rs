use super::*;

const SAMPLE_JSON: &str = r#"{
    "10:42": [
        {"quote": "It was 10:42 in the morning.", "timestring": "10:42",
         "title": "Nowhere", "author": "A. Nobody"},
        {"quote": "At 10:42 the train left.", "timestring": "10:42",
         "title": "Rails", "author": "B. Somebody"}
    ],
    "00:01": [
        {"quote": "One minute past midnight.", "timestring": "One minute past midnight",
         "title": "Night", "author": "C. Owl"}
    ]
}"#;

#[test]
fn json_loads_in_slot_order() {
    let report = QuoteBook::from_json_str(SAMPLE_JSON, FailurePolicy::Abort).unwrap();
    assert!(report.rejected.is_empty());
    let book = report.book;
    assert_eq!(book.len(), 3);

    let slots: Vec<String> = book.slots().map(|(s, _)| s.to_string()).collect();
    assert_eq!(slots, ["00:01", "10:42"]);

    let at = book.records("10:42".parse().unwrap());
    assert_eq!(at.len(), 2);
    assert_eq!(at[1].title, "Rails");
    assert!(book.records("12:00".parse().unwrap()).is_empty());
}

#[test]
fn yaml_loads_folded_quotes() {
    let yaml = r#"
"07:15":
- author: Herman Melville
  quote: >
    At a quarter past seven the whale surfaced.
  timestring: a quarter past seven
  title: Moby-Dick
"#;
    let report = QuoteBook::from_yaml_str(yaml, FailurePolicy::Abort).unwrap();
    let recs = report.book.records("07:15".parse().unwrap());
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].author, "Herman Melville");
    assert!(recs[0].quote.contains("a quarter past seven"));
}

#[test]
fn missing_timestring_in_quote_aborts_with_slot_and_preview() {
    let json = r#"{"09:00": [
        {"quote": "Nine in the morning.", "timestring": "nine o'clock",
         "title": "T", "author": "A"}
    ]}"#;
    let err = QuoteBook::from_json_str(json, FailurePolicy::Abort).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("data contract error"));
    assert!(msg.contains("09:00"));
    assert!(msg.contains("Nine in the morning."));
    assert!(msg.contains("nine o'clock"));
}

#[test]
fn skip_policy_drops_bad_records_and_reports_them() {
    let json = r#"{"09:00": [
        {"quote": "Nine sharp.", "timestring": "Nine", "title": "T", "author": "A"},
        {"quote": "No author here at nine.", "timestring": "nine", "title": "T"},
        {"quote": "Nine again.", "timestring": "Nine", "title": "T2", "author": "A2"}
    ]}"#;
    let report = QuoteBook::from_json_str(json, FailurePolicy::Skip).unwrap();
    assert_eq!(report.rejected.len(), 1);
    assert!(report.rejected[0].to_string().contains("missing field 'author'"));

    let recs = report.book.records("09:00".parse().unwrap());
    assert_eq!(recs.len(), 2);
    assert_eq!(recs[1].title, "T2");
}

#[test]
fn bad_time_key_is_rejected() {
    let json = r#"{"25:00": []}"#;
    assert!(QuoteBook::from_json_str(json, FailurePolicy::Skip).is_err());
}

#[test]
fn from_path_dispatches_on_extension() {
    let dir = tempfile::tempdir().unwrap();
    let json = dir.path().join("quotes.json");
    std::fs::write(&json, SAMPLE_JSON).unwrap();
    let report = QuoteBook::from_path(&json, FailurePolicy::Abort).unwrap();
    assert_eq!(report.book.len(), 3);

    let csv = dir.path().join("quotes.csv");
    std::fs::write(&csv, "time|quote").unwrap();
    assert!(QuoteBook::from_path(&csv, FailurePolicy::Abort).is_err());
}
