use super::*;

#[test]
fn time_slot_parse_and_format() {
    let slot: TimeSlot = "10:42".parse().unwrap();
    assert_eq!(slot.minute(), 642);
    assert_eq!(slot.to_string(), "10:42");
    assert_eq!(slot.compact(), "1042");

    assert_eq!("0:05".parse::<TimeSlot>().unwrap().to_string(), "00:05");
    assert!("24:00".parse::<TimeSlot>().is_err());
    assert!("12:60".parse::<TimeSlot>().is_err());
    assert!("1230".parse::<TimeSlot>().is_err());
    assert!("12:5".parse::<TimeSlot>().is_err());
}

#[test]
fn time_slot_serde_uses_clock_text() {
    let slot: TimeSlot = serde_json::from_str("\"23:59\"").unwrap();
    assert_eq!(slot.minute(), MINUTES_PER_DAY - 1);
    assert_eq!(serde_json::to_string(&slot).unwrap(), "\"23:59\"");
    assert!(serde_json::from_str::<TimeSlot>("\"7pm\"").is_err());
}

#[test]
fn full_day_covers_every_minute() {
    let all: Vec<_> = MinuteRange::full_day().slots().collect();
    assert_eq!(all.len(), 1440);
    assert_eq!(all.first().unwrap().to_string(), "00:00");
    assert_eq!(all.last().unwrap().to_string(), "23:59");
}

#[test]
fn minute_range_is_inclusive() {
    let r = MinuteRange::new("09:58".parse().unwrap(), "10:01".parse().unwrap()).unwrap();
    let slots: Vec<String> = r.slots().map(|s| s.to_string()).collect();
    assert_eq!(slots, ["09:58", "09:59", "10:00", "10:01"]);

    assert!(MinuteRange::new("10:00".parse().unwrap(), "09:00".parse().unwrap()).is_err());
}

#[test]
fn rgb_validation_and_conversion() {
    assert!(Rgb::new(1.2, 0.0, 0.0).is_err());
    assert!(Rgb::new(f32::NAN, 0.0, 0.0).is_err());

    let c = Rgb::new(1.0, 0.5, 0.0).unwrap();
    assert_eq!(c.to_rgba8(), [255, 128, 0, 255]);
    assert_eq!(c.to_hex(), "#ff8000");

    let back = Rgb::from_hex("#ff8000").unwrap();
    assert_eq!(back.to_rgba8(), c.to_rgba8());
    assert!(Rgb::from_hex("ff8000").is_err());
    assert!(Rgb::from_hex("#ff80zz").is_err());
}

#[test]
fn extent_caps_are_inclusive() {
    let e = Extent::new(548.0, 674.0);
    assert!(e.fits_within(548.0, 674.0));
    assert!(!e.fits_within(547.9, 674.0));
    assert!(!e.fits_within(548.0, 673.0));
}

#[test]
fn preview_flattens_and_truncates() {
    assert_eq!(text_preview("a\n  b", 10), "a b");
    let p = text_preview("The clock struck thirteen and nobody noticed", 10);
    assert_eq!(p.chars().count(), 10);
    assert!(p.ends_with('…'));
}
