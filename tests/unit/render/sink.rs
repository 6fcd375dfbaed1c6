use super::*;

use crate::foundation::core::TimeSlot;

fn frame(w: u32, h: u32, rgba: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: rgba.repeat((w * h) as usize),
        premultiplied: false,
    }
}

fn name() -> ArtifactName {
    ArtifactName::new(TimeSlot::from_minute(642).unwrap(), 0)
}

#[test]
fn png_sink_writes_both_directories() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = PngSink::new(dir.path().join("out"), false);
    sink.begin().unwrap();
    sink.write(&name(), ArtifactKind::Primary, &frame(4, 3, [200, 10, 10, 255]))
        .unwrap();
    sink.write(&name(), ArtifactKind::Credits, &frame(4, 3, [10, 200, 10, 255]))
        .unwrap();
    sink.end().unwrap();

    let primary = dir.path().join("out/quote_1042_0.png");
    let credits = dir.path().join("out/metadata/quote_1042_0_credits.png");
    assert_eq!(sink.written(), &[primary.clone(), credits.clone()]);

    let img = image::open(&primary).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (4, 3));
    assert_eq!(img.get_pixel(1, 1).0, [200, 10, 10, 255]);
    assert!(credits.is_file());
}

#[test]
fn grayscale_rewrites_as_single_channel() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = PngSink::new(dir.path(), true);
    sink.begin().unwrap();
    sink.write(&name(), ArtifactKind::Primary, &frame(2, 2, [255, 0, 0, 255]))
        .unwrap();

    let img = image::open(dir.path().join("quote_1042_0.png")).unwrap();
    assert_eq!(img.color(), image::ColorType::L8);
}

#[test]
fn premultiplied_frames_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = PngSink::new(dir.path(), false);
    sink.begin().unwrap();
    let mut f = frame(1, 1, [0, 0, 0, 128]);
    f.premultiplied = true;
    assert!(sink.write(&name(), ArtifactKind::Primary, &f).is_err());
}

#[test]
fn in_memory_sink_keeps_write_order() {
    let mut sink = InMemorySink::new();
    sink.begin().unwrap();
    sink.write(&name(), ArtifactKind::Primary, &frame(1, 1, [0; 4]))
        .unwrap();
    sink.write(&name(), ArtifactKind::Credits, &frame(1, 1, [0; 4]))
        .unwrap();
    sink.end().unwrap();

    let kinds: Vec<_> = sink.artifacts().iter().map(|(_, k, _)| *k).collect();
    assert_eq!(kinds, [ArtifactKind::Primary, ArtifactKind::Credits]);
    assert!(sink.is_closed());
}
