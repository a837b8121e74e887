//! Sample source tests.
//!
//! Fixture tests require `tests/fixtures/sample_video.mp4` (see
//! `tests/fixtures/generate_fixtures.sh`) and `ffprobe` on PATH; they pass
//! trivially when either is missing.

use std::{path::Path, process::Command};

use bitrate_viz::{
    BitrateError, FfprobeSource, InMemorySource, PacketSource, Sample, StreamKind,
    parse_ffprobe_json,
};

fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

fn ffprobe_available() -> bool {
    Command::new("ffprobe").arg("-version").output().is_ok()
}

// ── parse_ffprobe_json ─────────────────────────────────────────────

#[test]
fn parses_string_fields_as_printed_by_ffprobe() {
    let text = r#"{
        "packets": [
            { "pts_time": "0.000000", "size": "12345" },
            { "pts_time": "0.033367", "size": "678" }
        ]
    }"#;

    let samples = parse_ffprobe_json(text).expect("parse");
    assert_eq!(
        samples,
        vec![Sample::new(0.0, 12_345), Sample::new(0.033367, 678)]
    );
}

#[test]
fn parses_numeric_fields() {
    let text = r#"{ "packets": [ { "pts_time": 1.5, "size": 42 } ] }"#;
    let samples = parse_ffprobe_json(text).expect("parse");
    assert_eq!(samples, vec![Sample::new(1.5, 42)]);
}

#[test]
fn skips_packets_without_presentation_time() {
    let text = r#"{
        "packets": [
            { "pts_time": "N/A", "size": "10" },
            { "size": "20" },
            { "pts_time": null, "size": "30" },
            { "pts_time": "2.0", "size": "40" }
        ]
    }"#;

    let samples = parse_ffprobe_json(text).expect("parse");
    assert_eq!(samples, vec![Sample::new(2.0, 40)]);
}

#[test]
fn missing_packets_key_yields_no_samples() {
    let samples = parse_ffprobe_json("{}").expect("parse");
    assert!(samples.is_empty());

    let samples = parse_ffprobe_json(r#"{ "packets": [] }"#).expect("parse");
    assert!(samples.is_empty());
}

#[test]
fn negative_pts_time_is_passed_through() {
    // Edit lists can shift the first packets before zero; rejecting them is
    // the aggregator's job.
    let samples = parse_ffprobe_json(r#"{ "packets": [ { "pts_time": "-0.066", "size": "5" } ] }"#)
        .expect("parse");
    assert_eq!(samples, vec![Sample::new(-0.066, 5)]);
}

#[test]
fn invalid_json_is_malformed() {
    let result = parse_ffprobe_json("not json at all");
    assert!(matches!(result, Err(BitrateError::MalformedProbeOutput(_))));
}

#[test]
fn packets_not_an_array_is_malformed() {
    let result = parse_ffprobe_json(r#"{ "packets": { "size": "1" } }"#);
    assert!(matches!(result, Err(BitrateError::MalformedProbeOutput(_))));
}

#[test]
fn unparseable_fields_are_malformed() {
    let bad_documents = [
        r#"{ "packets": [ { "pts_time": "soon", "size": "1" } ] }"#,
        r#"{ "packets": [ { "pts_time": "0.1", "size": "big" } ] }"#,
        r#"{ "packets": [ { "pts_time": "0.1", "size": 1.5 } ] }"#,
        r#"{ "packets": [ { "pts_time": "0.1" } ] }"#,
        r#"{ "packets": [ { "pts_time": true, "size": "1" } ] }"#,
    ];

    for document in bad_documents {
        let result = parse_ffprobe_json(document);
        assert!(
            matches!(result, Err(BitrateError::MalformedProbeOutput(_))),
            "expected MalformedProbeOutput for {document}, got {result:?}"
        );
    }
}

#[test]
fn negative_size_is_an_invalid_sample() {
    let text = r#"{
        "packets": [
            { "pts_time": "0.0", "size": "1" },
            { "pts_time": "0.5", "size": "-20" }
        ]
    }"#;

    match parse_ffprobe_json(text) {
        Err(BitrateError::InvalidSample {
            index,
            timestamp_sec,
            reason,
        }) => {
            assert_eq!(index, 1);
            assert_eq!(timestamp_sec, 0.5);
            assert!(reason.contains("negative"), "reason: {reason}");
        }
        other => panic!("expected InvalidSample, got {other:?}"),
    }
}

// ── InMemorySource ─────────────────────────────────────────────────

#[test]
fn in_memory_source_returns_its_samples() {
    let samples = vec![Sample::new(0.1, 1), Sample::new(0.2, 2)];
    let mut source = InMemorySource::new(samples.clone());

    assert_eq!(source.read_samples().expect("read"), samples);
    // Reading twice gives the same data.
    assert_eq!(source.read_samples().expect("read"), samples);
    assert!(source.describe().contains('2'));
}

// ── FfprobeSource ──────────────────────────────────────────────────

#[test]
fn missing_probe_tool_is_reported() {
    let mut source = FfprobeSource::new("input.mp4").with_program("bitrate-viz-no-such-ffprobe");
    let result = source.read_samples();

    match result {
        Err(BitrateError::ProbeToolMissing { tool }) => {
            assert_eq!(tool, "bitrate-viz-no-such-ffprobe");
        }
        other => panic!("expected ProbeToolMissing, got {other:?}"),
    }
}

#[test]
fn describe_mentions_path_and_stream() {
    let source = FfprobeSource::new("clip.mkv").with_stream(StreamKind::Audio);
    let description = source.describe();
    assert!(description.contains("clip.mkv"), "{description}");
    assert!(description.contains("audio"), "{description}");
}

#[test]
fn probing_nonexistent_file_fails() {
    if !ffprobe_available() {
        return;
    }

    let mut source = FfprobeSource::new("this_file_does_not_exist.mp4");
    let result = source.read_samples();
    assert!(
        matches!(result, Err(BitrateError::ProbeFailed { .. })),
        "expected ProbeFailed, got {result:?}"
    );
}

#[test]
fn probing_fixture_yields_video_packets() {
    let path = sample_video_path();
    if !Path::new(path).exists() || !ffprobe_available() {
        return;
    }

    let mut source = FfprobeSource::new(path);
    let samples = source.read_samples().expect("probe fixture");

    assert!(!samples.is_empty(), "expected at least one packet");
    for sample in &samples {
        assert!(sample.size_bytes > 0, "packet size should be positive");
    }
}
