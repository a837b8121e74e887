//! Parallel aggregation tests.
//!
//! Requires the `rayon` feature.

#![cfg(feature = "rayon")]

use bitrate_viz::{BitrateError, Sample, aggregate, aggregate_parallel};

/// Roughly 30 fps of video with a keyframe every 60 packets, long enough
/// to be split across several chunks.
fn synthetic_stream(packets: u64) -> Vec<Sample> {
    (0..packets)
        .map(|i| {
            let size = if i % 60 == 0 { 90_000 } else { 4_000 + (i * 131) % 3_000 };
            Sample::new(i as f64 / 30.0, size)
        })
        .collect()
}

#[test]
fn parallel_matches_sequential() {
    let samples = synthetic_stream(100_000);
    for window in [0.5, 1.0, 3.7] {
        let sequential = aggregate(&samples, window).expect("sequential");
        let parallel = aggregate_parallel(&samples, window).expect("parallel");
        assert_eq!(parallel, sequential, "mismatch for window {window}");
    }
}

#[test]
fn parallel_empty_input() {
    let series = aggregate_parallel(&[], 1.0).expect("parallel");
    assert!(series.is_empty());
}

#[test]
fn parallel_rejects_window_first() {
    let samples = vec![Sample::new(-1.0, 1)];
    let result = aggregate_parallel(&samples, 0.0);
    assert!(matches!(result, Err(BitrateError::InvalidWindow(_))));
}

#[test]
fn parallel_reports_lowest_invalid_index() {
    let mut samples = synthetic_stream(100_000);
    samples[70_000].timestamp_sec = -1.0;
    samples[20_000].timestamp_sec = f64::NAN;
    samples[90_000].timestamp_sec = -2.0;

    let result = aggregate_parallel(&samples, 1.0);
    assert!(
        matches!(result, Err(BitrateError::InvalidSample { index: 20_000, .. })),
        "got {result:?}"
    );
}

#[test]
fn parallel_rejects_unrepresentable_bucket_index() {
    let mut samples = synthetic_stream(50_000);
    samples[40_000].timestamp_sec = 1e21;

    let result = aggregate_parallel(&samples, 1.0);
    assert!(
        matches!(result, Err(BitrateError::InvalidSample { index: 40_000, .. })),
        "got {result:?}"
    );
}
