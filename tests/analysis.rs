//! End-to-end analysis tests over in-memory and fake sources.

use bitrate_viz::{
    BitrateAnalysis, BitrateError, BitrateOptions, InMemorySource, PacketSource, Sample,
};

/// Counts reads so tests can assert the source was never touched.
struct CountingSource {
    reads: usize,
}

impl PacketSource for CountingSource {
    fn read_samples(&mut self) -> Result<Vec<Sample>, BitrateError> {
        self.reads += 1;
        Ok(vec![Sample::new(0.5, 10)])
    }

    fn describe(&self) -> String {
        "counting source".to_string()
    }
}

/// Always fails the way a broken probe would.
struct FailingSource;

impl PacketSource for FailingSource {
    fn read_samples(&mut self) -> Result<Vec<Sample>, BitrateError> {
        Err(BitrateError::MalformedProbeOutput("truncated output".to_string()))
    }

    fn describe(&self) -> String {
        "failing source".to_string()
    }
}

fn scenario_source() -> InMemorySource {
    InMemorySource::new(vec![
        Sample::new(0.2, 100),
        Sample::new(0.4, 150),
        Sample::new(1.1, 200),
    ])
}

#[test]
fn run_produces_series_and_statistics() {
    let mut source = scenario_source();
    let analysis = BitrateAnalysis::run(&mut source, &BitrateOptions::new()).expect("analysis");

    assert_eq!(analysis.sample_count, 3);
    assert_eq!(analysis.total_bytes, 450);
    assert_eq!(analysis.series.len(), 2);
    assert_eq!(analysis.statistics.point_count, 2);
    assert_eq!(analysis.statistics.max_kbps, 2.0);
    assert_eq!(analysis.target_bitrate_kbps, None);
}

#[test]
fn run_works_through_trait_objects() {
    let mut source: Box<dyn PacketSource> = Box::new(scenario_source());
    let analysis =
        BitrateAnalysis::run(source.as_mut(), &BitrateOptions::new()).expect("analysis");
    assert_eq!(analysis.series.len(), 2);
}

#[test]
fn invalid_window_rejected_before_reading_source() {
    let mut source = CountingSource { reads: 0 };
    let options = BitrateOptions::new().with_window(0.0);

    let result = BitrateAnalysis::run(&mut source, &options);

    assert!(matches!(result, Err(BitrateError::InvalidWindow(_))));
    assert_eq!(source.reads, 0, "source must not be read with a bad window");
}

#[test]
fn invalid_target_rejected_before_reading_source() {
    let mut source = CountingSource { reads: 0 };
    let options = BitrateOptions::new().with_target_bitrate(-5.0);

    let result = BitrateAnalysis::run(&mut source, &options);

    assert!(matches!(result, Err(BitrateError::InvalidTargetBitrate(_))));
    assert_eq!(source.reads, 0);
}

#[test]
fn source_errors_propagate_unchanged() {
    let result = BitrateAnalysis::run(&mut FailingSource, &BitrateOptions::new());
    match result {
        Err(BitrateError::MalformedProbeOutput(message)) => {
            assert_eq!(message, "truncated output");
        }
        other => panic!("expected MalformedProbeOutput, got {other:?}"),
    }
}

#[test]
fn invalid_sample_aborts_whole_analysis() {
    let samples = [Sample::new(0.1, 10), Sample::new(-0.2, 10)];
    let result = BitrateAnalysis::from_samples(&samples, &BitrateOptions::new());
    assert!(matches!(result, Err(BitrateError::InvalidSample { index: 1, .. })));
}

#[test]
fn empty_source_is_not_an_error() {
    let mut source = InMemorySource::new(Vec::new());
    let analysis = BitrateAnalysis::run(&mut source, &BitrateOptions::new()).expect("analysis");

    assert!(analysis.series.is_empty());
    assert!(!analysis.statistics.has_data());
    assert_eq!(analysis.sample_count, 0);
    assert_eq!(analysis.total_bytes, 0);
}

#[test]
fn target_does_not_affect_aggregation() {
    let samples = [Sample::new(0.2, 100), Sample::new(1.1, 200)];
    let plain = BitrateAnalysis::from_samples(&samples, &BitrateOptions::new()).expect("plain");
    let targeted = BitrateAnalysis::from_samples(
        &samples,
        &BitrateOptions::new().with_target_bitrate(1.0),
    )
    .expect("targeted");

    assert_eq!(plain.series, targeted.series);
    assert_eq!(plain.statistics, targeted.statistics);
    assert_eq!(targeted.target_bitrate_kbps, Some(1.0));
}

#[test]
fn exceeds_target_lists_points_above_it() {
    let mut source = scenario_source();
    let options = BitrateOptions::new().with_target_bitrate(1.8);
    let analysis = BitrateAnalysis::run(&mut source, &options).expect("analysis");

    let over = analysis.exceeds_target();
    assert_eq!(over.len(), 1);
    assert_eq!(over[0].time_sec, 0.5);

    let mut source = scenario_source();
    let analysis = BitrateAnalysis::run(&mut source, &BitrateOptions::new()).expect("analysis");
    assert!(analysis.exceeds_target().is_empty(), "no target, nothing exceeds it");
}

#[test]
fn custom_window_flows_through() {
    let mut source = scenario_source();
    let options = BitrateOptions::new().with_window(2.0);
    let analysis = BitrateAnalysis::run(&mut source, &options).expect("analysis");

    assert_eq!(analysis.series.window_sec(), 2.0);
    assert_eq!(analysis.series.len(), 1);
    // 450 bytes * 8 / 2 s / 1000
    assert_eq!(analysis.series.points()[0].rate_kbps, 1.8);
}
