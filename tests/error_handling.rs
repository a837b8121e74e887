//! Error handling integration tests.
//!
//! These tests verify that meaningful errors are returned for various
//! failure conditions.

use std::path::PathBuf;

use bitrate_viz::{BitrateError, Sample, aggregate};

#[test]
fn invalid_window_message() {
    let error = aggregate(&[], 0.0).unwrap_err();
    let error_message = error.to_string();
    assert!(
        error_message.contains("Invalid window"),
        "Error message should mention the window: {error_message}",
    );
}

#[test]
fn invalid_sample_message_names_position() {
    let error = aggregate(&[Sample::new(1.0, 1), Sample::new(-2.0, 1)], 1.0).unwrap_err();
    let error_message = error.to_string();
    assert!(
        error_message.contains("#1"),
        "Error message should name the sample index: {error_message}",
    );
    assert!(
        error_message.contains("negative"),
        "Error message should say what was wrong: {error_message}",
    );
}

#[test]
fn probe_failure_message_includes_stderr() {
    let error = BitrateError::ProbeFailed {
        path: PathBuf::from("broken.mp4"),
        status: "exit status: 1".to_string(),
        stderr: "broken.mp4: Invalid data found when processing input".to_string(),
    };
    let error_message = error.to_string();
    assert!(error_message.contains("broken.mp4"));
    assert!(error_message.contains("Invalid data found"));
}

#[test]
fn probe_tool_missing_message() {
    let error = BitrateError::ProbeToolMissing {
        tool: "ffprobe".to_string(),
    };
    assert!(error.to_string().contains("`ffprobe`"));
}

#[test]
fn io_errors_convert() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let error: BitrateError = io_error.into();
    assert!(matches!(error, BitrateError::IoError(_)));
    assert!(error.to_string().starts_with("I/O error"));
}

#[test]
fn json_errors_convert() {
    let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let error: BitrateError = json_error.into();
    assert!(matches!(error, BitrateError::JsonError(_)));
}
