//! Error types for the `bitrate-viz` crate.
//!
//! This module defines [`BitrateError`], the unified error type returned by
//! all fallible operations in the crate. Errors fall into three groups:
//! configuration errors (rejected before any work starts), upstream data
//! errors (the sample source failed or produced an invalid sample), and
//! output errors (writing exports or charts).

use std::{io::Error as IoError, path::PathBuf};

use serde_json::Error as JsonError;
use thiserror::Error;

/// The unified error type for all `bitrate-viz` operations.
///
/// Every public method that can fail returns `Result<T, BitrateError>`.
/// Variants carry enough context to diagnose the problem without needing
/// additional logging at the call site.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BitrateError {
    /// The bucket window is zero, negative, or not a finite number.
    #[error("Invalid window: {0} (window must be a positive number of seconds)")]
    InvalidWindow(f64),

    /// The target bitrate is negative or not a finite number.
    #[error("Invalid target bitrate: {0} kbps")]
    InvalidTargetBitrate(f64),

    /// A sample failed validation. Aggregation stops at the first one.
    #[error("Invalid sample #{index} (timestamp {timestamp_sec}): {reason}")]
    InvalidSample {
        /// Position of the sample in the input sequence.
        index: usize,
        /// The offending timestamp in seconds.
        timestamp_sec: f64,
        /// What was wrong with it.
        reason: String,
    },

    /// The external probing tool could not be started.
    #[error("Probe tool `{tool}` could not be started (is it installed and on PATH?)")]
    ProbeToolMissing {
        /// Executable that was invoked.
        tool: String,
    },

    /// The external probing tool ran but exited unsuccessfully.
    #[error("Probing {path} failed ({status}): {stderr}")]
    ProbeFailed {
        /// Media file that was probed.
        path: PathBuf,
        /// Exit status as reported by the OS.
        status: String,
        /// Captured standard error of the tool.
        stderr: String,
    },

    /// The probing tool produced output that could not be interpreted.
    #[error("Malformed probe output: {0}")]
    MalformedProbeOutput(String),

    /// The media file could not be opened.
    #[error("Failed to open media file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to the source.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file does not contain a video stream.
    #[error("No video stream found in file")]
    NoVideoStream,

    /// The file does not contain an audio stream.
    #[error("No audio stream found in file")]
    NoAudioStream,

    /// An error originating from the FFmpeg libraries.
    #[cfg(feature = "ffmpeg")]
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// JSON serialization of an export failed.
    #[error("JSON error: {0}")]
    JsonError(#[from] JsonError),

    /// Chart rendering failed.
    #[error("Chart rendering error: {0}")]
    ChartError(String),
}

#[cfg(feature = "ffmpeg")]
impl From<ffmpeg_next::Error> for BitrateError {
    fn from(error: ffmpeg_next::Error) -> Self {
        BitrateError::FfmpegError(error.to_string())
    }
}
