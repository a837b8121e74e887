//! Packet sample sources.
//!
//! A [`PacketSource`] produces the complete, materialized list of samples
//! for one stream. Two implementations are always available:
//!
//! - [`FfprobeSource`] runs the `ffprobe` tool that ships with FFmpeg and
//!   parses its JSON packet listing.
//! - [`InMemorySource`] wraps samples that were obtained elsewhere.
//!
//! With the `ffmpeg` feature, [`DemuxSource`](crate::DemuxSource) reads
//! packets in-process through `ffmpeg-next` instead.
//!
//! # Example
//!
//! ```no_run
//! use bitrate_viz::{FfprobeSource, PacketSource, StreamKind};
//!
//! let mut source = FfprobeSource::new("input.mp4").with_stream(StreamKind::Video);
//! let samples = source.read_samples()?;
//! println!("{} packets", samples.len());
//! # Ok::<(), bitrate_viz::BitrateError>(())
//! ```

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    process::Command,
};

use serde_json::Value;

use crate::configuration::StreamKind;
use crate::error::BitrateError;
use crate::sample::Sample;

/// Anything that can produce the packet samples of one stream.
///
/// Sources are read once; failures are reported as-is and never retried.
pub trait PacketSource {
    /// Read every sample of the selected stream.
    fn read_samples(&mut self) -> Result<Vec<Sample>, BitrateError>;

    /// Short human-readable description, used in log and CLI messages.
    fn describe(&self) -> String;
}

/// A source over samples that are already in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    samples: Vec<Sample>,
}

impl InMemorySource {
    /// Wrap a list of samples.
    pub fn new(samples: Vec<Sample>) -> Self {
        Self { samples }
    }
}

impl PacketSource for InMemorySource {
    fn read_samples(&mut self) -> Result<Vec<Sample>, BitrateError> {
        Ok(self.samples.clone())
    }

    fn describe(&self) -> String {
        format!("{} in-memory sample(s)", self.samples.len())
    }
}

/// Reads packet samples by running `ffprobe`.
///
/// Equivalent to:
///
/// ```text
/// ffprobe -v error -select_streams v -show_entries packet=pts_time,size -of json <path>
/// ```
#[derive(Debug, Clone)]
pub struct FfprobeSource {
    path: PathBuf,
    program: String,
    stream: StreamKind,
}

impl FfprobeSource {
    /// Probe the video stream of `path` with the `ffprobe` found on `PATH`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            program: "ffprobe".to_string(),
            stream: StreamKind::default(),
        }
    }

    /// Use a specific `ffprobe` executable.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Select which stream to read packets from.
    pub fn with_stream(mut self, stream: StreamKind) -> Self {
        self.stream = stream;
        self
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(["-v", "error"])
            .args(["-select_streams", self.stream.ffprobe_specifier()])
            .args(["-show_entries", "packet=pts_time,size"])
            .args(["-of", "json"])
            .arg(&self.path);
        command
    }
}

impl PacketSource for FfprobeSource {
    fn read_samples(&mut self) -> Result<Vec<Sample>, BitrateError> {
        log::debug!(
            "Running {} on {} ({} stream)",
            self.program,
            self.path.display(),
            self.stream
        );

        let output = self.command().output().map_err(|error| {
            if error.kind() == ErrorKind::NotFound {
                BitrateError::ProbeToolMissing {
                    tool: self.program.clone(),
                }
            } else {
                BitrateError::IoError(error)
            }
        })?;

        if !output.status.success() {
            return Err(BitrateError::ProbeFailed {
                path: self.path.clone(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout).map_err(|error| {
            BitrateError::MalformedProbeOutput(format!("output is not UTF-8: {error}"))
        })?;
        parse_ffprobe_json(&stdout)
    }

    fn describe(&self) -> String {
        format!("{} ({} stream via {})", self.path.display(), self.stream, self.program)
    }
}

/// Parse the JSON document printed by
/// `ffprobe -show_entries packet=pts_time,size -of json`.
///
/// `ffprobe` prints both fields as strings; plain JSON numbers are accepted
/// too. Packets without a presentation time (field absent or `"N/A"`) are
/// skipped. A document without a `packets` key yields no samples.
///
/// # Errors
///
/// - [`BitrateError::MalformedProbeOutput`] if the text is not JSON, if
///   `packets` is not an array, or if a field cannot be parsed.
/// - [`BitrateError::InvalidSample`] if a packet reports a negative size.
pub fn parse_ffprobe_json(text: &str) -> Result<Vec<Sample>, BitrateError> {
    let document: Value = serde_json::from_str(text)
        .map_err(|error| BitrateError::MalformedProbeOutput(format!("invalid JSON: {error}")))?;

    let packets = match document.get("packets") {
        None => return Ok(Vec::new()),
        Some(Value::Array(packets)) => packets,
        Some(_) => {
            return Err(BitrateError::MalformedProbeOutput(
                "`packets` is not an array".to_string(),
            ));
        }
    };

    let mut samples = Vec::with_capacity(packets.len());
    let mut skipped = 0_usize;

    for (index, packet) in packets.iter().enumerate() {
        let Some(timestamp_sec) = parse_pts_time(index, packet.get("pts_time"))? else {
            skipped += 1;
            continue;
        };
        let size_bytes = parse_size(index, timestamp_sec, packet.get("size"))?;
        samples.push(Sample::new(timestamp_sec, size_bytes));
    }

    if skipped > 0 {
        log::debug!("Skipped {skipped} packet(s) without a presentation timestamp");
    }

    Ok(samples)
}

fn parse_pts_time(index: usize, value: Option<&Value>) -> Result<Option<f64>, BitrateError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) if text == "N/A" => Ok(None),
        Some(Value::String(text)) => text.trim().parse::<f64>().map(Some).map_err(|_| {
            BitrateError::MalformedProbeOutput(format!(
                "packet #{index}: pts_time {text:?} is not a number"
            ))
        }),
        Some(Value::Number(number)) => number.as_f64().map(Some).ok_or_else(|| {
            BitrateError::MalformedProbeOutput(format!(
                "packet #{index}: pts_time {number} is out of range"
            ))
        }),
        Some(other) => Err(BitrateError::MalformedProbeOutput(format!(
            "packet #{index}: unexpected pts_time {other}"
        ))),
    }
}

fn parse_size(index: usize, timestamp_sec: f64, value: Option<&Value>) -> Result<u64, BitrateError> {
    let size: i64 = match value {
        None => {
            return Err(BitrateError::MalformedProbeOutput(format!(
                "packet #{index}: missing size"
            )));
        }
        Some(Value::String(text)) => text.trim().parse::<i64>().map_err(|_| {
            BitrateError::MalformedProbeOutput(format!(
                "packet #{index}: size {text:?} is not an integer"
            ))
        })?,
        Some(Value::Number(number)) => number.as_i64().ok_or_else(|| {
            BitrateError::MalformedProbeOutput(format!(
                "packet #{index}: size {number} is not an integer"
            ))
        })?,
        Some(other) => {
            return Err(BitrateError::MalformedProbeOutput(format!(
                "packet #{index}: unexpected size {other}"
            )));
        }
    };

    u64::try_from(size).map_err(|_| BitrateError::InvalidSample {
        index,
        timestamp_sec,
        reason: format!("size {size} is negative"),
    })
}
