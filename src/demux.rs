//! In-process packet reading through FFmpeg.
//!
//! [`DemuxSource`] opens the media file with `ffmpeg-next`, picks the best
//! stream of the requested kind, and reads its packets without decoding.
//! Each packet's PTS is converted to seconds with the stream's time base.
//!
//! # Example
//!
//! ```no_run
//! use bitrate_viz::{DemuxSource, PacketSource, StreamKind};
//!
//! let mut source = DemuxSource::new("input.mp4").with_stream(StreamKind::Audio);
//! let samples = source.read_samples()?;
//! # Ok::<(), bitrate_viz::BitrateError>(())
//! ```

use std::path::{Path, PathBuf};

use ffmpeg_next::{Error as FfmpegError, Packet, Rational, media::Type};

use crate::configuration::StreamKind;
use crate::error::BitrateError;
use crate::sample::Sample;
use crate::source::PacketSource;

/// Reads packet samples by demuxing the file in-process.
#[derive(Debug, Clone)]
pub struct DemuxSource {
    path: PathBuf,
    stream: StreamKind,
}

impl DemuxSource {
    /// Read the video stream of `path`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            stream: StreamKind::default(),
        }
    }

    /// Select which stream to read packets from.
    pub fn with_stream(mut self, stream: StreamKind) -> Self {
        self.stream = stream;
        self
    }
}

impl PacketSource for DemuxSource {
    fn read_samples(&mut self) -> Result<Vec<Sample>, BitrateError> {
        log::debug!("Opening media file: {}", self.path.display());

        // Initialise ffmpeg (safe to call multiple times).
        ffmpeg_next::init().map_err(|error| BitrateError::FileOpen {
            path: self.path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let mut input_context =
            ffmpeg_next::format::input(&self.path).map_err(|error| BitrateError::FileOpen {
                path: self.path.clone(),
                reason: error.to_string(),
            })?;

        let (media_type, missing) = match self.stream {
            StreamKind::Video => (Type::Video, BitrateError::NoVideoStream),
            StreamKind::Audio => (Type::Audio, BitrateError::NoAudioStream),
        };
        let stream = input_context.streams().best(media_type).ok_or(missing)?;
        let stream_index = stream.index();
        let time_base: Rational = stream.time_base();

        let tb_num = time_base.numerator() as f64;
        let tb_den = time_base.denominator().max(1) as f64;

        let mut samples = Vec::new();
        let mut skipped = 0_usize;
        let mut packet = Packet::empty();
        loop {
            match packet.read(&mut input_context) {
                Ok(()) => {
                    if packet.stream() as usize != stream_index {
                        continue;
                    }
                    let Some(pts) = packet.pts() else {
                        skipped += 1;
                        continue;
                    };
                    let timestamp_sec = pts as f64 * tb_num / tb_den;
                    samples.push(Sample::new(timestamp_sec, packet.size() as u64));
                }
                Err(FfmpegError::Eof) => break,
                Err(e) => return Err(BitrateError::from(e)),
            }
        }

        log::debug!(
            "Read {} packet(s) from stream {} ({} without PTS skipped)",
            samples.len(),
            stream_index,
            skipped
        );

        Ok(samples)
    }

    fn describe(&self) -> String {
        format!("{} ({} stream via ffmpeg)", self.path.display(), self.stream)
    }
}
