//! Analysis configuration.
//!
//! [`BitrateOptions`] is a builder carrying the settings that shape an
//! analysis: the bucket window, an optional target bitrate for display, and
//! which stream to measure. [`ChartOptions`] carries presentation settings
//! for the chart renderers.
//!
//! # Example
//!
//! ```
//! use bitrate_viz::{BitrateOptions, StreamKind};
//!
//! let options = BitrateOptions::new()
//!     .with_window(0.5)
//!     .with_target_bitrate(4_000.0)
//!     .with_stream(StreamKind::Video);
//! options.validate()?;
//! # Ok::<(), bitrate_viz::BitrateError>(())
//! ```

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::aggregate::validate_window;
use crate::error::BitrateError;

/// Default bucket duration in seconds.
pub const DEFAULT_WINDOW_SEC: f64 = 1.0;

/// Which logical stream of a media file to measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StreamKind {
    /// The video stream.
    #[default]
    Video,
    /// The audio stream.
    Audio,
}

impl StreamKind {
    /// Stream specifier understood by `ffprobe -select_streams`.
    pub fn ffprobe_specifier(&self) -> &'static str {
        match self {
            StreamKind::Video => "v",
            StreamKind::Audio => "a",
        }
    }
}

impl Display for StreamKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StreamKind::Video => write!(f, "video"),
            StreamKind::Audio => write!(f, "audio"),
        }
    }
}

/// Settings for a bitrate analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct BitrateOptions {
    /// Bucket duration in seconds. Default: 1.0.
    pub window_sec: f64,
    /// Reference bitrate in kbps. Only drawn on charts, never used in the
    /// aggregation itself.
    pub target_bitrate_kbps: Option<f64>,
    /// Stream to measure. Default: video.
    pub stream: StreamKind,
}

impl Default for BitrateOptions {
    fn default() -> Self {
        Self {
            window_sec: DEFAULT_WINDOW_SEC,
            target_bitrate_kbps: None,
            stream: StreamKind::default(),
        }
    }
}

impl BitrateOptions {
    /// Create a new [`BitrateOptions`] with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bucket duration in seconds.
    pub fn with_window(mut self, window_sec: f64) -> Self {
        self.window_sec = window_sec;
        self
    }

    /// Set a target bitrate to mark on charts.
    pub fn with_target_bitrate(mut self, target_kbps: f64) -> Self {
        self.target_bitrate_kbps = Some(target_kbps);
        self
    }

    /// Select which stream to measure.
    pub fn with_stream(mut self, stream: StreamKind) -> Self {
        self.stream = stream;
        self
    }

    /// Check the settings.
    ///
    /// # Errors
    ///
    /// - [`BitrateError::InvalidWindow`] if the window is not a positive,
    ///   finite number.
    /// - [`BitrateError::InvalidTargetBitrate`] if a target is set and is
    ///   negative or not finite.
    pub fn validate(&self) -> Result<(), BitrateError> {
        validate_window(self.window_sec)?;
        if let Some(target) = self.target_bitrate_kbps {
            if !target.is_finite() || target < 0.0 {
                return Err(BitrateError::InvalidTargetBitrate(target));
            }
        }
        Ok(())
    }
}

/// Presentation settings for static and interactive charts.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    /// Name shown in the chart title, usually the media file name.
    pub name: String,
    /// Horizontal reference line in kbps.
    pub target_bitrate_kbps: Option<f64>,
    /// Width in pixels. Default: 1000.
    pub width: u32,
    /// Height in pixels. Default: 500.
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            target_bitrate_kbps: None,
            width: 1000,
            height: 500,
        }
    }
}

impl ChartOptions {
    /// Create chart options titled after `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Draw a horizontal marker at `target_kbps`.
    pub fn with_target_bitrate(mut self, target_kbps: Option<f64>) -> Self {
        self.target_bitrate_kbps = target_kbps;
        self
    }

    /// Set the output size in pixels. Zero dimensions are clamped to 1.
    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width.max(1);
        self.height = height.max(1);
        self
    }

    /// Chart title.
    pub fn title(&self) -> String {
        if self.name.is_empty() {
            "Variable Bitrate".to_string()
        } else {
            format!("Variable Bitrate – {}", self.name)
        }
    }
}
