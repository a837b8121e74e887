//! One-call bitrate analysis.
//!
//! [`BitrateAnalysis`] ties a [`PacketSource`] to the aggregator: it checks
//! the options, reads the samples, buckets them and computes statistics.
//!
//! # Example
//!
//! ```no_run
//! use bitrate_viz::{BitrateAnalysis, BitrateOptions, FfprobeSource};
//!
//! let options = BitrateOptions::new().with_window(2.0);
//! let mut source = FfprobeSource::new("input.mp4").with_stream(options.stream);
//! let analysis = BitrateAnalysis::run(&mut source, &options)?;
//! print!("{}", analysis.statistics);
//! # Ok::<(), bitrate_viz::BitrateError>(())
//! ```

use crate::aggregate::{BitrateSeries, RatePoint};
use crate::configuration::BitrateOptions;
use crate::error::BitrateError;
use crate::sample::Sample;
use crate::source::PacketSource;
use crate::statistics::BitrateStatistics;

/// The result of analyzing one stream.
#[derive(Debug, Clone, PartialEq)]
pub struct BitrateAnalysis {
    /// Per-bucket bitrate, in time order.
    pub series: BitrateSeries,
    /// Min/max/mean over the series.
    pub statistics: BitrateStatistics,
    /// Number of packet samples that were aggregated.
    pub sample_count: usize,
    /// Sum of all packet sizes in bytes.
    pub total_bytes: u64,
    /// Target bitrate carried over from the options, for display.
    pub target_bitrate_kbps: Option<f64>,
}

impl BitrateAnalysis {
    /// Read `source` and analyze it.
    ///
    /// Options are validated before the source is touched, so a bad
    /// window never costs a probe run.
    ///
    /// # Errors
    ///
    /// Configuration errors from [`BitrateOptions::validate`], any error
    /// from the source, and [`BitrateError::InvalidSample`] from
    /// aggregation.
    pub fn run<S>(source: &mut S, options: &BitrateOptions) -> Result<Self, BitrateError>
    where
        S: PacketSource + ?Sized,
    {
        options.validate()?;
        log::debug!("Reading samples from {}", source.describe());
        let samples = source.read_samples()?;
        Self::from_samples(&samples, options)
    }

    /// Analyze samples that are already in memory.
    pub fn from_samples(samples: &[Sample], options: &BitrateOptions) -> Result<Self, BitrateError> {
        options.validate()?;

        #[cfg(feature = "rayon")]
        let series = crate::rayon::aggregate_parallel(samples, options.window_sec)?;
        #[cfg(not(feature = "rayon"))]
        let series = crate::aggregate::aggregate(samples, options.window_sec)?;

        let statistics = BitrateStatistics::from_series(&series);
        let total_bytes = series.total_bytes();

        Ok(Self {
            series,
            statistics,
            sample_count: samples.len(),
            total_bytes,
            target_bitrate_kbps: options.target_bitrate_kbps,
        })
    }

    /// Points whose rate is strictly above the target. Empty when no
    /// target is set.
    pub fn exceeds_target(&self) -> Vec<RatePoint> {
        match self.target_bitrate_kbps {
            Some(target) => self
                .series
                .points()
                .iter()
                .filter(|point| point.rate_kbps > target)
                .copied()
                .collect(),
            None => Vec::new(),
        }
    }
}
