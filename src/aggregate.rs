//! Packet-to-bitrate aggregation.
//!
//! Samples are assigned to fixed-duration buckets by
//! `floor(timestamp / window)`, their sizes are summed per bucket, and each
//! non-empty bucket becomes one [`RatePoint`] placed at the bucket midpoint.
//! Buckets that received no packets produce no point; gaps are never
//! zero-filled.
//!
//! # Example
//!
//! ```
//! use bitrate_viz::{Sample, aggregate};
//!
//! let samples = [
//!     Sample::new(0.2, 100),
//!     Sample::new(0.4, 150),
//!     Sample::new(1.1, 200),
//! ];
//! let series = aggregate(&samples, 1.0)?;
//! assert_eq!(series.len(), 2);
//! assert_eq!(series.points()[0].rate_kbps, 2.0);
//! # Ok::<(), bitrate_viz::BitrateError>(())
//! ```

use std::collections::BTreeMap;

use crate::error::BitrateError;
use crate::sample::Sample;

const BITS_PER_BYTE: f64 = 8.0;
const BITS_PER_KILOBIT: f64 = 1000.0;

/// Bitrate of a single bucket, located at the bucket's midpoint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatePoint {
    /// `floor(timestamp / window)` shared by every sample in the bucket.
    pub bucket_index: u64,
    /// Bucket midpoint in seconds: `(bucket_index + 0.5) * window`.
    pub time_sec: f64,
    /// Sum of the sizes of all samples in the bucket.
    pub total_bytes: u64,
    /// Bitrate in kilobits per second.
    pub rate_kbps: f64,
}

/// Time-ordered bitrate series, one point per non-empty bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct BitrateSeries {
    window_sec: f64,
    points: Vec<RatePoint>,
}

impl BitrateSeries {
    /// The bucket duration this series was built with.
    pub fn window_sec(&self) -> f64 {
        self.window_sec
    }

    /// Points in ascending time order.
    pub fn points(&self) -> &[RatePoint] {
        &self.points
    }

    /// Number of non-empty buckets.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// `true` when no sample was aggregated.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bucket midpoints, in order.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|point| point.time_sec)
    }

    /// Rates in kbps, in order.
    pub fn rates(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|point| point.rate_kbps)
    }

    /// Total bytes across every bucket.
    pub fn total_bytes(&self) -> u64 {
        self.points
            .iter()
            .fold(0_u64, |total, point| total.saturating_add(point.total_bytes))
    }
}

impl<'a> IntoIterator for &'a BitrateSeries {
    type Item = &'a RatePoint;
    type IntoIter = std::slice::Iter<'a, RatePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Sparse per-bucket byte totals.
///
/// Backed by an ordered map so emission is naturally in ascending bucket
/// order and gaps in packet timing cost nothing. Accumulators built over
/// disjoint parts of the input can be [merged](BucketAccumulator::merge)
/// in any order.
#[derive(Debug, Clone)]
pub struct BucketAccumulator {
    window_sec: f64,
    totals: BTreeMap<u64, u64>,
}

impl BucketAccumulator {
    /// Create an empty accumulator.
    ///
    /// # Errors
    ///
    /// Returns [`BitrateError::InvalidWindow`] if `window_sec` is not a
    /// finite number greater than zero.
    pub fn new(window_sec: f64) -> Result<Self, BitrateError> {
        validate_window(window_sec)?;
        Ok(Self {
            window_sec,
            totals: BTreeMap::new(),
        })
    }

    /// Bucket index for a timestamp. The timestamp must already be valid.
    ///
    /// Returns `None` when the index does not fit in a `u64`, which happens
    /// for huge timestamps or tiny windows.
    pub fn bucket_index(&self, timestamp_sec: f64) -> Option<u64> {
        let quotient = (timestamp_sec / self.window_sec).floor();
        // 2^64 is exactly representable, so anything below it converts losslessly.
        (quotient.is_finite() && quotient < u64::MAX as f64).then(|| quotient as u64)
    }

    /// Validate and add one sample. `index` is the sample's position in
    /// the overall input and only appears in errors.
    pub fn add(&mut self, index: usize, sample: &Sample) -> Result<(), BitrateError> {
        sample.validate(index)?;
        let bucket = self.bucket_index(sample.timestamp_sec).ok_or_else(|| {
            BitrateError::InvalidSample {
                index,
                timestamp_sec: sample.timestamp_sec,
                reason: "timestamp too large for window".to_string(),
            }
        })?;
        let total = self.totals.entry(bucket).or_insert(0);
        *total = total.saturating_add(sample.size_bytes);
        Ok(())
    }

    /// Fold another accumulator's totals into this one.
    ///
    /// Both accumulators must use the same window.
    pub fn merge(&mut self, other: BucketAccumulator) {
        debug_assert_eq!(self.window_sec, other.window_sec);
        for (bucket, bytes) in other.totals {
            let total = self.totals.entry(bucket).or_insert(0);
            *total = total.saturating_add(bytes);
        }
    }

    /// Number of non-empty buckets seen so far.
    pub fn bucket_count(&self) -> usize {
        self.totals.len()
    }

    /// Convert the totals into an ordered series.
    pub fn into_series(self) -> BitrateSeries {
        let window_sec = self.window_sec;
        let points = self
            .totals
            .into_iter()
            .map(|(bucket_index, total_bytes)| RatePoint {
                bucket_index,
                time_sec: (bucket_index as f64 + 0.5) * window_sec,
                total_bytes,
                rate_kbps: total_bytes as f64 * BITS_PER_BYTE / window_sec / BITS_PER_KILOBIT,
            })
            .collect();

        BitrateSeries { window_sec, points }
    }
}

/// Aggregate samples into a bitrate series.
///
/// The window is checked before any sample is looked at. Samples may come
/// in any order; the result only depends on which bucket each sample falls
/// in. The first invalid sample aborts the whole pass.
///
/// # Errors
///
/// - [`BitrateError::InvalidWindow`] if `window_sec` is not a positive,
///   finite number.
/// - [`BitrateError::InvalidSample`] for the first sample with a negative
///   or non-finite timestamp, or one whose bucket index does not fit in
///   a `u64`.
pub fn aggregate<'a, I>(samples: I, window_sec: f64) -> Result<BitrateSeries, BitrateError>
where
    I: IntoIterator<Item = &'a Sample>,
{
    let mut accumulator = BucketAccumulator::new(window_sec)?;
    for (index, sample) in samples.into_iter().enumerate() {
        accumulator.add(index, sample)?;
    }

    log::debug!(
        "Aggregated samples into {} bucket(s) of {}s",
        accumulator.bucket_count(),
        window_sec
    );

    Ok(accumulator.into_series())
}

pub(crate) fn validate_window(window_sec: f64) -> Result<(), BitrateError> {
    if window_sec.is_finite() && window_sec > 0.0 {
        Ok(())
    } else {
        Err(BitrateError::InvalidWindow(window_sec))
    }
}
