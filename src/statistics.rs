//! Summary statistics over a bitrate series.

use std::fmt::{Display, Formatter, Result as FmtResult};

use crate::aggregate::BitrateSeries;

/// Minimum, maximum and mean bitrate of a series.
///
/// An empty series yields all zeros. Use [`has_data`](Self::has_data) to
/// tell that apart from a series whose rates are genuinely zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BitrateStatistics {
    /// Lowest bucket rate in kbps.
    pub min_kbps: f64,
    /// Highest bucket rate in kbps.
    pub max_kbps: f64,
    /// Arithmetic mean of the bucket rates in kbps.
    pub avg_kbps: f64,
    /// Number of points the statistics were computed from.
    pub point_count: usize,
}

impl BitrateStatistics {
    /// Compute statistics for `series`.
    pub fn from_series(series: &BitrateSeries) -> Self {
        Self::from_rates(series.rates())
    }

    /// Compute statistics for an arbitrary sequence of rates.
    pub fn from_rates<I>(rates: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut min_kbps = f64::INFINITY;
        let mut max_kbps = f64::NEG_INFINITY;
        let mut sum = 0.0_f64;
        let mut point_count = 0_usize;

        for rate in rates {
            min_kbps = min_kbps.min(rate);
            max_kbps = max_kbps.max(rate);
            sum += rate;
            point_count += 1;
        }

        if point_count == 0 {
            return Self::default();
        }

        // Keep the mean inside [min, max] when summation rounding pushes it
        // just past either end.
        let mean = sum / point_count as f64;
        let avg_kbps = if min_kbps <= max_kbps {
            mean.clamp(min_kbps, max_kbps)
        } else {
            mean
        };

        Self {
            min_kbps,
            max_kbps,
            avg_kbps,
            point_count,
        }
    }

    /// Returns `true` if at least one point contributed.
    pub fn has_data(&self) -> bool {
        self.point_count > 0
    }
}

impl Display for BitrateStatistics {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        writeln!(f, "min={} kbps", self.min_kbps.round() as i64)?;
        writeln!(f, "max={} kbps", self.max_kbps.round() as i64)?;
        writeln!(f, "avg={} kbps", self.avg_kbps.round() as i64)
    }
}
