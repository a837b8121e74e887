//! Packet samples.
//!
//! A [`Sample`] is the only thing the aggregator knows about a packet: when
//! it is presented and how many bytes it occupies.

use crate::error::BitrateError;

/// Presentation time and encoded size of one packet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Presentation timestamp in seconds.
    pub timestamp_sec: f64,
    /// Encoded packet size in bytes.
    pub size_bytes: u64,
}

impl Sample {
    /// Create a new sample. No validation happens here; see
    /// [`Sample::validate`].
    pub fn new(timestamp_sec: f64, size_bytes: u64) -> Self {
        Self {
            timestamp_sec,
            size_bytes,
        }
    }

    /// Check that the timestamp is finite and non-negative.
    ///
    /// `index` is the sample's position in its sequence and is only used
    /// for the error message.
    ///
    /// # Errors
    ///
    /// Returns [`BitrateError::InvalidSample`] for negative, NaN, or
    /// infinite timestamps. A negative timestamp would otherwise land in a
    /// negative bucket or be folded into bucket zero.
    pub fn validate(&self, index: usize) -> Result<(), BitrateError> {
        if !self.timestamp_sec.is_finite() {
            return Err(BitrateError::InvalidSample {
                index,
                timestamp_sec: self.timestamp_sec,
                reason: "timestamp is not a finite number".to_string(),
            });
        }
        if self.timestamp_sec < 0.0 {
            return Err(BitrateError::InvalidSample {
                index,
                timestamp_sec: self.timestamp_sec,
                reason: "timestamp is negative".to_string(),
            });
        }
        Ok(())
    }
}

impl From<(f64, u64)> for Sample {
    fn from((timestamp_sec, size_bytes): (f64, u64)) -> Self {
        Self::new(timestamp_sec, size_bytes)
    }
}
