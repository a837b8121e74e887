//! Parallel bucket accumulation.
//!
//! This module provides [`aggregate_parallel`] which splits the sample set
//! into contiguous chunks, accumulates each chunk on a rayon worker, and
//! merges the per-chunk bucket maps before the ordered emission pass.
//! Bucket sums are associative and commutative, so the result is identical
//! to [`aggregate`](crate::aggregate).

use ::rayon::prelude::*;

use crate::aggregate::{BitrateSeries, BucketAccumulator, validate_window};
use crate::error::BitrateError;
use crate::sample::Sample;

/// Smallest chunk handed to a worker. Below this the merge costs more
/// than the accumulation it saves.
const MIN_CHUNK_LEN: usize = 16_384;

/// Aggregate samples across rayon threads.
///
/// Error behavior matches [`aggregate`](crate::aggregate): the window is
/// rejected before any work is scheduled, and when several samples are
/// invalid the one with the lowest position is reported.
///
/// # Errors
///
/// - [`BitrateError::InvalidWindow`] if `window_sec` is not a positive,
///   finite number.
/// - [`BitrateError::InvalidSample`] for the first invalid sample.
pub fn aggregate_parallel(
    samples: &[Sample],
    window_sec: f64,
) -> Result<BitrateSeries, BitrateError> {
    validate_window(window_sec)?;

    let chunk_len = (samples.len() / ::rayon::current_num_threads().max(1)).max(MIN_CHUNK_LEN);
    log::debug!(
        "Aggregating {} samples in parallel (chunk_len={})",
        samples.len(),
        chunk_len
    );

    // `collect` on an indexed parallel iterator keeps chunk order, so the
    // first error found below belongs to the earliest chunk.
    let partials: Vec<Result<BucketAccumulator, BitrateError>> = samples
        .par_chunks(chunk_len)
        .enumerate()
        .map(|(chunk_number, chunk)| -> Result<BucketAccumulator, BitrateError> {
            let offset = chunk_number * chunk_len;
            let mut accumulator = BucketAccumulator::new(window_sec)?;
            for (position, sample) in chunk.iter().enumerate() {
                accumulator.add(offset + position, sample)?;
            }
            Ok(accumulator)
        })
        .collect();

    let mut merged = BucketAccumulator::new(window_sec)?;
    for partial in partials {
        merged.merge(partial?);
    }

    Ok(merged.into_series())
}
