//! Tabular, structured and plain-text exports.
//!
//! | Format | Shape |
//! |--------|-------|
//! | CSV | header `time_sec,bitrate_kbps`, one row per point |
//! | JSON | `[{"time_sec": .., "bitrate_kbps": ..}, ..]` |
//! | Statistics | `min=<int> kbps`, `max=<int> kbps`, `avg=<int> kbps` |
//!
//! Every format has a `write_*` function targeting any [`Write`] and a
//! `save_*` wrapper that creates the file.

use std::{
    fs::File,
    io::{BufWriter, Write},
    path::Path,
};

use serde_json::{Value, json};

use crate::aggregate::BitrateSeries;
use crate::error::BitrateError;
use crate::statistics::BitrateStatistics;

/// CSV header line.
pub const CSV_HEADER: &str = "time_sec,bitrate_kbps";

/// Write the series as CSV.
pub fn write_csv<W: Write>(series: &BitrateSeries, mut writer: W) -> Result<(), BitrateError> {
    writeln!(writer, "{CSV_HEADER}")?;
    for point in series {
        // `{:?}` keeps the fractional part on whole numbers (`2.0`, not `2`).
        writeln!(writer, "{:?},{:?}", point.time_sec, point.rate_kbps)?;
    }
    writer.flush()?;
    Ok(())
}

/// Write the series as CSV to `path`.
pub fn save_csv<P: AsRef<Path>>(series: &BitrateSeries, path: P) -> Result<(), BitrateError> {
    log::debug!("Writing CSV to {}", path.as_ref().display());
    write_csv(series, BufWriter::new(File::create(path)?))
}

/// The series as a JSON array of `{time_sec, bitrate_kbps}` objects.
pub fn series_to_json(series: &BitrateSeries) -> Value {
    Value::Array(
        series
            .points()
            .iter()
            .map(|point| {
                json!({
                    "time_sec": point.time_sec,
                    "bitrate_kbps": point.rate_kbps,
                })
            })
            .collect(),
    )
}

/// Write the series as pretty-printed JSON.
pub fn write_json<W: Write>(series: &BitrateSeries, mut writer: W) -> Result<(), BitrateError> {
    serde_json::to_writer_pretty(&mut writer, &series_to_json(series))?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write the series as pretty-printed JSON to `path`.
pub fn save_json<P: AsRef<Path>>(series: &BitrateSeries, path: P) -> Result<(), BitrateError> {
    log::debug!("Writing JSON to {}", path.as_ref().display());
    write_json(series, BufWriter::new(File::create(path)?))
}

/// Write the statistics, one rounded value per line.
///
/// Rounding only affects the text; the struct keeps full precision.
pub fn write_statistics<W: Write>(
    statistics: &BitrateStatistics,
    mut writer: W,
) -> Result<(), BitrateError> {
    write!(writer, "{statistics}")?;
    writer.flush()?;
    Ok(())
}

/// Write the statistics text to `path`.
pub fn save_statistics<P: AsRef<Path>>(
    statistics: &BitrateStatistics,
    path: P,
) -> Result<(), BitrateError> {
    log::debug!("Writing statistics to {}", path.as_ref().display());
    write_statistics(statistics, BufWriter::new(File::create(path)?))
}
