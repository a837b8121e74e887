//! # bitrate-viz
//!
//! Measure and visualize the time-varying bitrate of a media stream.
//!
//! `bitrate-viz` reads the presentation timestamp and size of every packet
//! in one stream, sums packet sizes into fixed-duration buckets, and turns
//! each bucket into a kilobits-per-second rate. The resulting series can be
//! summarized, exported to CSV/JSON, or rendered as a static SVG chart or an
//! interactive HTML page.
//!
//! ## Quick Start
//!
//! ### Analyze a File
//!
//! ```no_run
//! use bitrate_viz::{BitrateAnalysis, BitrateOptions, FfprobeSource};
//!
//! let options = BitrateOptions::new().with_window(1.0);
//! let mut source = FfprobeSource::new("input.mp4");
//! let analysis = BitrateAnalysis::run(&mut source, &options).unwrap();
//! print!("{}", analysis.statistics);
//! ```
//!
//! ### Aggregate Samples Directly
//!
//! ```
//! use bitrate_viz::{BitrateStatistics, Sample, aggregate};
//!
//! let samples = [Sample::new(0.2, 100), Sample::new(0.4, 150), Sample::new(1.1, 200)];
//! let series = aggregate(&samples, 1.0).unwrap();
//! let stats = BitrateStatistics::from_series(&series);
//! assert_eq!(stats.max_kbps, 2.0);
//! ```
//!
//! ### Export and Chart
//!
//! ```no_run
//! use bitrate_viz::{ChartOptions, Sample, aggregate, chart, export};
//!
//! let series = aggregate(&[Sample::new(0.0, 125_000)], 1.0).unwrap();
//! export::save_csv(&series, "bitrate.csv").unwrap();
//! chart::save_svg(&series, &ChartOptions::new("input.mp4"), "bitrate.svg").unwrap();
//! ```
//!
//! ### Optional Features
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `ffmpeg` | `DemuxSource` reads packets in-process via `ffmpeg-next` instead of running `ffprobe` |
//! | `rayon` | `aggregate_parallel()` spreads bucket accumulation across rayon threads |
//! | `full` | Enables all of the above |

pub mod aggregate;
pub mod analysis;
pub mod chart;
pub mod configuration;
#[cfg(feature = "ffmpeg")]
pub mod demux;
pub mod error;
pub mod export;
pub mod html;
#[cfg(feature = "rayon")]
mod rayon;
pub mod sample;
pub mod source;
pub mod statistics;

pub use aggregate::{BitrateSeries, BucketAccumulator, RatePoint, aggregate};
pub use analysis::BitrateAnalysis;
pub use configuration::{BitrateOptions, ChartOptions, DEFAULT_WINDOW_SEC, StreamKind};
#[cfg(feature = "ffmpeg")]
pub use demux::DemuxSource;
pub use error::BitrateError;
#[cfg(feature = "rayon")]
pub use rayon::aggregate_parallel;
pub use sample::Sample;
pub use source::{FfprobeSource, InMemorySource, PacketSource, parse_ffprobe_json};
pub use statistics::BitrateStatistics;
