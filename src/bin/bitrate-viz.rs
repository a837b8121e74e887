use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use bitrate_viz::{
    BitrateAnalysis, BitrateOptions, ChartOptions, DEFAULT_WINDOW_SEC, FfprobeSource,
    PacketSource, StreamKind, chart, export, html,
};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;

#[cfg(feature = "ffmpeg")]
use bitrate_viz::DemuxSource;

const CLI_AFTER_HELP: &str = "Examples:\n  bitrate-viz analyze input.mp4\n  bitrate-viz analyze input.mp4 0.5 --chart bitrate.svg\n  bitrate-viz analyze input.mkv --window 2 --target 6000 --html report.html\n  bitrate-viz analyze input.mp4 --stream audio --csv audio.csv --stats audio.txt\n  bitrate-viz completions zsh > _bitrate-viz";

#[derive(Debug, Parser)]
#[command(
    name = "bitrate-viz",
    version,
    about = "Measure and chart the bitrate of a media stream over time",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// Show a spinner while packets are being read.
    #[arg(long)]
    progress: bool,

    /// Allow overwriting existing output files.
    #[arg(long)]
    overwrite: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Compute the bitrate series of a media file.
    #[command(
        about = "Compute, export, and chart the bitrate of a stream",
        visible_alias = "a",
        after_help = "Examples:\n  bitrate-viz analyze input.mp4 1\n  bitrate-viz analyze input.mp4 --window 0.5 --json series.json --print-json"
    )]
    Analyze {
        /// Input media path.
        input: PathBuf,

        /// Bucket duration in seconds (same as --window).
        #[arg(allow_negative_numbers = true)]
        bucket: Option<f64>,

        /// Bucket duration in seconds [default: 1].
        #[arg(long, allow_negative_numbers = true)]
        window: Option<f64>,

        /// Target bitrate in kbps, drawn as a reference line.
        #[arg(long, allow_negative_numbers = true)]
        target: Option<f64>,

        /// Stream to measure: video | audio.
        #[arg(long, default_value = "video")]
        stream: String,

        /// Packet reader: ffprobe | ffmpeg.
        #[arg(long, default_value = "ffprobe")]
        backend: String,

        /// Path to the ffprobe executable.
        #[arg(long)]
        ffprobe: Option<String>,

        /// Write the series as CSV.
        #[arg(long)]
        csv: Option<PathBuf>,

        /// Write the series as JSON.
        #[arg(long)]
        json: Option<PathBuf>,

        /// Write min/max/avg as text.
        #[arg(long)]
        stats: Option<PathBuf>,

        /// Render a static SVG chart.
        #[arg(long)]
        chart: Option<PathBuf>,

        /// Render an interactive HTML chart.
        #[arg(long)]
        html: Option<PathBuf>,

        /// Print series and statistics to stdout as JSON.
        #[arg(long)]
        print_json: bool,
    },

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Backend {
    Ffprobe,
    Ffmpeg,
}

fn parse_stream_kind(value: &str) -> Option<StreamKind> {
    match value.to_ascii_lowercase().as_str() {
        "video" | "v" => Some(StreamKind::Video),
        "audio" | "a" => Some(StreamKind::Audio),
        _ => None,
    }
}

fn parse_backend(value: &str) -> Option<Backend> {
    match value.to_ascii_lowercase().as_str() {
        "ffprobe" | "probe" => Some(Backend::Ffprobe),
        "ffmpeg" | "demux" => Some(Backend::Ffmpeg),
        _ => None,
    }
}

fn resolve_window(
    positional: Option<f64>,
    flag: Option<f64>,
) -> Result<f64, Box<dyn std::error::Error>> {
    match (positional, flag) {
        (Some(_), Some(_)) => {
            Err("give the window either positionally or with --window, not both".into())
        }
        (Some(window), None) | (None, Some(window)) => Ok(window),
        (None, None) => Ok(DEFAULT_WINDOW_SEC),
    }
}

fn open_source(
    input: &Path,
    backend: Backend,
    ffprobe: Option<&str>,
    stream: StreamKind,
) -> Result<Box<dyn PacketSource>, Box<dyn std::error::Error>> {
    match backend {
        Backend::Ffprobe => {
            let mut source = FfprobeSource::new(input).with_stream(stream);
            if let Some(program) = ffprobe {
                source = source.with_program(program);
            }
            Ok(Box::new(source))
        }
        #[cfg(feature = "ffmpeg")]
        Backend::Ffmpeg => Ok(Box::new(DemuxSource::new(input).with_stream(stream))),
        #[cfg(not(feature = "ffmpeg"))]
        Backend::Ffmpeg => {
            Err("--backend ffmpeg requires building with the `ffmpeg` feature".into())
        }
    }
}

fn ensure_writable_path(path: &Path, overwrite: bool) -> Result<(), Box<dyn std::error::Error>> {
    if path.exists() {
        if overwrite {
            eprintln!(
                "{} {}",
                "warning:".yellow().bold(),
                format!("overwriting {}", path.display()).yellow()
            );
        } else {
            return Err(format!(
                "output already exists: {} (use --overwrite to replace)",
                path.display()
            )
            .into());
        }
    }
    Ok(())
}

fn file_label(input: &Path) -> String {
    input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| input.display().to_string())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            input,
            bucket,
            window,
            target,
            stream,
            backend,
            ffprobe,
            csv,
            json,
            stats,
            chart,
            html,
            print_json,
        } => {
            let stream_kind =
                parse_stream_kind(&stream).ok_or(format!("unsupported --stream: {stream}"))?;
            let backend =
                parse_backend(&backend).ok_or(format!("unsupported --backend: {backend}"))?;

            let mut options = BitrateOptions::new()
                .with_window(resolve_window(bucket, window)?)
                .with_stream(stream_kind);
            if let Some(target) = target {
                options = options.with_target_bitrate(target);
            }
            options.validate()?;

            for path in [&csv, &json, &stats, &chart, &html].into_iter().flatten() {
                ensure_writable_path(path, cli.global.overwrite)?;
            }

            let mut source = open_source(&input, backend, ffprobe.as_deref(), stream_kind)?;
            if cli.global.verbose {
                eprintln!("reading packets from {}", source.describe());
            }

            let spinner = if cli.global.progress {
                let spinner = ProgressBar::new_spinner();
                spinner.set_style(ProgressStyle::with_template("{spinner:.green} {msg}")?);
                spinner.set_message(format!("reading packets from {}", file_label(&input)));
                spinner.enable_steady_tick(Duration::from_millis(100));
                Some(spinner)
            } else {
                None
            };

            let result = BitrateAnalysis::run(source.as_mut(), &options);
            if let Some(spinner) = spinner {
                spinner.finish_and_clear();
            }
            let analysis = result?;

            if cli.global.verbose {
                eprintln!(
                    "aggregated {} packet(s), {} byte(s) into {} bucket(s) of {}s",
                    analysis.sample_count,
                    analysis.total_bytes,
                    analysis.series.len(),
                    options.window_sec
                );
            }

            let chart_options = ChartOptions::new(file_label(&input))
                .with_target_bitrate(options.target_bitrate_kbps);

            if let Some(path) = &csv {
                export::save_csv(&analysis.series, path)?;
                println!("{} {}", "saved".green().bold(), path.display());
            }
            if let Some(path) = &json {
                export::save_json(&analysis.series, path)?;
                println!("{} {}", "saved".green().bold(), path.display());
            }
            if let Some(path) = &stats {
                export::save_statistics(&analysis.statistics, path)?;
                println!("{} {}", "saved".green().bold(), path.display());
            }
            if let Some(path) = &chart {
                chart::save_svg(&analysis.series, &chart_options, path)?;
                println!("{} {}", "saved".green().bold(), path.display());
            }
            if let Some(path) = &html {
                html::save_html(&analysis.series, &analysis.statistics, &chart_options, path)?;
                println!("{} {}", "saved".green().bold(), path.display());
            }

            if print_json {
                let payload = json!({
                    "window_sec": options.window_sec,
                    "target_bitrate_kbps": options.target_bitrate_kbps,
                    "sample_count": analysis.sample_count,
                    "total_bytes": analysis.total_bytes,
                    "statistics": {
                        "min_kbps": analysis.statistics.min_kbps,
                        "max_kbps": analysis.statistics.max_kbps,
                        "avg_kbps": analysis.statistics.avg_kbps,
                        "point_count": analysis.statistics.point_count,
                    },
                    "series": export::series_to_json(&analysis.series),
                });
                println!("{}", serde_json::to_string_pretty(&payload)?);
            } else {
                if !analysis.statistics.has_data() {
                    eprintln!(
                        "{} {}",
                        "warning:".yellow().bold(),
                        format!("no packets found in the {stream_kind} stream").yellow()
                    );
                }
                print!("{}", analysis.statistics);
                if let Some(target) = options.target_bitrate_kbps {
                    let over = analysis.exceeds_target().len();
                    let line = format!(
                        "{over} of {} bucket(s) above target {target} kbps",
                        analysis.series.len()
                    );
                    if over > 0 {
                        println!("{}", line.yellow());
                    } else {
                        println!("{}", line.green());
                    }
                }
            }
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "bitrate-viz", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
