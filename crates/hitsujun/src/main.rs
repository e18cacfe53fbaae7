//! hitsujun: compare parse-order and travel-optimized stroke playback.
//!
//! Loads an SVG drawing, sequences its strokes with the multi-start
//! nearest-neighbour heuristic, and plays both the parse order and the
//! optimized order on a shared virtual clock. The CLI is the scheduling
//! host: it owns the tick loop and hands each [`TickToken`](hitsujun_core::TickToken) back to
//! the [`PlaybackSession`].
//!
//! # Usage
//!
//! ```text
//! hitsujun order drawing.svg --json
//! hitsujun frames drawing.svg --out-dir frames/ --fps 30 --format png
//! hitsujun play drawing.svg --speed 4 --pause-at 500 --pause-for 1000
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use hitsujun_core::{
    Direction, Instant, Order, PlaybackConfig, PlaybackSession, SpeedFactor, StrokeDocument,
    TickOutcome, Track, compare, original_order, sequence, total_travel,
};
use hitsujun_export::{FrameStyle, Pane, SvgMetadata, comparison_to_png, comparison_to_svg};
use hitsujun_extract::{ExtractConfig, extract};

/// Wall-clock interval between ticks during real-time playback (~60 Hz).
const PLAY_TICK: Duration = Duration::from_millis(16);

/// Stroke-order playback comparison for SVG drawings.
#[derive(Parser)]
#[command(name = "hitsujun", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    settings: Settings,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Command {
    /// Print both stroke orders, their travel totals, and the comparison.
    Order {
        /// Path to the SVG drawing.
        svg: PathBuf,

        /// Print JSON instead of a human-readable report.
        #[arg(long)]
        json: bool,
    },

    /// Render side-by-side playback frames on a synthetic clock.
    Frames {
        /// Path to the SVG drawing.
        svg: PathBuf,

        /// Directory the frames are written to (created if missing).
        #[arg(long)]
        out_dir: PathBuf,

        /// Frames per second of virtual wall-clock time.
        #[arg(long, default_value_t = 30, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..=1000))]
        fps: u32,

        /// Output image format.
        #[arg(long, value_enum, default_value_t = Format::Svg)]
        format: Format,

        /// PNG pixels per document unit.
        #[arg(long, default_value_t = 4.0)]
        scale: f64,
    },

    /// Play both timelines in real time, logging progress.
    Play {
        /// Path to the SVG drawing.
        svg: PathBuf,

        /// Pause once virtual time reaches this many milliseconds.
        #[arg(long)]
        pause_at: Option<f64>,

        /// Wall-clock milliseconds to stay paused.
        #[arg(long, default_value_t = 1000)]
        pause_for: u64,
    },
}

/// Frame file format.
#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// SVG text with dash-offset stroke reveal.
    Svg,
    /// Rasterized PNG.
    Png,
}

/// Playback and extraction settings shared by every subcommand.
#[derive(Args)]
struct Settings {
    /// Playback speed multiplier. Non-positive or unparseable values mean 1.
    #[arg(long, global = true)]
    speed: Option<String>,

    /// Drawing speed in document units per virtual millisecond.
    #[arg(long, global = true, default_value_t = PlaybackConfig::DEFAULT_STROKE_SPEED)]
    stroke_speed: f64,

    /// Pen-up travel speed in document units per virtual millisecond.
    #[arg(long, global = true, default_value_t = PlaybackConfig::DEFAULT_TRAVEL_SPEED)]
    travel_speed: f64,

    /// Sample spacing of the reverse stroke geometry, in document units.
    #[arg(long, global = true, default_value_t = ExtractConfig::DEFAULT_RESAMPLE_STEP)]
    resample_step: f64,

    /// Full playback config as a JSON string.
    ///
    /// When provided, `--speed`, `--stroke-speed` and `--travel-speed`
    /// are ignored. The JSON must be a valid `PlaybackConfig`
    /// serialization; missing fields take their defaults.
    #[arg(long, global = true)]
    config_json: Option<String>,
}

/// Build a [`PlaybackConfig`] from CLI arguments.
///
/// If `--config-json` is provided it is parsed directly and the
/// individual flags are ignored.
fn playback_config(settings: &Settings) -> anyhow::Result<PlaybackConfig> {
    let config = if let Some(json) = &settings.config_json {
        serde_json::from_str(json).context("parsing --config-json")?
    } else {
        PlaybackConfig {
            stroke_speed: settings.stroke_speed,
            travel_speed: settings.travel_speed,
            speed: settings
                .speed
                .as_deref()
                .map_or(SpeedFactor::DEFAULT, SpeedFactor::parse),
        }
    };
    config.validate()?;
    Ok(config)
}

const fn extract_config(settings: &Settings) -> ExtractConfig {
    ExtractConfig {
        resample_step: settings.resample_step,
        accuracy: ExtractConfig::DEFAULT_ACCURACY,
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = playback_config(&cli.settings)?;
    let extraction = extract_config(&cli.settings);

    match &cli.command {
        Command::Order { svg, json } => {
            let document = load(svg, &extraction)?;
            print_orders(&document, *json)
        }
        Command::Frames {
            svg,
            out_dir,
            fps,
            format,
            scale,
        } => {
            let document = load(svg, &extraction)?;
            let title = file_title(svg);
            render_frames(document, config, &title, out_dir, *fps, *format, *scale)
        }
        Command::Play {
            svg,
            pause_at,
            pause_for,
        } => {
            let document = load(svg, &extraction)?;
            play(
                document,
                config,
                *pause_at,
                Duration::from_millis(*pause_for),
            )
        }
    }
}

/// Read and measure an SVG file.
fn load(path: &Path, config: &ExtractConfig) -> anyhow::Result<StrokeDocument> {
    let data = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let document =
        extract(&data, config).with_context(|| format!("extracting {}", path.display()))?;
    if document.is_empty() {
        tracing::warn!(path = %path.display(), "document has no strokes");
    }
    Ok(document)
}

fn file_title(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("hitsujun")
        .to_owned()
}

// ---------------------------------------------------------------------------
// order
// ---------------------------------------------------------------------------

fn print_orders(document: &StrokeDocument, json: bool) -> anyhow::Result<()> {
    let segments = &document.segments;
    let original = original_order(segments);
    let optimized = sequence(segments);
    let original_travel = total_travel(segments, &original);
    let optimized_travel = total_travel(segments, &optimized);
    let summary = compare(original_travel, optimized_travel);

    if json {
        let report = serde_json::json!({
            "segments": segments.len(),
            "original": { "order": original, "travel": original_travel },
            "optimized": { "order": optimized, "travel": optimized_travel },
            "summary": summary,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Segments:  {}", segments.len());
        println!(
            "Original:  {}  (travel {original_travel:.1})",
            format_order(&original)
        );
        println!(
            "Optimized: {}  (travel {optimized_travel:.1})",
            format_order(&optimized)
        );
        println!("Summary:   {summary}");
    }
    Ok(())
}

/// Render an order compactly, e.g. `0F 2R 1F`.
fn format_order(order: &Order) -> String {
    let mut out = String::new();
    for (i, entry) in order.iter().enumerate() {
        if i > 0 {
            out.push(' ');
        }
        let dir = match entry.direction {
            Direction::Forward => 'F',
            Direction::Reverse => 'R',
        };
        let _ = write!(out, "{}{dir}", entry.segment_id);
    }
    out
}

// ---------------------------------------------------------------------------
// frames
// ---------------------------------------------------------------------------

/// Drive a session with a synthetic clock that advances one frame period
/// per tick, writing a side-by-side frame after each tick.
fn render_frames(
    document: StrokeDocument,
    config: PlaybackConfig,
    title: &str,
    out_dir: &Path,
    fps: u32,
    format: Format,
    scale: f64,
) -> anyhow::Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut session = PlaybackSession::new(document, config)?;
    let style = FrameStyle::default();
    let period = Duration::from_secs_f64(1.0 / f64::from(fps));

    let mut now = Instant::now();
    let mut token = session
        .play(now)
        .ok_or_else(|| anyhow!("new session is already playing"))?;
    write_frame(&session, title, &style, out_dir, 0, format, scale)?;

    let mut index = 1_usize;
    let summary = loop {
        now += period;
        match session.tick(token, now) {
            TickOutcome::Continue(next) => token = next,
            TickOutcome::Finished(summary) => break summary,
            TickOutcome::Stale => bail!("tick token went stale with no pause or reset"),
        }
        write_frame(&session, title, &style, out_dir, index, format, scale)?;
        index += 1;
    };
    write_frame(&session, title, &style, out_dir, index, format, scale)?;

    eprintln!(
        "{} frames written to {} ({:.0} ms virtual)",
        index + 1,
        out_dir.display(),
        session.elapsed_ms()
    );
    println!("{summary}");
    Ok(())
}

fn write_frame(
    session: &PlaybackSession,
    title: &str,
    style: &FrameStyle,
    out_dir: &Path,
    index: usize,
    format: Format,
    scale: f64,
) -> anyhow::Result<()> {
    let original = Pane {
        title: "original",
        order: session.order(Track::Original),
        frame: session.frame(Track::Original),
    };
    let optimized = Pane {
        title: "optimized",
        order: session.order(Track::Optimized),
        frame: session.frame(Track::Optimized),
    };

    let (bytes, ext) = match format {
        Format::Svg => {
            let metadata = SvgMetadata {
                title: Some(title),
                description: None,
            };
            let svg = comparison_to_svg(
                session.document(),
                original,
                optimized,
                session.summary(),
                style,
                &metadata,
            );
            (svg.into_bytes(), "svg")
        }
        Format::Png => (
            comparison_to_png(session.document(), original, optimized, style, scale)?,
            "png",
        ),
    };

    let path = out_dir.join(format!("frame-{index:05}.{ext}"));
    std::fs::write(&path, &bytes).with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "frame written");
    Ok(())
}

// ---------------------------------------------------------------------------
// play
// ---------------------------------------------------------------------------

/// Real-time playback on the wall clock.
fn play(
    document: StrokeDocument,
    config: PlaybackConfig,
    pause_at: Option<f64>,
    pause_for: Duration,
) -> anyhow::Result<()> {
    let mut session = PlaybackSession::new(document, config)?;
    let mut token = session
        .play(Instant::now())
        .ok_or_else(|| anyhow!("new session is already playing"))?;
    let mut pending_pause = pause_at;
    let mut last_report = Instant::now();

    let summary = loop {
        std::thread::sleep(PLAY_TICK);
        match session.tick(token, Instant::now()) {
            TickOutcome::Continue(next) => token = next,
            TickOutcome::Finished(summary) => break summary,
            TickOutcome::Stale => bail!("tick token went stale with no pause or reset"),
        }

        if last_report.elapsed() >= Duration::from_secs(1) {
            last_report = Instant::now();
            tracing::info!(
                elapsed_ms = session.elapsed_ms(),
                original = session.frame(Track::Original).traveled_distance,
                optimized = session.frame(Track::Optimized).traveled_distance,
                "playing"
            );
        }

        if let Some(at) = pending_pause
            && session.elapsed_ms() >= at
        {
            pending_pause = None;
            session.pause();
            tracing::info!(elapsed_ms = session.elapsed_ms(), "paused");
            // The paused interval must not advance virtual time.
            let stale = token;
            std::thread::sleep(pause_for);
            if !matches!(session.tick(stale, Instant::now()), TickOutcome::Stale) {
                bail!("tick after pause was not rejected");
            }
            token = session
                .play(Instant::now())
                .ok_or_else(|| anyhow!("session did not resume"))?;
            tracing::info!(elapsed_ms = session.elapsed_ms(), "resumed");
        }
    };

    println!("Original:  {:.0}px", summary.original_distance.round());
    println!("Optimized: {summary}");
    Ok(())
}
