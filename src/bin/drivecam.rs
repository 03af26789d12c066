use std::io::Write as _;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::{ArgAction, Args, Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use drivecam::{
    ConvertConfig, ConvertRequest, DisplayConfig, EncoderSettings, FieldSet, Metadata,
    MetadataSummary, TimeMs, TimingMode, TranscodeProgress,
};

#[derive(Parser, Debug)]
#[command(name = "drivecam", version, about = "Drive recorder TS to MOV converter")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert a recording with the telemetry overlay (requires `ffmpeg` and `ffprobe`).
    Convert(ConvertArgs),
    /// Write only the ASS overlay.
    Overlay(OverlayArgs),
    /// Print a summary of a metadata file.
    Info(InfoArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// JSON config file; flags below override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Crop quadrant: 0 full, 1 top-left, 2 top-right, 3 bottom-left, 4 bottom-right.
    #[arg(long)]
    quadrant: Option<u8>,

    /// Trim start (HH:MM:SS[.fff], MM:SS or seconds); enables trimming.
    #[arg(long)]
    trim_start: Option<String>,

    /// Trim duration; enables trimming.
    #[arg(long)]
    trim_duration: Option<String>,

    /// Comma-separated overlay fields: speed, date, time, coordinates.
    #[arg(long)]
    show: Option<String>,

    /// Overlay font family.
    #[arg(long)]
    font: Option<String>,

    /// Base font size.
    #[arg(long)]
    font_size: Option<u32>,

    /// Speed line size relative to the base font size.
    #[arg(long)]
    speed_multiplier: Option<f64>,

    /// Thin telemetry to at most about this many samples.
    #[arg(long)]
    max_events: Option<usize>,

    /// Sample timing: auto, explicit, wall_clock or spread.
    #[arg(long, value_parser = parse_timing)]
    timing: Option<TimingMode>,
}

#[derive(Args, Debug)]
struct ConvertArgs {
    /// Recorder video (.ts).
    video: PathBuf,

    /// Metadata JSON.
    metadata: PathBuf,

    /// Output file; derived from crop and trim settings when omitted.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Skip the overlay and only crop / trim / transcode.
    #[arg(long, default_value_t = false)]
    no_overlay: bool,

    /// Use encoder defaults instead of the slow near-lossless preset.
    #[arg(long, default_value_t = false)]
    fast: bool,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args, Debug)]
#[command(group(clap::ArgGroup::new("length").required(true).args(["duration", "video"])))]
struct OverlayArgs {
    /// Metadata JSON.
    metadata: PathBuf,

    /// Output ASS path.
    #[arg(long)]
    out: PathBuf,

    /// Recording length (timecode), when no video is at hand.
    #[arg(long)]
    duration: Option<String>,

    /// Probe this video for length and frame size.
    #[arg(long)]
    video: Option<PathBuf>,

    #[command(flatten)]
    run: RunArgs,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// Metadata JSON.
    metadata: PathBuf,

    /// Print the summary as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Convert(args) => cmd_convert(args),
        Command::Overlay(args) => cmd_overlay(args),
        Command::Info(args) => cmd_info(args),
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

fn parse_timing(s: &str) -> Result<TimingMode, String> {
    serde_json::from_value(serde_json::Value::String(s.replace('-', "_")))
        .map_err(|_| format!("unknown timing mode '{s}'"))
}

fn build_config(run: &RunArgs) -> anyhow::Result<ConvertConfig> {
    let mut cfg = match &run.config {
        Some(path) => ConvertConfig::from_path(path)
            .with_context(|| format!("load config '{}'", path.display()))?,
        None => ConvertConfig::default(),
    };

    if let Some(q) = run.quadrant {
        cfg.crop_quadrant = q;
    }
    if run.trim_start.is_some() || run.trim_duration.is_some() {
        cfg.enable_trimming = true;
    }
    if let Some(start) = &run.trim_start {
        cfg.trim_start = start.clone();
    }
    if let Some(duration) = &run.trim_duration {
        cfg.trim_duration = duration.clone();
    }
    if let Some(show) = &run.show {
        cfg.display = DisplayConfig::from_fields(&FieldSet::parse_list(show)?);
    }
    if let Some(font) = &run.font {
        cfg.font_name = font.clone();
    }
    if let Some(size) = run.font_size {
        cfg.font_size = size;
    }
    if let Some(mult) = run.speed_multiplier {
        cfg.speed_multiplier = mult;
    }
    if let Some(max) = run.max_events {
        cfg.max_events = Some(max);
    }
    if let Some(timing) = run.timing {
        cfg.timing = timing;
    }

    cfg.validate().context("invalid configuration")?;
    Ok(cfg)
}

fn summary_lines(summary: &MetadataSummary) -> Vec<String> {
    let mut lines = vec![format!(
        "metadata: VIN={}, entries={}, skipped={}",
        summary.vin, summary.entries, summary.skipped
    )];
    if let Some((lo, hi)) = summary.speed_range {
        lines.push(format!("speed range: {lo:.1} - {hi:.1} km/h"));
    }
    match (&summary.first_date, &summary.last_date) {
        (Some(first), Some(last)) if first != last => {
            lines.push(format!("dates: {first} to {last}"));
        }
        (Some(first), _) => lines.push(format!("date: {first}")),
        _ => {}
    }
    lines
}

fn cmd_convert(args: ConvertArgs) -> anyhow::Result<()> {
    let mut config = build_config(&args.run)?;
    if args.no_overlay {
        config.enable_overlay = false;
    }
    if args.fast {
        config.encoder = EncoderSettings::fast();
    }

    let meta = Metadata::from_path(&args.metadata)
        .with_context(|| format!("load metadata '{}'", args.metadata.display()))?;
    for line in summary_lines(&MetadataSummary::of(&meta)) {
        eprintln!("{line}");
    }

    let request = ConvertRequest {
        video: args.video,
        metadata: args.metadata,
        output: args.output,
        config,
    };

    let mut last_percent = None;
    let mut on_progress = |p: TranscodeProgress| {
        let percent = p.fraction.map(|f| (f * 100.0).floor() as u32);
        if percent.is_some() && percent == last_percent {
            return;
        }
        last_percent = percent;
        match percent {
            Some(pct) => eprint!("\r{pct:>3}% ({})", p.out_time),
            None => eprint!("\r{}", p.out_time),
        }
        let _ = std::io::stderr().flush();
    };

    let report = drivecam::convert_with_metadata(&request, &meta, &mut on_progress)
        .with_context(|| {
            format!(
                "convert '{}' -> '{}'",
                request.video.display(),
                request.output_path().display()
            )
        })?;
    eprintln!();

    if let Some(stats) = report.overlay {
        eprintln!(
            "overlay: {} samples ({:?} timing), {} intervals, {} events",
            stats.samples, stats.timing, stats.intervals, stats.events
        );
    }
    let change = report
        .size_change_percent()
        .map(|c| format!(" ({c:+.1} %)"))
        .unwrap_or_default();
    eprintln!(
        "wrote {}: {:.1} MB -> {:.1} MB{change}",
        report.output.display(),
        report.input_mb(),
        report.output_mb()
    );
    Ok(())
}

fn cmd_overlay(args: OverlayArgs) -> anyhow::Result<()> {
    let config = build_config(&args.run)?;

    let (duration, play_res) = match (&args.video, &args.duration) {
        (Some(video), _) => {
            let media = drivecam::probe_media(video)
                .with_context(|| format!("probe '{}'", video.display()))?;
            let crop = drivecam::resolve_crop(config.quadrant()?, media.width, media.height)?;
            (media.duration, Some((crop.rect.width, crop.rect.height)))
        }
        (None, Some(duration)) => (
            TimeMs::parse_timecode(duration).context("parse --duration")?,
            None,
        ),
        (None, None) => anyhow::bail!("either --duration or --video is required"),
    };

    let plan = drivecam::write_overlay(&args.metadata, &args.out, &config, duration, play_res)
        .with_context(|| format!("write overlay '{}'", args.out.display()))?;
    eprintln!(
        "wrote {} ({} intervals, {} events)",
        args.out.display(),
        plan.stats.intervals,
        plan.stats.events
    );
    Ok(())
}

fn cmd_info(args: InfoArgs) -> anyhow::Result<()> {
    let meta = Metadata::from_path(&args.metadata)
        .with_context(|| format!("load metadata '{}'", args.metadata.display()))?;
    let summary = MetadataSummary::of(&meta);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        for line in summary_lines(&summary) {
            println!("{line}");
        }
    }
    Ok(())
}
