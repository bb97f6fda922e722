//! lane-marker CLI: run the two-marker lane detector over image frames.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use image::ImageReader;
use lane_marker::detect::detect_lane_markers_rgb_debug;
use lane_marker::overlay::{draw_overlay, OverlayStyle};
use lane_marker::preview::{EdgePreview, PreviewParams};
use lane_marker::{Hsv, HsvRange, LaneDetectionResult, LaneDetectorParams};
use log::{debug, info, warn, LevelFilter};
use serde::Serialize;

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "lane-marker")]
#[command(about = "Find two colored lane markers and check their midpoint against the frame centre")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Explicit log level (overrides -v and RUST_LOG).
    #[arg(long, global = true)]
    log_level: Option<LevelFilter>,

    /// Emit logs as JSON through tracing (requires the `tracing` feature).
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect lane markers in one or more frames, in order.
    Detect(DetectArgs),

    /// Write grayscale, blurred and edge previews of a frame.
    Preview(PreviewArgs),

    /// Print the default detector parameters as JSON.
    Preset,
}

#[derive(Debug, Clone, Args)]
struct DetectArgs {
    /// Input frames.
    #[arg(long = "image", required = true, num_args = 1..)]
    images: Vec<PathBuf>,

    /// Detector parameters (JSON); missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(flatten)]
    hsv: HsvOverrides,

    /// Minimum region area in pixels (exclusive).
    #[arg(long)]
    min_area: Option<u32>,

    /// Minimum marker separation in whole pixels (exclusive).
    #[arg(long)]
    min_pair_separation: Option<u32>,

    /// Half-width of the centre band in pixels.
    #[arg(long)]
    band_half_width: Option<u32>,

    /// Path to write the JSON report (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Directory for annotated frames.
    #[arg(long)]
    overlay_dir: Option<PathBuf>,

    /// Directory for binary masks.
    #[arg(long)]
    mask_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Args)]
struct HsvOverrides {
    /// Hue lower bound (0..=179).
    #[arg(long)]
    h_min: Option<u8>,
    /// Hue upper bound (0..=179).
    #[arg(long)]
    h_max: Option<u8>,
    /// Saturation lower bound.
    #[arg(long)]
    s_min: Option<u8>,
    /// Saturation upper bound.
    #[arg(long)]
    s_max: Option<u8>,
    /// Value lower bound.
    #[arg(long)]
    v_min: Option<u8>,
    /// Value upper bound.
    #[arg(long)]
    v_max: Option<u8>,
}

impl HsvOverrides {
    fn apply(&self, base: HsvRange) -> HsvRange {
        let lower = Hsv {
            h: self.h_min.unwrap_or(base.lower.h),
            s: self.s_min.unwrap_or(base.lower.s),
            v: self.v_min.unwrap_or(base.lower.v),
        };
        let upper = Hsv {
            h: self.h_max.unwrap_or(base.upper.h),
            s: self.s_max.unwrap_or(base.upper.s),
            v: self.v_max.unwrap_or(base.upper.v),
        };
        let range = HsvRange::new(lower, upper);
        if range.lower != lower || range.upper != upper {
            warn!(
                "HSV range clamped to lower={:?} upper={:?}",
                range.lower, range.upper
            );
        }
        range
    }
}

#[derive(Debug, Clone, Args)]
struct PreviewArgs {
    /// Input frame.
    #[arg(long)]
    image: PathBuf,

    /// Output directory for `<stem>_gray.png`, `<stem>_blur.png`, `<stem>_edges.png`.
    #[arg(long)]
    out_dir: PathBuf,

    #[arg(long, default_value = "1.1")]
    blur_sigma: f32,

    #[arg(long, default_value = "100")]
    canny_low: f32,

    #[arg(long, default_value = "200")]
    canny_high: f32,
}

#[derive(Debug, Serialize)]
struct FrameReport {
    image_path: String,
    #[serde(flatten)]
    result: LaneDetectionResult,
}

#[derive(Debug, Serialize)]
struct DetectReport {
    params: LaneDetectorParams,
    num_frames: usize,
    crossed_frames: usize,
    frames: Vec<FrameReport>,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    match cli.command {
        Commands::Detect(args) => run_detect(&args),
        Commands::Preview(args) => run_preview(&args),
        Commands::Preset => run_preset(),
    }
}

/// Filter directive for the logger: `--log-level`, then `RUST_LOG`, then `-v`.
fn log_directive(log_level: Option<LevelFilter>, verbose: u8, env: Option<&str>) -> String {
    if let Some(level) = log_level {
        return level.to_string().to_ascii_lowercase();
    }
    match env.map(str::trim) {
        Some(env) if !env.is_empty() => env.to_string(),
        _ => match verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
        .to_string(),
    }
}

fn cli_directive(cli: &Cli) -> String {
    let env = std::env::var("RUST_LOG").ok();
    log_directive(cli.log_level, cli.verbose, env.as_deref())
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) -> CliResult<()> {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::{fmt, EnvFilter};

    let builder = fmt()
        .with_env_filter(EnvFilter::try_new(cli_directive(cli))?)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    if cli.log_json {
        tracing::subscriber::set_global_default(builder.json().flatten_event(true).finish())?;
    } else {
        tracing::subscriber::set_global_default(
            builder.with_timer(fmt::time::Uptime::default()).finish(),
        )?;
    }
    tracing_log::LogTracer::init()?;
    Ok(())
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) -> CliResult<()> {
    env_logger::Builder::new()
        .parse_filters(&cli_directive(cli))
        .format_timestamp_millis()
        .target(env_logger::Target::Stderr)
        .try_init()?;
    Ok(())
}

fn load_params(args: &DetectArgs) -> CliResult<LaneDetectorParams> {
    let mut params = match &args.config {
        Some(path) => {
            let raw = fs::read_to_string(path)?;
            serde_json::from_str::<LaneDetectorParams>(&raw)?
        }
        None => LaneDetectorParams::default(),
    };
    params.hsv = args.hsv.apply(params.hsv);
    if let Some(v) = args.min_area {
        params.min_area = v;
    }
    if let Some(v) = args.min_pair_separation {
        params.min_pair_separation = v;
    }
    if let Some(v) = args.band_half_width {
        params.band_half_width = v;
    }
    Ok(params)
}

fn run_detect(args: &DetectArgs) -> CliResult<()> {
    let params = load_params(args)?;
    debug!("detector params: {:?}", params);
    for dir in [&args.overlay_dir, &args.mask_dir].into_iter().flatten() {
        fs::create_dir_all(dir)?;
    }

    let style = OverlayStyle::default();
    let mut frames = Vec::with_capacity(args.images.len());
    for (idx, path) in args.images.iter().enumerate() {
        let img = ImageReader::open(path)?.decode()?.to_rgb8();
        let (result, debug) = detect_lane_markers_rgb_debug(&img, &params);

        info!(
            "frame {} ({}): {} markers{}",
            idx,
            path.display(),
            result.markers.len(),
            result
                .distance
                .map(|d| format!(", distance {d}px"))
                .unwrap_or_default()
        );
        if result.crossed {
            if let Some(lane) = result.lane {
                warn!(
                    "frame {}: lane midpoint x={} crossed the centre band ({}..{})",
                    idx,
                    lane.midpoint[0],
                    result.band.left(),
                    result.band.right()
                );
            }
        }

        if let Some(dir) = &args.overlay_dir {
            let mut annotated = img.clone();
            draw_overlay(&mut annotated, &result, Some(&debug), &style);
            annotated.save(output_path(dir, path, "overlay"))?;
        }
        if let Some(dir) = &args.mask_dir {
            debug.mask.save(output_path(dir, path, "mask"))?;
        }

        frames.push(FrameReport {
            image_path: path.to_string_lossy().into_owned(),
            result,
        });
    }

    let report = DetectReport {
        num_frames: frames.len(),
        crossed_frames: frames.iter().filter(|f| f.result.crossed).count(),
        params,
        frames,
    };
    write_report(args.out.as_deref(), &report)
}

fn run_preview(args: &PreviewArgs) -> CliResult<()> {
    let img = ImageReader::open(&args.image)?.decode()?.to_rgb8();
    let params = PreviewParams {
        blur_sigma: args.blur_sigma,
        canny_low: args.canny_low,
        canny_high: args.canny_high,
    };
    let preview = EdgePreview::from_rgb(&img, &params);

    fs::create_dir_all(&args.out_dir)?;
    preview
        .gray
        .save(output_path(&args.out_dir, &args.image, "gray"))?;
    preview
        .blurred
        .save(output_path(&args.out_dir, &args.image, "blur"))?;
    preview
        .edges
        .save(output_path(&args.out_dir, &args.image, "edges"))?;
    info!("wrote previews to {}", args.out_dir.display());
    Ok(())
}

fn run_preset() -> CliResult<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&LaneDetectorParams::default())?
    );
    Ok(())
}

fn output_path(dir: &Path, input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "frame".to_string());
    dir.join(format!("{stem}_{suffix}.png"))
}

fn write_report(path: Option<&Path>, report: &DetectReport) -> CliResult<()> {
    let json = serde_json::to_string_pretty(report)?;
    match path {
        Some(out_path) => {
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(out_path, json)?;
            info!("wrote report JSON to {}", out_path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
