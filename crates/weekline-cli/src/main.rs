//! weekline CLI - Week-based timeline layout engine
//!
//! Command-line interface for checking timeline data, computing layouts and
//! rendering them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{debug, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use weekline_core::{
    AxisDirection, Milestone, OverlapMode, Renderer, Scale, TimelineConfig, TimelineLayout, Track,
    WeekRange,
};
use weekline_layout::{TimelineEngine, ViewState};
use weekline_loader::{load_config_file, load_milestones_file, load_tracks_file, WeeklineConfig};
use weekline_render::{SvgRenderer, TextRenderer};

#[derive(Parser)]
#[command(name = "weekline")]
#[command(author, version, about = "Week-based multi-track timeline layout", long_about = None)]
struct Cli {
    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load and validate a tracks file
    Check {
        #[command(flatten)]
        input: InputArgs,
    },

    /// Compute a layout
    Layout {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        view: ViewArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Render a layout as SVG
    Render {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        view: ViewArgs,

        /// Stroke width of item lines in pixels
        #[arg(long)]
        line_width: Option<f64>,

        /// Extra space between lanes in pixels
        #[arg(long)]
        lane_spacing: Option<f64>,

        /// Highlight a milestone by `"{title}-{at}"`
        #[arg(long)]
        select_milestone: Option<String>,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Tracks JSON file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Milestones JSON file
    #[arg(short, long)]
    milestones: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, env = "WEEKLINE_CONFIG")]
    config: Option<PathBuf>,

    /// Minimum number of weeks to show
    #[arg(long)]
    weeks: Option<u32>,

    /// Axis direction (descending puts the latest week on top)
    #[arg(long)]
    axis: Option<AxisDirection>,

    /// Overlap strategy (lanes or clusters)
    #[arg(long)]
    overlap: Option<OverlapMode>,
}

#[derive(Args)]
struct ViewArgs {
    /// Zoom scale (small, medium, large)
    #[arg(long)]
    scale: Option<Scale>,

    /// Zoom to a week range, e.g. `3..6`
    #[arg(long)]
    range: Option<WeekRange>,

    /// Viewport height used to fit a zoomed range
    #[arg(long)]
    viewport_height: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// Loaded data plus the effective configuration
struct Inputs {
    config: TimelineConfig,
    tracks: Vec<Track>,
    milestones: Vec<Milestone>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Some(Commands::Check { input }) => check(&input),
        Some(Commands::Layout {
            input,
            view,
            format,
            output,
        }) => {
            let layout = compute_layout(&input, &view)?;
            let rendered = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&layout)
                    .context("Failed to serialize layout")?,
                OutputFormat::Text => TextRenderer.render(&layout)?,
            };
            emit(&rendered, output.as_deref())
        }
        Some(Commands::Render {
            input,
            view,
            line_width,
            lane_spacing,
            select_milestone,
            output,
        }) => {
            let layout = compute_layout(&input, &view)?;
            let mut renderer = SvgRenderer::new().selected_milestone(select_milestone);
            if let Some(width) = line_width {
                renderer = renderer.line_width(width);
            }
            if let Some(spacing) = lane_spacing {
                renderer = renderer.lane_spacing(spacing);
            }
            let svg = renderer.render(&layout)?;
            emit(&svg, Some(output.as_path()))
        }
        None => {
            println!("weekline - Week-based timeline layout engine");
            println!("Run with --help for usage information");
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let fallback = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn load_inputs(input: &InputArgs) -> Result<Inputs> {
    let WeeklineConfig { mut timeline, mapping } = match &input.config {
        Some(path) => load_config_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => WeeklineConfig::default(),
    };

    if let Some(weeks) = input.weeks {
        timeline.weeks = Some(weeks);
    }
    if let Some(axis) = input.axis {
        timeline.axis = axis;
    }
    if let Some(overlap) = input.overlap {
        timeline.overlap = overlap;
    }

    let tracks = load_tracks_file(&input.file, &mapping)
        .with_context(|| format!("Failed to load tracks {}", input.file.display()))?;
    let milestones = match &input.milestones {
        Some(path) => load_milestones_file(path)
            .with_context(|| format!("Failed to load milestones {}", path.display()))?,
        None => Vec::new(),
    };

    info!(
        tracks = tracks.len(),
        milestones = milestones.len(),
        "inputs loaded"
    );

    Ok(Inputs {
        config: timeline,
        tracks,
        milestones,
    })
}

fn view_state(args: &ViewArgs) -> ViewState {
    let mut view = ViewState::new();
    if let Some(scale) = args.scale {
        view = view.scale(scale);
    }
    if let Some(range) = args.range {
        view = view.range(range);
    }
    if let Some(px) = args.viewport_height {
        view = view.viewport_height(px);
    }
    view
}

fn compute_layout(input: &InputArgs, view: &ViewArgs) -> Result<TimelineLayout> {
    let inputs = load_inputs(input)?;
    let engine = TimelineEngine::try_new(inputs.config).context("Invalid configuration")?;
    let view = view_state(view);
    debug!(scale = %view.scale, range = ?view.range, "view");
    Ok(engine.layout(&inputs.tracks, &inputs.milestones, &view))
}

fn check(input: &InputArgs) -> Result<()> {
    let inputs = load_inputs(input)?;
    let engine = TimelineEngine::try_new(inputs.config).context("Invalid configuration")?;
    let layout = engine.layout(&inputs.tracks, &inputs.milestones, &ViewState::default());

    let items: usize = inputs.tracks.iter().map(|t| t.items.len()).sum();
    let undated = inputs
        .tracks
        .iter()
        .flat_map(|t| &t.items)
        .filter(|item| item.start().is_none())
        .count();
    let placed: usize = layout.milestones.iter().map(|row| row.milestones.len()).sum();

    println!("Checking: {}", input.file.display());
    println!("  tracks:     {}", inputs.tracks.len());
    println!("  items:      {} ({} undated)", items, undated);
    match layout.bounds.origin {
        Some(origin) => println!("  timeline:   {} weeks from {}", layout.total_weeks(), origin),
        None => println!("  timeline:   no dated items"),
    }
    if !inputs.milestones.is_empty() {
        println!(
            "  milestones: {} ({} outside the timeline)",
            inputs.milestones.len(),
            inputs.milestones.len() - placed
        );
    }
    println!("OK");
    Ok(())
}

fn emit(content: &str, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = content.len(), "output written");
        }
        None => println!("{content}"),
    }
    Ok(())
}
