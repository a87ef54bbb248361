//! SnapEdit - sticker and filter editor
//!
//! Entry point: headless static and live sessions driven by event scripts.

mod config;
mod edit;
mod live;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand, ValueEnum};
use snapedit_effects::{BlendMode, FilterBank};
use snapedit_media::{load_pixel_buffer, save_pixel_buffer};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::config::AppConfig;

#[derive(Parser, Debug)]
#[command(name = "snapedit", version, about = "Place stickers and filters on images and video")]
struct Cli {
    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Debug-level logging (RUST_LOG takes precedence).
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Sticker blending, overriding the config file.
    #[arg(long, value_enum, global = true)]
    blend: Option<BlendChoice>,

    /// Maximum undo snapshots, overriding the config file.
    #[arg(long, global = true)]
    history_limit: Option<usize>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the filter catalog, optionally rendering a preview strip.
    Filters(FiltersArgs),
    /// Edit a still image by replaying an event script.
    Edit(EditArgs),
    /// Run a live session over a video file or capture device.
    Live(LiveArgs),
}

#[derive(Args, Debug)]
struct FiltersArgs {
    /// Image to render filter previews from.
    #[arg(long, requires = "out")]
    image: Option<PathBuf>,

    /// Directory for the preview PNGs.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Preview size.
    #[arg(long, value_parser = parse_size, default_value = "160x120")]
    size: (u32, u32),
}

#[derive(Args, Debug)]
pub(crate) struct EditArgs {
    /// Image to edit.
    #[arg(long)]
    pub image: PathBuf,

    /// Directory of PNG stickers.
    #[arg(long)]
    pub stickers: PathBuf,

    /// Event script (JSON).
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Output image; repeated saves are numbered.
    #[arg(long)]
    pub output: PathBuf,

    /// Treat pointer coordinates as clicks in a window of this size.
    #[arg(long, value_parser = parse_size)]
    pub display: Option<(u32, u32)>,
}

#[derive(Args, Debug)]
pub(crate) struct LiveArgs {
    /// Video file, URL or capture device.
    #[arg(long)]
    pub video: String,

    /// FFmpeg input format for capture devices (e.g. v4l2, avfoundation).
    #[arg(long)]
    pub device_format: Option<String>,

    /// Directory of PNG stickers.
    #[arg(long)]
    pub stickers: PathBuf,

    /// Event script (JSON); events are keyed by frame index.
    #[arg(long)]
    pub script: Option<PathBuf>,

    /// Record composed frames here once editing starts.
    #[arg(long)]
    pub record: Option<PathBuf>,

    /// Write stills (and the last frame) here.
    #[arg(long)]
    pub preview: Option<PathBuf>,

    /// Stop after this many frames.
    #[arg(long)]
    pub frames: Option<u64>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum BlendChoice {
    Masked,
    Alpha,
}

impl From<BlendChoice> for BlendMode {
    fn from(choice: BlendChoice) -> Self {
        match choice {
            BlendChoice::Masked => BlendMode::Masked,
            BlendChoice::Alpha => BlendMode::Alpha,
        }
    }
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{s}'"))?;
    let w: u32 = w.trim().parse().map_err(|e| format!("bad width '{w}': {e}"))?;
    let h: u32 = h.trim().parse().map_err(|e| format!("bad height '{h}': {e}"))?;
    if w == 0 || h == 0 {
        return Err(format!("size must be non-zero, got '{s}'"));
    }
    Ok((w, h))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("SnapEdit starting...");

    let config = AppConfig::resolve(cli.config.as_deref())?
        .with_overrides(cli.blend.map(BlendMode::from), cli.history_limit);

    match cli.cmd {
        Command::Filters(args) => cmd_filters(args),
        Command::Edit(args) => edit::run(args, config),
        Command::Live(args) => live::run(args, config),
    }
}

fn cmd_filters(args: FiltersArgs) -> anyhow::Result<()> {
    let bank = FilterBank::new();
    for (index, name) in bank.names().iter().enumerate() {
        println!("{index:>2}  {name}");
    }

    if let (Some(image), Some(out)) = (args.image, args.out) {
        let source = load_pixel_buffer(&image)
            .with_context(|| format!("load image '{}'", image.display()))?;
        std::fs::create_dir_all(&out)
            .with_context(|| format!("create output dir '{}'", out.display()))?;

        let (w, h) = args.size;
        for (index, preview) in bank.previews(&source, w, h).iter().enumerate() {
            let path = out.join(format!("{index:02}.png"));
            save_pixel_buffer(preview, &path)
                .with_context(|| format!("save '{}'", path.display()))?;
        }
        info!(dir = %out.display(), count = bank.len(), "Filter previews written");
    }
    Ok(())
}
