use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use impressionist::Config;
use impressionist::draw::BrushShape;
use impressionist::draw::raster::painted_pixel_count;
use impressionist::export::{FileSaveConfig, SaveManager, SaveOutcome, file};
use impressionist::input::PointerEvent;
use impressionist::session::PaintingSession;

const SAVE_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Parser, Debug)]
#[command(name = "impressionist")]
#[command(
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("IMPRESSIONIST_GIT_HASH"), ")"),
    about = "Repaint photographs as impressionist brush strokes"
)]
struct Cli {
    /// Config file to use instead of ~/.config/impressionist/config.toml
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Paint over an image and save the result
    Paint(PaintArgs),
    /// Write the default config file if none exists
    InitConfig,
}

#[derive(Args, Debug)]
struct PaintArgs {
    /// Source photograph (PNG)
    #[arg(long, short = 'i', value_name = "PNG")]
    image: PathBuf,

    /// JSON array of pointer events to replay, in view coordinates
    #[arg(long, short = 'e', value_name = "JSON")]
    events: Option<PathBuf>,

    /// Cover the whole image with an automatic stroke sweep
    #[arg(long, short = 'a')]
    auto: bool,

    /// Brush shape (overrides the config file)
    #[arg(long, short = 'b', value_enum, value_name = "SHAPE")]
    brush: Option<BrushShape>,

    /// Random seed for reproducible splatter and auto-paint
    #[arg(long, value_name = "N")]
    seed: Option<u64>,

    /// Output file; defaults to a timestamped name in the configured save directory
    #[arg(long, short = 'o', value_name = "PNG")]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Command::Paint(args) => {
            let config = match &cli.config {
                Some(path) => Config::load_from(path)?,
                None => Config::load()?,
            };
            run_paint(config, args)
        }
        Command::InitConfig => init_config(cli.config.as_deref()),
    }
}

fn run_paint(mut config: Config, args: PaintArgs) -> Result<()> {
    if let Some(shape) = args.brush {
        config.brush.shape = shape;
    }
    if args.seed.is_some() {
        config.engine.seed = args.seed;
    }

    let bytes = fs::read(&args.image)
        .with_context(|| format!("Failed to read image {}", args.image.display()))?;
    let pixels = file::decode_image(&bytes)
        .with_context(|| format!("Failed to decode image {}", args.image.display()))?;

    let mut session = PaintingSession::from_config(&config);
    session.load_image(&pixels, None)?;
    log::info!(
        "Painting {}x{} image with {} brush",
        pixels.width(),
        pixels.height(),
        session.brush().shape
    );

    if let Some(path) = &args.events {
        let events = read_events(path)?;
        let painted = events
            .iter()
            .filter(|event| session.handle_pointer_event(event))
            .count();
        log::info!("Replayed {} events, {} dabs", events.len(), painted);
    }

    if args.auto {
        session.auto_paint();
    }

    let painting = session
        .export_final()
        .context("Session has no painting to export")?;
    log::info!(
        "Exporting painting with {} of {} pixels painted",
        painted_pixel_count(&painting),
        painting.width() as usize * painting.height() as usize
    );
    let save_config = match &args.output {
        Some(path) => FileSaveConfig::for_path(path),
        None => FileSaveConfig::from(&config.export),
    };

    let runtime = tokio::runtime::Runtime::new().context("Failed to start tokio runtime")?;
    let manager = SaveManager::new(runtime.handle());
    manager.request_save(painting, save_config)?;

    match runtime.block_on(manager.wait_for_result(SAVE_TIMEOUT)) {
        Some(SaveOutcome::Success(result)) => {
            println!("Saved {}", result.path.display());
            Ok(())
        }
        Some(SaveOutcome::Failed(_, message)) => bail!("Save failed: {message}"),
        Some(SaveOutcome::Cancelled(ticket)) => bail!("Save {ticket} was cancelled"),
        None => bail!("Timed out waiting for the painting to be saved"),
    }
}

fn read_events(path: &Path) -> Result<Vec<PointerEvent>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read events from {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse events from {}", path.display()))
}

fn init_config(path: Option<&Path>) -> Result<()> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => Config::get_config_path()?,
    };
    if path.exists() {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }
    Config::default().save_to(&path)?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}
