use std::env;
use std::io;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, ArgGroup, Parser, ValueHint};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use gpsvis::discover::{default_output, title_for};
use gpsvis::util::point_bounds;
use gpsvis::{
    draw_folder, load_track, write_output, Bounds, Colour, Config, OutputMode, RenderSession,
    TrackPoint, TrackRequest,
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Draw GPS logs onto a map image", long_about = None)]
#[command(group(ArgGroup::new("input").required(true).args(["ifile", "ifolder"])))]
struct Cli {
    /// Single GPS log to draw
    #[arg(short = 'i', long, value_hint = ValueHint::FilePath)]
    ifile: Option<PathBuf>,

    /// Folder of GPS logs, one track per file
    #[arg(short = 'f', long, value_hint = ValueHint::DirPath)]
    ifolder: Option<PathBuf>,

    /// Output path (.png or .svg figure; .png/.bmp/.tga with --raw)
    #[arg(short = 'o', long, value_hint = ValueHint::FilePath)]
    ofile: Option<PathBuf>,

    /// Base map image (defaults to map.png next to the executable)
    #[arg(long, value_hint = ValueHint::FilePath)]
    map: Option<PathBuf>,

    /// Map corners: LAT_TOP_LEFT LON_TOP_LEFT LAT_BOTTOM_RIGHT LON_BOTTOM_RIGHT
    #[arg(long, num_args = 4, allow_negative_numbers = true, value_names = ["LAT_TL", "LON_TL", "LAT_BR", "LON_BR"])]
    bbox: Option<Vec<f64>>,

    /// Track stroke width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Track colour in single-file mode (name or #rrggbb)
    #[arg(long)]
    color: Option<String>,

    /// Extension of log files in folder mode
    #[arg(long)]
    ext: Option<String>,

    /// Figure title (defaults to the input name)
    #[arg(long)]
    title: Option<String>,

    /// Write only the map with tracks, without axes or legend
    #[arg(long, action = ArgAction::SetTrue)]
    raw: bool,

    /// JSON config file
    #[arg(long, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    run(cli)
}

/// Merge the config file (if any) with command line overrides.
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match cli.config {
        Some(ref path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(ref map) = cli.map {
        config.map = Some(map.clone());
    }
    if let Some(ref b) = cli.bbox {
        config.bounds = Bounds::from_corners(b[0], b[1], b[2], b[3]);
    }
    if let Some(width) = cli.width {
        config.line_width = width;
    }
    if let Some(ref color) = cli.color {
        config.colour = color.clone();
    }
    if let Some(ref ext) = cli.ext {
        config.extension = ext.clone();
    }
    if let Some(ref title) = cli.title {
        config.title = Some(title.clone());
    }
    Ok(config)
}

fn default_map() -> Result<PathBuf> {
    let exe = env::current_exe().context("cannot locate executable")?;
    let dir = exe
        .parent()
        .ok_or_else(|| anyhow!("executable has no parent directory"))?;
    Ok(dir.join("map.png"))
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let input = cli
        .ifile
        .clone()
        .or_else(|| cli.ifolder.clone())
        .ok_or_else(|| anyhow!("either --ifile or --ifolder is required"))?;
    if cli.ifile.is_some() {
        info!("input file is {}", input.display());
    } else {
        info!("input folder is {}", input.display());
    }

    let mode = if cli.raw {
        OutputMode::Raw
    } else {
        OutputMode::Figure
    };
    let output = cli
        .ofile
        .clone()
        .unwrap_or_else(|| default_output(&input, "png"));
    info!("output file is {}", output.display());
    let title = config.title.clone().unwrap_or_else(|| title_for(&input));

    let map = match config.map {
        Some(ref m) => m.clone(),
        None => default_map()?,
    };
    let started = Instant::now();
    let mut session = RenderSession::open(config.bounds, &map)
        .with_context(|| format!("failed to load map {}", map.display()))?;

    if cli.ifile.is_some() {
        let colour: Colour = config.colour.parse()?;
        let track = load_track(&TrackRequest {
            path: input.clone(),
            colour,
            width: config.line_width,
        })?;
        if let Some(b) = point_bounds(track.points.iter().filter(|p| p.is_valid())) {
            if !config.bounds.contains(&TrackPoint::new(b.north, b.west))
                || !config.bounds.contains(&TrackPoint::new(b.south, b.east))
            {
                warn!("{} extends beyond the map bounds", input.display());
            }
        }
        session.add_track(&track);
    } else {
        let mut palette = config.palette()?;
        draw_folder(
            &mut session,
            &input,
            &config.extension,
            &mut palette,
            config.line_width,
        )?;
    }
    info!(
        "drew {} track(s) in {} ms",
        session.legend().len(),
        started.elapsed().as_millis()
    );

    let bounds = *session.bounds();
    let rendered = session.finish();
    write_output(&rendered, &bounds, &title, &output, mode)
        .with_context(|| format!("failed to write {}", output.display()))?;
    Ok(())
}
