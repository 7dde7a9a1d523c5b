//! Draw GPS tracks over a pre-downloaded map image.
//!
//! The map image is assumed to cover a known latitude/longitude box exactly. Fixes are placed on it
//! with a local linear mapping (no projection), each input log becomes one coloured polyline, and
//! the result is written either as the bare raster or as a figure with axes and a legend.

mod types;
pub use types::*;

pub mod config;
pub mod discover;
pub mod error;
pub mod figure;
pub mod palette;
pub mod raster;
pub mod records;
pub mod render;
pub mod scale;
pub mod util;

pub use config::Config;
pub use error::{Error, Result};
pub use figure::{render_figure, write_output, OutputMode};
pub use palette::{Colour, Palette};
pub use raster::Raster;
pub use records::{read_log, GpsRecord, TrackLog};
pub use render::{add_track, RenderSession, Rendered};
pub use scale::scale_to_image;

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::info;

/// Request to draw one log file.
#[derive(Debug, Clone)]
pub struct TrackRequest {
    pub path: PathBuf,
    pub colour: Colour,
    pub width: u32,
}

/// Read a log file into a drawable track. The legend label is the source label of the first
/// record, or the file stem when the log has no records.
pub fn load_track(request: &TrackRequest) -> Result<Track> {
    let log = read_log(&request.path)?;
    info!(
        "{}: {} fixes ({} unreadable lines)",
        request.path.display(),
        log.points.len(),
        log.skipped
    );
    let label = log
        .source
        .unwrap_or_else(|| discover::title_for(&request.path));
    Ok(Track {
        label,
        colour: request.colour,
        width: request.width,
        points: log.points,
    })
}

/// Read every requested log (in parallel) and draw them onto the session in request order. Any
/// unreadable log aborts the whole batch before anything is drawn.
pub fn draw_logs(session: &mut RenderSession, requests: &[TrackRequest]) -> Result<()> {
    let tracks = requests
        .par_iter()
        .map(load_track)
        .collect::<Result<Vec<Track>>>()?;
    session.add_tracks(&tracks);
    Ok(())
}

/// One-shot helper: draw all the logs in `folder` with the given extension, one palette colour per
/// file in sorted filename order.
pub fn draw_folder<P: AsRef<Path>>(
    session: &mut RenderSession,
    folder: P,
    extension: &str,
    palette: &mut Palette,
    width: u32,
) -> Result<()> {
    let requests: Vec<TrackRequest> = discover::folder_inputs(folder, extension)?
        .into_iter()
        .map(|path| TrackRequest {
            path,
            colour: palette.next_colour(),
            width,
        })
        .collect();
    draw_logs(session, &requests)
}
