use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::Result;
use crate::palette::Colour;
use crate::raster::Raster;
use crate::scale::scale_to_image;
use crate::types::{Bounds, LegendEntry, Track, TrackPoint};

/// Map the valid points of a track to pixels, keeping recording order. Invalid fixes are dropped.
pub fn track_pixels(points: &[TrackPoint], bounds: &Bounds, size: (u32, u32)) -> Vec<(i32, i32)> {
    let (width, height) = size;
    points
        .iter()
        .filter(|p| p.is_valid())
        .map(|p| scale_to_image(p, bounds, width, height))
        .collect()
}

/// Draw the valid points of `points` as one polyline onto `raster` and return the legend entry for
/// it. The raster is drawn on in place; whatever is already there stays underneath.
pub fn add_track(
    raster: &mut Raster,
    bounds: &Bounds,
    points: &[TrackPoint],
    colour: Colour,
    width: u32,
    label: &str,
) -> LegendEntry {
    let pixels = track_pixels(points, bounds, raster.size());
    raster.draw_polyline(&pixels, colour, width);
    LegendEntry {
        colour,
        label: label.to_string(),
    }
}

/// A track already mapped to pixel space, waiting to be drawn.
#[derive(Debug, Clone)]
pub struct PreparedTrack {
    pub legend: LegendEntry,
    pub width: u32,
    pub pixels: Vec<(i32, i32)>,
    /// Fixes thrown away for being off the globe.
    pub dropped: usize,
}

/// The composited image and its legend, in draw order.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub raster: Raster,
    pub legend: Vec<LegendEntry>,
}

/// Accumulates tracks drawn over one base map. The base raster is never drawn on; tracks go onto a
/// working copy, so the session can be reset and reused.
#[derive(Debug, Clone)]
pub struct RenderSession {
    bounds: Bounds,
    base: Raster,
    working: Raster,
    legend: Vec<LegendEntry>,
}

impl RenderSession {
    pub fn new(bounds: Bounds, base: Raster) -> RenderSession {
        RenderSession {
            bounds,
            working: base.clone(),
            base,
            legend: Vec::new(),
        }
    }

    /// Start a session over a map image on disk.
    pub fn open<P: AsRef<Path>>(bounds: Bounds, map: P) -> Result<RenderSession> {
        let base = Raster::open(map.as_ref())?;
        info!(
            "loaded map {} ({}x{})",
            map.as_ref().display(),
            base.width(),
            base.height()
        );
        Ok(RenderSession::new(bounds, base))
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn base(&self) -> &Raster {
        &self.base
    }

    /// Current state of the working raster.
    pub fn raster(&self) -> &Raster {
        &self.working
    }

    pub fn legend(&self) -> &[LegendEntry] {
        &self.legend[..]
    }

    /// Filter and map a track without touching the raster.
    pub fn prepare(&self, track: &Track) -> PreparedTrack {
        let pixels = track_pixels(&track.points, &self.bounds, self.base.size());
        PreparedTrack {
            legend: LegendEntry {
                colour: track.colour,
                label: track.label.clone(),
            },
            width: track.width,
            dropped: track.points.len() - pixels.len(),
            pixels,
        }
    }

    /// Draw a prepared track over everything drawn so far and record its legend entry.
    pub fn draw_prepared(&mut self, track: PreparedTrack) -> &LegendEntry {
        if track.dropped > 0 {
            debug!("{}: dropped {} invalid fixes", track.legend.label, track.dropped);
        }
        if track.pixels.len() < 2 {
            debug!("{}: fewer than two valid fixes, nothing drawn", track.legend.label);
        }
        self.working
            .draw_polyline(&track.pixels, track.legend.colour, track.width);
        self.push_legend(track.legend)
    }

    /// Draw one track.
    pub fn add_track(&mut self, track: &Track) -> &LegendEntry {
        let prepared = self.prepare(track);
        self.draw_prepared(prepared)
    }

    /// Draw several tracks. Mapping runs in parallel; drawing happens in the given order so later
    /// tracks end up on top where they overlap.
    pub fn add_tracks(&mut self, tracks: &[Track]) {
        let prepared: Vec<PreparedTrack> = tracks.par_iter().map(|t| self.prepare(t)).collect();
        for p in prepared {
            self.draw_prepared(p);
        }
    }

    /// Throw away every drawn track.
    pub fn reset(&mut self) {
        self.working = self.base.clone();
        self.legend.clear();
    }

    pub fn finish(self) -> Rendered {
        Rendered {
            raster: self.working,
            legend: self.legend,
        }
    }

    fn push_legend(&mut self, entry: LegendEntry) -> &LegendEntry {
        self.legend.push(entry);
        &self.legend[self.legend.len() - 1]
    }
}
