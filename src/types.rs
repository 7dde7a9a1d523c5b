use serde_derive::{Deserialize, Serialize};

use crate::palette::Colour;

/// Represent some map coordinate, in degrees.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct TrackPoint {
    pub lat: f64,
    pub lon: f64,
}

impl TrackPoint {
    pub fn new(lat: f64, lon: f64) -> TrackPoint {
        TrackPoint { lat, lon }
    }

    /// A fix is usable when it lies on the globe. Receivers report out-of-range values (and the
    /// odd NaN) when they have no lock, so those are rejected rather than clamped.
    pub fn is_valid(&self) -> bool {
        self.lat.abs() <= 90.0 && self.lon.abs() <= 180.0
    }
}

/// Represent the map bounds covered by the base image, in degrees. North/west is the top-left
/// corner of the image and south/east the bottom-right one.
///
/// Nothing checks that `north > south` and `west < east`; a box given the wrong way round simply
/// mirrors the drawn tracks.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct Bounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl Bounds {
    /// Build bounds from the two image corners, given as
    /// `(lat_top_left, lon_top_left, lat_bottom_right, lon_bottom_right)`.
    pub fn from_corners(lat_tl: f64, lon_tl: f64, lat_br: f64, lon_br: f64) -> Bounds {
        Bounds {
            north: lat_tl,
            south: lat_br,
            east: lon_br,
            west: lon_tl,
        }
    }

    pub fn range_lat(&self) -> f64 {
        self.north - self.south
    }

    pub fn range_lon(&self) -> f64 {
        self.east - self.west
    }

    pub fn contains(&self, p: &TrackPoint) -> bool {
        self.south <= p.lat && p.lat <= self.north && self.west <= p.lon && p.lon <= self.east
    }
}

impl Default for Bounds {
    /// The Melbourne extract the tool has always shipped with.
    fn default() -> Bounds {
        Bounds::from_corners(-37.68, 144.75, -37.825, 144.89)
    }
}

/// One input source ready to be drawn: its raw fixes in recording order, the legend text and the
/// stroke to draw it with.
#[derive(Debug, Clone)]
pub struct Track {
    pub label: String,
    pub colour: Colour,
    pub width: u32,
    pub points: Vec<TrackPoint>,
}

/// Colour and label of one drawn track.
#[derive(Debug, PartialEq, Clone)]
pub struct LegendEntry {
    pub colour: Colour,
    pub label: String,
}
