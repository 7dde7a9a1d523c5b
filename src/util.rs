use num::Float;

use crate::types::{Bounds, TrackPoint};

/// Number of longitude tick labels on the figure.
pub const X_TICKS: usize = 7;
/// Number of latitude tick labels on the figure.
pub const Y_TICKS: usize = 8;

/// `n` evenly spaced values from `start` to `end`, both included.
pub fn linspace<T: Float>(start: T, end: T, n: usize) -> Vec<T> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let last = T::from(n - 1).unwrap_or_else(T::one);
            let step = (end - start) / last;
            // Pin the last value so rounding error never pushes it past `end`.
            (0..n - 1)
                .map(|i| start + step * T::from(i).unwrap_or_else(T::zero))
                .chain(Some(end))
                .collect()
        }
    }
}

/// Round to given number of decimal places.
pub fn round_to<T: Float>(v: T, places: i32) -> T {
    let scale = T::from(10.0).unwrap_or_else(T::one).powi(places);
    (v * scale).round() / scale
}

/// Tick values for the figure axes.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticks {
    /// Longitudes, west to east.
    pub x: Vec<f64>,
    /// Latitudes, north to south, matching the image rows.
    pub y: Vec<f64>,
}

/// Evenly spaced tick values across the bounds, rounded to 4 decimal places.
pub fn axis_ticks(bounds: &Bounds) -> Ticks {
    let x = linspace(bounds.west, bounds.east, X_TICKS)
        .into_iter()
        .map(|v| round_to(v, 4))
        .collect();
    let mut y: Vec<f64> = linspace(bounds.south, bounds.north, Y_TICKS)
        .into_iter()
        .map(|v| round_to(v, 4))
        .collect();
    y.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    Ticks { x, y }
}

/// Find the bounds over an iterator of points. Returns None for an empty iterator.
pub fn point_bounds<'a, I: Iterator<Item = &'a TrackPoint>>(iter: I) -> Option<Bounds> {
    iter.fold(None, |b: Option<Bounds>, p| {
        Some(match b {
            None => Bounds {
                north: p.lat,
                south: p.lat,
                east: p.lon,
                west: p.lon,
            },
            Some(b) => Bounds {
                north: f64::max(b.north, p.lat),
                south: f64::min(b.south, p.lat),
                east: f64::max(b.east, p.lon),
                west: f64::min(b.west, p.lon),
            },
        })
    })
}
