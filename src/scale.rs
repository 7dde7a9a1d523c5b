use crate::types::{Bounds, TrackPoint};

/// Convert a latitude/longitude into pixel coordinates on an image of `width` x `height` pixels
/// that exactly covers `bounds`.
///
/// Longitude maps linearly onto x. Latitude maps linearly onto y measured from the bottom edge and
/// is then flipped, since row 0 of the image is the northern edge. Both values are truncated
/// toward zero (not rounded) to stay pixel-compatible with earlier renders; the flip happens after
/// truncation. Points outside the bounds land outside the image and are not clamped; coordinates
/// too far off to fit in an `i32` saturate instead.
pub fn scale_to_image(p: &TrackPoint, bounds: &Bounds, width: u32, height: u32) -> (i32, i32) {
    let x = (p.lon - bounds.west) / bounds.range_lon() * f64::from(width);
    let y = (p.lat - bounds.south) / bounds.range_lat() * f64::from(height);
    (x as i32, (height as i32).saturating_sub(y as i32))
}
