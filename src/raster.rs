use std::path::Path;

use imagefmt::{ColFmt, ColType};

use crate::error::{Error, Result};
use crate::palette::Colour;

const CHANNELS: usize = 4;

/// An RGBA8 pixel buffer, row-major with row 0 at the top.
#[derive(Clone, Debug, PartialEq)]
pub struct Raster {
    width: u32,
    height: u32,
    buf: Vec<u8>,
}

impl Raster {
    /// Blank raster of given size filled with one colour.
    pub fn new(width: u32, height: u32, fill: Colour) -> Result<Raster> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions {
                width: width as usize,
                height: height as usize,
            });
        }
        let px = fill.rgba();
        let buf = px
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * CHANNELS)
            .collect();
        Ok(Raster { width, height, buf })
    }

    /// Wrap an existing RGBA buffer. Fails if the buffer length does not match the dimensions.
    pub fn from_rgba(width: u32, height: u32, buf: Vec<u8>) -> Result<Raster> {
        if width == 0 || height == 0 || buf.len() != width as usize * height as usize * CHANNELS {
            return Err(Error::InvalidDimensions {
                width: width as usize,
                height: height as usize,
            });
        }
        Ok(Raster { width, height, buf })
    }

    /// Load an image file (PNG, JPEG, TGA or BMP), converting it to RGBA.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Raster> {
        let path = path.as_ref();
        let img = imagefmt::read(path, ColFmt::RGBA).map_err(|e| Error::ImageRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Raster::from_rgba(img.w as u32, img.h as u32, img.buf)
    }

    /// Write the raster to disk; the format follows the file extension (PNG, TGA or BMP).
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        imagefmt::write(
            path,
            self.width as usize,
            self.height as usize,
            ColFmt::RGBA,
            &self.buf,
            ColType::Auto,
        )
        .map_err(|e| Error::ImageWrite {
            path: path.to_path_buf(),
            source: e,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// (width, height) in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Immutable access to the underlying RGBA bytes.
    pub fn as_rgba(&self) -> &[u8] {
        &self.buf[..]
    }

    #[inline]
    fn offset(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as u32 >= self.width || y as u32 >= self.height {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * CHANNELS)
    }

    /// Pixel at (x, y), or None when off the canvas.
    pub fn pixel(&self, x: i32, y: i32) -> Option<[u8; 4]> {
        self.offset(x, y).map(|o| {
            let mut px = [0; 4];
            px.copy_from_slice(&self.buf[o..o + CHANNELS]);
            px
        })
    }

    /// Set one pixel. Writes off the canvas are dropped.
    #[inline]
    pub fn put_pixel(&mut self, x: i32, y: i32, colour: Colour) {
        if let Some(o) = self.offset(x, y) {
            self.buf[o..o + CHANNELS].copy_from_slice(&colour.rgba());
        }
    }

    /// Paint a square brush of side `width` centred on (x, y).
    fn stamp(&mut self, x: i32, y: i32, colour: Colour, width: u32) {
        let (lo, hi) = brush_extent(width);
        for dy in lo..=hi {
            for dx in lo..=hi {
                self.put_pixel(x + dx, y + dy, colour);
            }
        }
    }

    /// Draw a connected line through `points` in order. Fewer than two points draw nothing.
    pub fn draw_polyline(&mut self, points: &[(i32, i32)], colour: Colour, width: u32) {
        for (a, b) in points.iter().zip(points.iter().skip(1)) {
            self.draw_segment(*a, *b, colour, width);
        }
    }

    /// Draw one straight segment. The segment is first clipped to the canvas (grown by the brush
    /// size) so points far off the map do not cost a walk across empty space.
    pub fn draw_segment(&mut self, a: (i32, i32), b: (i32, i32), colour: Colour, width: u32) {
        let (lo, hi) = brush_extent(width);
        let clip = (
            f64::from(lo),
            f64::from(lo),
            f64::from(self.width as i32 - 1 + hi),
            f64::from(self.height as i32 - 1 + hi),
        );
        let a = (f64::from(a.0), f64::from(a.1));
        let b = (f64::from(b.0), f64::from(b.1));
        let (a, b) = match clip_segment(a, b, clip) {
            Some(s) => s,
            None => return,
        };
        let max_abs_diff = f64::max((b.0 - a.0).abs(), (b.1 - a.1).abs());
        if max_abs_diff == 0.0 {
            self.stamp(a.0.round() as i32, a.1.round() as i32, colour, width);
            return;
        }
        // Step from a toward b so every step advances at most one pixel on each axis.
        let steps = max_abs_diff.ceil() as u32;
        let x_step = (b.0 - a.0) / f64::from(steps);
        let y_step = (b.1 - a.1) / f64::from(steps);
        for i in 0..=steps {
            let x = a.0 + x_step * f64::from(i);
            let y = a.1 + y_step * f64::from(i);
            self.stamp(x.round() as i32, y.round() as i32, colour, width);
        }
    }

    /// RGB bytes with the alpha channel composited onto a white background.
    pub fn to_rgb_on_white(&self) -> Vec<u8> {
        self.buf
            .chunks(CHANNELS)
            .flat_map(|px| {
                let a = u32::from(px[3]);
                let blend = move |c: u8| ((u32::from(c) * a + 255 * (255 - a)) / 255) as u8;
                [blend(px[0]), blend(px[1]), blend(px[2])]
            })
            .collect()
    }

    /// Nearest-neighbour resample to a new size.
    pub fn resample(&self, width: u32, height: u32) -> Result<Raster> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions {
                width: width as usize,
                height: height as usize,
            });
        }
        let mut buf = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for row in 0..height {
            let src_row = (u64::from(row) * u64::from(self.height) / u64::from(height)) as usize;
            for col in 0..width {
                let src_col = (u64::from(col) * u64::from(self.width) / u64::from(width)) as usize;
                let o = (src_row * self.width as usize + src_col) * CHANNELS;
                buf.extend_from_slice(&self.buf[o..o + CHANNELS]);
            }
        }
        Ok(Raster { width, height, buf })
    }
}

/// Offsets of the brush relative to its centre pixel, inclusive.
#[inline]
fn brush_extent(width: u32) -> (i32, i32) {
    let w = width.max(1) as i32;
    (-(w - 1) / 2, w / 2)
}

/// Liang-Barsky clip of segment a-b to the rectangle (xmin, ymin, xmax, ymax).
fn clip_segment(
    a: (f64, f64),
    b: (f64, f64),
    rect: (f64, f64, f64, f64),
) -> Option<((f64, f64), (f64, f64))> {
    let (xmin, ymin, xmax, ymax) = rect;
    let dx = b.0 - a.0;
    let dy = b.1 - a.1;
    let mut t0 = 0.0f64;
    let mut t1 = 1.0f64;
    for &(p, q) in &[
        (-dx, a.0 - xmin),
        (dx, xmax - a.0),
        (-dy, a.1 - ymin),
        (dy, ymax - a.1),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }
    Some((
        (a.0 + t0 * dx, a.1 + t0 * dy),
        (a.0 + t1 * dx, a.1 + t1 * dy),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Colour = Colour(255, 255, 255);
    const BLUE: Colour = Colour(0, 0, 255);
    const RED: Colour = Colour(255, 0, 0);

    fn count(r: &Raster, c: Colour) -> usize {
        r.as_rgba().chunks(4).filter(|px| *px == c.rgba()).count()
    }

    #[test]
    fn test_new_rejects_empty() {
        assert!(Raster::new(0, 10, WHITE).is_err());
        assert!(Raster::from_rgba(2, 2, vec![0; 15]).is_err());
        let r = Raster::new(3, 2, WHITE).unwrap();
        assert_eq!(r.size(), (3, 2));
        assert_eq!(r.as_rgba().len(), 24);
        assert_eq!(r.pixel(2, 1), Some([255, 255, 255, 255]));
        assert_eq!(r.pixel(3, 1), None);
        assert_eq!(r.pixel(-1, 0), None);
    }

    #[test]
    fn test_horizontal_line() {
        let mut r = Raster::new(10, 10, WHITE).unwrap();
        r.draw_polyline(&[(1, 5), (8, 5)], BLUE, 1);
        for x in 1..=8 {
            assert_eq!(r.pixel(x, 5), Some(BLUE.rgba()));
        }
        assert_eq!(r.pixel(0, 5), Some(WHITE.rgba()));
        assert_eq!(r.pixel(9, 5), Some(WHITE.rgba()));
        assert_eq!(count(&r, BLUE), 8);
    }

    #[test]
    fn test_diagonal_line_has_no_gaps() {
        let mut r = Raster::new(20, 20, WHITE).unwrap();
        r.draw_polyline(&[(0, 0), (19, 7)], BLUE, 1);
        // One pixel per column along the major axis.
        for x in 0..20 {
            assert!((0..20).any(|y| r.pixel(x, y) == Some(BLUE.rgba())), "gap at column {}", x);
        }
        assert_eq!(r.pixel(0, 0), Some(BLUE.rgba()));
        assert_eq!(r.pixel(19, 7), Some(BLUE.rgba()));
    }

    #[test]
    fn test_stroke_width() {
        let mut r = Raster::new(10, 10, WHITE).unwrap();
        r.draw_polyline(&[(2, 5), (7, 5)], BLUE, 3);
        for y in 4..=6 {
            assert_eq!(r.pixel(4, y), Some(BLUE.rgba()));
        }
        assert_eq!(r.pixel(4, 3), Some(WHITE.rgba()));
        assert_eq!(r.pixel(4, 7), Some(WHITE.rgba()));
        assert_eq!(count(&r, BLUE), 8 * 3);
    }

    #[test]
    fn test_single_point_draws_nothing() {
        let mut r = Raster::new(10, 10, WHITE).unwrap();
        r.draw_polyline(&[(5, 5)], BLUE, 3);
        r.draw_polyline(&[], BLUE, 3);
        assert_eq!(count(&r, BLUE), 0);
    }

    #[test]
    fn test_off_canvas_is_clipped() {
        let mut r = Raster::new(10, 10, WHITE).unwrap();
        // Crosses the canvas from far outside.
        r.draw_polyline(&[(-1_000_000, 5), (1_000_000, 5)], BLUE, 1);
        assert_eq!(count(&r, BLUE), 10);
        // Entirely outside.
        r.draw_polyline(&[(-50, -50), (-10, 200)], RED, 1);
        assert_eq!(count(&r, RED), 0);
        // Ends exactly one past the edge.
        r.draw_polyline(&[(0, 0), (10, 10)], RED, 1);
        assert_eq!(r.pixel(9, 9), Some(RED.rgba()));
    }

    #[test]
    fn test_later_stroke_paints_over() {
        let mut r = Raster::new(10, 10, WHITE).unwrap();
        r.draw_polyline(&[(0, 5), (9, 5)], BLUE, 1);
        r.draw_polyline(&[(5, 0), (5, 9)], RED, 1);
        assert_eq!(r.pixel(5, 5), Some(RED.rgba()));
        assert_eq!(r.pixel(4, 5), Some(BLUE.rgba()));
    }

    #[test]
    fn test_rgb_on_white() {
        let r = Raster::from_rgba(2, 1, vec![0, 0, 255, 255, 0, 0, 0, 0]).unwrap();
        assert_eq!(r.to_rgb_on_white(), vec![0, 0, 255, 255, 255, 255]);
    }

    #[test]
    fn test_resample() {
        let mut r = Raster::new(4, 4, WHITE).unwrap();
        r.put_pixel(0, 0, BLUE);
        let big = r.resample(8, 8).unwrap();
        assert_eq!(big.size(), (8, 8));
        assert_eq!(big.pixel(1, 1), Some(BLUE.rgba()));
        assert_eq!(big.pixel(2, 2), Some(WHITE.rgba()));
        let small = r.resample(2, 2).unwrap();
        assert_eq!(small.pixel(0, 0), Some(BLUE.rgba()));
        assert!(r.resample(0, 2).is_err());
    }

    #[test]
    fn test_save_and_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        let mut r = Raster::new(16, 8, WHITE).unwrap();
        r.draw_polyline(&[(0, 0), (15, 7)], BLUE, 1);
        r.save(&path).unwrap();
        let back = Raster::open(&path).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn test_open_missing() {
        match Raster::open("/definitely/not/here.png") {
            Err(Error::ImageRead { path, source }) => {
                assert_eq!(path, Path::new("/definitely/not/here.png"));
                assert!(matches!(source, imagefmt::Error::Io(_)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_open_not_an_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        std::fs::write(&path, b"this is a text file").unwrap();
        match Raster::open(&path) {
            Err(Error::ImageRead { source, .. }) => {
                assert!(matches!(source, imagefmt::Error::Unsupported(_)));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_save_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.gif");
        let r = Raster::new(2, 2, WHITE).unwrap();
        match r.save(&path) {
            Err(Error::ImageWrite { source, .. }) => {
                assert!(matches!(source, imagefmt::Error::Unsupported(_)));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(!path.exists());
    }
}
