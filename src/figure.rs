use std::ops::Range;
use std::path::Path;

use plotters::coord::ranged1d::{DefaultFormatting, KeyPointHint, Ranged};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use tracing::info;

use crate::error::{Error, Result};
use crate::palette::Colour;
use crate::raster::Raster;
use crate::render::Rendered;
use crate::types::Bounds;
use crate::util::axis_ticks;

/// Longest side of the map inside the figure, in pixels.
const PLOT_SIDE: u32 = 1000;
const LEFT_AREA: u32 = 100;
const BOTTOM_AREA: u32 = 70;
const MARGIN: u32 = 20;
const CAPTION_SPACE: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FigureFormat {
    Png,
    Svg,
}

impl FigureFormat {
    /// Pick the figure format from the output file extension.
    pub fn from_path(path: &Path) -> Result<FigureFormat> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "png" => Ok(FigureFormat::Png),
            "svg" => Ok(FigureFormat::Svg),
            _ => Err(Error::UnsupportedFormat(path.display().to_string())),
        }
    }
}

/// What gets written to the output path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Map with axes, ticks, title and legend.
    Figure,
    /// Only the composited raster.
    Raw,
}

/// Total figure size for a map raster of the given size. The map is scaled so its longest side is
/// `PLOT_SIDE`, keeping its aspect ratio.
pub fn figure_size(raster: (u32, u32)) -> (u32, u32) {
    let (w, h) = (raster.0.max(1), raster.1.max(1));
    let (pw, ph) = if w >= h {
        (PLOT_SIDE, (u64::from(PLOT_SIDE) * u64::from(h) / u64::from(w)).max(1) as u32)
    } else {
        ((u64::from(PLOT_SIDE) * u64::from(w) / u64::from(h)).max(1) as u32, PLOT_SIDE)
    };
    (
        pw + LEFT_AREA + 2 * MARGIN,
        ph + BOTTOM_AREA + CAPTION_SPACE + 2 * MARGIN,
    )
}

fn rgb(c: Colour) -> RGBColor {
    RGBColor(c.0, c.1, c.2)
}

/// Write the rendered map to `path`.
pub fn write_output(
    rendered: &Rendered,
    bounds: &Bounds,
    title: &str,
    path: &Path,
    mode: OutputMode,
) -> Result<()> {
    match mode {
        OutputMode::Raw => rendered.raster.save(path)?,
        OutputMode::Figure => render_figure(rendered, bounds, title, path)?,
    }
    info!("wrote {}", path.display());
    Ok(())
}

/// Render the annotated figure as PNG or SVG, depending on the extension of `path`.
pub fn render_figure(rendered: &Rendered, bounds: &Bounds, title: &str, path: &Path) -> Result<()> {
    let size = figure_size(rendered.raster.size());
    match FigureFormat::from_path(path)? {
        FigureFormat::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_figure(root, rendered, bounds, title)
        }
        FigureFormat::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_figure(root, rendered, bounds, title)
        }
    }
}

fn plot_err<E: std::error::Error + Send + Sync>(e: DrawingAreaErrorKind<E>) -> Error {
    Error::Plot(e.to_string())
}

/// A linear f64 axis whose labels sit exactly at precomputed tick values instead of the values
/// plotters would pick.
#[derive(Clone)]
struct TickAxis {
    linear: RangedCoordf64,
    ticks: Vec<f64>,
}

impl TickAxis {
    fn new(range: Range<f64>, ticks: Vec<f64>) -> TickAxis {
        TickAxis {
            linear: range.into(),
            ticks,
        }
    }
}

impl Ranged for TickAxis {
    type FormatOption = DefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.linear.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, _hint: Hint) -> Vec<f64> {
        self.ticks.clone()
    }

    fn range(&self) -> Range<f64> {
        self.linear.range()
    }
}

/// The map stretched over a plotting area of `dim` pixels, anchored at the north-west corner.
fn map_element(
    raster: &Raster,
    bounds: &Bounds,
    dim: (u32, u32),
) -> Result<BitMapElement<'static, (f64, f64)>> {
    let scaled = raster.resample(dim.0, dim.1)?;
    BitMapElement::with_owned_buffer((bounds.west, bounds.north), dim, scaled.to_rgb_on_white())
        .ok_or_else(|| {
            Error::Plot(format!("map bitmap does not fit a {}x{} plot area", dim.0, dim.1))
        })
}

fn draw_figure<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    rendered: &Rendered,
    bounds: &Bounds,
    title: &str,
) -> Result<()> {
    root.fill(&WHITE).map_err(plot_err)?;
    let ticks = axis_ticks(bounds);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 28))
        .margin(MARGIN as i32)
        .set_label_area_size(LabelAreaPosition::Left, LEFT_AREA as i32)
        .set_label_area_size(LabelAreaPosition::Bottom, BOTTOM_AREA as i32)
        .build_cartesian_2d(
            TickAxis::new(bounds.west..bounds.east, ticks.x),
            TickAxis::new(bounds.south..bounds.north, ticks.y),
        )
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Longitude")
        .y_desc("Latitude")
        .x_label_formatter(&|v| format!("{:.4}", v))
        .y_label_formatter(&|v| format!("{:.4}", v))
        .draw()
        .map_err(plot_err)?;

    let map = map_element(&rendered.raster, bounds, chart.plotting_area().dim_in_pixel())?;
    chart
        .draw_series(std::iter::once(map))
        .map_err(plot_err)?;

    for entry in &rendered.legend {
        let colour = rgb(entry.colour);
        chart
            .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())
            .map_err(plot_err)?
            .label(entry.label.clone())
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], colour.filled()));
    }
    if !rendered.legend.is_empty() {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::MiddleRight)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            FigureFormat::from_path(&PathBuf::from("out/run.png")).unwrap(),
            FigureFormat::Png
        );
        assert_eq!(
            FigureFormat::from_path(&PathBuf::from("run.SVG")).unwrap(),
            FigureFormat::Svg
        );
        assert!(FigureFormat::from_path(&PathBuf::from("run.eps")).is_err());
        assert!(FigureFormat::from_path(&PathBuf::from("run")).is_err());
    }

    #[test]
    fn test_figure_size_keeps_aspect() {
        let (w, h) = figure_size((2000, 1000));
        assert_eq!(w, PLOT_SIDE + LEFT_AREA + 2 * MARGIN);
        assert_eq!(h, 500 + BOTTOM_AREA + CAPTION_SPACE + 2 * MARGIN);
        let (w, h) = figure_size((500, 1000));
        assert_eq!(w, 500 + LEFT_AREA + 2 * MARGIN);
        assert_eq!(h, PLOT_SIDE + BOTTOM_AREA + CAPTION_SPACE + 2 * MARGIN);
    }

    #[test]
    fn test_tick_axis_uses_given_ticks() {
        let ticks = axis_ticks(&Bounds::default());
        let axis = TickAxis::new(144.75..144.89, ticks.x.clone());
        assert_eq!(axis.key_points(3usize), ticks.x);
        assert_eq!(axis.map(&144.75, (0, 1000)), 0);
        assert_eq!(axis.map(&144.89, (0, 1000)), 1000);
        assert_eq!(axis.range(), 144.75..144.89);
    }

    #[test]
    fn test_map_element_fails_loudly() {
        let raster = Raster::new(10, 10, Colour(255, 255, 255)).unwrap();
        let bounds = Bounds::default();
        assert!(map_element(&raster, &bounds, (40, 20)).is_ok());
        assert!(matches!(
            map_element(&raster, &bounds, (0, 20)),
            Err(Error::InvalidDimensions { .. })
        ));
    }
}
