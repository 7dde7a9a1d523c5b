//! Error types for gpsvis

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("could not read image {path}: {source}")]
    ImageRead {
        path: PathBuf,
        source: imagefmt::Error,
    },

    #[error("could not write image {path}: {source}")]
    ImageWrite {
        path: PathBuf,
        source: imagefmt::Error,
    },

    #[error("invalid raster dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("could not read track log {path}: {source}")]
    Csv { path: PathBuf, source: csv::Error },

    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown colour: {0}")]
    UnknownColour(String),

    #[error("no input files with extension .{extension} in {folder}")]
    NoInputs { folder: PathBuf, extension: String },

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("plotting error: {0}")]
    Plot(String),
}

pub type Result<T> = std::result::Result<T, Error>;
