use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use serde_derive::{Deserialize, Serialize};

use crate::error::Result;
use crate::palette::{Palette, DEFAULT_PALETTE};
use crate::types::Bounds;

/// Settings for a render run. Every field has a default so a config file only needs the values it
/// changes, e.g.
///
/// ```json
/// { "map": "melbourne.png", "bounds": { "north": -37.68, "south": -37.825, "east": 144.89, "west": 144.75 } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Base map image. Relative paths are taken from the working directory.
    pub map: Option<PathBuf>,
    pub bounds: Bounds,
    /// Stroke width of drawn tracks, in pixels.
    pub line_width: u32,
    /// Colour names or `#rrggbb` values handed out per file in folder mode.
    pub palette: Vec<String>,
    /// Colour of the track in single-file mode.
    pub colour: String,
    /// Extension of log files picked up in folder mode.
    pub extension: String,
    pub title: Option<String>,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            map: None,
            bounds: Bounds::default(),
            line_width: 3,
            palette: DEFAULT_PALETTE.iter().map(|s| s.to_string()).collect(),
            colour: "blue".to_string(),
            extension: "log".to_string(),
            title: None,
        }
    }
}

impl Config {
    pub fn from_reader<R: Read>(reader: R) -> Result<Config> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config> {
        let file = File::open(path)?;
        Config::from_reader(BufReader::new(file))
    }

    pub fn palette(&self) -> Result<Palette> {
        Palette::new(&self.palette)
    }
}
