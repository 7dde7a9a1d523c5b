use std::fmt;
use std::str::FromStr;

use tracing::warn;

use crate::error::Error;

/// An opaque RGB draw colour.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Colour(pub u8, pub u8, pub u8);

/// Named colours understood on the command line and in config files. These are the CSS/X11
/// values for the names.
static NAMED: &[(&str, Colour)] = &[
    ("black", Colour(0, 0, 0)),
    ("white", Colour(255, 255, 255)),
    ("blue", Colour(0, 0, 255)),
    ("red", Colour(255, 0, 0)),
    ("green", Colour(0, 128, 0)),
    ("orange", Colour(255, 165, 0)),
    ("darkgreen", Colour(0, 100, 0)),
    ("magenta", Colour(255, 0, 255)),
    ("purple", Colour(128, 0, 128)),
    ("coral", Colour(255, 127, 80)),
    ("cornflowerblue", Colour(100, 149, 237)),
    ("limegreen", Colour(50, 205, 50)),
    ("darkorchid", Colour(153, 50, 204)),
    ("gold", Colour(255, 215, 0)),
    ("steelblue", Colour(70, 130, 180)),
    ("yellowgreen", Colour(154, 205, 50)),
    ("chocolate", Colour(210, 105, 30)),
    ("teal", Colour(0, 128, 128)),
    ("yellow", Colour(255, 255, 0)),
    ("cyan", Colour(0, 255, 255)),
    ("gray", Colour(128, 128, 128)),
];

/// Default per-file colours in folder mode, in assignment order.
pub const DEFAULT_PALETTE: [&str; 15] = [
    "blue",
    "red",
    "orange",
    "darkgreen",
    "magenta",
    "purple",
    "coral",
    "cornflowerblue",
    "limegreen",
    "darkorchid",
    "gold",
    "steelblue",
    "yellowgreen",
    "chocolate",
    "teal",
];

impl Colour {
    /// Look up a colour by name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Colour> {
        let name = name.trim().to_ascii_lowercase();
        NAMED.iter().find(|&&(n, _)| n == name).map(|&(_, c)| c)
    }

    /// Name of this colour if it is one of the named ones.
    pub fn name(&self) -> Option<&'static str> {
        NAMED.iter().find(|&&(_, c)| c == *self).map(|&(n, _)| n)
    }

    pub fn rgba(&self) -> [u8; 4] {
        [self.0, self.1, self.2, 255]
    }
}

impl FromStr for Colour {
    type Err = Error;

    /// Accept either a known name or `#rrggbb`.
    fn from_str(s: &str) -> Result<Colour, Error> {
        if let Some(hex) = s.trim().strip_prefix('#') {
            if hex.len() == 6 && hex.is_ascii() {
                let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);
                if let (Ok(r), Ok(g), Ok(b)) = (channel(0), channel(2), channel(4)) {
                    return Ok(Colour(r, g, b));
                }
            }
            return Err(Error::UnknownColour(s.to_string()));
        }
        Colour::from_name(s).ok_or_else(|| Error::UnknownColour(s.to_string()))
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}", name),
            None => write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2),
        }
    }
}

/// Hands out one colour per input file. Once every colour has been used the palette starts over
/// from the first one, so large folders still render (with repeated colours).
#[derive(Debug, Clone)]
pub struct Palette {
    colours: Vec<Colour>,
    next: usize,
}

impl Palette {
    /// Build a palette from colour names or hex values. An empty list falls back to the default.
    pub fn new<S: AsRef<str>>(names: &[S]) -> Result<Palette, Error> {
        let colours = names
            .iter()
            .map(|n| n.as_ref().parse())
            .collect::<Result<Vec<Colour>, Error>>()?;
        if colours.is_empty() {
            return Ok(Palette::default());
        }
        Ok(Palette { colours, next: 0 })
    }

    pub fn len(&self) -> usize {
        self.colours.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colours.is_empty()
    }

    /// Next colour in rotation.
    pub fn next_colour(&mut self) -> Colour {
        let idx = self.next % self.colours.len();
        if self.next == self.colours.len() {
            warn!("palette of {} colours exhausted, reusing colours", self.colours.len());
        }
        self.next += 1;
        self.colours[idx]
    }
}

impl Default for Palette {
    fn default() -> Palette {
        Palette {
            colours: DEFAULT_PALETTE
                .iter()
                .filter_map(|n| Colour::from_name(n))
                .collect(),
            next: 0,
        }
    }
}
