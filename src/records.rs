use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde_derive::Deserialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::types::TrackPoint;

/// One line of a GPS log. The logger writes 13 comma separated fields with no header row; only
/// the position and the source label are used for drawing.
#[derive(Debug, Clone, Deserialize)]
pub struct GpsRecord {
    pub timestamp: String,
    pub day_of_week: String,
    pub year: String,
    pub month: String,
    pub day: String,
    pub hour: String,
    pub minute: String,
    pub second: String,
    pub timezone: String,
    pub latitude: f64,
    pub longitude: f64,
    pub speed: String,
    pub source: String,
}

impl GpsRecord {
    pub fn point(&self) -> TrackPoint {
        TrackPoint::new(self.latitude, self.longitude)
    }
}

/// Fixes read from one log, in recording order.
#[derive(Debug, Clone, Default)]
pub struct TrackLog {
    /// Source label of the first record, if any record parsed.
    pub source: Option<String>,
    pub points: Vec<TrackPoint>,
    /// Lines that could not be parsed as a record at all.
    pub skipped: usize,
}

/// Parse GPS records from any reader. Lines that do not parse are counted and skipped, the same as
/// fixes with an impossible position.
pub fn read_records<R: Read>(reader: R) -> std::result::Result<TrackLog, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut log = TrackLog::default();
    for (line, result) in rdr.deserialize::<GpsRecord>().enumerate() {
        match result {
            Ok(rec) => {
                if log.source.is_none() {
                    log.source = Some(rec.source.clone());
                }
                log.points.push(rec.point());
            }
            Err(e) => {
                if matches!(e.kind(), csv::ErrorKind::Io(_)) {
                    return Err(e);
                }
                debug!("skipping malformed record on line {}: {}", line + 1, e);
                log.skipped += 1;
            }
        }
    }
    Ok(log)
}

/// Read a GPS log file. A missing or unreadable file is an error.
pub fn read_log<P: AsRef<Path>>(path: P) -> Result<TrackLog> {
    let path = path.as_ref();
    let csv_err = |e| Error::Csv {
        path: path.to_path_buf(),
        source: e,
    };
    let file = File::open(path).map_err(|e| csv_err(csv::Error::from(e)))?;
    read_records(file).map_err(csv_err)
}
