use std::fs;
use std::path::Path;

use gpsvis::{draw_folder, write_output, Bounds, Colour, OutputMode, Palette, Raster, RenderSession};

const WHITE: Colour = Colour(255, 255, 255);
const BLUE: Colour = Colour(0, 0, 255);
const RED: Colour = Colour(255, 0, 0);

fn record(lat: f64, lon: f64, source: &str) -> String {
    format!("1530425005,Sun,2018,7,1,16,3,25,AEST,{},{},10.0,{}\n", lat, lon, source)
}

fn write_log(path: &Path, source: &str, points: &[(f64, f64)]) {
    let body: String = points.iter().map(|&(lat, lon)| record(lat, lon, source)).collect();
    fs::write(path, body).unwrap();
}

fn open_session(dir: &Path) -> RenderSession {
    let map = dir.join("map.png");
    Raster::new(100, 100, WHITE).unwrap().save(&map).unwrap();
    RenderSession::open(Bounds::from_corners(1.0, 0.0, 0.0, 1.0), &map).unwrap()
}

#[test]
fn folder_draws_logs_in_name_order() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("logs");
    fs::create_dir(&logs).unwrap();
    // b is written first; a must still be drawn first.
    write_log(&logs.join("b.log"), "bravo", &[(0.5, 0.3), (0.5, 0.7)]);
    write_log(
        &logs.join("a.log"),
        "alpha",
        &[(0.5, 0.1), (91.0, 0.5), (0.5, 181.0), (0.5, 0.9)],
    );
    write_log(&logs.join("c.txt"), "charlie", &[(0.1, 0.1), (0.9, 0.9)]);

    let mut session = open_session(dir.path());
    let mut palette = Palette::default();
    draw_folder(&mut session, &logs, "log", &mut palette, 1).unwrap();

    let legend = session.legend();
    assert_eq!(legend.len(), 2);
    assert_eq!(legend[0].label, "alpha");
    assert_eq!(legend[0].colour, BLUE);
    assert_eq!(legend[1].label, "bravo");
    assert_eq!(legend[1].colour, RED);

    let r = session.raster();
    // bravo overlaps alpha in the middle and was drawn last.
    assert_eq!(r.pixel(50, 50), Some(RED.rgba()));
    assert_eq!(r.pixel(15, 50), Some(BLUE.rgba()));
    assert_eq!(r.pixel(85, 50), Some(BLUE.rgba()));
    // c.txt was skipped: nothing on its diagonal off the middle row.
    assert_eq!(r.pixel(20, 80), Some(WHITE.rgba()));
}

#[test]
fn single_fix_log_draws_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("logs");
    fs::create_dir(&logs).unwrap();
    write_log(&logs.join("one.log"), "solo", &[(0.5, 0.5), (95.0, 0.5)]);

    let mut session = open_session(dir.path());
    draw_folder(&mut session, &logs, "log", &mut Palette::default(), 3).unwrap();
    assert_eq!(session.legend().len(), 1);
    assert_eq!(session.raster(), session.base());
}

#[test]
fn unreadable_map_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.png");
    assert!(RenderSession::open(Bounds::default(), &missing).is_err());
}

#[test]
fn raw_output_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let logs = dir.path().join("logs");
    fs::create_dir(&logs).unwrap();
    write_log(&logs.join("a.log"), "alpha", &[(0.9, 0.1), (0.1, 0.9)]);

    let mut session = open_session(dir.path());
    draw_folder(&mut session, &logs, "log", &mut Palette::default(), 2).unwrap();
    let bounds = *session.bounds();
    let rendered = session.finish();
    let out = dir.path().join("out.png");
    write_output(&rendered, &bounds, "logs", &out, OutputMode::Raw).unwrap();
    assert_eq!(Raster::open(&out).unwrap(), rendered.raster);
}
