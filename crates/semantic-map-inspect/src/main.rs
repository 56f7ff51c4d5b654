mod settings;

use clap::Parser;
use geo::Rect;
use semantic_map_lib::{
    CacheStats, CrosswalkCoords, FaceColor, InterpolationMethod, LaneCoords, LaneInterpolation,
    MapApi, MapError, MapInfo,
};
use serde::Serialize;
use settings::{Command, Settings};
use std::io::Write;

#[derive(Debug, thiserror::Error)]
enum InspectError {
    #[error(transparent)]
    Map(#[from] MapError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Serialize)]
struct Summary {
    #[serde(flatten)]
    info: MapInfo,
    total_bounds: Option<Rect<f64>>,
    cache: CacheStats,
}

#[derive(Serialize)]
struct LaneReport<'a> {
    id: &'a str,
    coords: &'a LaneCoords,
    traffic_control_ids: &'a [String],
    step: f64,
    method: InterpolationMethod,
    interpolation: &'a LaneInterpolation,
}

#[derive(Serialize)]
struct CrosswalkReport<'a> {
    id: &'a str,
    coords: &'a CrosswalkCoords,
}

#[derive(Serialize)]
struct FaceReport<'a> {
    id: &'a str,
    color: FaceColor,
    matches: bool,
}

/// Initialize logging, with a helpful default if RUST_LOG is not set
fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn print_json<T: Serialize>(value: &T) -> Result<(), InspectError> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

fn run(settings: Settings) -> Result<(), InspectError> {
    let world_to_ecef = settings.world_to_ecef()?;
    let map = MapApi::from_file(&settings.map, world_to_ecef, settings.config())?;

    match settings.command {
        Command::Summary => print_json(&Summary {
            info: map.get_info(),
            total_bounds: map.bounds().total_bounds(),
            cache: map.cache_stats(),
        }),
        Command::Lane { id, step, method } => {
            let coords = map.get_lane_coords(&id)?;
            let traffic_control_ids = map.get_lane_traffic_control_ids(&id)?;
            let interpolation = map.get_lane_as_interpolation(&id, step, method)?;
            print_json(&LaneReport {
                id: &id,
                coords: &coords,
                traffic_control_ids: &traffic_control_ids,
                step,
                method,
                interpolation: &interpolation,
            })
        }
        Command::Crosswalk { id } => {
            let coords = map.get_crosswalk_coords(&id)?;
            print_json(&CrosswalkReport {
                id: &id,
                coords: &coords,
            })
        }
        Command::Face { id, color } => print_json(&FaceReport {
            matches: map.is_traffic_face_color(&id, color)?,
            id: &id,
            color,
        }),
    }
}

fn main() {
    setup_logging();
    let settings = match Settings::try_parse() {
        Ok(settings) => settings,
        Err(e) => e.exit(),
    };

    if let Err(e) = run(settings) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}
