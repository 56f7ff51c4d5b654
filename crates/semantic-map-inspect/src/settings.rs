use clap::{Parser, Subcommand};
use glam::DMat4;
use semantic_map_lib::{Config, FaceColor, InterpolationMethod, utils};
use std::fs::File;
use std::io::BufReader;
use std::num::NonZeroUsize;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Semantic Map Inspect - Query lanes, crosswalks and signal faces of a semantic map document
pub struct Settings {
    /// Serialized map document to load
    #[clap(short, long, value_name = "FILE")]
    pub map: PathBuf,

    /// JSON file with the world-to-ECEF transform as a row-major 4x4 array (identity if omitted)
    #[clap(long, value_name = "FILE")]
    pub world_to_ecef: Option<PathBuf>,

    /// Maximum cached entries per geometry query
    #[clap(long, default_value = "100000")]
    pub cache_capacity: NonZeroUsize,

    /// Decode geometry on a single thread while building bounds
    #[clap(long, default_value = "false")]
    pub sequential: bool,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Element counts and overall bounds
    Summary,

    /// Decoded and resampled geometry of a lane
    Lane {
        /// Lane id
        id: String,

        /// Meters between samples, or the number of samples for fixed-count
        #[clap(short, long, default_value = "5.0")]
        step: f64,

        /// Resampling method (fixed-step-meters or fixed-count)
        #[clap(long, default_value = "fixed-count")]
        method: InterpolationMethod,
    },

    /// Decoded polygon of a crosswalk
    Crosswalk {
        /// Crosswalk id
        id: String,
    },

    /// Check whether a traffic control element is a signal face of a color
    Face {
        /// Traffic control element id
        id: String,

        /// red, yellow or green
        color: FaceColor,
    },
}

impl Settings {
    /// Library configuration for these settings
    pub fn config(&self) -> Config {
        Config {
            cache_capacity: self.cache_capacity,
            parallel_bounds: !self.sequential,
        }
    }

    /// Load the world-to-ECEF matrix, defaulting to identity
    pub fn world_to_ecef(&self) -> std::io::Result<DMat4> {
        match &self.world_to_ecef {
            Some(path) => {
                let file = BufReader::new(File::open(path)?);
                let rows: [[f64; 4]; 4] = serde_json::from_reader(file)?;
                Ok(utils::mat4_from_rows(rows))
            }
            None => Ok(DMat4::IDENTITY),
        }
    }
}
