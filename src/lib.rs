pub mod calibration;
pub mod config;
pub mod detected_points;
pub mod error;
pub mod io;
pub mod lidar;
pub mod matching;
pub mod pipeline;
pub mod report;
pub mod synthetic;
pub mod ttc;
pub mod types;
pub mod util;

pub use error::{Error, Result};
