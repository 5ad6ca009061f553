use serde::{Deserialize, Serialize};

use crate::matching::DEFAULT_OUTLIER_SIGMA;

/// Volume in front of the vehicle that lidar points must fall into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CropConfig {
    pub min_x: f64,
    pub max_x: f64,
    /// lateral half extent
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
    pub min_r: f64,
}

impl Default for CropConfig {
    fn default() -> Self {
        Self {
            min_x: 2.0,
            max_x: 20.0,
            max_y: 2.0,
            min_z: -1.5,
            max_z: -0.9,
            min_r: 0.1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LidarTtcConfig {
    /// Lane width used to compute the mean ± stdev distance window.
    pub window_lane_width: f64,
    /// Lane width used when scanning for the closest point.
    pub scan_lane_width: f64,
}

impl Default for LidarTtcConfig {
    fn default() -> Self {
        Self {
            window_lane_width: 2.0,
            scan_lane_width: 4.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTtcConfig {
    /// Minimum current-frame distance in pixels for a keypoint pair to vote.
    pub min_kpt_dist: f64,
    /// Matches farther than this many stdevs from the box mean are dropped.
    pub outlier_sigma: f64,
}

impl Default for CameraTtcConfig {
    fn default() -> Self {
        Self {
            min_kpt_dist: 5.0,
            outlier_sigma: DEFAULT_OUTLIER_SIGMA,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FusionConfig {
    pub frame_rate: f64,
    /// Fraction by which boxes are inset before lidar clustering.
    pub shrink_factor: f32,
    pub crop: CropConfig,
    pub lidar: LidarTtcConfig,
    pub camera: CameraTtcConfig,
}

impl Default for FusionConfig {
    fn default() -> Self {
        Self {
            frame_rate: 10.0,
            shrink_factor: 0.10,
            crop: CropConfig::default(),
            lidar: LidarTtcConfig::default(),
            camera: CameraTtcConfig::default(),
        }
    }
}
