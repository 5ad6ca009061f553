use glam::Vec2;
use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::types::LidarPoint;

/// Row-major matrices as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationConfig {
    /// intrinsic projection after rectification
    pub p_rect: [[f64; 4]; 3],
    /// rectifying rotation
    pub r_rect: [[f64; 4]; 4],
    /// lidar to camera
    pub rt: [[f64; 4]; 4],
}

impl Default for CalibrationConfig {
    /// KITTI sequence calibration for the left gray camera.
    fn default() -> Self {
        Self {
            p_rect: [
                [7.215377e+02, 0.000000e+00, 6.095593e+02, 0.000000e+00],
                [0.000000e+00, 7.215377e+02, 1.728540e+02, 0.000000e+00],
                [0.000000e+00, 0.000000e+00, 1.000000e+00, 0.000000e+00],
            ],
            r_rect: [
                [9.999239e-01, 9.837760e-03, -7.445048e-03, 0.0],
                [-9.869795e-03, 9.999421e-01, -4.278459e-03, 0.0],
                [7.402527e-03, 4.351614e-03, 9.999631e-01, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ],
            rt: [
                [7.533745e-03, -9.999714e-01, -6.166020e-04, -4.069766e-03],
                [1.480249e-02, 7.280733e-04, -9.998902e-01, -7.631618e-02],
                [9.998621e-01, 7.523790e-03, 1.480755e-02, -2.717806e-01],
                [0.0, 0.0, 0.0, 1.0],
            ],
        }
    }
}

/// Lidar to image projection chain `P_rect * R_rect * RT`.
#[derive(Debug, Clone)]
pub struct Calibration {
    pub p_rect: na::Matrix3x4<f64>,
    pub r_rect: na::Matrix4<f64>,
    pub rt: na::Matrix4<f64>,
    lidar_to_image: na::Matrix3x4<f64>,
}

impl Calibration {
    pub fn new(
        p_rect: na::Matrix3x4<f64>,
        r_rect: na::Matrix4<f64>,
        rt: na::Matrix4<f64>,
    ) -> Calibration {
        Calibration {
            p_rect,
            r_rect,
            rt,
            lidar_to_image: p_rect * r_rect * rt,
        }
    }

    pub fn from_config(config: &CalibrationConfig) -> Calibration {
        let p_rect = na::Matrix3x4::from_row_slice(config.p_rect.as_flattened());
        let r_rect = na::Matrix4::from_row_slice(config.r_rect.as_flattened());
        let rt = na::Matrix4::from_row_slice(config.rt.as_flattened());
        Self::new(p_rect, r_rect, rt)
    }

    pub fn to_config(&self) -> CalibrationConfig {
        let mut config = CalibrationConfig::default();
        for r in 0..3 {
            for c in 0..4 {
                config.p_rect[r][c] = self.p_rect[(r, c)];
            }
        }
        for r in 0..4 {
            for c in 0..4 {
                config.r_rect[r][c] = self.r_rect[(r, c)];
                config.rt[r][c] = self.rt[(r, c)];
            }
        }
        config
    }

    pub fn lidar_to_image(&self) -> &na::Matrix3x4<f64> {
        &self.lidar_to_image
    }

    /// Homogeneous image coordinates of a lidar point.
    pub fn project_homogeneous(&self, p: &LidarPoint) -> na::Vector3<f64> {
        self.lidar_to_image * na::Vector4::new(p.x, p.y, p.z, 1.0)
    }

    /// Pixel position of a lidar point. `None` when the point is on or
    /// behind the image plane.
    pub fn project_one(&self, p: &LidarPoint) -> Option<Vec2> {
        let y = self.project_homogeneous(p);
        if y[2] <= f64::EPSILON {
            return None;
        }
        Some(Vec2::new((y[0] / y[2]) as f32, (y[1] / y[2]) as f32))
    }
}

impl Default for Calibration {
    fn default() -> Self {
        Self::from_config(&CalibrationConfig::default())
    }
}
