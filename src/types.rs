use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::detected_points::{Keypoint, KeypointMatch};

/// Single lidar return. x forward, y left, z up, in meters.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LidarPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// reflectivity
    #[serde(default)]
    pub r: f64,
}

impl LidarPoint {
    pub fn new(x: f64, y: f64, z: f64, r: f64) -> LidarPoint {
        LidarPoint { x, y, z, r }
    }
}

/// Axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Roi {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Roi {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Roi {
        Roi {
            x,
            y,
            width,
            height,
        }
    }

    /// Half-open containment, `x <= p.x < x + width`.
    pub fn contains(&self, p: Vec2) -> bool {
        self.x <= p.x && p.x < self.x + self.width && self.y <= p.y && p.y < self.y + self.height
    }

    /// Inset the rectangle about its center so that width and height
    /// shrink by `shrink_factor`.
    pub fn shrink(&self, shrink_factor: f32) -> Roi {
        Roi {
            x: self.x + shrink_factor * self.width / 2.0,
            y: self.y + shrink_factor * self.height / 2.0,
            width: self.width * (1.0 - shrink_factor),
            height: self.height * (1.0 - shrink_factor),
        }
    }
}

/// Object detection with everything associated to it during one frame pair.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub box_id: u32,
    pub roi: Roi,
    #[serde(default)]
    pub class_id: i32,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub lidar_points: Vec<LidarPoint>,
    #[serde(default)]
    pub kpt_matches: Vec<KeypointMatch>,
}

impl BoundingBox {
    pub fn new(box_id: u32, roi: Roi) -> BoundingBox {
        BoundingBox {
            box_id,
            roi,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataFrame {
    #[serde(default)]
    pub time_ns: i64,
    pub keypoints: Vec<Keypoint>,
    pub bounding_boxes: Vec<BoundingBox>,
    #[serde(default)]
    pub lidar_points: Vec<LidarPoint>,
    /// matches to the previous frame
    #[serde(default)]
    pub kpt_matches: Vec<KeypointMatch>,
    /// previous box id -> current box id
    #[serde(default)]
    pub bb_matches: BTreeMap<u32, u32>,
}

impl DataFrame {
    pub fn find_box(&self, box_id: u32) -> Option<&BoundingBox> {
        self.bounding_boxes.iter().find(|b| b.box_id == box_id)
    }
}

/// Two consecutive frames and the keypoint matches between them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FramePair {
    pub prev: DataFrame,
    pub curr: DataFrame,
    pub matches: Vec<KeypointMatch>,
}
