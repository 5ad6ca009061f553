use serde::{Deserialize, Serialize};

use crate::pipeline::TtcEstimate;
use crate::types::BoundingBox;

/// Top-view statistics of the lidar points clustered into one box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxSummary {
    pub box_id: u32,
    pub num_points: usize,
    /// closest forward distance in meters
    pub x_min: Option<f64>,
    /// lateral extent in meters
    pub y_width: Option<f64>,
}

impl BoxSummary {
    pub fn from_box(bounding_box: &BoundingBox) -> BoxSummary {
        let pts = &bounding_box.lidar_points;
        let x_min = pts.iter().map(|p| p.x).min_by(|a, b| a.total_cmp(b));
        let y_min = pts.iter().map(|p| p.y).min_by(|a, b| a.total_cmp(b));
        let y_max = pts.iter().map(|p| p.y).max_by(|a, b| a.total_cmp(b));
        BoxSummary {
            box_id: bounding_box.box_id,
            num_points: pts.len(),
            x_min,
            y_width: y_min.zip(y_max).map(|(lo, hi)| hi - lo),
        }
    }
}

pub fn summarize_boxes(bounding_boxes: &[BoundingBox]) -> Vec<BoxSummary> {
    bounding_boxes.iter().map(BoxSummary::from_box).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct TtcReport {
    pub time_ns_prev: i64,
    pub time_ns_curr: i64,
    pub frame_rate: f64,
    pub objects: Vec<BoxSummary>,
    /// NaN estimates are written as `null`
    pub estimates: Vec<TtcEstimate>,
}
