use log::{debug, trace};

use crate::calibration::Calibration;
use crate::config::CropConfig;
use crate::types::{BoundingBox, LidarPoint};
use crate::util::mean_stdev;

/// Keep only points inside the configured volume in front of the vehicle.
pub fn crop_lidar_points(points: &[LidarPoint], crop: &CropConfig) -> Vec<LidarPoint> {
    let cropped: Vec<LidarPoint> = points
        .iter()
        .filter(|p| {
            p.x >= crop.min_x
                && p.x <= crop.max_x
                && p.y.abs() <= crop.max_y
                && p.z >= crop.min_z
                && p.z <= crop.max_z
                && p.r >= crop.min_r
        })
        .copied()
        .collect();
    trace!("cropped lidar points {} -> {}", points.len(), cropped.len());
    cropped
}

/// Assign every lidar point whose projection falls into exactly one shrunk
/// box to that box. Points inside several boxes or none are dropped.
pub fn cluster_lidar_with_roi(
    bounding_boxes: &mut [BoundingBox],
    lidar_points: &[LidarPoint],
    shrink_factor: f32,
    calibration: &Calibration,
) {
    let shrunk: Vec<_> = bounding_boxes
        .iter()
        .map(|b| b.roi.shrink(shrink_factor))
        .collect();

    let mut assigned = 0usize;
    for p in lidar_points {
        let Some(pt) = calibration.project_one(p) else {
            continue;
        };
        let mut enclosing = shrunk
            .iter()
            .enumerate()
            .filter(|(_, roi)| roi.contains(pt))
            .map(|(i, _)| i);
        if let (Some(i), None) = (enclosing.next(), enclosing.next()) {
            bounding_boxes[i].lidar_points.push(*p);
            assigned += 1;
        }
    }
    debug!(
        "clustered {}/{} lidar points into {} boxes",
        assigned,
        lidar_points.len(),
        bounding_boxes.len()
    );
}

/// Distance window `[mean - stdev, mean + stdev]` of the points inside the
/// lane. `None` if no point lies in the lane.
pub fn x_limits(points: &[LidarPoint], lane_width: f64) -> Option<(f64, f64)> {
    let distances: Vec<f64> = points
        .iter()
        .filter(|p| p.y.abs() <= lane_width / 2.0)
        .map(|p| p.x)
        .collect();
    if distances.is_empty() {
        return None;
    }
    let (mean, stdev) = mean_stdev(&distances);
    Some((mean - stdev, mean + stdev))
}

/// Closest in-lane distance among the points strictly inside the window
/// computed with `window_lane_width`. A zero-spread lane (a single point, or
/// all points at one distance) yields no distance.
pub fn closest_distance(
    points: &[LidarPoint],
    window_lane_width: f64,
    scan_lane_width: f64,
) -> Option<f64> {
    let (lower, upper) = x_limits(points, window_lane_width)?;
    points
        .iter()
        .filter(|p| p.y.abs() <= scan_lane_width / 2.0)
        .filter(|p| lower < p.x && p.x < upper)
        .map(|p| p.x)
        .min_by(|a, b| a.total_cmp(b))
}
