//! Time-to-collision estimators.
//!
//! Both estimators assume a constant closing velocity between the two frames
//! and return NaN when no estimate can be formed.

use log::{debug, warn};

use crate::config::{CameraTtcConfig, LidarTtcConfig};
use crate::detected_points::{Keypoint, KeypointMatch};
use crate::lidar::closest_distance;
use crate::types::LidarPoint;
use crate::util::median;

/// TTC from the shrinking distance to the closest in-lane lidar point.
pub fn compute_ttc_lidar(
    lidar_points_prev: &[LidarPoint],
    lidar_points_curr: &[LidarPoint],
    frame_rate: f64,
) -> f64 {
    compute_ttc_lidar_with(
        lidar_points_prev,
        lidar_points_curr,
        frame_rate,
        &LidarTtcConfig::default(),
    )
}

pub fn compute_ttc_lidar_with(
    lidar_points_prev: &[LidarPoint],
    lidar_points_curr: &[LidarPoint],
    frame_rate: f64,
    config: &LidarTtcConfig,
) -> f64 {
    let dt = 1.0 / frame_rate;
    let closest = |points: &[LidarPoint]| {
        closest_distance(points, config.window_lane_width, config.scan_lane_width)
    };
    let (Some(min_x_prev), Some(min_x_curr)) =
        (closest(lidar_points_prev), closest(lidar_points_curr))
    else {
        warn!("no lidar points in ego lane, ttc unavailable");
        return f64::NAN;
    };
    if (min_x_prev - min_x_curr).abs() <= f64::EPSILON {
        warn!("closest distance unchanged at {:.3} m, ttc unavailable", min_x_curr);
        return f64::NAN;
    }
    debug!("lidar min x prev {:.3} m curr {:.3} m", min_x_prev, min_x_curr);
    min_x_curr * dt / (min_x_prev - min_x_curr)
}

/// Ratios `dist_curr / dist_prev` over every unordered pair of matches.
pub fn distance_ratios(
    kpts_prev: &[Keypoint],
    kpts_curr: &[Keypoint],
    kpt_matches: &[KeypointMatch],
    min_dist: f64,
) -> crate::Result<Vec<f64>> {
    let points = kpt_matches
        .iter()
        .map(|m| m.points(kpts_prev, kpts_curr))
        .collect::<crate::Result<Vec<_>>>()?;

    let mut dist_ratios = Vec::new();
    for (i, (outer_prev, outer_curr)) in points.iter().enumerate() {
        for (inner_prev, inner_curr) in &points[i + 1..] {
            let dist_curr = outer_curr.distance(*inner_curr) as f64;
            let dist_prev = outer_prev.distance(*inner_prev) as f64;
            if dist_prev > f64::EPSILON && dist_curr >= min_dist {
                dist_ratios.push(dist_curr / dist_prev);
            }
        }
    }
    Ok(dist_ratios)
}

/// TTC from the median scale change between keypoint pairs.
pub fn compute_ttc_camera(
    kpts_prev: &[Keypoint],
    kpts_curr: &[Keypoint],
    kpt_matches: &[KeypointMatch],
    frame_rate: f64,
) -> crate::Result<f64> {
    compute_ttc_camera_with(
        kpts_prev,
        kpts_curr,
        kpt_matches,
        frame_rate,
        &CameraTtcConfig::default(),
    )
}

pub fn compute_ttc_camera_with(
    kpts_prev: &[Keypoint],
    kpts_curr: &[Keypoint],
    kpt_matches: &[KeypointMatch],
    frame_rate: f64,
    config: &CameraTtcConfig,
) -> crate::Result<f64> {
    let dist_ratios = distance_ratios(kpts_prev, kpts_curr, kpt_matches, config.min_kpt_dist)?;
    let Some(med_dist_ratio) = median(&dist_ratios) else {
        warn!(
            "no usable keypoint pairs among {} matches, ttc unavailable",
            kpt_matches.len()
        );
        return Ok(f64::NAN);
    };
    debug!(
        "median distance ratio {:.5} from {} pairs",
        med_dist_ratio,
        dist_ratios.len()
    );
    let dt = 1.0 / frame_rate;
    Ok(-dt / (1.0 - med_dist_ratio))
}
