//! Synthetic frame pairs of a vehicle approaching in the ego lane.
//!
//! The preceding vehicle is modelled as a flat rear surface facing the
//! sensor. Lidar returns and keypoints are sampled on that surface and
//! projected with the same calibration the pipeline uses, so the true TTC of
//! the generated pair is `distance_curr / closing_speed`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::calibration::Calibration;
use crate::detected_points::{Keypoint, KeypointMatch};
use crate::types::{BoundingBox, DataFrame, FramePair, LidarPoint, Roi};

const GROUND_Z: f64 = -1.73;
const ROOF_Z: f64 = -0.3;
const BACKGROUND_DISTANCE: f64 = 60.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// distance to the rear of the vehicle in the previous frame, meters
    pub distance_prev: f64,
    /// meters per second, positive when approaching
    pub closing_speed: f64,
    pub frame_rate: f64,
    pub vehicle_width: f64,
    pub lidar_rows: usize,
    pub lidar_cols: usize,
    /// uniform range noise, meters
    pub lidar_noise: f64,
    pub num_keypoints: usize,
    pub num_background_keypoints: usize,
    /// uniform pixel noise
    pub pixel_noise: f32,
    pub image_width: u32,
    pub image_height: u32,
    pub seed: u64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            distance_prev: 8.0,
            closing_speed: 5.0,
            frame_rate: 10.0,
            vehicle_width: 1.8,
            lidar_rows: 6,
            lidar_cols: 30,
            lidar_noise: 0.01,
            num_keypoints: 60,
            num_background_keypoints: 40,
            pixel_noise: 0.5,
            image_width: 1242,
            image_height: 375,
            seed: 0,
        }
    }
}

impl SceneConfig {
    pub fn distance_curr(&self) -> f64 {
        self.distance_prev - self.closing_speed / self.frame_rate
    }

    pub fn true_ttc(&self) -> f64 {
        self.distance_curr() / self.closing_speed
    }
}

/// Pixel rectangle enclosing the vehicle's rear surface at `distance`.
fn vehicle_roi(calibration: &Calibration, distance: f64, half_width: f64) -> Option<Roi> {
    let corners = [
        LidarPoint::new(distance, half_width, GROUND_Z, 0.0),
        LidarPoint::new(distance, -half_width, GROUND_Z, 0.0),
        LidarPoint::new(distance, half_width, ROOF_Z, 0.0),
        LidarPoint::new(distance, -half_width, ROOF_Z, 0.0),
    ];
    let px: Vec<Vec2> = corners
        .iter()
        .map(|c| calibration.project_one(c))
        .collect::<Option<_>>()?;
    let min = px.iter().fold(Vec2::splat(f32::MAX), |a, p| a.min(*p));
    let max = px.iter().fold(Vec2::splat(f32::MIN), |a, p| a.max(*p));
    Some(Roi::new(min.x, min.y, max.x - min.x, max.y - min.y))
}

fn lidar_returns(config: &SceneConfig, distance: f64, rng: &mut ChaCha8Rng) -> Vec<LidarPoint> {
    let half_width = config.vehicle_width / 2.0 - 0.2;
    let mut points = Vec::with_capacity(config.lidar_rows * config.lidar_cols + config.lidar_cols);
    for r in 0..config.lidar_rows {
        let z = -1.45 + 0.5 * r as f64 / (config.lidar_rows.max(2) - 1) as f64;
        for c in 0..config.lidar_cols {
            let y =
                -half_width + 2.0 * half_width * c as f64 / (config.lidar_cols.max(2) - 1) as f64;
            let noise = uniform_noise(config.lidar_noise, rng);
            points.push(LidarPoint::new(distance + noise, y, z, 0.5));
        }
    }
    // ground returns below the vehicle, removed by the crop
    for c in 0..config.lidar_cols {
        let y = -2.0 + 4.0 * c as f64 / (config.lidar_cols.max(2) - 1) as f64;
        points.push(LidarPoint::new(distance - 1.0, y, GROUND_Z, 0.3));
    }
    points
}

/// Sample from `[-amplitude, amplitude]`; zero for a non-positive or
/// non-finite amplitude.
fn uniform_noise(amplitude: f64, rng: &mut ChaCha8Rng) -> f64 {
    if amplitude > 0.0 && amplitude.is_finite() {
        rng.random_range(-amplitude..=amplitude)
    } else {
        0.0
    }
}

fn jitter(p: Vec2, noise: f32, rng: &mut ChaCha8Rng) -> Vec2 {
    if !(noise > 0.0 && noise.is_finite()) {
        return p;
    }
    p + Vec2::new(
        rng.random_range(-noise..=noise),
        rng.random_range(-noise..=noise),
    )
}

/// Generate a frame pair with one tracked vehicle (box id 0).
pub fn generate_frame_pair(config: &SceneConfig, calibration: &Calibration) -> FramePair {
    let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
    let d_prev = config.distance_prev;
    let d_curr = config.distance_curr();
    let half_width = config.vehicle_width / 2.0;
    // keypoints keep a 10 cm margin to the vehicle's sides
    let kpt_half_width = (half_width - 0.1).max(0.0);

    let mut frames = [d_prev, d_curr].map(|d| {
        let mut frame = DataFrame {
            lidar_points: lidar_returns(config, d, &mut rng),
            ..Default::default()
        };
        if let Some(roi) = vehicle_roi(calibration, d, half_width) {
            frame.bounding_boxes.push(BoundingBox {
                confidence: 0.9,
                ..BoundingBox::new(0, roi)
            });
        }
        frame
    });
    let dt_ns = (1e9 / config.frame_rate) as i64;
    frames[1].time_ns = dt_ns;

    let mut matches = Vec::new();
    let mut push_match = |frames: &mut [DataFrame; 2], p_prev: Vec2, p_curr: Vec2| {
        matches.push(KeypointMatch::new(
            frames[0].keypoints.len(),
            frames[1].keypoints.len(),
        ));
        frames[0].keypoints.push(Keypoint::new(p_prev.x, p_prev.y));
        frames[1].keypoints.push(Keypoint::new(p_curr.x, p_curr.y));
    };

    for _ in 0..config.num_keypoints {
        let y = rng.random_range(-kpt_half_width..=kpt_half_width);
        let z = rng.random_range(GROUND_Z + 0.1..ROOF_Z - 0.1);
        let projected = (
            calibration.project_one(&LidarPoint::new(d_prev, y, z, 0.0)),
            calibration.project_one(&LidarPoint::new(d_curr, y, z, 0.0)),
        );
        if let (Some(p), Some(c)) = projected {
            let p = jitter(p, config.pixel_noise, &mut rng);
            let c = jitter(c, config.pixel_noise, &mut rng);
            push_match(&mut frames, p, c);
        }
    }

    let in_any_box =
        |frame: &DataFrame, pt: Vec2| frame.bounding_boxes.iter().any(|b| b.roi.contains(pt));
    let mut added = 0;
    let mut attempts = 0;
    let max_attempts = config.num_background_keypoints * 20;
    while added < config.num_background_keypoints && attempts < max_attempts {
        attempts += 1;
        let y = rng.random_range(-10.0..10.0);
        let z = rng.random_range(GROUND_Z..3.0);
        let travelled = d_prev - d_curr;
        let projected = (
            calibration.project_one(&LidarPoint::new(BACKGROUND_DISTANCE, y, z, 0.0)),
            calibration.project_one(&LidarPoint::new(BACKGROUND_DISTANCE - travelled, y, z, 0.0)),
        );
        let (Some(p), Some(c)) = projected else {
            continue;
        };
        let in_image = |q: Vec2| {
            q.x >= 0.0
                && q.y >= 0.0
                && q.x < config.image_width as f32
                && q.y < config.image_height as f32
        };
        if !in_image(p) || !in_image(c) || in_any_box(&frames[0], p) || in_any_box(&frames[1], c) {
            continue;
        }
        push_match(&mut frames, p, c);
        added += 1;
    }

    let [prev, curr] = frames;
    FramePair {
        prev,
        curr,
        matches,
    }
}
