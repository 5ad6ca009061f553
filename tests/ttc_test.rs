use camera_lidar_ttc::config::{CameraTtcConfig, LidarTtcConfig};
use camera_lidar_ttc::detected_points::{Keypoint, KeypointMatch};
use camera_lidar_ttc::error::{Error, FrameSide};
use camera_lidar_ttc::ttc::{
    compute_ttc_camera, compute_ttc_camera_with, compute_ttc_lidar, compute_ttc_lidar_with,
    distance_ratios,
};
use camera_lidar_ttc::types::LidarPoint;

fn points_at(xs: &[f64]) -> Vec<LidarPoint> {
    xs.iter().map(|&x| LidarPoint::new(x, 0.0, -1.2, 0.5)).collect()
}

#[test]
fn test_ttc_lidar_closest_points() {
    // window of prev is [9.6, 11.2] and of curr [7.6, 9.2], minimum 10 and 8
    let prev = points_at(&[10.0, 10.0, 10.0, 10.0, 12.0]);
    let curr = points_at(&[8.0, 8.0, 8.0, 8.0, 10.0]);
    let ttc = compute_ttc_lidar(&prev, &curr, 10.0);
    assert!((ttc - 0.4).abs() < 1e-9);
}

#[test]
fn test_ttc_lidar_zero_spread_is_unavailable() {
    // the window collapses to a point and its edge is excluded
    let ttc = compute_ttc_lidar(&points_at(&[10.0]), &points_at(&[8.0]), 10.0);
    assert!(ttc.is_nan());
    let ttc = compute_ttc_lidar(&points_at(&[10.0, 10.0]), &points_at(&[8.0, 8.0]), 10.0);
    assert!(ttc.is_nan());
}

#[test]
fn test_ttc_lidar_two_points_per_frame_is_unavailable() {
    // with two points the nearer one lies exactly on mean - stdev
    let ttc = compute_ttc_lidar(&points_at(&[10.0, 12.0]), &points_at(&[8.0, 10.0]), 10.0);
    assert!(ttc.is_nan());
}

#[test]
fn test_ttc_lidar_ignores_points_outside_lane() {
    let mut prev = points_at(&[10.0, 10.0, 10.0, 10.0, 12.0]);
    let mut curr = points_at(&[8.0, 8.0, 8.0, 8.0, 10.0]);
    // close object in the neighbouring lane
    prev.push(LidarPoint::new(3.0, 3.5, -1.2, 0.5));
    curr.push(LidarPoint::new(2.0, 3.5, -1.2, 0.5));
    let ttc = compute_ttc_lidar(&prev, &curr, 10.0);
    assert!((ttc - 0.4).abs() < 1e-9);
}

#[test]
fn test_ttc_lidar_unavailable() {
    // nothing in the ego lane
    let off_lane = vec![LidarPoint::new(10.0, 5.0, -1.2, 0.5)];
    let curr = points_at(&[8.0, 8.0, 8.0, 8.0, 10.0]);
    assert!(compute_ttc_lidar(&off_lane, &curr, 10.0).is_nan());
    assert!(compute_ttc_lidar(&[], &[], 10.0).is_nan());
    // no relative motion
    assert!(compute_ttc_lidar(&curr, &curr, 10.0).is_nan());
}

#[test]
fn test_ttc_lidar_receding_is_negative() {
    let prev = points_at(&[8.0, 8.0, 8.0, 8.0, 10.0]);
    let curr = points_at(&[10.0, 10.0, 10.0, 10.0, 12.0]);
    let ttc = compute_ttc_lidar(&prev, &curr, 10.0);
    assert!(ttc < 0.0);
}

#[test]
fn test_ttc_lidar_with_narrow_scan_lane() {
    // windows (9.6, 11.2) and (7.6, 9.2) from the points at y = 0
    let mut prev = points_at(&[10.0, 10.0, 10.0, 10.0, 12.0]);
    let mut curr = points_at(&[8.0, 8.0, 8.0, 8.0, 10.0]);
    prev.push(LidarPoint::new(9.8, 1.5, -1.2, 0.5));
    curr.push(LidarPoint::new(7.8, 1.5, -1.2, 0.5));

    let wide = compute_ttc_lidar(&prev, &curr, 10.0);
    assert!((wide - 0.39).abs() < 1e-9);

    let config = LidarTtcConfig {
        window_lane_width: 2.0,
        scan_lane_width: 2.0,
    };
    let narrow = compute_ttc_lidar_with(&prev, &curr, 10.0, &config);
    assert!((narrow - 0.4).abs() < 1e-9);
}

#[test]
fn test_ttc_camera_distance_ratio_two() {
    let kpts_prev = vec![Keypoint::new(0.0, 0.0), Keypoint::new(10.0, 0.0)];
    let kpts_curr = vec![Keypoint::new(0.0, 0.0), Keypoint::new(20.0, 0.0)];
    let matches = vec![KeypointMatch::new(0, 0), KeypointMatch::new(1, 1)];
    let ttc = compute_ttc_camera(&kpts_prev, &kpts_curr, &matches, 10.0).unwrap();
    assert!((ttc - 0.1).abs() < 1e-9);
}

#[test]
fn test_ttc_camera_median_ratio() {
    // three pairs with ratios 1.1, 1.1 and an outlier
    let kpts_prev = vec![
        Keypoint::new(0.0, 0.0),
        Keypoint::new(100.0, 0.0),
        Keypoint::new(0.0, 100.0),
    ];
    let kpts_curr = vec![
        Keypoint::new(0.0, 0.0),
        Keypoint::new(110.0, 0.0),
        Keypoint::new(0.0, 300.0),
    ];
    let matches = vec![
        KeypointMatch::new(0, 0),
        KeypointMatch::new(1, 1),
        KeypointMatch::new(2, 2),
    ];
    let ratios = distance_ratios(&kpts_prev, &kpts_curr, &matches, 5.0).unwrap();
    assert_eq!(ratios.len(), 3);
    let ttc = compute_ttc_camera(&kpts_prev, &kpts_curr, &matches, 10.0).unwrap();
    // median of {1.1, 3.0, ~2.26} is ~2.26
    let ratio_12 = (110.0f64.powi(2) + 300.0f64.powi(2)).sqrt() / (2.0f64).sqrt() / 100.0;
    let expected = -0.1 / (1.0 - ratio_12);
    assert!((ttc - expected).abs() < 1e-4);
}

#[test]
fn test_ttc_camera_no_ratios_is_nan() {
    let kpts_prev = vec![Keypoint::new(0.0, 0.0)];
    let kpts_curr = vec![Keypoint::new(1.0, 1.0)];
    let matches = vec![KeypointMatch::new(0, 0)];
    let ttc = compute_ttc_camera(&kpts_prev, &kpts_curr, &matches, 10.0).unwrap();
    assert!(ttc.is_nan());

    let ttc = compute_ttc_camera(&kpts_prev, &kpts_curr, &[], 10.0).unwrap();
    assert!(ttc.is_nan());
}

#[test]
fn test_ttc_camera_min_distance_guard() {
    let kpts_prev = vec![Keypoint::new(0.0, 0.0), Keypoint::new(10.0, 0.0)];
    let kpts_curr = vec![Keypoint::new(0.0, 0.0), Keypoint::new(20.0, 0.0)];
    let matches = vec![KeypointMatch::new(0, 0), KeypointMatch::new(1, 1)];
    let config = CameraTtcConfig {
        min_kpt_dist: 100.0,
        ..Default::default()
    };
    let ttc = compute_ttc_camera_with(&kpts_prev, &kpts_curr, &matches, 10.0, &config).unwrap();
    assert!(ttc.is_nan());
}

#[test]
fn test_ttc_camera_coincident_prev_keypoints_skipped() {
    let kpts_prev = vec![Keypoint::new(5.0, 5.0), Keypoint::new(5.0, 5.0)];
    let kpts_curr = vec![Keypoint::new(0.0, 0.0), Keypoint::new(20.0, 0.0)];
    let matches = vec![KeypointMatch::new(0, 0), KeypointMatch::new(1, 1)];
    let ratios = distance_ratios(&kpts_prev, &kpts_curr, &matches, 5.0).unwrap();
    assert!(ratios.is_empty());
}

#[test]
fn test_ttc_camera_index_out_of_range() {
    let kpts = vec![Keypoint::new(0.0, 0.0), Keypoint::new(10.0, 0.0)];
    let matches = vec![KeypointMatch::new(0, 0), KeypointMatch::new(1, 7)];
    let result = compute_ttc_camera(&kpts, &kpts, &matches, 10.0);
    match result {
        Err(Error::KeypointIndexOutOfRange { side, index, len }) => {
            assert_eq!(side, FrameSide::Curr);
            assert_eq!(index, 7);
            assert_eq!(len, 2);
        }
        other => panic!("unexpected result {:?}", other),
    }
}
