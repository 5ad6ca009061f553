use camera_lidar_ttc::calibration::{Calibration, CalibrationConfig};
use camera_lidar_ttc::config::FusionConfig;
use camera_lidar_ttc::io::{
    format_report, load_calibration, load_config, object_from_json, object_to_json, write_report,
};
use camera_lidar_ttc::pipeline::TtcEstimate;
use camera_lidar_ttc::report::{BoxSummary, TtcReport};
use camera_lidar_ttc::synthetic::{SceneConfig, generate_frame_pair};
use camera_lidar_ttc::types::{FramePair, LidarPoint};
use tempfile::TempDir;

#[test]
fn test_partial_config_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    std::fs::write(&path, r#"{"frame_rate": 20.0, "lidar": {"scan_lane_width": 2.0}}"#).unwrap();

    let config = load_config(&path).unwrap();
    let default = FusionConfig::default();
    assert_eq!(config.frame_rate, 20.0);
    assert_eq!(config.lidar.scan_lane_width, 2.0);
    assert_eq!(config.lidar.window_lane_width, default.lidar.window_lane_width);
    assert_eq!(config.crop, default.crop);
    assert_eq!(config.camera, default.camera);
    assert_eq!(config.shrink_factor, default.shrink_factor);
}

#[test]
fn test_config_round_trip() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.json");
    let mut config = FusionConfig::default();
    config.camera.min_kpt_dist = 100.0;
    config.crop.max_x = 30.0;
    object_to_json(&path, &config).unwrap();
    let loaded: FusionConfig = object_from_json(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_calibration_file() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("calibration.json");
    let calibration = Calibration::default();
    object_to_json(&path, &calibration.to_config()).unwrap();

    let loaded = load_calibration(&path).unwrap();
    assert!((loaded.lidar_to_image() - calibration.lidar_to_image()).norm() < 1e-9);
    // row-major on disk
    let config: CalibrationConfig = object_from_json(&path).unwrap();
    assert_eq!(config.p_rect[0][2], calibration.p_rect[(0, 2)]);
    assert_eq!(config.rt[2][0], calibration.rt[(2, 0)]);
}

#[test]
fn test_kitti_calibration_projects_forward_point_near_principal_point() {
    let calibration = Calibration::default();
    let px = calibration
        .project_one(&LidarPoint::new(20.0, 0.0, 0.0, 0.0))
        .unwrap();
    assert!((px.x - 609.6).abs() < 20.0);
    assert!((px.y - 172.9).abs() < 20.0);
}

#[test]
fn test_frame_pair_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pair.json");
    let pair = generate_frame_pair(&SceneConfig::default(), &Calibration::default());
    object_to_json(&path, &pair).unwrap();
    let loaded: FramePair = object_from_json(&path).unwrap();
    assert_eq!(loaded.matches, pair.matches);
    assert_eq!(loaded.prev.keypoints, pair.prev.keypoints);
    assert_eq!(loaded.curr.bounding_boxes.len(), pair.curr.bounding_boxes.len());
}

#[test]
fn test_minimal_frame_pair_json() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("pair.json");
    let json = r#"{
        "prev": {
            "keypoints": [{"pt": [1.0, 2.0]}],
            "bounding_boxes": [{"box_id": 3, "roi": {"x": 0.0, "y": 0.0, "width": 10.0, "height": 10.0}}]
        },
        "curr": {"keypoints": [{"pt": [1.5, 2.5]}], "bounding_boxes": []},
        "matches": [{"query_idx": 0, "train_idx": 0}]
    }"#;
    std::fs::write(&path, json).unwrap();
    let pair: FramePair = object_from_json(&path).unwrap();
    assert_eq!(pair.prev.bounding_boxes[0].box_id, 3);
    assert!(pair.prev.bounding_boxes[0].lidar_points.is_empty());
    assert!((pair.curr.keypoints[0].pt.y - 2.5).abs() < 1e-6);
}

#[test]
fn test_missing_file_is_error() {
    let result = load_config("non_existent_path/config.json");
    assert!(result.is_err());
}

#[test]
fn test_write_report_nan_as_null() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().join("report.json");
    let report = TtcReport {
        time_ns_prev: 0,
        time_ns_curr: 100_000_000,
        frame_rate: 10.0,
        objects: vec![BoxSummary {
            box_id: 0,
            num_points: 12,
            x_min: Some(7.5),
            y_width: Some(1.4),
        }],
        estimates: vec![TtcEstimate {
            prev_box_id: 0,
            curr_box_id: 0,
            ttc_lidar: 1.5,
            ttc_camera: f64::NAN,
            lidar_points_prev: 10,
            lidar_points_curr: 12,
            kpt_matches: 1,
        }],
    };
    write_report(&output_path, &report).unwrap();

    let content = std::fs::read_to_string(&output_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert!(json["estimates"].is_array());
    assert_eq!(json["estimates"][0]["ttc_lidar"].as_f64(), Some(1.5));
    assert!(json["estimates"][0]["ttc_camera"].is_null());

    let text = format_report(&report);
    assert!(text.contains("ttc lidar : 1.500 s"));
    assert!(text.contains("ttc camera: unavailable"));
}
