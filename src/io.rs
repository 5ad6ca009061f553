use std::io::Write;
use std::path::Path;

use serde::{Serialize, de::DeserializeOwned};

use crate::calibration::{Calibration, CalibrationConfig};
use crate::config::FusionConfig;
use crate::report::TtcReport;

/// Serializes an object to a JSON file.
pub fn object_to_json<T: Serialize>(
    output_path: impl AsRef<Path>,
    object: &T,
) -> crate::Result<()> {
    let j = serde_json::to_string_pretty(object)?;
    let mut file = std::fs::File::create(output_path)?;
    file.write_all(j.as_bytes())?;
    Ok(())
}

/// Deserializes an object from a JSON file.
pub fn object_from_json<T: DeserializeOwned>(file_path: impl AsRef<Path>) -> crate::Result<T> {
    let contents = std::fs::read_to_string(file_path)?;
    Ok(serde_json::from_str(&contents)?)
}

pub fn load_calibration(file_path: impl AsRef<Path>) -> crate::Result<Calibration> {
    let config: CalibrationConfig = object_from_json(file_path)?;
    Ok(Calibration::from_config(&config))
}

/// Missing fields fall back to their defaults.
pub fn load_config(file_path: impl AsRef<Path>) -> crate::Result<FusionConfig> {
    object_from_json(file_path)
}

/// Writes the estimates of a frame pair as JSON.
pub fn write_report(output_path: impl AsRef<Path>, report: &TtcReport) -> crate::Result<()> {
    object_to_json(output_path, report)
}

/// Human readable one-line-per-object summary.
pub fn format_report(report: &TtcReport) -> String {
    let mut s = String::new();
    s += format!("frame rate: {} Hz\n\n", report.frame_rate).as_str();
    for obj in &report.objects {
        s += format!("box {}: {} lidar points", obj.box_id, obj.num_points).as_str();
        if let (Some(x_min), Some(y_width)) = (obj.x_min, obj.y_width) {
            s += format!(", xmin = {:.2} m, width = {:.2} m", x_min, y_width).as_str();
        }
        s += "\n";
    }
    s += "\n";
    for e in &report.estimates {
        s += format!("box {} -> {}:\n", e.prev_box_id, e.curr_box_id).as_str();
        s += format!("    ttc lidar : {}\n", fmt_ttc(e.lidar())).as_str();
        s += format!("    ttc camera: {}\n", fmt_ttc(e.camera())).as_str();
    }
    s
}

fn fmt_ttc(ttc: Option<f64>) -> String {
    match ttc {
        Some(t) => format!("{:.3} s", t),
        None => "unavailable".to_string(),
    }
}
