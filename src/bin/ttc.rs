use camera_lidar_ttc::calibration::Calibration;
use camera_lidar_ttc::config::FusionConfig;
use camera_lidar_ttc::io::{
    format_report, load_calibration, load_config, object_from_json, write_report,
};
use camera_lidar_ttc::pipeline::FusionPipeline;
use camera_lidar_ttc::report::{TtcReport, summarize_boxes};
use camera_lidar_ttc::types::FramePair;
use clap::Parser;
use std::time::Instant;

#[derive(Parser)]
#[command(version, about, author)]
struct TtcCli {
    /// path to a frame pair json
    path: String,

    /// calibration json, KITTI calibration if omitted
    #[arg(short, long)]
    calibration: Option<String>,

    /// fusion config json
    #[arg(long)]
    config: Option<String>,

    /// override the frame rate of the config
    #[arg(short, long)]
    frame_rate: Option<f64>,

    /// write a json report here
    #[arg(short, long)]
    output: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = TtcCli::parse();

    let calibration = match &cli.calibration {
        Some(path) => load_calibration(path)?,
        None => Calibration::default(),
    };
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => FusionConfig::default(),
    };
    if let Some(frame_rate) = cli.frame_rate {
        config.frame_rate = frame_rate;
    }

    let FramePair {
        mut prev,
        mut curr,
        matches,
    } = object_from_json(&cli.path)?;
    log::info!(
        "loaded {} / {} keypoints, {} matches, {} / {} boxes",
        prev.keypoints.len(),
        curr.keypoints.len(),
        matches.len(),
        prev.bounding_boxes.len(),
        curr.bounding_boxes.len()
    );

    let now = Instant::now();
    let pipeline = FusionPipeline::new(calibration, config);
    pipeline.prepare_frame(&mut prev);
    pipeline.prepare_frame(&mut curr);
    let estimates = pipeline.process(&prev, &mut curr, &matches)?;
    log::debug!("fusion took {:.6} sec", now.elapsed().as_secs_f64());

    let report = TtcReport {
        time_ns_prev: prev.time_ns,
        time_ns_curr: curr.time_ns,
        frame_rate: pipeline.config.frame_rate,
        objects: summarize_boxes(&curr.bounding_boxes),
        estimates,
    };
    println!("{}", format_report(&report));
    if let Some(output) = &cli.output {
        write_report(output, &report)?;
        log::info!("report written to {}", output);
    }
    Ok(())
}
