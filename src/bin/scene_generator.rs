use camera_lidar_ttc::calibration::Calibration;
use camera_lidar_ttc::io::object_to_json;
use camera_lidar_ttc::synthetic::{SceneConfig, generate_frame_pair};
use clap::{Parser, Subcommand};
use std::path::Path;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic frame pair of an approaching vehicle
    Generate {
        /// Output directory
        #[arg(short, long)]
        output: String,

        /// Distance to the vehicle in the previous frame (m)
        #[arg(short, long, default_value = "8.0")]
        distance: f64,

        /// Closing speed (m/s)
        #[arg(short, long, default_value = "5.0")]
        speed: f64,

        /// Frame rate (Hz)
        #[arg(short, long, default_value = "10.0")]
        frame_rate: f64,

        /// Random seed
        #[arg(long, default_value = "0")]
        seed: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    match args.command {
        Commands::Generate {
            output,
            distance,
            speed,
            frame_rate,
            seed,
        } => {
            let scene = SceneConfig {
                distance_prev: distance,
                closing_speed: speed,
                frame_rate,
                seed,
                ..Default::default()
            };
            generate_scene(&output, &scene)?;
        }
    }

    Ok(())
}

fn generate_scene(output_dir: &str, scene: &SceneConfig) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(output_dir)?;
    let calibration = Calibration::default();
    let pair = generate_frame_pair(scene, &calibration);

    let out = Path::new(output_dir);
    object_to_json(out.join("pair.json"), &pair)?;
    object_to_json(out.join("calibration.json"), &calibration.to_config())?;
    object_to_json(out.join("scene.json"), scene)?;

    println!(
        "Generated {} matches, true ttc {:.3} s, in {}",
        pair.matches.len(),
        scene.true_ttc(),
        output_dir
    );
    Ok(())
}
