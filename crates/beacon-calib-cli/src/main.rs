use argh::FromArgs;
use std::path::PathBuf;

use beacon_calib::{
    batch::{calibrate_directory, calibrate_single, BatchOptions},
    io::{camera::read_camera_json, sidecar::SidecarDetector},
    FrequencyParams, Position3,
};

#[derive(FromArgs)]
/// Estimate beacon positions from calibration photographs
struct Args {
    /// calibration directory holding cal.txt and the *.jpg images, or a single
    /// image when --scene is given
    #[argh(positional)]
    path: PathBuf,

    /// path to the camera model (JSON)
    #[argh(option, short = 'c')]
    camera: PathBuf,

    /// scene file to calibrate a single image against
    #[argh(option, short = 's')]
    scene: Option<PathBuf>,

    /// detections below this frequency (Hz) are ignored
    #[argh(option, default = "FrequencyParams::default().min_frequency_hz")]
    min_frequency: f64,

    /// spacing of the frequency channels (Hz)
    #[argh(option, default = "FrequencyParams::default().frequency_step_hz")]
    frequency_step: f64,

    /// ask the detector to write its debugging artifacts
    #[argh(switch)]
    debug: bool,

    /// only process the first image of the directory
    #[argh(switch)]
    first_only: bool,

    /// write the averaged positions to this JSON file
    #[argh(option)]
    json: Option<PathBuf>,
}

fn format_position(p: &Position3) -> String {
    format!("[{:.6} {:.6} {:.6}]", p.x, p.y, p.z)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    let params = FrequencyParams {
        min_frequency_hz: args.min_frequency,
        frequency_step_hz: args.frequency_step,
    };
    params.validate()?;

    let camera = read_camera_json(&args.camera)?;
    let options = BatchOptions {
        debug: args.debug,
        first_only: args.first_only,
    };

    let result = match &args.scene {
        Some(scene) => calibrate_single(&args.path, scene, &camera, &SidecarDetector, &params, &options)?,
        None => calibrate_directory(&args.path, &camera, &SidecarDetector, &params, &options)?,
    };

    let summary = result.summarize();
    if summary.is_empty() {
        log::warn!("No beacons were found in {}", args.path.display());
    }

    for beacon in summary.iter() {
        println!(
            "Bulb {} ({} Hz):",
            beacon.name.as_deref().unwrap_or("unnamed"),
            beacon.channel
        );
        log::debug!("{:?}", result.samples(beacon.channel));
        println!("{}", format_position(&beacon.relative));
        println!("{}", format_position(&beacon.absolute));
    }

    if let Some(json_path) = &args.json {
        std::fs::write(json_path, serde_json::to_string_pretty(&summary)?)?;
        log::info!("Wrote {} beacons to {}", summary.len(), json_path.display());
    }

    Ok(())
}
