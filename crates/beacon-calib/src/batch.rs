use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::calibrate::{calibrate_image, BeaconPosition, ImageCalibration};
use crate::camera::CameraModel;
use crate::detection::BeaconDetector;
use crate::error::CalibrationError;
use crate::frequency::{FrequencyChannel, FrequencyParams};
use crate::io::scene::read_scene_txt;
use crate::locator::Position3;
use crate::scene::SceneConfig;

/// Name of the scene file inside a calibration directory.
pub const SCENE_FILE_NAME: &str = "cal.txt";

/// Options controlling a calibration run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Ask the detector to emit its debugging artifacts.
    pub debug: bool,
    /// Stop after the first image.
    pub first_only: bool,
}

/// The averaged position of one beacon over a calibration run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BeaconSummary {
    /// The beacon's frequency channel in Hz
    pub channel: FrequencyChannel,
    /// The beacon's display name from the scene file
    pub name: Option<String>,
    /// Number of images the beacon was seen in
    pub num_samples: usize,
    /// Mean offset from the camera
    pub relative: Position3,
    /// Mean world position
    pub absolute: Position3,
}

/// Beacon positions accumulated over the images of a calibration run.
///
/// Samples are appended per channel while images are processed and only
/// reduced to a mean by [`CalibrationResult::summarize`].
#[derive(Debug, Clone, Default)]
pub struct CalibrationResult {
    samples: BTreeMap<FrequencyChannel, Vec<BeaconPosition>>,
    names: BTreeMap<FrequencyChannel, String>,
}

impl CalibrationResult {
    /// Create an empty result carrying the display names of the beacons.
    pub fn new(names: BTreeMap<FrequencyChannel, String>) -> Self {
        Self {
            samples: BTreeMap::new(),
            names,
        }
    }

    /// Append the positions found in one image.
    pub fn push_image(&mut self, image: ImageCalibration) {
        for (channel, position) in image {
            self.samples.entry(channel).or_default().push(position);
        }
    }

    /// The samples collected for `channel`, in image order.
    pub fn samples(&self, channel: FrequencyChannel) -> &[BeaconPosition] {
        self.samples.get(&channel).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Channels with at least one sample, ascending.
    pub fn channels(&self) -> impl Iterator<Item = FrequencyChannel> + '_ {
        self.samples.keys().copied()
    }

    /// Display name of the beacon on `channel`, if known.
    pub fn name(&self, channel: FrequencyChannel) -> Option<&str> {
        self.names.get(&channel).map(String::as_str)
    }

    /// Reduce every channel to its mean position, channels ascending.
    pub fn summarize(&self) -> Vec<BeaconSummary> {
        self.samples
            .iter()
            .filter_map(|(&channel, samples)| {
                Some(BeaconSummary {
                    channel,
                    name: self.names.get(&channel).cloned(),
                    num_samples: samples.len(),
                    relative: mean_position(samples.iter().map(|s| s.relative))?,
                    absolute: mean_position(samples.iter().map(|s| s.absolute))?,
                })
            })
            .collect()
    }
}

/// Arithmetic mean of each coordinate, or `None` for no positions.
pub fn mean_position(positions: impl IntoIterator<Item = Position3>) -> Option<Position3> {
    let (sum, count) = positions
        .into_iter()
        .fold(([0.0; 3], 0usize), |(mut sum, count), p| {
            sum[0] += p.x;
            sum[1] += p.y;
            sum[2] += p.z;
            (sum, count + 1)
        });

    if count == 0 {
        return None;
    }

    let n = count as f64;
    Some(Position3::new(sum[0] / n, sum[1] / n, sum[2] / n))
}

/// Detect and calibrate the beacons of one image.
///
/// Errors are tagged with the image path.
pub fn calibrate_image_file<D: BeaconDetector + ?Sized>(
    image_path: &Path,
    scene: &SceneConfig,
    camera: &CameraModel,
    detector: &D,
    params: &FrequencyParams,
    debug: bool,
) -> Result<ImageCalibration, CalibrationError> {
    let run = || -> Result<ImageCalibration, CalibrationError> {
        let frame = detector.detect(image_path, camera, debug)?.into_frame()?;
        calibrate_image(&frame, scene, camera, params)
    };
    run().map_err(|e| e.in_image(image_path))
}

/// Calibrate every image and accumulate the positions per channel.
///
/// The first failing image aborts the run.
///
/// # Arguments
///
/// * `image_paths` - The images to process, in processing order.
/// * `scene` - The scene shared by all images.
/// * `camera` - The camera shared by all images.
/// * `detector` - The beacon detector.
/// * `params` - The frequency thresholds.
/// * `options` - The run options.
pub fn aggregate<P, D>(
    image_paths: &[P],
    scene: &SceneConfig,
    camera: &CameraModel,
    detector: &D,
    params: &FrequencyParams,
    options: &BatchOptions,
) -> Result<CalibrationResult, CalibrationError>
where
    P: AsRef<Path>,
    D: BeaconDetector + ?Sized,
{
    params.validate()?;
    let mut result = CalibrationResult::new(scene.names.clone());

    for image_path in image_paths {
        let image_path = image_path.as_ref();
        log::info!(
            "Calibrate using image {} taken with {} at {:?}",
            image_path.display(),
            scene.camera_id,
            scene.camera_world_position
        );

        let positions =
            calibrate_image_file(image_path, scene, camera, detector, params, options.debug)?;

        for (channel, position) in positions.iter() {
            let rel = position.relative;
            log::info!(
                "{} Hz: [{:.3}, {:.3}, {:.3}]",
                channel,
                rel.x,
                rel.y,
                rel.z
            );
        }

        result.push_image(positions);

        if options.first_only {
            break;
        }
    }

    Ok(result)
}

/// List the `*.jpg` images of a directory, in directory order.
///
/// Hidden files (names starting with `.`, such as `._IMG_0001.jpg` resource
/// forks) are not images.
pub fn list_images(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>, CalibrationError> {
    let mut images = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "jpg") {
            images.push(path);
        }
    }
    Ok(images)
}

/// Run a calibration over a directory.
///
/// The directory holds the scene file `cal.txt` and the `*.jpg` images to
/// average over.
///
/// # Errors
///
/// [`CalibrationError::NoImages`] if the directory holds no images, or the
/// first error raised while reading the scene or processing an image.
pub fn calibrate_directory<D: BeaconDetector + ?Sized>(
    dir: impl AsRef<Path>,
    camera: &CameraModel,
    detector: &D,
    params: &FrequencyParams,
    options: &BatchOptions,
) -> Result<CalibrationResult, CalibrationError> {
    let dir = dir.as_ref();
    log::info!("Averaging images in {}", dir.display());

    let scene = read_scene_txt(dir.join(SCENE_FILE_NAME))?;
    let images = list_images(dir)?;
    if images.is_empty() {
        return Err(CalibrationError::NoImages(dir.to_path_buf()));
    }

    aggregate(&images, &scene, camera, detector, params, options)
}

/// Run a calibration over a single image with an explicit scene file.
pub fn calibrate_single<D: BeaconDetector + ?Sized>(
    image_path: impl AsRef<Path>,
    scene_path: impl AsRef<Path>,
    camera: &CameraModel,
    detector: &D,
    params: &FrequencyParams,
    options: &BatchOptions,
) -> Result<CalibrationResult, CalibrationError> {
    let scene = read_scene_txt(scene_path)?;
    aggregate(&[image_path], &scene, camera, detector, params, options)
}
