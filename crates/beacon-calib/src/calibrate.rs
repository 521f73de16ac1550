use std::collections::BTreeMap;

use serde::Serialize;

use crate::camera::CameraModel;
use crate::detection::ImageFrame;
use crate::error::CalibrationError;
use crate::frequency::{
    filter_beacons, frequency_channel, normalize_frequency, FrequencyChannel, FrequencyParams,
};
use crate::locator::{locate_light, Position3};
use crate::scene::SceneConfig;

/// The position of one beacon as seen in one image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BeaconPosition {
    /// Offset from the camera
    pub relative: Position3,
    /// Relative offset plus the camera world position
    pub absolute: Position3,
}

/// Beacon positions found in a single image, by channel.
pub type ImageCalibration = BTreeMap<FrequencyChannel, BeaconPosition>;

/// Compute the position of every beacon detected in one image.
///
/// Detections below the frequency floor are dropped, the rest are snapped to
/// the channel grid and back-projected with the height the scene declares for
/// their channel.
///
/// # Arguments
///
/// * `frame` - The processed frame and its detections.
/// * `scene` - The scene the image was taken in.
/// * `camera` - The camera the image was taken with.
/// * `params` - The frequency thresholds.
///
/// # Returns
///
/// The relative and absolute position of each detected beacon. If two
/// detections snap to the same channel, the later one wins.
///
/// # Errors
///
/// * [`CalibrationError::InvalidFrequencyParams`] if the frequency step is not usable.
/// * [`CalibrationError::Orientation`] if the frame is not portrait.
/// * [`CalibrationError::UnknownCamera`] if the camera has no correction for the scene's camera id.
/// * [`CalibrationError::InsufficientConfig`] if more beacons survive than the scene declares.
/// * [`CalibrationError::UnknownBeacon`] if a beacon's channel is not in the scene.
pub fn calibrate_image(
    frame: &ImageFrame,
    scene: &SceneConfig,
    camera: &CameraModel,
    params: &FrequencyParams,
) -> Result<ImageCalibration, CalibrationError> {
    params.validate()?;
    frame.check_orientation()?;
    let correction = camera.correction(&scene.camera_id)?;

    let beacons = filter_beacons(frame.detections.clone(), params.min_frequency_hz);
    if beacons.len() > scene.num_beacons() {
        return Err(CalibrationError::InsufficientConfig {
            detected: beacons.len(),
            configured: scene.num_beacons(),
        });
    }

    let mut positions = ImageCalibration::new();
    for beacon in beacons.iter() {
        let normalized_hz = normalize_frequency(beacon.frequency_hz, params.frequency_step_hz);
        let (channel, known_height) = frequency_channel(normalized_hz)
            .and_then(|channel| Some((channel, scene.known_height(channel)?)))
            .ok_or(CalibrationError::UnknownBeacon {
                measured_hz: beacon.frequency_hz,
                normalized_hz,
            })?;

        let pixel_offset = frame.centered_offset(beacon);
        log::debug!(
            "Calibrate {} Hz light at {:?} px at height {} m",
            channel,
            pixel_offset,
            known_height
        );

        let relative = locate_light(pixel_offset, camera.focal_length_px, correction, known_height);
        let absolute = relative.translate_xy(scene.camera_world_position);

        if positions
            .insert(channel, BeaconPosition { relative, absolute })
            .is_some()
        {
            log::warn!("Several detections snap to {} Hz, keeping the last one", channel);
        }
    }

    Ok(positions)
}
