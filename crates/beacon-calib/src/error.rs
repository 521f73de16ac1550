use std::path::PathBuf;

use crate::detection::DetectionError;
use crate::io::camera::CameraModelError;
use crate::io::scene::SceneError;

/// An error type for the calibration pipeline.
///
/// Every variant is fatal for the run: the batch stops at the first error.
#[derive(thiserror::Error, Debug)]
pub enum CalibrationError {
    /// The processed frame is not in portrait orientation.
    #[error("Processed image is not oriented correctly: width {width} >= height {height}")]
    Orientation {
        /// Frame width in pixels
        width: usize,
        /// Frame height in pixels
        height: usize,
    },

    /// A detected beacon does not map to any configured frequency channel.
    #[error("Beacon measured at {measured_hz} Hz snaps to {normalized_hz} Hz which is not a configured channel")]
    UnknownBeacon {
        /// The raw frequency reported by the detector
        measured_hz: f64,
        /// The frequency after snapping to the channel grid
        normalized_hz: f64,
    },

    /// More beacons survived filtering than the scene declares.
    #[error("{detected} beacons detected but the scene only declares {configured}")]
    InsufficientConfig {
        /// Number of beacons left after filtering
        detected: usize,
        /// Number of channels in the scene file
        configured: usize,
    },

    /// The camera model has no angular correction for the scene's camera id.
    #[error("No angular correction for camera id {0}")]
    UnknownCamera(String),

    /// The detector outputs are not index-aligned.
    #[error("Detector outputs are not aligned: {positions} positions, {radii} radii, {frequencies} frequencies")]
    MisalignedDetections {
        /// Number of pixel positions
        positions: usize,
        /// Number of radii
        radii: usize,
        /// Number of frequencies
        frequencies: usize,
    },

    /// The frequency thresholds cannot snap frequencies to channels.
    #[error("Invalid frequency parameters: {0}")]
    InvalidFrequencyParams(String),

    /// The calibration directory holds no images.
    #[error("No *.jpg images found in {0}")]
    NoImages(PathBuf),

    /// A failure while calibrating a specific image.
    #[error("Failed to calibrate {path}: {source}")]
    Image {
        /// The image being processed
        path: PathBuf,
        /// The underlying failure
        source: Box<CalibrationError>,
    },

    /// Error reading the scene file.
    #[error(transparent)]
    Scene(#[from] SceneError),

    /// Error reading the camera model.
    #[error(transparent)]
    Camera(#[from] CameraModelError),

    /// Error obtaining detections for an image.
    #[error(transparent)]
    Detection(#[from] DetectionError),

    /// Error listing the calibration directory.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),
}

impl CalibrationError {
    /// Attach the image path to an error raised while processing it.
    pub fn in_image(self, path: impl Into<PathBuf>) -> Self {
        CalibrationError::Image {
            path: path.into(),
            source: Box::new(self),
        }
    }
}
