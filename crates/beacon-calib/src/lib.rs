#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Beacon calibration
//!
//! Recovers the world position of modulated light beacons from photographs
//! taken by a camera at a known position, and averages the estimates over a
//! directory of photographs that share one scene description.
//!
//! ## Example: locate a single beacon
//!
//! ```rust
//! use beacon_calib::{camera::AngularCorrection, locator::locate_light};
//!
//! // a beacon 2 m above the camera, seen at 45 degrees on the x axis
//! let position = locate_light([1000.0, 0.0], 1000.0, &AngularCorrection::default(), 2.0);
//!
//! assert!((position.x - 2.0).abs() < 1e-9);
//! assert_eq!(position.y, 0.0);
//! assert_eq!(position.z, 2.0);
//! ```

/// Multi-image aggregation of beacon positions.
///
/// See [`batch::calibrate_directory`] for the directory-level entry point.
pub mod batch;

/// Per-image calibration of the detected beacons.
pub mod calibrate;

/// Camera model with per-camera angular correction.
pub mod camera;

/// Detection types and the beacon detector trait.
pub mod detection;

/// Error types for the calibration pipeline.
pub mod error;

/// Frequency snapping and plausibility filtering.
pub mod frequency;

/// Readers for scene files, camera models and detection sidecars.
pub mod io;

/// Pinhole back-projection of a beacon to a real-world offset.
pub mod locator;

/// Scene description shared by every image of a calibration run.
pub mod scene;

pub use batch::{calibrate_directory, BatchOptions, BeaconSummary, CalibrationResult};
pub use calibrate::{calibrate_image, BeaconPosition, ImageCalibration};
pub use camera::{AngularCorrection, CameraModel};
pub use detection::{BeaconDetector, ImageFrame, PixelDetection, RawDetections};
pub use error::CalibrationError;
pub use frequency::{FrequencyChannel, FrequencyParams};
pub use locator::Position3;
pub use scene::SceneConfig;
