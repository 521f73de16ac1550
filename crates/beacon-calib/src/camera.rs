use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::CalibrationError;

/// A static per-axis offset added to the viewing angle, in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AngularCorrection {
    /// Correction along the image x axis
    pub x: f64,
    /// Correction along the image y axis
    pub y: f64,
}

/// The camera parameters used to back-project beacons.
///
/// Loaded once per run and shared read-only by every image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraModel {
    /// The focal length in pixels
    pub focal_length_px: f64,
    /// Angular correction indexed by camera identifier
    #[serde(default)]
    pub angular_correction: BTreeMap<String, AngularCorrection>,
}

impl CameraModel {
    /// Create a camera model without any correction entries.
    pub fn new(focal_length_px: f64) -> Self {
        Self {
            focal_length_px,
            angular_correction: BTreeMap::new(),
        }
    }

    /// Register the angular correction of one camera.
    pub fn with_correction(mut self, camera_id: impl Into<String>, correction: AngularCorrection) -> Self {
        self.angular_correction.insert(camera_id.into(), correction);
        self
    }

    /// Look up the angular correction of a camera.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::UnknownCamera`] if the camera has no entry.
    pub fn correction(&self, camera_id: &str) -> Result<&AngularCorrection, CalibrationError> {
        self.angular_correction
            .get(camera_id)
            .ok_or_else(|| CalibrationError::UnknownCamera(camera_id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camera_correction_lookup() -> Result<(), CalibrationError> {
        let camera = CameraModel::new(5300.0).with_correction(
            "back",
            AngularCorrection { x: 0.01, y: -0.02 },
        );

        let correction = camera.correction("back")?;
        assert_eq!(correction.x, 0.01);
        assert_eq!(correction.y, -0.02);
        Ok(())
    }

    #[test]
    fn test_camera_unknown_id() {
        let camera = CameraModel::new(5300.0);
        assert!(matches!(
            camera.correction("front"),
            Err(CalibrationError::UnknownCamera(id)) if id == "front"
        ));
    }
}
