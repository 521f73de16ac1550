use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::camera::CameraModel;
use crate::error::CalibrationError;

/// One beacon observation reported by the detector.
///
/// Coordinates have their origin at the top-left corner of the frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelDetection {
    /// Column of the blob centroid in pixels
    pub pixel_x: f64,
    /// Row of the blob centroid in pixels
    pub pixel_y: f64,
    /// Radius of the blob in pixels
    pub radius: f64,
    /// Dominant blink frequency in Hz
    pub frequency_hz: f64,
}

/// A processed frame and the beacons detected in it.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFrame {
    /// Frame width in pixels
    pub width: usize,
    /// Frame height in pixels
    pub height: usize,
    /// Detections in detector order
    pub detections: Vec<PixelDetection>,
}

impl ImageFrame {
    /// Check that the frame is in portrait orientation.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::Orientation`] unless `height > width`.
    pub fn check_orientation(&self) -> Result<(), CalibrationError> {
        if self.height > self.width {
            Ok(())
        } else {
            Err(CalibrationError::Orientation {
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Offset of a detection from the frame center, x right and y up.
    ///
    /// The lens mirrors the scene vertically, so rows are flipped.
    pub fn centered_offset(&self, detection: &PixelDetection) -> [f64; 2] {
        // integer center, as reported by the detector's frame shape
        let center_col = (self.width / 2) as f64;
        let center_row = (self.height / 2) as f64;
        [
            detection.pixel_x - center_col,
            center_row - detection.pixel_y,
        ]
    }
}

/// The raw output of a beacon detector for one image.
///
/// The i-th entry of `positions`, `radii` and `frequencies` describe the same
/// blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawDetections {
    /// Blob centroids as (row, col)
    pub positions: Vec<[f64; 2]>,
    /// Blob radii in pixels
    pub radii: Vec<f64>,
    /// Dominant blink frequencies in Hz
    pub frequencies: Vec<f64>,
    /// Frame shape as (height, width) after any rotation done by the detector
    pub frame_shape: [usize; 2],
}

impl RawDetections {
    /// Zip the index-aligned detector outputs into an [`ImageFrame`].
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::MisalignedDetections`] if the outputs differ in length.
    pub fn into_frame(self) -> Result<ImageFrame, CalibrationError> {
        let (n_pos, n_radii, n_freqs) = (
            self.positions.len(),
            self.radii.len(),
            self.frequencies.len(),
        );
        if n_pos != n_radii || n_pos != n_freqs {
            return Err(CalibrationError::MisalignedDetections {
                positions: n_pos,
                radii: n_radii,
                frequencies: n_freqs,
            });
        }

        let detections = self
            .positions
            .iter()
            .zip(self.radii.iter())
            .zip(self.frequencies.iter())
            .map(|((&[row, col], &radius), &frequency_hz)| PixelDetection {
                pixel_x: col,
                pixel_y: row,
                radius,
                frequency_hz,
            })
            .collect();

        Ok(ImageFrame {
            width: self.frame_shape[1],
            height: self.frame_shape[0],
            detections,
        })
    }
}

/// An error type for beacon detectors.
#[derive(thiserror::Error, Debug)]
pub enum DetectionError {
    /// The detection data for an image does not exist.
    #[error("Detections do not exist: {0}")]
    FileDoesNotExist(PathBuf),

    /// Error reading the detection data.
    #[error("Failed to read detections. {0}")]
    FileError(#[from] std::io::Error),

    /// Error decoding the detection data.
    #[error("Failed to decode detections. {0}")]
    DecodeError(#[from] serde_json::Error),

    /// Failure reported by an external detector.
    #[error("Detector failed: {0}")]
    Detector(String),
}

/// Locates modulated beacons in a photograph.
///
/// Implementations find light blobs and measure their blink frequency. The
/// calibration pipeline only consumes their output.
pub trait BeaconDetector {
    /// Detect the beacons in one image.
    ///
    /// # Arguments
    ///
    /// * `image_path` - The photograph to process.
    /// * `camera` - The camera the photograph was taken with.
    /// * `debug` - Whether the detector should emit debugging artifacts.
    fn detect(
        &self,
        image_path: &Path,
        camera: &CameraModel,
        debug: bool,
    ) -> Result<RawDetections, DetectionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_frame() -> Result<(), CalibrationError> {
        let raw = RawDetections {
            positions: vec![[100.0, 200.0], [300.0, 50.0]],
            radii: vec![4.0, 6.0],
            frequencies: vec![1500.0, 2000.0],
            frame_shape: [1000, 600],
        };
        let frame = raw.into_frame()?;

        assert_eq!(frame.width, 600);
        assert_eq!(frame.height, 1000);
        assert_eq!(frame.detections.len(), 2);
        assert_eq!(frame.detections[0].pixel_x, 200.0);
        assert_eq!(frame.detections[0].pixel_y, 100.0);
        assert_eq!(frame.detections[1].radius, 6.0);
        assert_eq!(frame.detections[1].frequency_hz, 2000.0);
        Ok(())
    }

    #[test]
    fn test_into_frame_misaligned() {
        let raw = RawDetections {
            positions: vec![[100.0, 200.0]],
            radii: vec![4.0, 6.0],
            frequencies: vec![1500.0],
            frame_shape: [1000, 600],
        };
        assert!(matches!(
            raw.into_frame(),
            Err(CalibrationError::MisalignedDetections {
                positions: 1,
                radii: 2,
                frequencies: 1
            })
        ));
    }

    #[test]
    fn test_check_orientation() {
        let frame = |width, height| ImageFrame {
            width,
            height,
            detections: Vec::new(),
        };
        assert!(frame(600, 1000).check_orientation().is_ok());
        assert!(matches!(
            frame(1000, 600).check_orientation(),
            Err(CalibrationError::Orientation {
                width: 1000,
                height: 600
            })
        ));
        assert!(frame(800, 800).check_orientation().is_err());
    }

    #[test]
    fn test_centered_offset() {
        let frame = ImageFrame {
            width: 600,
            height: 1000,
            detections: Vec::new(),
        };
        let detection = PixelDetection {
            pixel_x: 400.0,
            pixel_y: 100.0,
            radius: 1.0,
            frequency_hz: 1500.0,
        };
        // right of center, near the top of the frame
        assert_eq!(frame.centered_offset(&detection), [100.0, 400.0]);
    }

    #[test]
    fn test_centered_offset_odd_size() {
        let frame = ImageFrame {
            width: 5,
            height: 7,
            detections: Vec::new(),
        };
        let detection = PixelDetection {
            pixel_x: 2.0,
            pixel_y: 3.0,
            radius: 1.0,
            frequency_hz: 1500.0,
        };
        assert_eq!(frame.centered_offset(&detection), [0.0, 0.0]);
    }
}
