use std::path::{Path, PathBuf};

use crate::camera::CameraModel;
use crate::detection::{BeaconDetector, DetectionError, RawDetections};

/// A detector that reads precomputed detections from JSON sidecar files.
///
/// The detections of `photo.jpg` are read from `photo.json` in the same
/// directory, in the [`RawDetections`] layout:
///
/// ```json
/// {
///   "positions": [[1210.0, 640.5]],
///   "radii": [14.2],
///   "frequencies": [1508.3],
///   "frame_shape": [2592, 1456]
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct SidecarDetector;

impl SidecarDetector {
    /// Path of the sidecar holding the detections of `image_path`.
    pub fn sidecar_path(image_path: &Path) -> PathBuf {
        image_path.with_extension("json")
    }
}

impl BeaconDetector for SidecarDetector {
    fn detect(
        &self,
        image_path: &Path,
        _camera: &CameraModel,
        _debug: bool,
    ) -> Result<RawDetections, DetectionError> {
        let path = Self::sidecar_path(image_path);
        if !path.exists() {
            return Err(DetectionError::FileDoesNotExist(path));
        }

        let contents = std::fs::read_to_string(&path)?;
        let detections = serde_json::from_str(&contents)?;
        log::debug!("Read detections for {} from {}", image_path.display(), path.display());

        Ok(detections)
    }
}

/// Write detections as the sidecar of `image_path`.
pub fn write_detections_json(
    image_path: &Path,
    detections: &RawDetections,
) -> Result<(), DetectionError> {
    let contents = serde_json::to_string_pretty(detections)?;
    std::fs::write(SidecarDetector::sidecar_path(image_path), contents)?;
    Ok(())
}
