use std::path::Path;

use crate::camera::CameraModel;

/// An error type for the camera model reader.
#[derive(thiserror::Error, Debug)]
pub enum CameraModelError {
    /// Error when the file does not exist.
    #[error("Camera model does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// Error to decode the camera model.
    #[error("Failed to decode the camera model. {0}")]
    DecodeError(#[from] serde_json::Error),

    /// The focal length is not a positive finite number.
    #[error("Invalid focal length: {0}")]
    InvalidFocalLength(f64),
}

/// Read a camera model from a JSON file.
///
/// The document holds the focal length in pixels and the angular correction
/// in radians of each camera id:
///
/// ```json
/// {
///   "focal_length_px": 5298.0,
///   "angular_correction": { "back": { "x": 0.012, "y": -0.004 } }
/// }
/// ```
pub fn read_camera_json(file_path: impl AsRef<Path>) -> Result<CameraModel, CameraModelError> {
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(CameraModelError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let contents = std::fs::read_to_string(file_path)?;
    parse_camera_json(&contents)
}

/// Decode a camera model from a JSON string.
pub fn parse_camera_json(contents: &str) -> Result<CameraModel, CameraModelError> {
    let camera: CameraModel = serde_json::from_str(contents)?;
    if !(camera.focal_length_px.is_finite() && camera.focal_length_px > 0.0) {
        return Err(CameraModelError::InvalidFocalLength(camera.focal_length_px));
    }
    Ok(camera)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_camera_json() -> Result<(), CameraModelError> {
        let camera = parse_camera_json(
            r#"{
                "focal_length_px": 5298.0,
                "angular_correction": {
                    "back": { "x": 0.012, "y": -0.004 },
                    "test": { "x": 0.0, "y": 0.0 }
                }
            }"#,
        )?;

        assert_eq!(camera.focal_length_px, 5298.0);
        assert_eq!(camera.angular_correction.len(), 2);
        assert_eq!(camera.angular_correction["back"].x, 0.012);
        assert_eq!(camera.angular_correction["back"].y, -0.004);
        Ok(())
    }

    #[test]
    fn test_parse_camera_json_invalid_focal_length() {
        assert!(matches!(
            parse_camera_json(r#"{ "focal_length_px": 0.0 }"#),
            Err(CameraModelError::InvalidFocalLength(_))
        ));
        assert!(matches!(
            parse_camera_json(r#"{ "angular_correction": {} }"#),
            Err(CameraModelError::DecodeError(_))
        ));
    }

    #[test]
    fn test_read_camera_json_missing() {
        assert!(matches!(
            read_camera_json("/nonexistent/camera.json"),
            Err(CameraModelError::FileDoesNotExist(_))
        ));
    }
}
