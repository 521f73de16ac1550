use serde::{Deserialize, Serialize};

use crate::camera::AngularCorrection;

/// A 3D position in metres with double precision coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position3 {
    /// x coordinate
    pub x: f64,
    /// y coordinate
    pub y: f64,
    /// z coordinate
    pub z: f64,
}

impl Position3 {
    /// Create a new position from its coordinates.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create a new position from an array of 3 f64 values.
    pub fn from_array(array: &[f64; 3]) -> Self {
        Self {
            x: array[0],
            y: array[1],
            z: array[2],
        }
    }

    /// Return the coordinates as an array.
    pub fn to_array(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Shift the horizontal coordinates, leaving z untouched.
    pub fn translate_xy(&self, offset: [f64; 2]) -> Self {
        Self {
            x: self.x + offset[0],
            y: self.y + offset[1],
            z: self.z,
        }
    }
}

/// Back-project a beacon from its centered pixel offset to a real-world offset.
///
/// The viewing angle on each axis is recovered with a pinhole model, shifted
/// by the camera's angular correction, and scaled by the known height of the
/// beacon above the camera.
///
/// # Arguments
///
/// * `pixel_offset` - The beacon offset from the image center in pixels (x right, y up).
/// * `focal_length` - The focal length in pixels.
/// * `correction` - The per-axis angular correction in radians.
/// * `known_height` - The vertical distance from the camera to the beacon.
///
/// # Returns
///
/// The beacon offset relative to the camera. The z coordinate is `known_height`.
pub fn locate_light(
    pixel_offset: [f64; 2],
    focal_length: f64,
    correction: &AngularCorrection,
    known_height: f64,
) -> Position3 {
    let atan_x = pixel_offset[0].atan2(focal_length);
    let atan_y = pixel_offset[1].atan2(focal_length);
    log::debug!("          atan(x): {} deg", atan_x.to_degrees());
    log::debug!("          atan(y): {} deg", atan_y.to_degrees());

    let atan_x = atan_x + correction.x;
    let atan_y = atan_y + correction.y;
    log::debug!("corrected atan(x): {} deg", atan_x.to_degrees());
    log::debug!("corrected atan(y): {} deg", atan_y.to_degrees());

    Position3 {
        x: atan_x.tan() * known_height,
        y: atan_y.tan() * known_height,
        z: known_height,
    }
}
