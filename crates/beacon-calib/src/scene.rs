use std::collections::BTreeMap;

use crate::frequency::FrequencyChannel;

/// The scene description shared by every image of a calibration run.
///
/// Defines the closed set of beacons expected in the images.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    /// Camera position in world coordinates as (row, col)
    pub camera_world_position: [f64; 2],
    /// Identifier used to pick the camera's angular correction
    pub camera_id: String,
    /// Height of each beacon above the camera, by channel
    pub known_heights: BTreeMap<FrequencyChannel, f64>,
    /// Display name of each beacon, by channel
    pub names: BTreeMap<FrequencyChannel, String>,
}

impl SceneConfig {
    /// Create a scene without beacons.
    pub fn new(camera_world_position: [f64; 2], camera_id: impl Into<String>) -> Self {
        Self {
            camera_world_position,
            camera_id: camera_id.into(),
            known_heights: BTreeMap::new(),
            names: BTreeMap::new(),
        }
    }

    /// Declare a beacon. A repeated channel replaces the earlier entry.
    pub fn with_beacon(
        mut self,
        name: impl Into<String>,
        channel: FrequencyChannel,
        height: f64,
    ) -> Self {
        self.known_heights.insert(channel, height);
        self.names.insert(channel, name.into());
        self
    }

    /// Height of the beacon on `channel`, if configured.
    pub fn known_height(&self, channel: FrequencyChannel) -> Option<f64> {
        self.known_heights.get(&channel).copied()
    }

    /// Display name of the beacon on `channel`, if configured.
    pub fn name(&self, channel: FrequencyChannel) -> Option<&str> {
        self.names.get(&channel).map(String::as_str)
    }

    /// Number of configured channels.
    pub fn num_beacons(&self) -> usize {
        self.known_heights.len()
    }
}
