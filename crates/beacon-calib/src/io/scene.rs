use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

use crate::frequency::FrequencyChannel;
use crate::scene::SceneConfig;

/// Error types for the scene file reader.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    /// Error reading the file
    #[error("Failed to read scene file {path}: {source}")]
    IoError {
        /// The scene file being read
        path: PathBuf,
        /// The underlying I/O failure
        source: std::io::Error,
    },

    /// Parse error on a given line
    #[error("Parse error on line {line}: {message}")]
    ParseError {
        /// 1-based line number
        line: usize,
        /// What went wrong
        message: String,
    },

    /// A required header line is absent
    #[error("Scene file has no {0} line")]
    MissingField(&'static str),
}

/// Read a scene file (`cal.txt`) and return its [`SceneConfig`].
///
/// # Arguments
///
/// * `path` - The path to the scene file.
///
/// # Returns
///
/// The parsed scene description.
pub fn read_scene_txt(path: impl AsRef<Path>) -> Result<SceneConfig, SceneError> {
    let path = path.as_ref();
    let io_error = |source| SceneError::IoError {
        path: path.to_path_buf(),
        source,
    };

    // open the file and create a buffered reader
    let file = File::open(path).map_err(io_error)?;
    let reader = BufReader::new(file);

    let lines = reader
        .lines()
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_error)?;
    parse_scene_lines(lines.iter().map(String::as_str))
}

/// Parse the contents of a scene file.
///
/// The format is line oriented:
///
/// ```text
/// # comment
/// CAM_POS: <col> <row>
/// CAM_ID: <camera id>
/// <name> <frequency channel> <height>
/// ```
///
/// NOTE: `CAM_POS:` lists the camera position as (col, row) but it is stored
///       as (row, col).
pub fn parse_scene_str(contents: &str) -> Result<SceneConfig, SceneError> {
    parse_scene_lines(contents.lines())
}

fn parse_scene_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Result<SceneConfig, SceneError> {
    let mut camera_world_position = None;
    let mut camera_id = None;
    let mut beacons = Vec::new();

    for (idx, line) in lines.enumerate() {
        let line_no = idx + 1;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let parts = line.split_whitespace().collect::<Vec<_>>();
        match parts[0] {
            "CAM_POS:" => {
                if parts.len() < 3 {
                    return Err(parse_error(line_no, "CAM_POS: needs two coordinates"));
                }
                let col: f64 = parse_part(parts[1], line_no)?;
                let row: f64 = parse_part(parts[2], line_no)?;
                camera_world_position = Some([row, col]);
            }
            "CAM_ID:" => {
                let id = parts
                    .get(1)
                    .ok_or_else(|| parse_error(line_no, "CAM_ID: needs an identifier"))?;
                camera_id = Some(id.to_string());
            }
            name => {
                if parts.len() < 3 {
                    return Err(parse_error(
                        line_no,
                        format!("Invalid number of parts: {}", parts.len()),
                    ));
                }
                let channel: FrequencyChannel = parse_part(parts[1], line_no)?;
                let height: f64 = parse_part(parts[2], line_no)?;
                beacons.push((name.to_string(), channel, height));
            }
        }
    }

    let camera_world_position = camera_world_position.ok_or(SceneError::MissingField("CAM_POS:"))?;
    let camera_id = camera_id.ok_or(SceneError::MissingField("CAM_ID:"))?;

    Ok(beacons
        .into_iter()
        .fold(SceneConfig::new(camera_world_position, camera_id), |scene, (name, channel, height)| {
            scene.with_beacon(name, channel, height)
        }))
}

fn parse_error(line: usize, message: impl Into<String>) -> SceneError {
    SceneError::ParseError {
        line,
        message: message.into(),
    }
}

/// Utility function for parsing one whitespace separated field
fn parse_part<T: std::str::FromStr>(s: &str, line: usize) -> Result<T, SceneError>
where
    T::Err: std::fmt::Display,
{
    s.parse::<T>()
        .map_err(|e| parse_error(line, format!("{}: {}", s, e)))
}
