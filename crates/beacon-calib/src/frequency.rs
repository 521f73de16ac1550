use serde::{Deserialize, Serialize};

use crate::detection::PixelDetection;
use crate::error::CalibrationError;

/// A normalized blink frequency identifying one beacon, in Hz.
pub type FrequencyChannel = u32;

/// Frequency thresholds used to clean up detections before lookup.
///
/// The defaults match the beacon hardware the rig was built with.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyParams {
    /// Detections below this frequency are treated as sensor noise.
    pub min_frequency_hz: f64,
    /// Spacing of the frequency channel grid.
    pub frequency_step_hz: f64,
}

impl Default for FrequencyParams {
    fn default() -> Self {
        Self {
            min_frequency_hz: 1250.0,
            frequency_step_hz: 50.0,
        }
    }
}

impl FrequencyParams {
    /// Check that the thresholds can be used to snap frequencies.
    ///
    /// # Errors
    ///
    /// Returns [`CalibrationError::InvalidFrequencyParams`] if the step is not a
    /// positive finite number or the floor is not finite.
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if !(self.frequency_step_hz.is_finite() && self.frequency_step_hz > 0.0) {
            return Err(CalibrationError::InvalidFrequencyParams(format!(
                "frequency step must be positive, got {}",
                self.frequency_step_hz
            )));
        }
        if !self.min_frequency_hz.is_finite() {
            return Err(CalibrationError::InvalidFrequencyParams(format!(
                "minimum frequency must be finite, got {}",
                self.min_frequency_hz
            )));
        }
        Ok(())
    }
}

/// Snap a measured frequency to the nearest multiple of `step_hz`.
///
/// Halfway values round away from zero.
///
/// # Arguments
///
/// * `frequency_hz` - The measured blink frequency.
/// * `step_hz` - The channel spacing.
///
/// # Returns
///
/// The nearest multiple of `step_hz`.
pub fn normalize_frequency(frequency_hz: f64, step_hz: f64) -> f64 {
    (frequency_hz / step_hz).round() * step_hz
}

/// Convert a normalized frequency to its channel key.
///
/// Returns `None` when the value is not a non-negative whole number of Hz,
/// which can only happen with a fractional channel spacing.
pub fn frequency_channel(normalized_hz: f64) -> Option<FrequencyChannel> {
    let in_range = normalized_hz >= 0.0 && normalized_hz <= FrequencyChannel::MAX as f64;
    if in_range && normalized_hz.fract() == 0.0 {
        Some(normalized_hz as FrequencyChannel)
    } else {
        None
    }
}

/// Drop every detection blinking slower than `min_frequency_hz`.
///
/// The relative order of the kept detections is preserved. Detections with a
/// non-finite frequency are dropped as well.
pub fn filter_beacons(detections: Vec<PixelDetection>, min_frequency_hz: f64) -> Vec<PixelDetection> {
    detections
        .into_iter()
        .filter(|detection| {
            let keep = detection.frequency_hz >= min_frequency_hz;
            if !keep {
                log::debug!(
                    "Deleting light with freq too low: {}",
                    detection.frequency_hz
                );
            }
            keep
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detection(frequency_hz: f64) -> PixelDetection {
        PixelDetection {
            pixel_x: 10.0,
            pixel_y: 20.0,
            radius: 3.0,
            frequency_hz,
        }
    }

    #[test]
    fn test_normalize_frequency() {
        assert_eq!(normalize_frequency(1010.0, 50.0), 1000.0);
        assert_eq!(normalize_frequency(1024.9, 50.0), 1000.0);
        assert_eq!(normalize_frequency(1025.0, 50.0), 1050.0);
        assert_eq!(normalize_frequency(2480.0, 50.0), 2500.0);
        assert_eq!(normalize_frequency(0.0, 50.0), 0.0);
    }

    #[test]
    fn test_normalize_frequency_idempotent() {
        let step = FrequencyParams::default().frequency_step_hz;
        let mut freq = 0.0;
        while freq < 10_000.0 {
            let once = normalize_frequency(freq, step);
            assert_eq!(normalize_frequency(once, step), once, "freq {freq}");
            freq += 3.7;
        }
    }

    #[test]
    fn test_frequency_channel() {
        assert_eq!(frequency_channel(1000.0), Some(1000));
        assert_eq!(frequency_channel(0.0), Some(0));
        assert_eq!(frequency_channel(1000.5), None);
        assert_eq!(frequency_channel(-50.0), None);
        assert_eq!(frequency_channel(f64::NAN), None);
    }

    #[test]
    fn test_filter_beacons() {
        let detections = vec![
            detection(1300.0),
            detection(1249.9),
            detection(1250.0),
            detection(400.0),
            detection(3000.0),
            detection(f64::NAN),
        ];
        let kept = filter_beacons(detections.clone(), 1250.0);

        assert!(kept.len() <= detections.len());
        assert!(kept.iter().all(|d| d.frequency_hz >= 1250.0));

        let freqs = kept.iter().map(|d| d.frequency_hz).collect::<Vec<_>>();
        assert_eq!(freqs, vec![1300.0, 1250.0, 3000.0]);
    }

    #[test]
    fn test_filter_beacons_empty() {
        assert!(filter_beacons(Vec::new(), 1250.0).is_empty());
    }

    #[test]
    fn test_frequency_params_default() {
        let params = FrequencyParams::default();
        assert_eq!(params.min_frequency_hz, 1250.0);
        assert_eq!(params.frequency_step_hz, 50.0);
    }

    #[test]
    fn test_frequency_params_validate() {
        assert!(FrequencyParams::default().validate().is_ok());

        for step in [0.0, -50.0, f64::NAN, f64::INFINITY] {
            let params = FrequencyParams {
                frequency_step_hz: step,
                ..Default::default()
            };
            assert!(
                matches!(
                    params.validate(),
                    Err(CalibrationError::InvalidFrequencyParams(_))
                ),
                "step {step}"
            );
        }

        let params = FrequencyParams {
            min_frequency_hz: f64::NAN,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(CalibrationError::InvalidFrequencyParams(_))
        ));
    }

    #[test]
    fn test_frequency_params_partial_json() -> Result<(), Box<dyn std::error::Error>> {
        let params: FrequencyParams = serde_json::from_str(r#"{ "min_frequency_hz": 900.0 }"#)?;
        assert_eq!(params.min_frequency_hz, 900.0);
        assert_eq!(params.frequency_step_hz, 50.0);
        Ok(())
    }
}
