use crate::errors::{FanControlError, Result};
use std::fs;
use std::path::PathBuf;

/// Anything the control loop can sample a temperature from
pub trait TemperatureSource {
    /// Current temperature in degrees Celsius
    fn read_celsius(&mut self) -> Result<f32>;
}

/// CPU temperature read from a thermal zone `temp` file
#[derive(Debug, Clone)]
pub struct ThermalZoneSensor {
    temp_path: PathBuf,
}

impl ThermalZoneSensor {
    pub fn new(temp_path: impl Into<PathBuf>) -> Self {
        Self {
            temp_path: temp_path.into(),
        }
    }

    /// Read the current CPU temperature
    pub fn read_temperature(&self) -> Result<f32> {
        let content =
            fs::read_to_string(&self.temp_path).map_err(|source| FanControlError::SensorRead {
                path: self.temp_path.clone(),
                source,
            })?;

        // Temperature is reported in millidegrees Celsius
        let raw = content.trim();
        let millidegrees: i64 = raw.parse().map_err(|_| FanControlError::SensorParse {
            path: self.temp_path.clone(),
            raw: raw.to_string(),
        })?;

        Ok(millidegrees as f32 / 1000.0)
    }
}

impl TemperatureSource for ThermalZoneSensor {
    fn read_celsius(&mut self) -> Result<f32> {
        self.read_temperature()
    }
}
