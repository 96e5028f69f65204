//! Error types for the fan controller

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias for the fan controller
pub type Result<T> = std::result::Result<T, FanControlError>;

/// Main error type for the fan controller
#[derive(Error, Debug)]
pub enum FanControlError {
    #[error("Could not find PWM fan control path under {}", .root.display())]
    DeviceNotFound { root: PathBuf },

    #[error("Required fan control file not found: {}", .path.display())]
    MissingControlFile { hwmon_path: PathBuf, path: PathBuf },

    #[error("Fan control file is not writable: {}: {source}", .path.display())]
    ControlNotWritable {
        hwmon_path: PathBuf,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error reading temperature from {}: {source}", .path.display())]
    SensorRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error parsing temperature {raw:?} from {}", .path.display())]
    SensorParse { path: PathBuf, raw: String },

    #[error("Error writing {value:?} to {}: {source}", .path.display())]
    ControlWrite {
        path: PathBuf,
        value: String,
        source: std::io::Error,
    },

    #[error("Failed to install shutdown signal handler: {0}")]
    Signal(std::io::Error),
}

impl FanControlError {
    /// The hwmon directory this error concerns, if one had been resolved.
    pub fn hwmon_path(&self) -> Option<&Path> {
        match self {
            Self::MissingControlFile { hwmon_path, .. }
            | Self::ControlNotWritable { hwmon_path, .. } => Some(hwmon_path),
            Self::ControlWrite { path, .. } => path.parent(),
            _ => None,
        }
    }

    /// Sensor and control write failures are retried on the next cycle.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::SensorRead { .. } | Self::SensorParse { .. } | Self::ControlWrite { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_errors_are_fatal() {
        let err = FanControlError::DeviceNotFound {
            root: PathBuf::from("/sys/class/hwmon"),
        };
        assert!(!err.is_recoverable());
        assert!(err.hwmon_path().is_none());
        assert_eq!(
            err.to_string(),
            "Could not find PWM fan control path under /sys/class/hwmon"
        );

        let err = FanControlError::MissingControlFile {
            hwmon_path: PathBuf::from("/sys/class/hwmon/hwmon2"),
            path: PathBuf::from("/sys/class/hwmon/hwmon2/pwm1"),
        };
        assert!(!err.is_recoverable());
        assert_eq!(err.hwmon_path(), Some(Path::new("/sys/class/hwmon/hwmon2")));
    }

    #[test]
    fn test_io_errors_in_loop_are_recoverable() {
        let err = FanControlError::ControlWrite {
            path: PathBuf::from("/sys/class/hwmon/hwmon2/pwm1"),
            value: "51".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.hwmon_path(), Some(Path::new("/sys/class/hwmon/hwmon2")));

        let err = FanControlError::SensorParse {
            path: PathBuf::from("/sys/class/thermal/thermal_zone0/temp"),
            raw: "garbage".to_string(),
        };
        assert!(err.is_recoverable());
    }
}
