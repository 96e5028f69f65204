use crate::errors::{FanControlError, Result};
use crate::fan::DutyCycle;
use crate::fan_detector::HwmonEntry;
use log::{debug, info, warn};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Value written to `pwm1_enable` to select manual duty control
pub const PWM_MODE_MANUAL: &str = "1";

/// Anything the control loop can drive to a duty cycle
pub trait FanActuator {
    fn apply(&mut self, duty: DutyCycle) -> Result<()>;
}

/// PWM fan driven through the `pwm1_enable` and `pwm1` hwmon attributes
#[derive(Debug, Clone)]
pub struct PwmFan {
    enable_path: PathBuf,
    pwm_path: PathBuf,
}

impl PwmFan {
    /// Wrap a located hwmon device.
    ///
    /// Both control files must exist and open for writing, otherwise the
    /// device is unusable and this fails.
    pub fn open(entry: &HwmonEntry) -> Result<Self> {
        let hwmon_path = entry.path.clone();
        let enable_path = hwmon_path.join("pwm1_enable");
        let pwm_path = hwmon_path.join("pwm1");

        for path in [&enable_path, &pwm_path] {
            if !path.exists() {
                return Err(FanControlError::MissingControlFile {
                    hwmon_path: hwmon_path.clone(),
                    path: path.clone(),
                });
            }
        }

        for path in [&enable_path, &pwm_path] {
            if let Err(source) = OpenOptions::new().write(true).open(path) {
                return Err(FanControlError::ControlNotWritable {
                    hwmon_path: hwmon_path.clone(),
                    path: path.clone(),
                    source,
                });
            }
        }

        info!(
            "PWM fan ready: enable={}, pwm={}",
            enable_path.display(),
            pwm_path.display()
        );

        Ok(Self {
            enable_path,
            pwm_path,
        })
    }

    fn write_control(path: &Path, value: &str) -> Result<()> {
        fs::write(path, value).map_err(|source| FanControlError::ControlWrite {
            path: path.to_path_buf(),
            value: value.to_string(),
            source,
        })
    }
}

impl FanActuator for PwmFan {
    /// Select manual mode, then write the duty on the 0-255 scale.
    ///
    /// The duty write is attempted even if enabling manual mode failed;
    /// the first failure is returned.
    fn apply(&mut self, duty: DutyCycle) -> Result<()> {
        let pwm_value = duty.to_pwm().to_string();

        let enabled = Self::write_control(&self.enable_path, PWM_MODE_MANUAL);
        if let Err(e) = &enabled {
            warn!("Failed to enable manual PWM control: {}", e);
        }
        let written = Self::write_control(&self.pwm_path, &pwm_value);

        enabled.and(written)?;
        debug!("Set fan PWM to {} ({})", pwm_value, duty);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn fan_dir(files: &[&str]) -> (TempDir, HwmonEntry) {
        let dir = TempDir::new().unwrap();
        for file in files {
            fs::write(dir.path().join(file), "0\n").unwrap();
        }
        let entry = HwmonEntry {
            path: dir.path().to_path_buf(),
            name: "pwmfan".to_string(),
        };
        (dir, entry)
    }

    #[test]
    fn test_open_requires_both_control_files() {
        let (_dir, entry) = fan_dir(&["pwm1"]);
        match PwmFan::open(&entry) {
            Err(FanControlError::MissingControlFile { hwmon_path, path }) => {
                assert_eq!(hwmon_path, entry.path);
                assert_eq!(path, entry.path.join("pwm1_enable"));
            }
            other => panic!("unexpected result: {:?}", other),
        }

        let (_dir, entry) = fan_dir(&["pwm1_enable"]);
        assert!(matches!(
            PwmFan::open(&entry),
            Err(FanControlError::MissingControlFile { .. })
        ));
    }

    #[test]
    fn test_apply_writes_manual_mode_and_pwm() {
        let (_dir, entry) = fan_dir(&["pwm1_enable", "pwm1"]);
        let mut fan = PwmFan::open(&entry).unwrap();

        fan.apply(DutyCycle::from_percent(40)).unwrap();
        assert_eq!(fs::read_to_string(entry.path.join("pwm1_enable")).unwrap(), "1");
        assert_eq!(fs::read_to_string(entry.path.join("pwm1")).unwrap(), "102");

        fan.apply(DutyCycle::from_percent(30)).unwrap();
        assert_eq!(fs::read_to_string(entry.path.join("pwm1")).unwrap(), "77");
    }

    #[test]
    fn test_out_of_range_duty_is_clamped() {
        let (_dir, entry) = fan_dir(&["pwm1_enable", "pwm1"]);
        let mut fan = PwmFan::open(&entry).unwrap();

        fan.apply(DutyCycle::from_percent(150)).unwrap();
        assert_eq!(fs::read_to_string(entry.path.join("pwm1")).unwrap(), "255");
    }

    #[test]
    fn test_failed_write_is_reported_not_fatal() {
        let (dir, entry) = fan_dir(&["pwm1_enable", "pwm1"]);
        let mut fan = PwmFan::open(&entry).unwrap();

        // replacing the enable file with a directory makes its write fail
        fs::remove_file(dir.path().join("pwm1_enable")).unwrap();
        fs::create_dir(dir.path().join("pwm1_enable")).unwrap();

        let err = fan.apply(DutyCycle::from_percent(20)).unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(err, FanControlError::ControlWrite { ref path, .. } if path.ends_with("pwm1_enable")));
        // the duty write still went through
        assert_eq!(fs::read_to_string(entry.path.join("pwm1")).unwrap(), "51");
    }

    #[test]
    fn test_open_requires_writable_control_files() {
        let (dir, entry) = fan_dir(&["pwm1_enable"]);
        // a directory exists but cannot be opened for writing
        fs::create_dir(dir.path().join("pwm1")).unwrap();

        match PwmFan::open(&entry) {
            Err(err @ FanControlError::ControlNotWritable { .. }) => {
                assert!(!err.is_recoverable());
                assert_eq!(err.hwmon_path(), Some(entry.path.as_path()));
                assert!(matches!(err, FanControlError::ControlNotWritable { ref path, .. } if path.ends_with("pwm1")));
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
