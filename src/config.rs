//! Compiled-in controller configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::{HWMON_DIR, PWMFAN_DEVICE_NAME, THERMAL_TEMP_PATH};

/// Delay between two temperature samples
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Where the controller looks for its sensor and fan.
///
/// There are no runtime knobs; `Default` is what the daemon runs with.
/// Tests point the paths at a temporary tree instead of `/sys`.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlConfig {
    pub hwmon_root: PathBuf,
    pub device_name: String,
    pub thermal_path: PathBuf,
    pub poll_interval: Duration,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            hwmon_root: PathBuf::from(HWMON_DIR),
            device_name: PWMFAN_DEVICE_NAME.to_string(),
            thermal_path: PathBuf::from(THERMAL_TEMP_PATH),
            poll_interval: POLL_INTERVAL,
        }
    }
}
