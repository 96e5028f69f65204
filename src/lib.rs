//! PWM fan control
//!
//! Closed-loop fan controller for the Raspberry Pi 5: samples the CPU
//! thermal zone and drives the `pwmfan` hwmon device through a fixed step table.

pub mod args;
pub mod config;
pub mod cpu_temp;
pub mod daemon;
pub mod errors;
pub mod fan;
pub mod fan_control;
pub mod fan_detector;
pub mod logging;

// sysfs locations on the Raspberry Pi 5
pub const HWMON_DIR: &str = "/sys/class/hwmon";
pub const THERMAL_TEMP_PATH: &str = "/sys/class/thermal/thermal_zone0/temp";
pub const PWMFAN_DEVICE_NAME: &str = "pwmfan";

// Re-export commonly used types
pub use config::ControlConfig;
pub use daemon::{DaemonState, FanControlDaemon, TickOutcome};
pub use errors::{FanControlError, Result};
pub use fan::{DutyCycle, FanCurve, FanStep};
