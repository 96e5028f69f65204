//! Control loop driving the PWM fan from the CPU temperature

use crate::{
    config::ControlConfig,
    cpu_temp::{TemperatureSource, ThermalZoneSensor},
    errors::{FanControlError, Result},
    fan::{DutyCycle, FanCurve},
    fan_control::{FanActuator, PwmFan},
    fan_detector::HwmonLocator,
};
use log::{debug, error, info, warn};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;

/// Lifecycle of the control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DaemonState {
    Initializing,
    Running,
    Stopped,
    FatalError,
}

/// What a single sample-and-actuate cycle did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// Target equals the last applied duty, nothing written
    Unchanged { temperature: f32, duty: DutyCycle },
    Applied { temperature: f32, duty: DutyCycle },
    /// Write failed, the same target is retried next cycle
    ApplyFailed { temperature: f32, duty: DutyCycle },
}

/// Temperature-driven fan controller
pub struct FanControlDaemon<S = ThermalZoneSensor, F = PwmFan> {
    sensor: S,
    fan: F,
    curve: FanCurve,
    poll_interval: Duration,
    hwmon_path: Option<PathBuf>,
    last_applied: Option<DutyCycle>,
    state: DaemonState,
}

impl FanControlDaemon {
    /// Locate the PWM fan and open its control files.
    ///
    /// Failing here is fatal: the returned error carries the hwmon path
    /// when one was found.
    pub fn initialize(config: &ControlConfig) -> Result<Self> {
        info!("Initializing fan control...");

        let locator = HwmonLocator::new(&config.hwmon_root, config.device_name.as_str());
        let entry = locator
            .locate()
            .ok_or_else(|| FanControlError::DeviceNotFound {
                root: locator.root().to_path_buf(),
            })?;
        let fan = PwmFan::open(&entry)?;
        let sensor = ThermalZoneSensor::new(&config.thermal_path);

        let mut daemon = Self::with_parts(sensor, fan, FanCurve::quiet(), config.poll_interval);
        daemon.hwmon_path = Some(entry.path);
        Ok(daemon)
    }
}

impl<S: TemperatureSource, F: FanActuator> FanControlDaemon<S, F> {
    /// Assemble a daemon from already opened parts
    pub fn with_parts(sensor: S, fan: F, curve: FanCurve, poll_interval: Duration) -> Self {
        Self {
            sensor,
            fan,
            curve,
            poll_interval,
            hwmon_path: None,
            last_applied: None,
            state: DaemonState::Initializing,
        }
    }

    pub fn state(&self) -> DaemonState {
        self.state
    }

    pub fn last_applied(&self) -> Option<DutyCycle> {
        self.last_applied
    }

    /// Directory of the controlled fan, for diagnostics
    pub fn hwmon_path(&self) -> Option<&Path> {
        self.hwmon_path.as_deref()
    }

    pub fn fan(&self) -> &F {
        &self.fan
    }

    /// Read the sensor, falling back to 0.0°C so a bad sample never stops the loop
    fn sample_temperature(&mut self) -> f32 {
        match self.sensor.read_celsius() {
            Ok(temp) => temp,
            Err(e) => {
                log_cycle_error("Error reading temperature", &e);
                0.0
            }
        }
    }

    /// Sample once and apply the target duty if it differs from the last applied one
    pub fn tick(&mut self) -> TickOutcome {
        let temperature = self.sample_temperature();
        let duty = self.curve.duty_for_temperature(temperature);

        if self.last_applied == Some(duty) {
            debug!("CPU Temp: {:.1}°C, fan unchanged at {}", temperature, duty);
            return TickOutcome::Unchanged { temperature, duty };
        }

        match self.fan.apply(duty) {
            Ok(()) => {
                self.last_applied = Some(duty);
                println!("CPU Temp: {:.1}°C, Fan Speed: {}%", temperature, duty.percent());
                TickOutcome::Applied { temperature, duty }
            }
            Err(e) => {
                log_cycle_error("Error setting fan speed", &e);
                TickOutcome::ApplyFailed { temperature, duty }
            }
        }
    }

    /// Run until `shutdown` resolves.
    ///
    /// A shutdown future that resolves to an error means the interrupt
    /// handlers could not be installed; that ends the loop as a fatal error.
    pub async fn run<Sd>(&mut self, shutdown: Sd) -> Result<()>
    where
        Sd: Future<Output = std::io::Result<()>>,
    {
        tokio::pin!(shutdown);
        self.state = DaemonState::Running;
        info!(
            "Fan control running with '{}' curve, polling every {:?}",
            self.curve.name(),
            self.poll_interval
        );

        loop {
            self.tick();

            tokio::select! {
                biased;

                result = &mut shutdown => {
                    return match result {
                        Ok(()) => {
                            info!("Shutdown requested, stopping fan control");
                            self.state = DaemonState::Stopped;
                            Ok(())
                        }
                        Err(e) => {
                            self.state = DaemonState::FatalError;
                            Err(FanControlError::Signal(e))
                        }
                    };
                }
                _ = sleep(self.poll_interval) => {}
            }
        }
    }
}

/// Errors inside a cycle never end the loop; unexpected kinds are logged louder
fn log_cycle_error(context: &str, err: &FanControlError) {
    if err.is_recoverable() {
        warn!("{}: {} (retrying next cycle)", context, err);
    } else {
        error!("{}: {}", context, err);
    }
}

/// SIGINT and SIGTERM handlers, registered as soon as this is built.
///
/// Signals arriving before the first `recv` are kept, so install this
/// before touching the fan.
pub struct ShutdownSignal {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    terminate: tokio::signal::unix::Signal,
}

impl ShutdownSignal {
    /// Must be called from within the tokio runtime
    pub fn install() -> std::io::Result<Self> {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};

            Ok(Self {
                interrupt: signal(SignalKind::interrupt())?,
                terminate: signal(SignalKind::terminate())?,
            })
        }

        #[cfg(not(unix))]
        {
            Ok(Self {})
        }
    }

    /// Resolves on the next SIGINT or SIGTERM
    pub async fn recv(&mut self) -> std::io::Result<()> {
        #[cfg(unix)]
        {
            tokio::select! {
                _ = self.interrupt.recv() => {}
                _ = self.terminate.recv() => {}
            }
            Ok(())
        }

        #[cfg(not(unix))]
        {
            tokio::signal::ctrl_c().await
        }
    }
}
