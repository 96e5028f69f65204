//! Command line argument parsing for the fan controller

use clap::Parser;

/// Raspberry Pi 5 PWM fan control
///
/// Samples the CPU temperature every five seconds and drives the pwmfan
/// hwmon device through a fixed quiet-operation step table. Takes no
/// options; stop it with CTRL+C or SIGTERM.
#[derive(Parser, Debug)]
#[command(name = "pwmfan-control")]
#[command(about = "Temperature driven PWM fan control")]
#[command(version)]
pub struct Args {}
