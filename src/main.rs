//! Main entry point for the fan controller

use anyhow::Context;
use clap::Parser;
use log::error;
use pwmfan_control::{
    args::Args,
    daemon::{FanControlDaemon, ShutdownSignal},
    fan_detector::list_device_files,
    logging, ControlConfig, FanControlError,
};
use std::path::Path;
use std::process::ExitCode;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<ExitCode> {
    // Print version and build metadata for binary identity verification
    let pkg_version = env!("CARGO_PKG_VERSION");
    let git_hash = option_env!("GIT_HASH").unwrap_or("unknown");
    let git_desc = option_env!("GIT_DESC").unwrap_or("unknown");
    let build_time = option_env!("BUILD_TIME").unwrap_or("unknown");
    eprintln!(
        "pwmfan-control v{} (git {} / {}) built {}",
        pkg_version, git_hash, git_desc, build_time
    );
    let _args = Args::parse();

    logging::setup(1).context("failed to initialise logging")?;

    let config = ControlConfig::default();

    // Installed before startup so an early CTRL+C still stops gracefully
    let mut signals = match ShutdownSignal::install() {
        Ok(signals) => signals,
        Err(e) => {
            report_fatal(&FanControlError::Signal(e), None, &config);
            return Ok(ExitCode::FAILURE);
        }
    };

    let mut daemon = match FanControlDaemon::initialize(&config) {
        Ok(daemon) => daemon,
        Err(e) => {
            report_fatal(&e, e.hwmon_path(), &config);
            return Ok(ExitCode::FAILURE);
        }
    };

    println!("Starting Raspberry Pi 5 fan control. Press CTRL+C to exit.");

    match daemon.run(signals.recv()).await {
        Ok(()) => {
            println!("\nProgram stopped by user");
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            report_fatal(&e, daemon.hwmon_path(), &config);
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Print the error and whatever the fan's hwmon directory contains
fn report_fatal(err: &FanControlError, hwmon_path: Option<&Path>, config: &ControlConfig) {
    error!("{}", err);
    println!("An error occurred: {}", err);
    println!("Details for debugging:");

    let Some(path) = hwmon_path else {
        println!(
            "No PWM fan device was found under {}",
            config.hwmon_root.display()
        );
        return;
    };

    println!("PWM fan path found at: {}", path.display());
    match list_device_files(path) {
        Ok(files) => {
            println!("Available files:");
            for file in files {
                println!("  {}", file);
            }
        }
        Err(e) => println!("Could not list {}: {}", path.display(), e),
    }
}
