//! evrep-record - Input Event Capture
//!
//! Captures events from input devices into a delta-timestamped log file.

use anyhow::{Context, Result};
use clap::{Arg, Command};
use std::path::PathBuf;

use evrep::record::RecordWriter;
use evrep::EventMultiplexer;

fn main() -> Result<()> {
    // Initialize logging for development
    env_logger::init();

    // Parse command-line arguments
    let matches = Command::new("evrep-record")
        .version(evrep::VERSION)
        .about("Capture input-device events into a delta-timestamped log")
        .long_about(
            "evrep-record opens input devices, multiplexes their event streams into \
             arrival order, and writes one delta-timestamped record per line. With no \
             device names, every device in the directory is captured and devices that \
             appear or disappear while running are tracked automatically.",
        )
        .override_usage("evrep-record [OPTIONS] [device-name ...] <output-path>")
        .arg(
            Arg::new("device-dir")
                .long("device-dir")
                .value_name("DIR")
                .default_value(evrep::DEFAULT_DEVICE_DIR)
                .help("Directory of input device nodes to monitor"),
        )
        .arg(
            Arg::new("args")
                .help("Optional device names to capture, followed by the output log path")
                .num_args(1..)
                .required(true),
        )
        .get_matches();

    let device_dir = PathBuf::from(
        matches
            .get_one::<String>("device-dir")
            .expect("device-dir has a default"),
    );
    let mut args: Vec<String> = matches
        .get_many::<String>("args")
        .expect("args is required")
        .cloned()
        .collect();

    // The last positional is the output path; anything before it is a device name.
    let output_path = PathBuf::from(args.pop().expect("args is non-empty"));
    let devices = args;

    if !device_dir.is_dir() {
        anyhow::bail!("device directory does not exist: {}", device_dir.display());
    }

    let mut writer = RecordWriter::create(&output_path)
        .with_context(|| format!("failed to open output file {}", output_path.display()))?;

    let mut multiplexer = EventMultiplexer::new(&device_dir)
        .context("failed to establish device directory watch")?;

    if devices.is_empty() {
        multiplexer
            .open_all()
            .with_context(|| format!("device scan failed for {}", device_dir.display()))?;
    } else {
        multiplexer
            .open_named(&devices)
            .context("failed to open requested devices")?;
    }

    log::info!(
        "capturing {} device(s) from {} into {}",
        multiplexer.device_count(),
        device_dir.display(),
        output_path.display()
    );

    // Runs until a fatal I/O error; termination is external (signal).
    multiplexer
        .run(&mut writer)
        .context("capture loop aborted")?;

    Ok(())
}
