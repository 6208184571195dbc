//! evrep-replay - Input Event Replay
//!
//! Replays a captured event log against input devices with original timing.

use anyhow::{Context, Result};
use clap::{Arg, Command};
use std::path::PathBuf;

use evrep::record::RecordReader;
use evrep::replay::{DeviceResolver, ReplayScheduler, SystemClock};

fn main() -> Result<()> {
    // Initialize logging for development
    env_logger::init();

    // Parse command-line arguments
    let matches = Command::new("evrep-replay")
        .version(evrep::VERSION)
        .about("Replay a captured input-event log with original timing")
        .long_about(
            "evrep-replay reads a log produced by evrep-record and writes each event \
             back to its device, pacing emissions so inter-event gaps match the capture \
             to microsecond precision.",
        )
        .arg(
            Arg::new("device-dir")
                .long("device-dir")
                .value_name("DIR")
                .default_value(evrep::DEFAULT_DEVICE_DIR)
                .help("Directory of input device nodes to replay against"),
        )
        .arg(
            Arg::new("input")
                .help("Path to the capture log to replay")
                .required(true)
                .index(1),
        )
        .get_matches();

    let device_dir = PathBuf::from(
        matches
            .get_one::<String>("device-dir")
            .expect("device-dir has a default"),
    );
    let input_path = PathBuf::from(
        matches
            .get_one::<String>("input")
            .expect("input argument is required"),
    );

    if !input_path.is_file() {
        anyhow::bail!("input log does not exist: {}", input_path.display());
    }

    let reader = RecordReader::open(&input_path)
        .with_context(|| format!("failed to open input file {}", input_path.display()))?;

    let mut resolver = DeviceResolver::new(&device_dir);
    let mut scheduler = ReplayScheduler::new(SystemClock::new());

    let replayed = scheduler
        .run(reader, &mut resolver)
        .context("replay aborted")?;

    log::info!("replayed {replayed} events from {}", input_path.display());
    Ok(())
}
