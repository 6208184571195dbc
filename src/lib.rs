//! # evrep - Input Event Capture and Replay
//!
//! Captures kernel input-device events (keyboard, mouse, touch) into a
//! delta-timestamped text log and replays that log against the same class of
//! devices with microsecond timing fidelity. Built for deterministic UI
//! testing, input-driven regression harnesses, and device diagnostics.
//!
//! ## Architecture
//!
//! Two independent single-threaded pipelines share design patterns but not
//! state:
//!
//! - **Capture**: [`capture::DeviceRegistry`] (open handles unified with the
//!   poll wait-set) → [`capture::HotplugMonitor`] (inotify on the device
//!   directory) → [`capture::EventMultiplexer`] (blocking readiness wait) →
//!   [`record::RecordWriter`] (flush-per-record log output)
//! - **Replay**: [`record::RecordReader`] (lazy line parser) →
//!   [`replay::DeviceResolver`] (cached lazy opens) →
//!   [`replay::ReplayScheduler`] (spin-sleep pacing) → device write
//!
//! ## Modules
//!
//! - [`error`] - Centralized error types and handling
//! - [`event`] - Fixed-size kernel event records and their byte layout
//! - [`device`] - Owned device handles with exact-size event I/O
//! - [`capture`] - Registry, hotplug monitor, and multiplexer
//! - [`record`] - Log record type plus writer/reader codecs
//! - [`replay`] - Resolver, monotonic clock, and scheduler

// Core modules
pub mod device;
pub mod error;
pub mod event;

// Pipelines
pub mod capture;
pub mod record;
pub mod replay;

// Re-export commonly used types for convenience
pub use error::{EvrepError, Result};

// Public API surface for external usage
pub use capture::EventMultiplexer;
pub use event::{InputEvent, EVENT_SIZE};
pub use record::{CaptureRecord, RecordReader, RecordWriter};
pub use replay::{DeviceResolver, ReplayScheduler, SystemClock};

/// Default directory of input device nodes on Linux hosts.
pub const DEFAULT_DEVICE_DIR: &str = "/dev/input";

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
