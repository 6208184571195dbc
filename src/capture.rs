//! Capture pipeline: registry, hotplug monitoring, and the event multiplexer.
//!
//! The pipeline is single-threaded and blocking. One readiness wait owns
//! control at a time; hotplug changes and device reads within a wakeup never
//! interleave with another wakeup's processing.

pub mod hotplug;
pub mod multiplexer;
pub mod registry;

pub use hotplug::{HotplugEvent, HotplugMonitor};
pub use multiplexer::{DeltaTracker, EventMultiplexer};
pub use registry::DeviceRegistry;
