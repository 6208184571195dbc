//! Capture multiplexer: one blocking readiness wait over the hotplug watch
//! and every registered device.
//!
//! Each wakeup is processed atomically: hotplug notifications are dispatched
//! first (they shift wait-set positions), then every device flagged ready
//! contributes exactly one event record. Within a single wakeup, simultaneous
//! readiness is resolved in ascending registry position, a documented
//! non-guarantee of true cross-device arrival order.

use crate::capture::hotplug::{HotplugEvent, HotplugMonitor};
use crate::capture::registry::DeviceRegistry;
use crate::error::{EvrepError, Result};
use crate::record::{CaptureRecord, RecordWriter};
use log::debug;
use std::io;
use std::io::Write;
use std::path::Path;

/// Tracks the previous emission timestamp to produce relative deltas.
///
/// The first event baselines against itself, so the first record always
/// carries delta 0 regardless of the device's absolute clock value.
#[derive(Debug, Default)]
pub struct DeltaTracker {
    last_micros: Option<i64>,
}

impl DeltaTracker {
    /// Delta for an event stamped `time_micros`, advancing the baseline.
    pub fn delta(&mut self, time_micros: i64) -> i64 {
        let delta = time_micros - self.last_micros.unwrap_or(time_micros);
        self.last_micros = Some(time_micros);
        delta
    }
}

/// Blocking capture loop over a dynamic device set.
#[derive(Debug)]
pub struct EventMultiplexer {
    registry: DeviceRegistry,
    monitor: HotplugMonitor,
    deltas: DeltaTracker,
}

impl EventMultiplexer {
    /// Establish the hotplug watch on `dir` and an empty registry.
    pub fn new(dir: &Path) -> Result<Self> {
        let monitor = HotplugMonitor::new(dir)?;
        let registry = DeviceRegistry::new(dir, monitor.raw_fd());
        Ok(Self {
            registry,
            monitor,
            deltas: DeltaTracker::default(),
        })
    }

    /// Open every device currently present in the directory, skipping
    /// subdirectories (`by-id/` and friends are not event nodes).
    pub fn open_all(&mut self) -> Result<()> {
        let entries = std::fs::read_dir(self.registry.dir())
            .map_err(|e| EvrepError::io("scan device directory", e))?;

        for entry in entries {
            let entry = entry.map_err(|e| EvrepError::io("scan device directory", e))?;
            let is_dir = entry
                .file_type()
                .map_err(|e| EvrepError::io("scan device directory", e))?
                .is_dir();
            if is_dir {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            self.registry.add(&name)?;
        }
        Ok(())
    }

    /// Open exactly the named devices. Hotplug remains active, but the
    /// tracked set is fixed by the caller.
    pub fn open_named<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        for name in names {
            self.registry.add(name.as_ref())?;
        }
        Ok(())
    }

    /// Number of devices currently tracked.
    pub fn device_count(&self) -> usize {
        self.registry.len()
    }

    /// Shared registry view, used by the tests that assert alignment.
    #[cfg(test)]
    pub(crate) fn registry_mut(&mut self) -> &mut DeviceRegistry {
        &mut self.registry
    }

    /// Run the capture loop until a fatal error.
    pub fn run<W: Write>(&mut self, writer: &mut RecordWriter<W>) -> Result<()> {
        loop {
            self.run_once(writer)?;
        }
    }

    /// Process one readiness wakeup; returns the number of records emitted.
    ///
    /// Blocks indefinitely until the notification channel or any device is
    /// ready. A signal interrupting the wait emits nothing and returns 0.
    pub fn run_once<W: Write>(&mut self, writer: &mut RecordWriter<W>) -> Result<usize> {
        let wait_set = self.registry.wait_set();
        let rc = unsafe {
            libc::poll(wait_set.as_mut_ptr(), wait_set.len() as libc::nfds_t, -1)
        };
        if rc < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(0);
            }
            return Err(EvrepError::io("readiness wait", err));
        }

        // Hotplug first: registry mutation shifts wait-set positions, and the
        // unified add/remove keeps each surviving slot's readiness flag glued
        // to its device.
        if self.registry.slot_ready(0) {
            let changes = self.monitor.drain()?;
            self.apply_hotplug(&changes)?;
        }

        let mut emitted = 0;
        let mut position = 0;
        while position < self.registry.len() {
            if self.registry.slot_ready(position + 1) {
                let event = self.registry.device_at(position).read_event()?;
                let record = CaptureRecord {
                    delta_micros: self.deltas.delta(event.time_micros),
                    device: self.registry.device_at(position).name().to_string(),
                    event_type: event.event_type,
                    code: event.code,
                    value: event.value,
                };
                writer.write_record(&record)?;
                emitted += 1;
            }
            position += 1;
        }

        Ok(emitted)
    }

    /// Dispatch a batch of hotplug notifications against the registry.
    pub fn apply_hotplug(&mut self, changes: &[HotplugEvent]) -> Result<()> {
        for change in changes {
            match change {
                HotplugEvent::Arrived(name) => {
                    if self.registry.find(name).is_some() {
                        debug!("ignoring duplicate arrival for {name}");
                        continue;
                    }
                    debug!("device arrived: {name}");
                    self.registry.add(name)?;
                }
                HotplugEvent::Departed(name) => {
                    if self.registry.find(name).is_none() {
                        // Normal in selective mode: untracked nodes come and go.
                        debug!("departure for untracked device {name}");
                        continue;
                    }
                    debug!("device departed: {name}");
                    self.registry.remove(name)?;
                }
            }
        }
        Ok(())
    }
}
