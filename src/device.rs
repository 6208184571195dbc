//! Device handles: owned open input-device nodes with exact-size event I/O.
//!
//! A [`DeviceHandle`] pairs a logical device name (the file name under the
//! monitored directory, e.g. `event3`) with the opened node. Reads and writes
//! always transfer exactly one raw event record; a partial transfer leaves the
//! stream with no recovery point and is surfaced as a fatal error.

use crate::error::{EvrepError, Result};
use crate::event::{InputEvent, EVENT_SIZE};
use std::fs::{File, OpenOptions};
use std::io::{Read, Write};
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;

/// An open input device, owned exclusively by the registry or resolver that
/// created it. The underlying node is closed when the handle drops.
#[derive(Debug)]
pub struct DeviceHandle {
    name: String,
    file: File,
}

impl DeviceHandle {
    /// Open `<dir>/<name>` read+write.
    ///
    /// Capture only reads and replay only writes, but the node is opened
    /// read+write in both pipelines so a log captured from a device can be
    /// replayed against the same open mode the kernel granted during capture.
    pub fn open(dir: &Path, name: &str) -> Result<Self> {
        let path = dir.join(name);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&path)
            .map_err(|e| EvrepError::device_open(path, e))?;

        Ok(Self {
            name: name.to_string(),
            file,
        })
    }

    /// Logical device name (file name under the device directory).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw descriptor for readiness multiplexing.
    pub fn raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }

    /// Read exactly one raw event record from the device.
    ///
    /// Called only when the wait-set reported this handle ready, so a single
    /// read suffices; anything under `EVENT_SIZE` bytes is stream corruption.
    pub fn read_event(&mut self) -> Result<InputEvent> {
        let mut buf = [0u8; EVENT_SIZE];
        let got = self
            .file
            .read(&mut buf)
            .map_err(|e| EvrepError::io(format!("read from device {}", self.name), e))?;

        if got < EVENT_SIZE {
            return Err(EvrepError::ShortRead {
                device: self.name.clone(),
                expected: EVENT_SIZE,
                got,
            });
        }

        Ok(InputEvent::from_raw(&buf))
    }

    /// Write exactly one raw event record to the device.
    pub fn write_event(&mut self, event: &InputEvent) -> Result<()> {
        let buf = event.to_raw();
        let wrote = self
            .file
            .write(&buf)
            .map_err(|e| EvrepError::io(format!("write to device {}", self.name), e))?;

        if wrote < EVENT_SIZE {
            return Err(EvrepError::ShortWrite {
                device: self.name.clone(),
                expected: EVENT_SIZE,
                got: wrote,
            });
        }

        Ok(())
    }
}
