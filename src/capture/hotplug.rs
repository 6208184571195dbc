//! Hotplug monitoring via an inotify watch on the device directory.
//!
//! The monitor contributes one extra descriptor to the capture wait-set.
//! When that descriptor turns readable, [`HotplugMonitor::drain`] performs a
//! single read and decodes the back-to-back, variable-length notification
//! records in the buffer with an explicit cursor. Arrivals and departures are
//! returned to the caller, which dispatches them against the registry before
//! inspecting device readiness (positions shift once the registry mutates).

use crate::error::{EvrepError, Result};
use std::ffi::CString;
use std::io;
use std::mem;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::RawFd;
use std::path::Path;

/// Size of the notification read buffer. Large enough for a burst of events
/// with maximum-length names.
const NOTIFY_BUF_LEN: usize = 4096;

/// Byte length of the fixed inotify event header (wd, mask, cookie, len).
const HEADER_LEN: usize = mem::size_of::<libc::inotify_event>();

/// A device appearing in or disappearing from the monitored directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HotplugEvent {
    /// A device node was created under the watched directory
    Arrived(String),
    /// A device node was removed from the watched directory
    Departed(String),
}

/// Watches a device directory for node creation and deletion.
#[derive(Debug)]
pub struct HotplugMonitor {
    fd: RawFd,
}

impl HotplugMonitor {
    /// Establish the watch on `dir`. Failure here is fatal at startup: the
    /// capture loop cannot guarantee it sees every device without it.
    pub fn new(dir: &Path) -> Result<Self> {
        let fd = unsafe { libc::inotify_init1(libc::IN_CLOEXEC) };
        if fd < 0 {
            return Err(EvrepError::watch(
                "inotify_init1",
                io::Error::last_os_error(),
            ));
        }

        let c_dir = CString::new(dir.as_os_str().as_bytes())
            .map_err(|_| EvrepError::watch_invalid("device directory path contains NUL"))?;
        let wd = unsafe {
            libc::inotify_add_watch(fd, c_dir.as_ptr(), libc::IN_CREATE | libc::IN_DELETE)
        };
        if wd < 0 {
            let err = io::Error::last_os_error();
            unsafe { libc::close(fd) };
            return Err(EvrepError::watch(
                format!("add watch for {}", dir.display()),
                err,
            ));
        }

        Ok(Self { fd })
    }

    /// Descriptor to multiplex alongside the device descriptors.
    pub fn raw_fd(&self) -> RawFd {
        self.fd
    }

    /// Read and decode one buffer's worth of pending notifications.
    ///
    /// Returns an empty batch when the read is interrupted by a benign
    /// signal. Any other failure, or a buffer that does not decode cleanly,
    /// is fatal: log integrity cannot be guaranteed once a notification is
    /// lost or misread.
    pub fn drain(&mut self) -> Result<Vec<HotplugEvent>> {
        let mut buf = [0u8; NOTIFY_BUF_LEN];
        let n = unsafe { libc::read(self.fd, buf.as_mut_ptr() as *mut libc::c_void, buf.len()) };
        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(Vec::new());
            }
            return Err(EvrepError::watch("read notification channel", err));
        }

        decode_notifications(&buf[..n as usize])
    }
}

impl Drop for HotplugMonitor {
    fn drop(&mut self) {
        unsafe { libc::close(self.fd) };
    }
}

/// Decode a sequence of variable-length inotify records from one read buffer.
///
/// Cursor over an opaque byte span: each step checks the remaining bytes
/// before touching the header or the name that follows it. A record that
/// would overrun the buffer is a decode error, never a silent truncation.
fn decode_notifications(buf: &[u8]) -> Result<Vec<HotplugEvent>> {
    let mut events = Vec::new();
    let mut cursor = 0usize;

    while cursor < buf.len() {
        let remaining = buf.len() - cursor;
        if remaining < HEADER_LEN {
            return Err(EvrepError::watch_invalid(format!(
                "truncated notification header: {} bytes remaining",
                remaining
            )));
        }

        let header =
            unsafe { std::ptr::read_unaligned(buf[cursor..].as_ptr() as *const libc::inotify_event) };
        let name_len = header.len as usize;
        if remaining < HEADER_LEN + name_len {
            return Err(EvrepError::watch_invalid(format!(
                "notification name overruns buffer: need {}, have {}",
                HEADER_LEN + name_len,
                remaining
            )));
        }

        if name_len > 0 {
            let name_bytes = &buf[cursor + HEADER_LEN..cursor + HEADER_LEN + name_len];
            // The name field is NUL-padded to its declared length.
            let end = name_bytes
                .iter()
                .position(|&b| b == 0)
                .unwrap_or(name_len);
            let name = String::from_utf8_lossy(&name_bytes[..end]).into_owned();

            if header.mask & libc::IN_CREATE != 0 {
                events.push(HotplugEvent::Arrived(name));
            } else if header.mask & libc::IN_DELETE != 0 {
                events.push(HotplugEvent::Departed(name));
            }
        }

        cursor += HEADER_LEN + name_len;
    }

    Ok(events)
}
