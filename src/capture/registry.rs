//! Device registry unified with the poll wait-set.
//!
//! The registry owns every open capture device together with the `pollfd`
//! array handed to `poll(2)`. Slot 0 of the wait-set is reserved for the
//! hotplug notification descriptor; slot `i + 1` always belongs to device
//! `i`. Insertions and removals update both vectors in the same call, so the
//! positional alignment can never drift. That alignment is the invariant the
//! capture loop leans on when it maps readiness flags back to devices.

use crate::device::DeviceHandle;
use crate::error::{EvrepError, Result};
use std::os::unix::io::RawFd;
use std::path::{Path, PathBuf};

/// Ordered, name-keyed collection of open devices plus their wait-set.
#[derive(Debug)]
pub struct DeviceRegistry {
    dir: PathBuf,
    entries: Vec<DeviceHandle>,
    /// `pollfds[0]` is the notification descriptor; `pollfds[i + 1]`
    /// corresponds to `entries[i]`.
    pollfds: Vec<libc::pollfd>,
}

impl DeviceRegistry {
    /// Create a registry over the device directory `dir`, with `watch_fd`
    /// (the hotplug notification descriptor) occupying wait-set slot 0.
    pub fn new(dir: &Path, watch_fd: RawFd) -> Self {
        Self {
            dir: dir.to_path_buf(),
            entries: Vec::new(),
            pollfds: vec![libc::pollfd {
                fd: watch_fd,
                events: libc::POLLIN,
                revents: 0,
            }],
        }
    }

    /// Open `name` under the device directory and append it, extending the
    /// wait-set in the same operation.
    ///
    /// Duplicate names are rejected; hotplug dispatch deduplicates before
    /// calling, and the initial scan cannot see a name twice.
    pub fn add(&mut self, name: &str) -> Result<usize> {
        if self.find(name).is_some() {
            return Err(EvrepError::AlreadyRegistered {
                name: name.to_string(),
            });
        }

        let handle = DeviceHandle::open(&self.dir, name)?;
        self.pollfds.push(libc::pollfd {
            fd: handle.raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        });
        self.entries.push(handle);
        Ok(self.entries.len() - 1)
    }

    /// Remove `name`, closing its handle and shrinking the wait-set in the
    /// same operation.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let position = self.find(name).ok_or_else(|| EvrepError::NotFound {
            name: name.to_string(),
        })?;

        // Dropping the handle closes the node.
        self.entries.remove(position);
        self.pollfds.remove(position + 1);
        Ok(())
    }

    /// The monitored device directory this registry opens names under.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Position of `name` in the registry, if present.
    pub fn find(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name() == name)
    }

    /// Device at `position`, parallel to wait-set slot `position + 1`.
    pub fn device_at(&mut self, position: usize) -> &mut DeviceHandle {
        &mut self.entries[position]
    }

    /// Number of registered devices (wait-set length minus the watch slot).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no devices are registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full wait-set for the readiness wait: watch slot plus one slot per
    /// device, in registry order.
    pub fn wait_set(&mut self) -> &mut [libc::pollfd] {
        &mut self.pollfds
    }

    /// Whether wait-set slot `slot` reported readable input after a poll.
    /// Slot 0 is the notification channel; slot `i + 1` is device `i`.
    pub fn slot_ready(&self, slot: usize) -> bool {
        self.pollfds[slot].revents & libc::POLLIN != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn registry_with_devices(names: &[&str]) -> (TempDir, DeviceRegistry) {
        let dir = TempDir::new().unwrap();
        for name in names {
            std::fs::File::create(dir.path().join(name)).unwrap();
        }
        // Any descriptor works as the watch slot for alignment tests.
        let mut registry = DeviceRegistry::new(dir.path(), 0);
        for name in names {
            registry.add(name).unwrap();
        }
        (dir, registry)
    }

    #[test]
    fn wait_set_is_registry_plus_watch_slot() {
        let (_dir, mut registry) = registry_with_devices(&["event0", "event1", "event2"]);
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.wait_set().len(), 4);
    }

    #[test]
    fn wait_set_positions_track_registry_positions() {
        let (_dir, mut registry) = registry_with_devices(&["event0", "event1", "event2"]);

        for position in 0..registry.len() {
            let fd = registry.device_at(position).raw_fd();
            assert_eq!(registry.wait_set()[position + 1].fd, fd);
        }
    }

    #[test]
    fn remove_shrinks_both_structures_in_step() {
        let (_dir, mut registry) = registry_with_devices(&["event0", "event1", "event2"]);

        registry.remove("event1").unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.wait_set().len(), 3);

        // event2 shifted into position 1; its wait slot shifted with it.
        assert_eq!(registry.find("event2"), Some(1));
        let fd = registry.device_at(1).raw_fd();
        assert_eq!(registry.wait_set()[2].fd, fd);
    }

    #[test]
    fn alignment_survives_interleaved_add_remove() {
        let (dir, mut registry) = registry_with_devices(&["event0", "event1"]);
        std::fs::File::create(dir.path().join("event3")).unwrap();

        registry.remove("event0").unwrap();
        registry.add("event3").unwrap();
        registry.remove("event1").unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.wait_set().len(), 2);
        assert_eq!(registry.find("event3"), Some(0));
        let fd = registry.device_at(0).raw_fd();
        assert_eq!(registry.wait_set()[1].fd, fd);
    }

    #[test]
    fn duplicate_add_is_rejected() {
        let (_dir, mut registry) = registry_with_devices(&["event0"]);
        let err = registry.add("event0").unwrap_err();
        assert!(matches!(err, EvrepError::AlreadyRegistered { .. }));
        // The failed insert must not disturb the wait-set.
        assert_eq!(registry.wait_set().len(), 2);
    }

    #[test]
    fn remove_unknown_name_is_not_found() {
        let (_dir, mut registry) = registry_with_devices(&[]);
        assert!(matches!(
            registry.remove("event9"),
            Err(EvrepError::NotFound { .. })
        ));
    }

    #[test]
    fn watch_slot_keeps_position_zero() {
        let dir = TempDir::new().unwrap();
        std::fs::File::create(dir.path().join("event0")).unwrap();

        let mut registry = DeviceRegistry::new(dir.path(), 7);
        registry.add("event0").unwrap();
        registry.remove("event0").unwrap();
        assert_eq!(registry.wait_set()[0].fd, 7);
    }
}
