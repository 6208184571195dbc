//! Lazy device resolution for replay.
//!
//! The log names devices; the resolver opens each name on first reference
//! and hands back the cached handle on every later one. Handles live until
//! the resolver drops, at which point they close together in registration
//! order, best effort: one failed close never blocks the rest, which `File`
//! drop semantics already guarantee.

use crate::device::DeviceHandle;
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Opens devices by name on demand and caches the handles.
#[derive(Debug)]
pub struct DeviceResolver {
    dir: PathBuf,
    devices: Vec<DeviceHandle>,
}

impl DeviceResolver {
    /// Create a resolver over the device directory `dir`.
    pub fn new(dir: &Path) -> Self {
        Self {
            dir: dir.to_path_buf(),
            devices: Vec::new(),
        }
    }

    /// Handle for `name`, opening the device on first reference.
    ///
    /// Resolving the same name twice yields the same handle with exactly one
    /// underlying open.
    pub fn resolve(&mut self, name: &str) -> Result<&mut DeviceHandle> {
        if let Some(position) = self.devices.iter().position(|d| d.name() == name) {
            return Ok(&mut self.devices[position]);
        }

        let handle = DeviceHandle::open(&self.dir, name)?;
        let position = self.devices.len();
        self.devices.push(handle);
        Ok(&mut self.devices[position])
    }

    /// Number of distinct devices opened so far.
    pub fn opened_count(&self) -> usize {
        self.devices.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EvrepError;
    use tempfile::TempDir;

    fn device_dir(names: &[&str]) -> TempDir {
        let dir = TempDir::new().unwrap();
        for name in names {
            std::fs::File::create(dir.path().join(name)).unwrap();
        }
        dir
    }

    #[test]
    fn duplicate_resolve_reuses_the_open_handle() {
        let dir = device_dir(&["event0"]);
        let mut resolver = DeviceResolver::new(dir.path());

        let fd_first = resolver.resolve("event0").unwrap().raw_fd();
        let fd_second = resolver.resolve("event0").unwrap().raw_fd();

        assert_eq!(fd_first, fd_second);
        assert_eq!(resolver.opened_count(), 1);
    }

    #[test]
    fn distinct_names_get_distinct_handles() {
        let dir = device_dir(&["event0", "event1"]);
        let mut resolver = DeviceResolver::new(dir.path());

        resolver.resolve("event0").unwrap();
        resolver.resolve("event1").unwrap();
        assert_eq!(resolver.opened_count(), 2);
    }

    #[test]
    fn unknown_device_fails_to_resolve() {
        let dir = device_dir(&[]);
        let mut resolver = DeviceResolver::new(dir.path());
        assert!(matches!(
            resolver.resolve("event9"),
            Err(EvrepError::DeviceOpen { .. })
        ));
        // A failed open must not leave a phantom cache entry.
        assert_eq!(resolver.opened_count(), 0);
    }
}
