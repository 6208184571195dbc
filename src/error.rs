//! Error types and handling infrastructure for evrep.
//!
//! This module provides a centralized error handling system using `thiserror` for
//! custom error types and `anyhow` for application-level error handling with context.
//!
//! ## Design Principles
//!
//! - **Fail hard on corruption**: short transfers and malformed log lines have no
//!   recovery point mid-record, so they abort the run
//! - **Context preservation**: errors carry the device name, path, or line number
//!   that produced them
//! - **Consistency**: standardized Result type across all modules

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for evrep operations.
///
/// This enum covers all failure conditions across the capture and replay
/// pipelines: device access, directory monitoring, fixed-size record I/O,
/// and log parsing.
#[derive(Error, Debug)]
pub enum EvrepError {
    /// Failed to open an input device node
    #[error("could not open device {path}: {source}")]
    DeviceOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to establish or service the hotplug directory watch
    #[error("device watch failed: {message}")]
    Watch {
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// A fixed-size event read transferred fewer bytes than one record
    #[error("short read from {device}: got {got} of {expected} bytes")]
    ShortRead {
        device: String,
        expected: usize,
        got: usize,
    },

    /// A fixed-size event write transferred fewer bytes than one record
    #[error("short write to {device}: wrote {got} of {expected} bytes")]
    ShortWrite {
        device: String,
        expected: usize,
        got: usize,
    },

    /// A log line that cannot be parsed as a capture record
    #[error("malformed record at line {line}: {message}")]
    MalformedRecord { line: u64, message: String },

    /// A registry lookup or removal referenced an unknown device name
    #[error("device not registered: {name}")]
    NotFound { name: String },

    /// A registry insert collided with an existing device name
    #[error("device already registered: {name}")]
    AlreadyRegistered { name: String },

    /// Generic I/O failure with context
    #[error("{message}: {source}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },
}

/// Standard Result type for evrep operations.
///
/// This type alias provides a consistent error handling interface across
/// all modules in the evrep codebase.
pub type Result<T> = std::result::Result<T, EvrepError>;

impl EvrepError {
    /// Create a DeviceOpen error for a device node path
    pub fn device_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DeviceOpen {
            path: path.into(),
            source,
        }
    }

    /// Create a Watch error with a descriptive message and an OS error
    pub fn watch(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Watch {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a Watch error with no underlying OS error
    pub fn watch_invalid(message: impl Into<String>) -> Self {
        Self::Watch {
            message: message.into(),
            source: None,
        }
    }

    /// Create a MalformedRecord error for a 1-based log line number
    pub fn malformed(line: u64, message: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            message: message.into(),
        }
    }

    /// Create a generic Io error with a descriptive message
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }
}
