//! Serializes capture records to the log, one line per record.
//!
//! The writer flushes after every record. Capture sessions are interactive
//! and unbounded, so durability of what has already happened outranks
//! throughput: a crash or SIGKILL loses at most the record being formatted.

use crate::error::{EvrepError, Result};
use crate::record::{CaptureRecord, DELTA_WIDTH};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Append-only writer for the capture log.
#[derive(Debug)]
pub struct RecordWriter<W: Write> {
    out: W,
}

impl RecordWriter<BufWriter<File>> {
    /// Create (truncating) the log file at `path`.
    pub fn create(path: &Path) -> Result<Self> {
        let file = File::create(path)
            .map_err(|e| EvrepError::io(format!("create log file {}", path.display()), e))?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write> RecordWriter<W> {
    /// Wrap any byte sink. Used directly by tests; binaries go through
    /// [`RecordWriter::create`].
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write one record as a newline-terminated line and flush it.
    pub fn write_record(&mut self, record: &CaptureRecord) -> Result<()> {
        writeln!(
            self.out,
            "{:>width$} {} {} {} {}",
            record.delta_micros,
            record.device,
            record.event_type,
            record.code,
            record.value,
            width = DELTA_WIDTH,
        )
        .map_err(|e| EvrepError::io("write log record", e))?;

        self.out
            .flush()
            .map_err(|e| EvrepError::io("flush log record", e))
    }

    /// Consume the writer, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}
