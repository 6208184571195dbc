//! Lazy line-by-line parser for capture logs.
//!
//! The reader is an iterator over parsed records, restartable only from the
//! start of the input. Logs are machine-generated, so there is no partial-line
//! recovery: a line with the wrong field count or a non-numeric field aborts
//! the whole replay with a [`MalformedRecord`](crate::EvrepError::MalformedRecord)
//! naming the offending line number.

use crate::error::{EvrepError, Result};
use crate::record::{CaptureRecord, FIELD_COUNT};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

/// Streaming reader for the capture log.
#[derive(Debug)]
pub struct RecordReader<R: BufRead> {
    input: R,
    line_number: u64,
}

impl RecordReader<BufReader<File>> {
    /// Open the log file at `path` for sequential reading.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .map_err(|e| EvrepError::io(format!("open log file {}", path.display()), e))?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> RecordReader<R> {
    /// Wrap any buffered byte source.
    pub fn new(input: R) -> Self {
        Self {
            input,
            line_number: 0,
        }
    }

    /// Parse one trimmed log line into a record.
    fn parse_line(&self, line: &str) -> Result<CaptureRecord> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() != FIELD_COUNT {
            return Err(EvrepError::malformed(
                self.line_number,
                format!("expected {} fields, found {}", FIELD_COUNT, fields.len()),
            ));
        }

        Ok(CaptureRecord {
            delta_micros: self.parse_field(fields[0], "delta")?,
            device: fields[1].to_string(),
            event_type: self.parse_field(fields[2], "event type")?,
            code: self.parse_field(fields[3], "event code")?,
            value: self.parse_field(fields[4], "event value")?,
        })
    }

    fn parse_field<T: FromStr>(&self, field: &str, what: &str) -> Result<T> {
        field.parse().map_err(|_| {
            EvrepError::malformed(self.line_number, format!("invalid {}: {:?}", what, field))
        })
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<CaptureRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut line = String::new();
        loop {
            line.clear();
            self.line_number += 1;

            match self.input.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(EvrepError::io("read log line", e))),
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                // A trailing newline produces one empty final line; skip it.
                continue;
            }

            return Some(self.parse_line(trimmed));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader(log: &str) -> RecordReader<Cursor<&[u8]>> {
        RecordReader::new(Cursor::new(log.as_bytes()))
    }

    #[test]
    fn parses_padded_capture_output() {
        let log = "             0 event0 1 30 1\n          1250 event1 1 30 0\n";
        let records: Vec<CaptureRecord> = reader(log).map(|r| r.unwrap()).collect();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].delta_micros, 0);
        assert_eq!(records[0].device, "event0");
        assert_eq!(records[1].delta_micros, 1250);
        assert_eq!(records[1].code, 30);
        assert_eq!(records[1].value, 0);
    }

    #[test]
    fn too_few_fields_is_malformed() {
        let mut r = reader("0 event0 1 30\n");
        let err = r.next().unwrap().unwrap_err();
        match err {
            EvrepError::MalformedRecord { line, message } => {
                assert_eq!(line, 1);
                assert!(message.contains("found 4"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn too_many_fields_is_malformed() {
        let mut r = reader("0 event0 1 30 1 extra\n");
        assert!(matches!(
            r.next().unwrap(),
            Err(EvrepError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn non_numeric_field_is_malformed() {
        let mut r = reader("abc event0 1 30 1\n");
        let err = r.next().unwrap().unwrap_err();
        assert!(err.to_string().contains("invalid delta"));

        let mut r = reader("0 event0 1 thirty 1\n");
        let err = r.next().unwrap().unwrap_err();
        assert!(err.to_string().contains("invalid event code"));
    }

    #[test]
    fn reports_line_number_of_bad_line() {
        let log = "0 event0 1 30 1\n5 event0 1 30 0\nbroken line here\n";
        let mut r = reader(log);
        assert!(r.next().unwrap().is_ok());
        assert!(r.next().unwrap().is_ok());

        match r.next().unwrap().unwrap_err() {
            EvrepError::MalformedRecord { line, .. } => assert_eq!(line, 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn empty_input_yields_no_records() {
        assert!(reader("").next().is_none());
        assert!(reader("\n").next().is_none());
    }

    #[test]
    fn negative_delta_parses() {
        let mut r = reader("-7 event0 1 30 1\n");
        assert_eq!(r.next().unwrap().unwrap().delta_micros, -7);
    }
}
