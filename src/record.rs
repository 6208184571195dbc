//! Capture log records and their text line format.
//!
//! One record per newline-terminated line, fields separated by whitespace:
//!
//! ```text
//! <delta_micros> <device_name> <event_type> <event_code> <event_value>
//! ```
//!
//! `delta_micros` is the elapsed time since the previous record (0 for the
//! first record) and is written right-aligned in a 14-character column so
//! logs stay eyeball-able; the reader tolerates any amount of surrounding
//! whitespace. Lines appear in strict chronological emission order.

pub mod reader;
pub mod writer;

pub use reader::RecordReader;
pub use writer::RecordWriter;

/// Number of whitespace-separated fields in one log line.
pub const FIELD_COUNT: usize = 5;

/// Column width for the delta field, matching the capture format.
pub(crate) const DELTA_WIDTH: usize = 14;

/// One captured input event, delta-timestamped against its predecessor.
///
/// Produced in arrival order by the capture pipeline, consumed in file order
/// by replay. Immutable once written: summing deltas from the first record
/// reconstructs a non-decreasing absolute timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureRecord {
    /// Microseconds since the previous record; 0 for the first record
    pub delta_micros: i64,
    /// Logical device name the event was read from / will be written to
    pub device: String,
    /// Kernel event type
    pub event_type: u16,
    /// Kernel event code
    pub code: u16,
    /// Kernel event value
    pub value: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_equality_covers_all_fields() {
        let record = CaptureRecord {
            delta_micros: 125,
            device: "event2".to_string(),
            event_type: 1,
            code: 30,
            value: 1,
        };
        let mut other = record.clone();
        assert_eq!(record, other);

        other.delta_micros = 126;
        assert_ne!(record, other);
    }
}
