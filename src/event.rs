//! Fixed-size kernel input event records.
//!
//! Devices under the input subsystem speak a stream of `struct input_event`
//! records. This module owns the byte-level view of that record: decoding one
//! event from exactly `EVENT_SIZE` raw bytes, re-encoding an event for
//! injection, and extracting the microsecond timestamp used for delta
//! computation.

use std::mem;

/// Size in bytes of one raw kernel input event record.
pub const EVENT_SIZE: usize = mem::size_of::<libc::input_event>();

/// One hardware input change: timestamp plus (type, code, value) triple.
///
/// The timestamp is the kernel's event time flattened to microseconds. It is
/// only meaningful on the capture side; injected events carry a zeroed
/// timestamp, which the kernel ignores on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputEvent {
    /// Event time in microseconds (tv_sec * 1_000_000 + tv_usec)
    pub time_micros: i64,
    /// Event type (EV_KEY, EV_REL, EV_ABS, ...)
    pub event_type: u16,
    /// Event code within the type (KEY_A, REL_X, ...)
    pub code: u16,
    /// Event value (press/release, axis delta, ...)
    pub value: i32,
}

impl InputEvent {
    /// Create an event for injection. The timestamp stays zero.
    pub fn for_injection(event_type: u16, code: u16, value: i32) -> Self {
        Self {
            time_micros: 0,
            event_type,
            code,
            value,
        }
    }

    /// Decode one event from a raw kernel record.
    ///
    /// The buffer is exactly one record; the caller is responsible for having
    /// read `EVENT_SIZE` bytes (a short read is a fatal stream desync,
    /// handled at the I/O layer).
    pub fn from_raw(buf: &[u8; EVENT_SIZE]) -> Self {
        // The record came from the kernel with native layout, so reading it
        // back as input_event is sound. read_unaligned keeps the buffer free
        // of alignment requirements.
        let raw: libc::input_event =
            unsafe { std::ptr::read_unaligned(buf.as_ptr() as *const libc::input_event) };

        Self {
            time_micros: raw.time.tv_sec as i64 * 1_000_000 + raw.time.tv_usec as i64,
            event_type: raw.type_,
            code: raw.code,
            value: raw.value,
        }
    }

    /// Encode this event as one raw kernel record for device injection.
    ///
    /// The timestamp is written as zero regardless of `time_micros`; pacing
    /// is the scheduler's job, not the record's.
    pub fn to_raw(&self) -> [u8; EVENT_SIZE] {
        let mut raw: libc::input_event = unsafe { mem::zeroed() };
        raw.type_ = self.event_type;
        raw.code = self.code;
        raw.value = self.value;

        let mut buf = [0u8; EVENT_SIZE];
        unsafe {
            std::ptr::write_unaligned(buf.as_mut_ptr() as *mut libc::input_event, raw);
        }
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a raw record the way the kernel would emit it.
    fn raw_event(sec: i64, usec: i64, event_type: u16, code: u16, value: i32) -> [u8; EVENT_SIZE] {
        let mut raw: libc::input_event = unsafe { mem::zeroed() };
        raw.time.tv_sec = sec as libc::time_t;
        raw.time.tv_usec = usec as libc::suseconds_t;
        raw.type_ = event_type;
        raw.code = code;
        raw.value = value;

        let mut buf = [0u8; EVENT_SIZE];
        unsafe {
            std::ptr::write_unaligned(buf.as_mut_ptr() as *mut libc::input_event, raw);
        }
        buf
    }

    #[test]
    fn decodes_timestamp_to_micros() {
        let buf = raw_event(3, 250_000, 1, 30, 1);
        let event = InputEvent::from_raw(&buf);

        assert_eq!(event.time_micros, 3_250_000);
        assert_eq!(event.event_type, 1);
        assert_eq!(event.code, 30);
        assert_eq!(event.value, 1);
    }

    #[test]
    fn injection_encoding_zeroes_timestamp() {
        let event = InputEvent {
            time_micros: 987_654_321,
            event_type: 2,
            code: 0,
            value: -5,
        };

        let decoded = InputEvent::from_raw(&event.to_raw());
        assert_eq!(decoded.time_micros, 0);
        assert_eq!(decoded.event_type, 2);
        assert_eq!(decoded.code, 0);
        assert_eq!(decoded.value, -5);
    }

    #[test]
    fn event_size_matches_kernel_abi() {
        assert_eq!(EVENT_SIZE, mem::size_of::<libc::input_event>());
        // tv_sec + tv_usec + type + code + value
        assert!(EVENT_SIZE >= 16);
    }
}
