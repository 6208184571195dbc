//! Replay scheduler: reconstructs absolute timing from relative deltas.
//!
//! A running target time starts at the monotonic clock reading when the
//! scheduler is built and advances strictly by each record's delta. The
//! scheduler then spin-sleeps (short fixed-granularity sleeps, re-checking
//! the clock) until the target is due and issues exactly one device write.
//! The spin loop is a deliberate design choice: OS sleep granularity cannot
//! be trusted below a millisecond, and timing fidelity is the feature under
//! test. CPU cost is the accepted price.

use crate::error::Result;
use crate::event::InputEvent;
use crate::record::CaptureRecord;
use crate::replay::clock::MonotonicClock;
use crate::replay::resolver::DeviceResolver;
use log::debug;
use std::io::BufRead;

/// Paces capture records back out against a monotonic clock.
#[derive(Debug)]
pub struct ReplayScheduler<C: MonotonicClock> {
    clock: C,
    target_micros: i64,
}

impl<C: MonotonicClock> ReplayScheduler<C> {
    /// Anchor the cumulative target at the clock's current reading.
    pub fn new(clock: C) -> Self {
        let target_micros = clock.now_micros();
        Self {
            clock,
            target_micros,
        }
    }

    /// Current absolute target in clock microseconds.
    pub fn target_micros(&self) -> i64 {
        self.target_micros
    }

    /// Advance the target by one record's delta and block until it is due.
    pub fn pace(&mut self, delta_micros: i64) {
        self.target_micros += delta_micros;
        while self.clock.now_micros() < self.target_micros {
            self.clock.spin_sleep();
        }
    }

    /// Dispatch one record: pace to its target, then write exactly one event
    /// to the resolved device.
    pub fn dispatch(&mut self, record: &CaptureRecord, resolver: &mut DeviceResolver) -> Result<()> {
        self.pace(record.delta_micros);

        let event = InputEvent::for_injection(record.event_type, record.code, record.value);
        resolver.resolve(&record.device)?.write_event(&event)
    }

    /// Replay every record from `reader` in file order.
    ///
    /// Returns the number of events written on clean end-of-input; the first
    /// malformed line, unresolvable device, or short write aborts the run.
    pub fn run<R: BufRead>(
        &mut self,
        reader: crate::record::RecordReader<R>,
        resolver: &mut DeviceResolver,
    ) -> Result<u64> {
        let mut replayed = 0u64;
        for record in reader {
            self.dispatch(&record?, resolver)?;
            replayed += 1;
        }
        debug!("replayed {replayed} events across {} devices", resolver.opened_count());
        Ok(replayed)
    }
}
