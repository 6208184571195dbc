//! Replay pipeline: log reading, lazy device resolution, and paced dispatch.

pub mod clock;
pub mod resolver;
pub mod scheduler;

pub use clock::{MonotonicClock, SystemClock};
pub use resolver::DeviceResolver;
pub use scheduler::ReplayScheduler;
