// src/clock.rs

// clock module definition and implementations

// dependencies
use std::time::Instant;

/// Clock trait to abstract time retrieval.
/// Implementors must be thread-safe (Send + Sync).
/// The `now` method returns monotonic nanoseconds since an arbitrary, fixed origin.
/// The AdmissionController only ever compares readings from the same clock, so the
/// origin itself carries no meaning.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// SystemClock implementation backed by `std::time::Instant`.
/// Readings never go backwards, so bucket refills cannot be skewed by
/// wall-clock adjustments.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

// Make SystemClock the default
impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        // u64 nanoseconds covers ~584 years of process uptime
        self.origin.elapsed().as_nanos() as u64
    }
}
