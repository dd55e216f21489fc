//! Frame timing from a monotonic tick counter

use std::time::Instant;

/// A monotonic high-resolution counter
pub trait TickSource {
    fn ticks(&self) -> u64;
    /// Ticks per second
    fn frequency(&self) -> u64;
}

/// `std::time::Instant` counted in nanoseconds since creation
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self { origin: Instant::now() }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl TickSource for MonotonicClock {
    fn ticks(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }

    fn frequency(&self) -> u64 {
        1_000_000_000
    }
}

/// Last sampled tick and the counter's frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameClock {
    last: u64,
    frequency: u64,
}

impl FrameClock {
    /// Start timing from the source's current tick
    pub fn start<T: TickSource + ?Sized>(source: &T) -> Self {
        Self { last: source.ticks(), frequency: source.frequency().max(1) }
    }

    pub fn last_tick(&self) -> u64 {
        self.last
    }

    /// Seconds since the previous sample; never negative.
    ///
    /// The first call measures from [`FrameClock::start`].
    pub fn advance(&mut self, now: u64) -> f32 {
        let elapsed = now.saturating_sub(self.last);
        self.last = now;
        (elapsed as f64 / self.frequency as f64) as f32
    }
}
