//! Time sources for the search deadline.
//!
//! The engine reads the clock once per iteration, after branching, and
//! compares the reading against [`crate::policy::SearchPolicy::budget`].

use std::time::Instant;

/// A monotone source of elapsed ticks.
pub trait Clock {
    /// Ticks elapsed since the search started.
    fn elapsed(&mut self) -> u64;
}

/// Wall-clock milliseconds since construction.
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    start: Instant,
}

impl WallClock {
    #[must_use]
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for WallClock {
    fn elapsed(&mut self) -> u64 {
        u64::try_from(self.start.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// A logical clock that advances by one tick per reading, so a budget of
/// `n` allows exactly `n` iterations. Runs are reproducible bit for bit.
#[derive(Debug, Clone, Copy, Default)]
pub struct IterationClock {
    ticks: u64,
}

impl IterationClock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}

impl Clock for IterationClock {
    fn elapsed(&mut self) -> u64 {
        self.ticks += 1;
        self.ticks
    }
}
