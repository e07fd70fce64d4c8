//! Call context: who is calling and what time the commit clock reads.
//!
//! The registry never reads ambient globals for identity or time. Both come
//! in through a [`CallContext`] built by the calling environment.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use clairo_core::Submitter;

/// Source of commit time, in seconds since the Unix epoch.
pub trait Clock: Send + Sync {
    fn now(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// A manually driven clock for tests and replays.
#[derive(Debug, Default)]
pub struct FixedClock(AtomicU64);

impl FixedClock {
    pub fn new(now: u64) -> Self {
        Self(AtomicU64::new(now))
    }

    pub fn set(&self, now: u64) {
        self.0.store(now, Ordering::SeqCst);
    }

    /// Move the clock forward and return the new reading.
    pub fn advance(&self, secs: u64) -> u64 {
        self.0.fetch_add(secs, Ordering::SeqCst) + secs
    }
}

impl Clock for FixedClock {
    fn now(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-call inputs supplied by the environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// The authenticated caller; recorded as the proof's submitter.
    pub caller: Submitter,
    /// Commit clock reading. The store may raise it to keep commit times
    /// non-decreasing, but never lowers it.
    pub now: u64,
}

impl CallContext {
    pub fn new(caller: Submitter, now: u64) -> Self {
        Self { caller, now }
    }

    /// Read the commit time from a clock.
    pub fn with_clock(caller: Submitter, clock: &dyn Clock) -> Self {
        Self::new(caller, clock.now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::new(100);
        assert_eq!(clock.now(), 100);
        assert_eq!(clock.advance(5), 105);
        clock.set(7);

        let ctx = CallContext::with_clock(Submitter::derive("alice"), &clock);
        assert_eq!(ctx.now, 7);
        assert_eq!(ctx.caller, Submitter::derive("alice"));
    }

    #[test]
    fn test_system_clock_is_after_2020() {
        assert!(SystemClock.now() > 1_577_836_800);
    }
}
