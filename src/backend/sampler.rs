//! Repeated-message sampling.
//!
//! # Policy
//! Within each tick, the first `first` records with the same level and
//! message pass; after that only every `thereafter`-th one does. Counters
//! reset when a new tick starts.
//!
//! # Design Decisions
//! - Each level has a fixed table of `COUNTER_SLOTS` counters indexed by the
//!   message hash, so formatted messages with ever-changing text cannot grow
//!   it; distinct messages that share a slot share a counter
//! - DashMap shards the counters; a check only locks one entry

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use dashmap::DashMap;

use crate::level::Level;

/// Records allowed through per message per tick before thinning starts.
pub const SAMPLING_INITIAL: u64 = 100;

/// After the initial burst, one record in this many passes.
pub const SAMPLING_THEREAFTER: u64 = 100;

/// Length of a sampling window.
pub const SAMPLING_TICK: Duration = Duration::from_secs(1);

/// Counters per level.
pub const COUNTER_SLOTS: u64 = 4096;

#[derive(Debug)]
struct Counter {
    reset_at: Instant,
    count: u64,
}

/// Drops repetitive records.
#[derive(Debug)]
pub(crate) struct Sampler {
    tick: Duration,
    first: u64,
    thereafter: u64,
    counters: DashMap<(Level, u64), Counter>,
}

impl Sampler {
    pub(crate) fn new(tick: Duration, first: u64, thereafter: u64) -> Self {
        Self {
            tick,
            first,
            thereafter,
            counters: DashMap::new(),
        }
    }

    /// Whether a record with this level and message should be written now.
    pub(crate) fn check(&self, level: Level, message: &str) -> bool {
        self.check_at(level, message, Instant::now())
    }

    fn check_at(&self, level: Level, message: &str, now: Instant) -> bool {
        let mut hasher = DefaultHasher::new();
        message.hash(&mut hasher);
        let key = (level, hasher.finish() % COUNTER_SLOTS);

        let n = {
            let mut counter = self.counters.entry(key).or_insert_with(|| Counter {
                reset_at: now + self.tick,
                count: 0,
            });
            if now >= counter.reset_at {
                counter.count = 0;
                counter.reset_at = now + self.tick;
            }
            counter.count += 1;
            counter.count
        };

        if n <= self.first {
            return true;
        }
        self.thereafter != 0 && (n - self.first) % self.thereafter == 0
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::new(SAMPLING_TICK, SAMPLING_INITIAL, SAMPLING_THEREAFTER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passed(sampler: &Sampler, level: Level, msg: &str, n: usize, now: Instant) -> usize {
        (0..n).filter(|_| sampler.check_at(level, msg, now)).count()
    }

    #[test]
    fn test_initial_burst_then_thinning() {
        let sampler = Sampler::default();
        let now = Instant::now();
        assert_eq!(passed(&sampler, Level::Info, "tick", 250, now), 101);
    }

    #[test]
    fn test_counters_reset_each_tick() {
        let sampler = Sampler::default();
        let start = Instant::now();
        assert_eq!(passed(&sampler, Level::Info, "tick", 150, start), 100);

        let later = start + SAMPLING_TICK;
        assert_eq!(passed(&sampler, Level::Info, "tick", 100, later), 100);
    }

    #[test]
    fn test_table_size_is_fixed() {
        let sampler = Sampler::default();
        let start = Instant::now();
        for i in 0..100_000 {
            sampler.check_at(Level::Info, &format!("request {i} handled"), start);
        }
        sampler.check_at(Level::Info, "request 0 handled", start + SAMPLING_TICK);
        sampler.check_at(Level::Warn, "request 0 handled", start + SAMPLING_TICK);

        assert!(sampler.counters.len() as u64 <= COUNTER_SLOTS + 1);
    }

    #[test]
    fn test_messages_and_levels_are_independent() {
        let sampler = Sampler::new(SAMPLING_TICK, 2, 0);
        let now = Instant::now();
        assert_eq!(passed(&sampler, Level::Info, "a", 5, now), 2);
        assert_eq!(passed(&sampler, Level::Info, "b", 5, now), 2);
        assert_eq!(passed(&sampler, Level::Warn, "a", 5, now), 2);
    }
}
