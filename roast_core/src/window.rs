//! Bounded trailing window of live readings for the instantaneous ROR.

use std::collections::VecDeque;

use crate::ror::ror_per_minute;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Entry {
    value: f64,
    arrival_ms: u64,
}

/// Holds at most `capacity` readings together with their wall-clock arrival
/// (ms). The oldest entry is evicted first.
#[derive(Debug, Clone)]
pub struct SampleWindow {
    buf: VecDeque<Entry>,
    cap: usize,
}

impl SampleWindow {
    pub const DEFAULT_CAPACITY: usize = 5;

    pub fn new(capacity: usize) -> Self {
        let cap = capacity.max(2);
        Self {
            buf: VecDeque::with_capacity(cap),
            cap,
        }
    }

    /// Push a reading and return the updated instantaneous ROR.
    pub fn push(&mut self, value: f64, arrival_ms: u64) -> f64 {
        if self.buf.len() == self.cap {
            self.buf.pop_front();
        }
        self.buf.push_back(Entry { value, arrival_ms });
        self.current_ror()
    }

    /// ROR (units/min) between the oldest and newest entry; 0 with fewer than
    /// two entries or when no wall time has passed.
    pub fn current_ror(&self) -> f64 {
        match (self.buf.front(), self.buf.back()) {
            (Some(first), Some(last)) if self.buf.len() >= 2 => {
                let dt_ms = last.arrival_ms.saturating_sub(first.arrival_ms);
                ror_per_minute(last.value - first.value, dt_ms as f64 / 1000.0)
            }
            _ => 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        self.cap
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl Default for SampleWindow {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}
