//! Session status and the per-tick report.

use crate::types::{Phases, RoastEvent, Sample};

/// Lifecycle of a roast session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionStatus {
    /// Probe idle; nothing is read.
    #[default]
    Off,
    /// Live readings update current values but are not recorded.
    On,
    /// Readings are appended to the channel histories.
    Recording,
}

/// What one tick changed.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    /// Roast timer (s) the tick ran at.
    pub timer: i64,
    /// Events auto-detected during this tick, in detection order.
    pub detected: Vec<RoastEvent>,
    /// Alarm temperature that fired this tick.
    pub alarm: Option<f64>,
    pub phases: Phases,
    pub last_smoothed: Option<Sample>,
}
