//! Per-channel state: live readings, history and derived series.

use crate::config::EngineCfg;
use crate::pipeline::{DerivedSeries, derive_series};
use crate::ror::build_ror_series;
use crate::types::{RoastEvent, Sample};
use crate::window::SampleWindow;

#[derive(Debug, Clone)]
pub struct Channel {
    pub id: String,
    pub label: String,
    pub color: String,
    pub ror_color: Option<String>,
    current: f64,
    current_ror: f64,
    window: SampleWindow,
    history: Vec<Sample>,
    derived: DerivedSeries,
    last_smoothed: Option<Sample>,
}

impl Channel {
    pub fn new(id: impl Into<String>, window_len: usize) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            color: String::new(),
            ror_color: None,
            current: 0.0,
            current_ror: 0.0,
            window: SampleWindow::new(window_len),
            history: Vec::new(),
            derived: DerivedSeries::default(),
            last_smoothed: None,
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    #[must_use]
    pub fn with_colors(mut self, color: impl Into<String>, ror_color: Option<String>) -> Self {
        self.color = color.into();
        self.ror_color = ror_color;
        self
    }

    /// Resize the live window (drops any buffered readings).
    #[must_use]
    pub fn with_window_len(mut self, window_len: usize) -> Self {
        if self.window.capacity() != window_len.max(2) {
            self.window = SampleWindow::new(window_len);
        }
        self
    }

    pub const fn current(&self) -> f64 {
        self.current
    }

    /// Instantaneous ROR over the live window.
    pub const fn current_ror(&self) -> f64 {
        self.current_ror
    }

    pub fn history(&self) -> &[Sample] {
        &self.history
    }

    pub fn derived(&self) -> &DerivedSeries {
        &self.derived
    }

    pub fn ror(&self) -> &[Sample] {
        &self.derived.ror
    }

    /// Last point of the most recent non-empty smoothing pass.
    pub const fn last_smoothed(&self) -> Option<Sample> {
        self.last_smoothed
    }

    /// Take a live reading. With `record_at` the reading is also appended to
    /// the history at that roast-timer second.
    pub fn observe(&mut self, value: f64, arrival_ms: u64, record_at: Option<i64>) {
        self.current = value;
        self.current_ror = self.window.push(value, arrival_ms);
        if let Some(ts) = record_at {
            self.history.push(Sample::new(ts, value));
        }
    }

    /// Raw ROR only (secondary channels).
    pub fn recompute_ror(&mut self, cfg: &EngineCfg, drop: Option<&RoastEvent>) {
        self.derived.ror = build_ror_series(&self.history, cfg.ror.window, drop);
    }

    /// Full ROR / outlier / smoothing pass (primary channel).
    pub fn recompute_all(&mut self, cfg: &EngineCfg, drop: Option<&RoastEvent>, live: bool) {
        self.derived = derive_series(&self.history, drop, cfg, live);
        if let Some(p) = self.derived.last_smoothed() {
            self.last_smoothed = Some(p);
        }
    }

    /// Replace the history wholesale (profile load). Derived series are
    /// cleared until the next recompute.
    pub fn replace_history(&mut self, history: Vec<Sample>) {
        self.current = history.last().map_or(0.0, |s| s.value);
        self.history = history;
        self.derived = DerivedSeries::default();
    }

    pub fn reset(&mut self) {
        self.current = 0.0;
        self.current_ror = 0.0;
        self.window.clear();
        self.history.clear();
        self.derived = DerivedSeries::default();
        self.last_smoothed = None;
    }
}

/// Operator-set channel (gas, airflow, ...). Values are stepped integers in
/// `[min, max]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ManualChannel {
    pub id: String,
    pub label: String,
    pub unit: String,
    pub min: u16,
    pub max: u16,
    pub step: u16,
    pub default_value: u16,
    history: Vec<Sample>,
}

impl ManualChannel {
    pub fn new(id: impl Into<String>, min: u16, max: u16, step: u16, default_value: u16) -> Self {
        let id = id.into();
        Self {
            label: id.clone(),
            id,
            unit: String::new(),
            min,
            max,
            step: step.max(1),
            default_value,
            history: vec![Sample::new(0, f64::from(default_value))],
        }
    }

    pub fn history(&self) -> &[Sample] {
        &self.history
    }

    pub fn current(&self) -> f64 {
        self.history
            .last()
            .map_or(f64::from(self.default_value), |s| s.value)
    }

    /// Append a value at `timestamp`, clamped to `[min, max]`.
    pub fn set(&mut self, timestamp: i64, value: f64) -> Sample {
        let v = value.clamp(f64::from(self.min), f64::from(self.max));
        let s = Sample::new(timestamp, v);
        self.history.push(s);
        s
    }

    pub fn replace_history(&mut self, history: Vec<Sample>) {
        self.history = history;
    }

    pub fn reset(&mut self) {
        self.history = vec![Sample::new(0, f64::from(self.default_value))];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn observe_without_recording_keeps_history_empty() {
        let mut c = Channel::new("BT", 5);
        c.observe(180.0, 0, None);
        c.observe(181.0, 1_000, None);
        assert!(c.history().is_empty());
        assert_eq!(c.current(), 181.0);
        assert_eq!(c.current_ror(), 60.0);
    }

    #[test]
    fn last_smoothed_survives_empty_pass() {
        let cfg = EngineCfg::default();
        let mut c = Channel::new("BT", 5);
        for t in 0..30 {
            c.observe(100.0 + t as f64, t as u64 * 1_000, Some(t));
        }
        c.recompute_all(&cfg, None, false);
        let before = c.last_smoothed();
        assert!(before.is_some());
        c.replace_history(vec![Sample::new(0, 1.0)]);
        c.recompute_all(&cfg, None, false);
        assert!(c.derived().convolved.is_empty());
        assert_eq!(c.last_smoothed(), before);
        c.reset();
        assert_eq!(c.last_smoothed(), None);
    }

    #[test]
    fn manual_channel_clamps_and_resets() {
        let mut m = ManualChannel::new("gas", 0, 100, 5, 50);
        assert_eq!(m.current(), 50.0);
        assert_eq!(m.set(10, 140.0).value, 100.0);
        m.reset();
        assert_eq!(m.history(), &[Sample::new(0, 50.0)]);
    }
}
