//! One-shot ascending temperature alarms.

use crate::events::RoastEventSet;
use crate::types::{AlarmThreshold, EventKind};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Alarms {
    thresholds: Vec<AlarmThreshold>,
}

impl Alarms {
    pub fn from_temperatures(temps: &[f64]) -> Self {
        Self {
            thresholds: temps
                .iter()
                .map(|&temperature| AlarmThreshold {
                    temperature,
                    triggered: false,
                })
                .collect(),
        }
    }

    pub fn thresholds(&self) -> &[AlarmThreshold] {
        &self.thresholds
    }

    /// Check the first untriggered threshold against `current`. Returns its
    /// temperature when it fires. Nothing fires before TURNING_POINT.
    pub fn evaluate(&mut self, events: &RoastEventSet, current: f64) -> Option<f64> {
        if !events.is_set(EventKind::TurningPoint) {
            return None;
        }
        let next = self.thresholds.iter_mut().find(|a| !a.triggered)?;
        if current >= next.temperature {
            next.triggered = true;
            tracing::info!(temperature = next.temperature, current, "alarm triggered");
            Some(next.temperature)
        } else {
            None
        }
    }

    pub fn reset(&mut self) {
        for a in &mut self.thresholds {
            a.triggered = false;
        }
    }

    pub fn fired(&self) -> impl Iterator<Item = f64> + '_ {
        self.thresholds
            .iter()
            .filter(|a| a.triggered)
            .map(|a| a.temperature)
    }
}
