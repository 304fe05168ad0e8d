//! Rate-of-rise series over the recorded history.

use crate::types::{RoastEvent, Sample};

/// Change per minute, floored to one decimal. Any non-finite or zero result
/// collapses to `0.0` (so no `-0.0` either).
#[inline]
pub fn ror_per_minute(delta_value: f64, delta_secs: f64) -> f64 {
    let r = (delta_value / delta_secs * 60.0 * 10.0).floor() / 10.0;
    if r.is_finite() && r != 0.0 { r } else { 0.0 }
}

/// One ROR point per history sample, measured from the first to the last
/// sample of the trailing `window` ending at that sample. With a DROP event,
/// points after the DROP timestamp are cut off.
pub fn build_ror_series(history: &[Sample], window: usize, drop: Option<&RoastEvent>) -> Vec<Sample> {
    let span = window.max(2) - 1;
    let mut out = Vec::with_capacity(history.len());
    for (i, cur) in history.iter().enumerate() {
        if let Some(d) = drop
            && cur.timestamp > d.timestamp
        {
            break;
        }
        let first = &history[i.saturating_sub(span)];
        let dt = (cur.timestamp - first.timestamp) as f64;
        out.push(Sample::new(
            cur.timestamp,
            ror_per_minute(cur.value - first.value, dt),
        ));
    }
    out
}
