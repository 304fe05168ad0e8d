//! Milestone auto-detection.
//!
//! Each detector is a pure function of the current series and event set. It
//! returns the event it would add, or `None`. Guards make every detector
//! idempotent: once its target slot is filled it never fires again.

use crate::config::DetectionCfg;
use crate::events::RoastEventSet;
use crate::types::{EventKind, RoastEvent, Sample};

/// Charge dip / drop cooldown heuristic over the trailing raw ROR window.
///
/// Fires when ROR goes from positive to sharply negative inside the window.
/// The first firing is CHARGE; after TURNING_POINT the same pattern is DROP.
pub fn detect_charge_drop(
    ror: &[Sample],
    history: &[Sample],
    events: &RoastEventSet,
    cfg: &DetectionCfg,
) -> Option<RoastEvent> {
    let w = cfg.charge_window.max(5);
    if ror.len() < w {
        return None;
    }
    let win = &ror[ror.len() - w..];
    let (w0, w1) = (win[0].value, win[1].value);
    let (wa, wb) = (win[w - 2].value, win[w - 1].value);
    let d_pre = (w0 + w1) / 2.0;
    let d_post = (wa + wb) / 2.0;
    let fired = w0 > 0.0 && w1 > 0.0 && wa < 0.0 && wb < 0.0 && d_post.abs() > 2.0 * d_pre.abs();
    if !fired {
        return None;
    }

    let kind = if !events.is_set(EventKind::Charge) {
        EventKind::Charge
    } else if events.is_set(EventKind::TurningPoint) && !events.is_set(EventKind::Drop) {
        EventKind::Drop
    } else {
        return None;
    };
    let target = history.get(ror.len() - 1 - w / 2)?;
    Some(RoastEvent::at(kind, *target))
}

/// Turning point: the bottom of the post-charge dip.
///
/// Scans the whole history for its running min and max; fires once the last
/// two readings are back above the minimum and the swing exceeds the
/// configured drop. Both conditions only get easier as the scan advances,
/// so checking after the full scan matches an early-exit scan.
pub fn detect_turning_point(
    history: &[Sample],
    events: &RoastEventSet,
    cfg: &DetectionCfg,
) -> Option<RoastEvent> {
    if !events.is_set(EventKind::Charge) || events.is_set(EventKind::TurningPoint) {
        return None;
    }
    let n = history.len();
    if n < 3 {
        return None;
    }
    let (tp, high) = history
        .iter()
        .fold((1000.0_f64, 0.0_f64), |(lo, hi), s| (lo.min(s.value), hi.max(s.value)));
    let recovering = history[n - 1].value > tp && history[n - 2].value > tp;
    if recovering && high - tp > cfg.turning_point_min_drop {
        Some(RoastEvent::at(EventKind::TurningPoint, history[n - 3]))
    } else {
        None
    }
}

/// Dry end: the last two readings exceed the configured temperature.
pub fn detect_dry_end(
    history: &[Sample],
    events: &RoastEventSet,
    cfg: &DetectionCfg,
) -> Option<RoastEvent> {
    if !events.is_set(EventKind::TurningPoint) || events.is_set(EventKind::DryEnd) {
        return None;
    }
    let n = history.len();
    if n < 2 {
        return None;
    }
    if history[n - 1].value > cfg.dry_end_temp && history[n - 2].value > cfg.dry_end_temp {
        Some(RoastEvent::at(EventKind::DryEnd, history[n - 2]))
    } else {
        None
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Detection {
    pub events: RoastEventSet,
    pub detected: Vec<RoastEvent>,
}

/// Run charge/drop, turning point and dry end in that order, each seeing the
/// events added by the ones before it.
pub fn run_detectors(
    ror: &[Sample],
    history: &[Sample],
    events: RoastEventSet,
    cfg: &DetectionCfg,
) -> Detection {
    let mut out = Detection {
        events,
        detected: Vec::new(),
    };
    if let Some(ev) = detect_charge_drop(ror, history, &out.events, cfg) {
        out.events = out.events.with_event(ev);
        out.detected.push(ev);
    }
    if let Some(ev) = detect_turning_point(history, &out.events, cfg) {
        out.events = out.events.with_event(ev);
        out.detected.push(ev);
    }
    if let Some(ev) = detect_dry_end(history, &out.events, cfg) {
        out.events = out.events.with_event(ev);
        out.detected.push(ev);
    }
    out
}
