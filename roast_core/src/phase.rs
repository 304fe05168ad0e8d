//! Drying / maillard / development phase breakdown.

use crate::events::RoastEventSet;
use crate::types::{EventKind, Phase, Phases};

fn percent(part: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let p = part as f64 / total as f64 * 100.0;
    if p.is_finite() { p } else { 0.0 }
}

fn phase(duration_secs: i64, total: i64, temp_rise: f64) -> Phase {
    Phase {
        duration_secs,
        percent: percent(duration_secs, total),
        temp_rise,
    }
}

/// Compute the phases at `now` with the primary channel reading `current`.
///
/// Without CHARGE every phase is zero. Once DROP is set its timestamp and
/// value replace `now`/`current`.
pub fn calculate_phases(now: i64, current: f64, events: &RoastEventSet) -> Phases {
    let Some(charge) = events.get(EventKind::Charge) else {
        tracing::warn!("phase calculation requested before CHARGE; reporting zero phases");
        return Phases::default();
    };
    let Some(tp) = events.get(EventKind::TurningPoint) else {
        let dry = now - charge.timestamp;
        return Phases {
            dry: Phase {
                duration_secs: dry,
                percent: 100.0,
                temp_rise: 0.0,
            },
            ..Phases::default()
        };
    };

    let (end_t, end_v) = events
        .get(EventKind::Drop)
        .map_or((now, current), |d| (d.timestamp, d.value));

    match (events.get(EventKind::DryEnd), events.get(EventKind::FcStart)) {
        (None, None) => {
            let dry = end_t - charge.timestamp;
            Phases {
                dry: Phase {
                    duration_secs: dry,
                    percent: 100.0,
                    temp_rise: end_v - tp.value,
                },
                ..Phases::default()
            }
        }
        (Some(de), None) => {
            let dry = de.timestamp - charge.timestamp;
            let mai = end_t - de.timestamp;
            let total = dry + mai;
            Phases {
                dry: phase(dry, total, de.value - tp.value),
                maillard: phase(mai, total, end_v - de.value),
                ..Phases::default()
            }
        }
        (Some(de), Some(fc)) => {
            let dry = de.timestamp - charge.timestamp;
            let mai = fc.timestamp - de.timestamp;
            let dev = end_t - fc.timestamp;
            let total = dry + mai + dev;
            Phases {
                dry: phase(dry, total, de.value - tp.value),
                maillard: phase(mai, total, fc.value - de.value),
                develop: phase(dev, total, end_v - fc.value),
            }
        }
        (None, Some(fc)) => {
            let dry = fc.timestamp - charge.timestamp;
            let dev = end_t - fc.timestamp;
            let total = dry + dev;
            Phases {
                dry: phase(dry, total, fc.value - tp.value),
                develop: phase(dev, total, end_v - fc.value),
                ..Phases::default()
            }
        }
    }
}
