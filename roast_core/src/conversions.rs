//! `From` implementations bridging `roast_config` types to `roast_core` types.
//!
//! Covers both the TOML config (runtime cfgs) and the JSON roast profile
//! (samples, events, notes).

use roast_config::{ProfileChannel, ProfileEvent, ProfileEvents, ProfilePoint, RoastProfile};

use crate::config::{DetectionCfg, EngineCfg, RorCfg, SamplingCfg, SmoothingCfg};
use crate::events::RoastEventSet;
use crate::notes::RoastNotes;
use crate::types::{EventKind, RoastEvent, Sample};

// ── RorCfg ───────────────────────────────────────────────────────────────────

impl From<&roast_config::RorCfg> for RorCfg {
    fn from(c: &roast_config::RorCfg) -> Self {
        Self {
            window: c.window,
            outlier_window: c.outlier_window,
            outlier_z: c.outlier_z,
        }
    }
}

// ── SmoothingCfg ─────────────────────────────────────────────────────────────

impl From<&roast_config::SmoothingCfg> for SmoothingCfg {
    fn from(c: &roast_config::SmoothingCfg) -> Self {
        Self {
            kernel_len: c.kernel_len,
            live_lag: c.live_lag,
        }
    }
}

// ── DetectionCfg ─────────────────────────────────────────────────────────────

impl From<&roast_config::DetectionCfg> for DetectionCfg {
    fn from(c: &roast_config::DetectionCfg) -> Self {
        Self {
            charge_window: c.charge_window,
            turning_point_min_drop: c.turning_point_min_drop,
            dry_end_temp: c.dry_end_temp,
        }
    }
}

// ── SamplingCfg ──────────────────────────────────────────────────────────────

impl From<&roast_config::SamplingCfg> for SamplingCfg {
    fn from(c: &roast_config::SamplingCfg) -> Self {
        Self {
            sample_rate_hz: c.sample_rate_hz,
            read_timeout_ms: c.read_timeout_ms,
        }
    }
}

// ── EngineCfg ────────────────────────────────────────────────────────────────

impl From<&roast_config::Config> for EngineCfg {
    fn from(c: &roast_config::Config) -> Self {
        Self {
            ror: (&c.ror).into(),
            smoothing: (&c.smoothing).into(),
            detection: (&c.detection).into(),
        }
    }
}

// ── Samples ──────────────────────────────────────────────────────────────────

impl From<&ProfilePoint> for Sample {
    fn from(p: &ProfilePoint) -> Self {
        Self::new(p.timestamp, p.value)
    }
}

impl From<&Sample> for ProfilePoint {
    fn from(s: &Sample) -> Self {
        Self {
            timestamp: s.timestamp,
            value: s.value,
        }
    }
}

pub fn samples_from_channel(ch: &ProfileChannel) -> Vec<Sample> {
    ch.data.iter().map(Sample::from).collect()
}

pub fn channel_to_profile(id: &str, history: &[Sample]) -> ProfileChannel {
    ProfileChannel {
        id: id.to_string(),
        data: history.iter().map(ProfilePoint::from).collect(),
    }
}

// ── Events ───────────────────────────────────────────────────────────────────

fn slot(events: &ProfileEvents, kind: EventKind) -> Option<&ProfileEvent> {
    match kind {
        EventKind::Charge => events.charge.as_ref(),
        EventKind::TurningPoint => events.turning_point.as_ref(),
        EventKind::DryEnd => events.dry_end.as_ref(),
        EventKind::FcStart => events.fc_start.as_ref(),
        EventKind::FcEnd => events.fc_end.as_ref(),
        EventKind::ScStart => events.sc_start.as_ref(),
        EventKind::ScEnd => events.sc_end.as_ref(),
        EventKind::Drop => events.drop.as_ref(),
    }
}

fn slot_mut(events: &mut ProfileEvents, kind: EventKind) -> &mut Option<ProfileEvent> {
    match kind {
        EventKind::Charge => &mut events.charge,
        EventKind::TurningPoint => &mut events.turning_point,
        EventKind::DryEnd => &mut events.dry_end,
        EventKind::FcStart => &mut events.fc_start,
        EventKind::FcEnd => &mut events.fc_end,
        EventKind::ScStart => &mut events.sc_start,
        EventKind::ScEnd => &mut events.sc_end,
        EventKind::Drop => &mut events.drop,
    }
}

impl From<&ProfileEvents> for RoastEventSet {
    fn from(e: &ProfileEvents) -> Self {
        EventKind::ALL
            .iter()
            .filter_map(|&kind| {
                slot(e, kind).map(|p| RoastEvent {
                    kind,
                    timestamp: p.timestamp,
                    value: p.value,
                })
            })
            .collect()
    }
}

impl From<&RoastEventSet> for ProfileEvents {
    fn from(set: &RoastEventSet) -> Self {
        let mut out = Self::default();
        for ev in set.iter() {
            *slot_mut(&mut out, ev.kind) = Some(ProfileEvent {
                id: ev.kind.as_str().to_string(),
                timestamp: ev.timestamp,
                value: ev.value,
            });
        }
        out
    }
}

// ── Notes ────────────────────────────────────────────────────────────────────

impl From<&RoastProfile> for RoastNotes {
    fn from(p: &RoastProfile) -> Self {
        Self {
            title: p.title.clone(),
            country: p.country.clone(),
            process: p.process.clone(),
            notes: p.notes.clone(),
            weight_green: p.weight_green,
            weight_roasted: p.weight_roasted,
            volume_green: p.volume_green,
            volume_roasted: p.volume_roasted,
            density_green: p.density_green,
            density_roasted: p.density_roasted,
            moisture_green: p.moisture_green,
            moisture_roasted: p.moisture_roasted,
            color_whole: p.color_whole,
            color_ground: p.color_ground,
            flavors: p.flavor_list.clone(),
        }
    }
}

impl RoastNotes {
    /// Copy the notes into the metadata fields of `profile`.
    pub fn write_into(&self, profile: &mut RoastProfile) {
        profile.title.clone_from(&self.title);
        profile.country.clone_from(&self.country);
        profile.process.clone_from(&self.process);
        profile.notes.clone_from(&self.notes);
        profile.weight_green = self.weight_green;
        profile.weight_roasted = self.weight_roasted;
        profile.volume_green = self.volume_green;
        profile.volume_roasted = self.volume_roasted;
        profile.density_green = self.density_green;
        profile.density_roasted = self.density_roasted;
        profile.moisture_green = self.moisture_green;
        profile.moisture_roasted = self.moisture_roasted;
        profile.color_whole = self.color_whole;
        profile.color_ground = self.color_ground;
        profile.flavor_list.clone_from(&self.flavors);
    }
}
