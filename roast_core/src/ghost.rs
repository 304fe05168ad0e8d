//! Reference ("ghost") roast recomputed from a saved profile for overlay.

use roast_config::{DEFAULT_PRIMARY_CHANNEL, RoastProfile};

use crate::config::EngineCfg;
use crate::conversions::samples_from_channel;
use crate::error::{Result, RoastError};
use crate::events::RoastEventSet;
use crate::phase::calculate_phases;
use crate::pipeline::derive_series;
use crate::types::{EventKind, Phases, Sample};

#[derive(Debug, Clone, PartialEq)]
pub struct GhostChannel {
    pub id: String,
    pub history: Vec<Sample>,
    pub convolved: Vec<Sample>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GhostManualChannel {
    pub id: String,
    pub history: Vec<Sample>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ghost {
    pub time_delta: i64,
    pub channels: Vec<GhostChannel>,
    pub manual_channels: Vec<GhostManualChannel>,
    pub events: RoastEventSet,
    pub phases: Phases,
}

impl Ghost {
    pub fn from_profile(profile: &RoastProfile, cfg: &EngineCfg) -> Result<Self> {
        Self::from_profile_with_primary(profile, cfg, DEFAULT_PRIMARY_CHANNEL)
    }

    pub fn from_profile_with_primary(
        profile: &RoastProfile,
        cfg: &EngineCfg,
        primary: &str,
    ) -> Result<Self> {
        profile
            .validate()
            .map_err(|e| eyre::Report::new(RoastError::Profile(format!("{e:#}"))))?;
        let last = profile
            .channel(primary)
            .and_then(|c| c.data.last())
            .map(Sample::from)
            .ok_or_else(|| {
                eyre::Report::new(RoastError::Profile(format!(
                    "reference profile has no '{primary}' samples"
                )))
            })?;

        let events = RoastEventSet::from(&profile.roast_events);
        let drop = events.get(EventKind::Drop);
        let channels = profile
            .channel_arr
            .iter()
            .map(|pc| {
                let history = samples_from_channel(pc);
                let convolved = derive_series(&history, drop, cfg, false).convolved;
                GhostChannel {
                    id: pc.id.clone(),
                    history,
                    convolved,
                }
            })
            .collect();

        // manual values hold until the end of the reference roast
        let manual_channels = profile
            .manual_channel_arr
            .iter()
            .map(|pc| {
                let mut history = samples_from_channel(pc);
                if let Some(tail) = history.last().copied() {
                    history.push(Sample::new(last.timestamp, tail.value));
                }
                GhostManualChannel {
                    id: pc.id.clone(),
                    history,
                }
            })
            .collect();

        let time_delta = events.get(EventKind::Charge).map_or(0, |c| -c.timestamp);
        let phases = if events.is_set(EventKind::Charge) {
            calculate_phases(last.timestamp, last.value, &events)
        } else {
            Phases::default()
        };

        Ok(Self {
            time_delta,
            channels,
            manual_channels,
            events,
            phases,
        })
    }

    pub fn channel(&self, id: &str) -> Option<&GhostChannel> {
        self.channels.iter().find(|c| c.id == id)
    }
}
