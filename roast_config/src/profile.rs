//! Roast profile (session file) schema.
//!
//! JSON, camelCase keys, compatible with files written by the desktop
//! roasting app:
//!
//! ```json
//! { "channelArr": [{ "id": "BT", "dataArr": [{ "timestamp": 0, "value": 180.2 }] }],
//!   "manualChannelArr": [],
//!   "roastEvents": { "CHARGE": { "id": "CHARGE", "timestamp": 30, "value": 200.1 } },
//!   "title": "Ethiopia Guji", ... }
//! ```
//!
//! Only raw histories and events are stored; ROR, smoothing and phases are
//! always recomputed on load.
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq)]
pub struct ProfilePoint {
    pub timestamp: i64,
    pub value: f64,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProfileChannel {
    pub id: String,
    #[serde(rename = "dataArr", default)]
    pub data: Vec<ProfilePoint>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProfileEvent {
    pub id: String,
    pub timestamp: i64,
    pub value: f64,
}

/// Milestones keyed the way the file stores them (`TP` is the turning point).
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ProfileEvents {
    #[serde(rename = "CHARGE", default, skip_serializing_if = "Option::is_none")]
    pub charge: Option<ProfileEvent>,
    #[serde(rename = "TP", default, skip_serializing_if = "Option::is_none")]
    pub turning_point: Option<ProfileEvent>,
    #[serde(rename = "DRY_END", default, skip_serializing_if = "Option::is_none")]
    pub dry_end: Option<ProfileEvent>,
    #[serde(rename = "FC_START", default, skip_serializing_if = "Option::is_none")]
    pub fc_start: Option<ProfileEvent>,
    #[serde(rename = "FC_END", default, skip_serializing_if = "Option::is_none")]
    pub fc_end: Option<ProfileEvent>,
    #[serde(rename = "SC_START", default, skip_serializing_if = "Option::is_none")]
    pub sc_start: Option<ProfileEvent>,
    #[serde(rename = "SC_END", default, skip_serializing_if = "Option::is_none")]
    pub sc_end: Option<ProfileEvent>,
    #[serde(rename = "DROP", default, skip_serializing_if = "Option::is_none")]
    pub drop: Option<ProfileEvent>,
}

impl ProfileEvents {
    /// Set slots in milestone order.
    pub fn iter(&self) -> impl Iterator<Item = &ProfileEvent> {
        [
            &self.charge,
            &self.turning_point,
            &self.dry_end,
            &self.fc_start,
            &self.fc_end,
            &self.sc_start,
            &self.sc_end,
            &self.drop,
        ]
        .into_iter()
        .flatten()
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct RoastProfile {
    pub channel_arr: Vec<ProfileChannel>,
    pub manual_channel_arr: Vec<ProfileChannel>,
    pub roast_events: ProfileEvents,
    pub title: String,
    pub country: String,
    pub process: String,
    pub notes: String,
    pub weight_green: f64,
    pub weight_roasted: f64,
    pub volume_green: f64,
    pub volume_roasted: f64,
    pub density_green: f64,
    pub density_roasted: f64,
    pub moisture_green: f64,
    pub moisture_roasted: f64,
    pub color_whole: f64,
    pub color_ground: f64,
    pub flavor_list: Vec<String>,
}

impl RoastProfile {
    /// Find a temperature channel by id.
    pub fn channel(&self, id: &str) -> Option<&ProfileChannel> {
        self.channel_arr.iter().find(|c| c.id == id)
    }

    /// Reject histories the engine cannot consume: non-finite readings,
    /// negative timestamps, or timestamps that go backwards within one channel.
    pub fn validate(&self) -> eyre::Result<()> {
        for ch in self.channel_arr.iter().chain(&self.manual_channel_arr) {
            if let Some(p) = ch.data.iter().find(|p| p.timestamp < 0) {
                eyre::bail!(
                    "channel '{}' has a negative timestamp ({})",
                    ch.id,
                    p.timestamp
                );
            }
            if let Some((i, p)) = ch
                .data
                .iter()
                .enumerate()
                .find(|(_, p)| !p.value.is_finite())
            {
                eyre::bail!(
                    "channel '{}' has a non-finite value at index {i} (t={})",
                    ch.id,
                    p.timestamp
                );
            }
            if let Some(i) = ch
                .data
                .windows(2)
                .position(|w| w[1].timestamp < w[0].timestamp)
            {
                eyre::bail!(
                    "channel '{}' timestamps decrease at index {}",
                    ch.id,
                    i + 1
                );
            }
        }
        for ev in self.roast_events.iter() {
            if ev.timestamp < 0 {
                eyre::bail!("event '{}' has a negative timestamp ({})", ev.id, ev.timestamp);
            }
            if !ev.value.is_finite() {
                eyre::bail!("event '{}' has a non-finite value", ev.id);
            }
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> eyre::Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| eyre::eyre!("serialize roast profile: {e}"))
    }
}

/// Parse and validate a profile from JSON text.
pub fn load_profile_str(s: &str) -> eyre::Result<RoastProfile> {
    let profile: RoastProfile =
        serde_json::from_str(s).map_err(|e| eyre::eyre!("invalid roast profile JSON: {e}"))?;
    profile.validate()?;
    Ok(profile)
}

pub fn load_profile(path: &Path) -> eyre::Result<RoastProfile> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("open roast profile {:?}: {}", path, e))?;
    load_profile_str(&text)
}
