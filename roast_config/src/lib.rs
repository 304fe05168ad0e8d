#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schemas and roast-profile parsing for the roasting monitor.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - `profile` holds the JSON session-file schema (raw histories, events,
//!   notes). Derived series are never persisted.
use serde::Deserialize;

pub mod profile;

pub use profile::{
    ProfileChannel, ProfileEvent, ProfileEvents, ProfilePoint, RoastProfile, load_profile,
    load_profile_str,
};

/// Channel id used for the bean-temperature probe when none is configured.
pub const DEFAULT_PRIMARY_CHANNEL: &str = "BT";

/// A temperature channel delivered by the probe.
#[derive(Debug, Deserialize, Clone)]
pub struct ChannelCfg {
    pub id: String,
    #[serde(default)]
    pub label: String,
    /// Presentation metadata; carried through untouched.
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub ror_color: Option<String>,
}

/// A manually adjusted channel (gas, airflow, drum speed, ...).
#[derive(Debug, Deserialize, Clone)]
pub struct ManualChannelCfg {
    pub id: String,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub unit: String,
    pub min: u16,
    pub max: u16,
    #[serde(default = "default_step")]
    pub step: u16,
    pub default_value: u16,
}

fn default_step() -> u16 {
    1
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SamplingCfg {
    /// Tick cadence in Hz.
    pub sample_rate_hz: u32,
    /// Max time to wait for one probe read (ms). Also accepts alias "sensor_ms".
    #[serde(alias = "sensor_ms")]
    pub read_timeout_ms: u64,
}

impl Default for SamplingCfg {
    fn default() -> Self {
        Self {
            sample_rate_hz: 1,
            read_timeout_ms: 500,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RorCfg {
    /// Trailing samples used for one ROR point.
    pub window: usize,
    /// Trailing ROR points used for the outlier z-score.
    pub outlier_window: usize,
    /// z-score above which a ROR point is an outlier.
    pub outlier_z: f64,
}

impl Default for RorCfg {
    fn default() -> Self {
        Self {
            window: 5,
            outlier_window: 5,
            outlier_z: 3.0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SmoothingCfg {
    /// Hann kernel length (odd).
    pub kernel_len: usize,
    /// Points trimmed from the smoothed tail while recording.
    pub live_lag: usize,
}

impl Default for SmoothingCfg {
    fn default() -> Self {
        Self {
            kernel_len: 11,
            live_lag: 3,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DetectionCfg {
    /// Trailing raw ROR points inspected by the charge/drop heuristic.
    pub charge_window: usize,
    /// Minimum high-minus-low swing before a turning point is accepted.
    pub turning_point_min_drop: f64,
    /// Temperature the last two readings must exceed to mark dry end.
    pub dry_end_temp: f64,
}

impl Default for DetectionCfg {
    fn default() -> Self {
        Self {
            charge_window: 5,
            turning_point_min_drop: 50.0,
            dry_end_temp: 150.0,
        }
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default = "default_primary")]
    pub primary_channel: String,
    /// Alarm temperatures, ascending.
    #[serde(default)]
    pub alarms: Vec<f64>,
    #[serde(rename = "channel")]
    pub channels: Vec<ChannelCfg>,
    #[serde(default, rename = "manual_channel")]
    pub manual_channels: Vec<ManualChannelCfg>,
    #[serde(default)]
    pub sampling: SamplingCfg,
    #[serde(default)]
    pub ror: RorCfg,
    #[serde(default)]
    pub smoothing: SmoothingCfg,
    #[serde(default)]
    pub detection: DetectionCfg,
    #[serde(default)]
    pub logging: Logging,
}

fn default_primary() -> String {
    DEFAULT_PRIMARY_CHANNEL.to_string()
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Channels
        if self.channels.is_empty() {
            eyre::bail!("at least one [[channel]] must be configured");
        }
        for (i, c) in self.channels.iter().enumerate() {
            if c.id.trim().is_empty() {
                eyre::bail!("channel #{i} has an empty id");
            }
            if self.channels[..i].iter().any(|o| o.id == c.id) {
                eyre::bail!("duplicate channel id '{}'", c.id);
            }
        }
        if !self.channels.iter().any(|c| c.id == self.primary_channel) {
            eyre::bail!(
                "primary_channel '{}' does not match any configured channel",
                self.primary_channel
            );
        }
        for m in &self.manual_channels {
            if m.min > m.max {
                eyre::bail!("manual_channel '{}': min must be <= max", m.id);
            }
            if !(m.min..=m.max).contains(&m.default_value) {
                eyre::bail!("manual_channel '{}': default_value out of range", m.id);
            }
            if m.step == 0 {
                eyre::bail!("manual_channel '{}': step must be >= 1", m.id);
            }
        }

        // Alarms
        if self.alarms.iter().any(|a| !a.is_finite()) {
            eyre::bail!("alarms must be finite temperatures");
        }
        if self.alarms.windows(2).any(|w| w[0] >= w[1]) {
            eyre::bail!("alarms must be strictly ascending");
        }

        // Sampling
        if self.sampling.sample_rate_hz == 0 {
            eyre::bail!("sampling.sample_rate_hz must be > 0");
        }
        if self.sampling.read_timeout_ms == 0 {
            eyre::bail!("sampling.read_timeout_ms must be >= 1");
        }

        // ROR
        if self.ror.window < 2 {
            eyre::bail!("ror.window must be >= 2");
        }
        if self.ror.outlier_window < 2 {
            eyre::bail!("ror.outlier_window must be >= 2");
        }
        if !(self.ror.outlier_z.is_finite() && self.ror.outlier_z > 0.0) {
            eyre::bail!("ror.outlier_z must be a positive number");
        }

        // Smoothing
        if self.smoothing.kernel_len < 3 || self.smoothing.kernel_len.is_multiple_of(2) {
            eyre::bail!("smoothing.kernel_len must be odd and >= 3");
        }
        if self.smoothing.live_lag >= self.smoothing.kernel_len {
            eyre::bail!("smoothing.live_lag must be < smoothing.kernel_len");
        }

        // Detection
        if self.detection.charge_window < 5 {
            eyre::bail!("detection.charge_window must be >= 5");
        }
        if !(self.detection.turning_point_min_drop.is_finite()
            && self.detection.turning_point_min_drop > 0.0)
        {
            eyre::bail!("detection.turning_point_min_drop must be > 0");
        }
        if !(self.detection.dry_end_temp.is_finite() && self.detection.dry_end_temp > 0.0) {
            eyre::bail!("detection.dry_end_temp must be > 0");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got '{rot}'");
        }

        Ok(())
    }

    /// Configured channel ids, in order.
    pub fn channel_ids(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(|c| c.id.as_str())
    }
}
