//! Builder for `RoastSession`.
//!
//! `try_build()` is the single place where channel layout, alarms and the
//! engine cfgs are validated.

use std::collections::HashSet;

use crate::alarm::Alarms;
use crate::channel::{Channel, ManualChannel};
use crate::config::{DetectionCfg, EngineCfg, RorCfg, SmoothingCfg};
use crate::error::{BuildError, Result};
use crate::notes::RoastNotes;
use crate::session::RoastSession;

#[derive(Debug, Default)]
pub struct RoastSessionBuilder {
    channels: Vec<Channel>,
    primary: Option<String>,
    alarms: Vec<f64>,
    manual: Vec<ManualChannel>,
    cfg: EngineCfg,
    notes: RoastNotes,
}

fn invalid(msg: &'static str) -> eyre::Report {
    eyre::Report::new(BuildError::InvalidConfig(msg))
}

impl RoastSessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pre-filled from a loaded TOML config.
    pub fn from_config(cfg: &roast_config::Config) -> Self {
        let engine = EngineCfg::from(cfg);
        let channels = cfg
            .channels
            .iter()
            .map(|c| {
                let ch = Channel::new(c.id.clone(), engine.ror.window)
                    .with_colors(c.color.clone(), c.ror_color.clone());
                if c.label.is_empty() { ch } else { ch.with_label(c.label.clone()) }
            })
            .collect();
        let manual = cfg
            .manual_channels
            .iter()
            .map(|m| {
                let mut mc = ManualChannel::new(m.id.clone(), m.min, m.max, m.step, m.default_value);
                if !m.label.is_empty() {
                    mc.label.clone_from(&m.label);
                }
                mc.unit.clone_from(&m.unit);
                mc
            })
            .collect();
        Self {
            channels,
            primary: Some(cfg.primary_channel.clone()),
            alarms: cfg.alarms.clone(),
            manual,
            cfg: engine,
            notes: RoastNotes::default(),
        }
    }

    pub fn channel(mut self, ch: Channel) -> Self {
        self.channels.push(ch);
        self
    }

    /// Channel id driving detection; defaults to `BT`.
    pub fn primary(mut self, id: impl Into<String>) -> Self {
        self.primary = Some(id.into());
        self
    }

    pub fn alarms(mut self, temps: &[f64]) -> Self {
        self.alarms = temps.to_vec();
        self
    }

    pub fn manual_channel(mut self, m: ManualChannel) -> Self {
        self.manual.push(m);
        self
    }

    pub fn engine(mut self, cfg: EngineCfg) -> Self {
        self.cfg = cfg;
        self
    }

    pub fn ror(mut self, ror: RorCfg) -> Self {
        self.cfg.ror = ror;
        self
    }

    pub fn smoothing(mut self, smoothing: SmoothingCfg) -> Self {
        self.cfg.smoothing = smoothing;
        self
    }

    pub fn detection(mut self, detection: DetectionCfg) -> Self {
        self.cfg.detection = detection;
        self
    }

    pub fn notes(mut self, notes: RoastNotes) -> Self {
        self.notes = notes;
        self
    }

    pub fn try_build(self) -> Result<RoastSession> {
        // ── Validation ───────────────────────────────────────────────────────
        if self.channels.is_empty() {
            return Err(eyre::Report::new(BuildError::MissingChannels));
        }
        let mut seen = HashSet::new();
        for ch in &self.channels {
            if !seen.insert(ch.id.as_str()) {
                return Err(eyre::Report::new(BuildError::DuplicateChannel(
                    ch.id.clone(),
                )));
            }
        }
        let primary_id = self
            .primary
            .unwrap_or_else(|| roast_config::DEFAULT_PRIMARY_CHANNEL.to_string());
        let primary = self
            .channels
            .iter()
            .position(|c| c.id == primary_id)
            .ok_or_else(|| eyre::Report::new(BuildError::UnknownPrimary(primary_id.clone())))?;

        if self.alarms.iter().any(|t| !t.is_finite()) {
            return Err(invalid("alarms must be finite"));
        }
        if self.alarms.windows(2).any(|w| w[1] <= w[0]) {
            return Err(invalid("alarms must be strictly ascending"));
        }
        for m in &self.manual {
            if m.min > m.max {
                return Err(invalid("manual channel min must be <= max"));
            }
            if !(m.min..=m.max).contains(&m.default_value) {
                return Err(invalid("manual channel default_value out of range"));
            }
        }

        let cfg = &self.cfg;
        if cfg.ror.window < 2 {
            return Err(invalid("ror.window must be >= 2"));
        }
        if cfg.ror.outlier_window < 2 {
            return Err(invalid("ror.outlier_window must be >= 2"));
        }
        if !(cfg.ror.outlier_z.is_finite() && cfg.ror.outlier_z > 0.0) {
            return Err(invalid("ror.outlier_z must be a positive number"));
        }
        if cfg.smoothing.kernel_len < 3 || cfg.smoothing.kernel_len.is_multiple_of(2) {
            return Err(invalid("smoothing.kernel_len must be odd and >= 3"));
        }
        if cfg.smoothing.live_lag >= cfg.smoothing.kernel_len {
            return Err(invalid("smoothing.live_lag must be < smoothing.kernel_len"));
        }
        if cfg.detection.charge_window < 5 {
            return Err(invalid("detection.charge_window must be >= 5"));
        }
        if !(cfg.detection.turning_point_min_drop.is_finite()
            && cfg.detection.turning_point_min_drop > 0.0)
        {
            return Err(invalid("detection.turning_point_min_drop must be > 0"));
        }
        if !(cfg.detection.dry_end_temp.is_finite() && cfg.detection.dry_end_temp > 0.0) {
            return Err(invalid("detection.dry_end_temp must be > 0"));
        }

        let window = cfg.ror.window;
        let channels = self
            .channels
            .into_iter()
            .map(|c| c.with_window_len(window))
            .collect();
        Ok(RoastSession::from_parts(
            self.cfg,
            channels,
            primary,
            self.manual,
            Alarms::from_temperatures(&self.alarms),
            self.notes,
        ))
    }

    /// Alias for `try_build()`.
    pub fn build(self) -> Result<RoastSession> {
        self.try_build()
    }
}
