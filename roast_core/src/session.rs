//! Explicitly owned roast session state.
//!
//! `RoastSession` holds everything one roast needs: channels, events,
//! alarms, phases, timer and notes. All mutation goes through `&mut self`,
//! so a reset can never interleave with a tick.

use std::path::Path;

use eyre::WrapErr;
use roast_config::RoastProfile;
use roast_traits::Readings;

use crate::alarm::Alarms;
use crate::atomic::write_atomic;
use crate::builder::RoastSessionBuilder;
use crate::channel::{Channel, ManualChannel};
use crate::config::EngineCfg;
use crate::conversions::{channel_to_profile, samples_from_channel};
use crate::detector::run_detectors;
use crate::error::{Result, RoastError};
use crate::events::RoastEventSet;
use crate::notes::RoastNotes;
use crate::phase::calculate_phases;
use crate::status::{SessionStatus, TickReport};
use crate::types::{EventKind, Phases, RoastEvent, Sample};
use crate::util::format_elapsed;

/// Which neighbour an event is moved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

#[derive(Debug, Clone)]
pub struct RoastSession {
    cfg: EngineCfg,
    channels: Vec<Channel>,
    primary: usize,
    manual: Vec<ManualChannel>,
    events: RoastEventSet,
    alarms: Alarms,
    status: SessionStatus,
    timer: i64,
    time_delta: i64,
    phases: Phases,
    notes: RoastNotes,
}

impl RoastSession {
    pub fn builder() -> RoastSessionBuilder {
        RoastSessionBuilder::new()
    }

    pub(crate) fn from_parts(
        cfg: EngineCfg,
        channels: Vec<Channel>,
        primary: usize,
        manual: Vec<ManualChannel>,
        alarms: Alarms,
        notes: RoastNotes,
    ) -> Self {
        Self {
            cfg,
            channels,
            primary,
            manual,
            events: RoastEventSet::new(),
            alarms,
            status: SessionStatus::Off,
            timer: 0,
            time_delta: 0,
            phases: Phases::default(),
            notes,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    pub const fn cfg(&self) -> &EngineCfg {
        &self.cfg
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    pub fn channel(&self, id: &str) -> Option<&Channel> {
        self.channels.iter().find(|c| c.id == id)
    }

    /// The channel driving detection, phases and alarms.
    pub fn primary(&self) -> &Channel {
        &self.channels[self.primary]
    }

    pub fn manual_channels(&self) -> &[ManualChannel] {
        &self.manual
    }

    pub fn manual_channel(&self, id: &str) -> Option<&ManualChannel> {
        self.manual.iter().find(|m| m.id == id)
    }

    pub const fn events(&self) -> &RoastEventSet {
        &self.events
    }

    pub const fn alarms(&self) -> &Alarms {
        &self.alarms
    }

    pub const fn status(&self) -> SessionStatus {
        self.status
    }

    pub const fn timer(&self) -> i64 {
        self.timer
    }

    pub const fn time_delta(&self) -> i64 {
        self.time_delta
    }

    /// Roast time: timer shifted so CHARGE is zero.
    pub const fn roast_time(&self) -> i64 {
        self.timer + self.time_delta
    }

    pub const fn phases(&self) -> &Phases {
        &self.phases
    }

    pub const fn notes(&self) -> &RoastNotes {
        &self.notes
    }

    pub const fn notes_mut(&mut self) -> &mut RoastNotes {
        &mut self.notes
    }

    pub fn elapsed_display(&self) -> String {
        format_elapsed(self.roast_time())
    }

    fn live(&self) -> bool {
        self.status == SessionStatus::Recording
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Change status. Turning a stopped session on starts from a clean slate;
    /// entering or leaving `Recording` re-smooths with the matching lag.
    pub fn set_status(&mut self, status: SessionStatus) {
        let prev = self.status;
        if prev == status {
            return;
        }
        if prev == SessionStatus::Off && status == SessionStatus::On {
            self.reset();
        }
        self.status = status;
        if prev == SessionStatus::Recording || status == SessionStatus::Recording {
            self.recompute();
        }
        tracing::info!(from = ?prev, to = ?status, "session status changed");
    }

    pub fn set_timer(&mut self, secs: i64) {
        self.timer = secs;
    }

    /// Clear all roast data. Channel/alarm configuration and status are kept.
    pub fn reset(&mut self) {
        for ch in &mut self.channels {
            ch.reset();
        }
        for m in &mut self.manual {
            m.reset();
        }
        self.events = RoastEventSet::new();
        self.alarms.reset();
        self.phases = Phases::default();
        self.timer = 0;
        self.time_delta = 0;
        tracing::debug!("session reset");
    }

    // ── Tick ─────────────────────────────────────────────────────────────────

    /// Feed one probe read taken at `arrival_ms` (wall-clock ms).
    pub fn tick(&mut self, readings: &Readings, arrival_ms: u64) -> TickReport {
        let record_at = self.live().then_some(self.timer);
        for ch in &mut self.channels {
            if let Some(&v) = readings.get(&ch.id) {
                ch.observe(v, arrival_ms, record_at);
            }
        }
        self.recompute();

        let primary = &self.channels[self.primary];
        let detection = run_detectors(
            primary.ror(),
            primary.history(),
            self.events,
            &self.cfg.detection,
        );
        self.events = detection.events;
        for ev in &detection.detected {
            tracing::info!(kind = %ev.kind, timestamp = ev.timestamp, value = ev.value, "auto detected event");
            if ev.kind == EventKind::Charge {
                self.time_delta = -ev.timestamp;
            }
        }
        if detection.detected.iter().any(|e| e.kind == EventKind::Drop) {
            self.recompute();
        }

        self.refresh_phases();
        let current = self.primary().current();
        let alarm = self.alarms.evaluate(&self.events, current);

        TickReport {
            timer: self.timer,
            detected: detection.detected,
            alarm,
            phases: self.phases,
            last_smoothed: self.primary().last_smoothed(),
        }
    }

    fn recompute(&mut self) {
        let live = self.live();
        let drop = self.events.get(EventKind::Drop).copied();
        for (i, ch) in self.channels.iter_mut().enumerate() {
            if i == self.primary {
                ch.recompute_all(&self.cfg, drop.as_ref(), live);
            } else {
                ch.recompute_ror(&self.cfg, drop.as_ref());
            }
        }
    }

    fn refresh_phases(&mut self) {
        self.phases = if self.events.is_set(EventKind::Charge) {
            calculate_phases(self.timer, self.primary().current(), &self.events)
        } else {
            Phases::default()
        };
    }

    // ── Manual operations ────────────────────────────────────────────────────

    /// Record `kind` at the current timer and primary reading, replacing any
    /// earlier event of that kind.
    pub fn mark_event(&mut self, kind: EventKind) -> RoastEvent {
        let ev = RoastEvent::at(kind, Sample::new(self.timer, self.primary().current()));
        self.events = self.events.with_event(ev);
        if kind == EventKind::Charge {
            self.time_delta = -self.timer;
        }
        if kind == EventKind::Drop {
            self.recompute();
        }
        self.refresh_phases();
        tracing::info!(kind = %kind, timestamp = ev.timestamp, value = ev.value, "event marked");
        ev
    }

    /// Move an event to the neighbouring primary history sample. `None` when
    /// the event is unset or there is no neighbour in that direction.
    pub fn navigate_event(&mut self, kind: EventKind, dir: Direction) -> Option<RoastEvent> {
        let ev = *self.events.get(kind)?;
        let hist = self.primary().history();
        let i = hist.iter().position(|s| s.timestamp >= ev.timestamp)?;
        let j = match dir {
            Direction::Previous => i.checked_sub(1)?,
            Direction::Next => i + 1,
        };
        let target = *hist.get(j)?;
        let moved = RoastEvent::at(kind, target);
        self.events = self.events.with_event(moved);
        if kind == EventKind::Charge {
            self.time_delta = -target.timestamp;
        }
        self.recompute();
        self.refresh_phases();
        tracing::debug!(kind = %kind, from = ev.timestamp, to = moved.timestamp, "event moved");
        Some(moved)
    }

    pub fn set_manual_value(&mut self, id: &str, value: f64) -> Result<Sample> {
        let timer = self.timer;
        let m = self
            .manual
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| eyre::Report::new(RoastError::State(format!("unknown manual channel '{id}'"))))?;
        Ok(m.set(timer, value))
    }

    // ── Persistence ──────────────────────────────────────────────────────────

    /// Replace histories, events and notes with a saved roast and recompute
    /// everything as if the roast had just finished.
    pub fn load_profile(&mut self, profile: &RoastProfile) -> Result<()> {
        profile
            .validate()
            .map_err(|e| eyre::Report::new(RoastError::Profile(format!("{e:#}"))))?;
        let primary_id = self.primary().id.clone();
        if profile.channel(&primary_id).is_none() {
            return Err(eyre::Report::new(RoastError::Profile(format!(
                "profile has no '{primary_id}' channel"
            ))));
        }

        self.reset();
        for ch in &mut self.channels {
            match profile.channel(&ch.id) {
                Some(pc) => ch.replace_history(samples_from_channel(pc)),
                None => tracing::warn!(channel = %ch.id, "channel missing from profile"),
            }
        }
        for m in &mut self.manual {
            if let Some(pc) = profile.manual_channel_arr.iter().find(|c| c.id == m.id) {
                m.replace_history(samples_from_channel(pc));
            }
        }
        self.events = RoastEventSet::from(&profile.roast_events);
        self.time_delta = self
            .events
            .get(EventKind::Charge)
            .map_or(0, |c| -c.timestamp);
        self.notes = RoastNotes::from(profile);

        let drop = self.events.get(EventKind::Drop).copied();
        for (i, ch) in self.channels.iter_mut().enumerate() {
            if i == self.primary {
                ch.recompute_all(&self.cfg, drop.as_ref(), false);
            } else {
                ch.recompute_ror(&self.cfg, drop.as_ref());
            }
        }
        self.timer = self.primary().history().last().map_or(0, |s| s.timestamp);
        self.refresh_phases();
        tracing::info!(
            samples = self.primary().history().len(),
            events = self.events.len(),
            "profile loaded"
        );
        Ok(())
    }

    pub fn to_profile(&self) -> RoastProfile {
        let mut p = RoastProfile {
            channel_arr: self
                .channels
                .iter()
                .map(|c| channel_to_profile(&c.id, c.history()))
                .collect(),
            manual_channel_arr: self
                .manual
                .iter()
                .map(|m| channel_to_profile(&m.id, m.history()))
                .collect(),
            roast_events: (&self.events).into(),
            ..RoastProfile::default()
        };
        self.notes.write_into(&mut p);
        p
    }

    pub fn save_profile(&self, path: &Path) -> Result<()> {
        let json = self.to_profile().to_json_pretty()?;
        write_atomic(path, json.as_bytes())
            .map_err(|e| eyre::Report::new(RoastError::Io(e.to_string())))
            .wrap_err_with(|| format!("save roast profile {}", path.display()))?;
        tracing::info!(path = %path.display(), "profile saved");
        Ok(())
    }
}
