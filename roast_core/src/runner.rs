use crate::error::{Result as CoreResult, RoastError};
use crate::sampler::Sampler;
use crate::session::RoastSession;
use crate::status::{SessionStatus, TickReport};
use crate::types::{EventKind, Phases, Sample};
use crate::util::{period_ms, period_us};
use crate::{RoastEventSet, SamplingCfg};
use roast_config::RoastProfile;
use roast_traits::clock::{Clock, MonotonicClock};
use roast_traits::{Probe, Readings};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// How sampling should be orchestrated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SamplingMode {
    /// Read inside the tick loop using Probe::read(timeout)
    Direct,
    /// Background thread sampling at the given Hz
    Paced(u32),
}

#[derive(Debug, Clone)]
pub struct RunParams {
    pub sampling: SamplingCfg,
    pub mode: SamplingMode,
    /// Hard cap on the recording.
    pub max_duration: Duration,
    /// Keep recording this long after DROP (roast seconds).
    pub post_drop_secs: i64,
    /// Checked every tick; set from a Ctrl-C handler.
    pub shutdown: Option<Arc<AtomicBool>>,
}

impl Default for RunParams {
    fn default() -> Self {
        Self {
            sampling: SamplingCfg::default(),
            mode: SamplingMode::Direct,
            max_duration: Duration::from_secs(30 * 60),
            post_drop_secs: 0,
            shutdown: None,
        }
    }
}

/// Why a run ended without error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    Dropped,
    MaxDuration,
    Shutdown,
    ProbeExhausted,
}

#[derive(Debug, Clone)]
pub struct RoastSummary {
    pub stop: StopReason,
    pub events: RoastEventSet,
    pub phases: Phases,
    /// Alarm temperatures in the order they fired.
    pub alarms_fired: Vec<f64>,
    pub samples: usize,
    pub last_smoothed: Option<Sample>,
    pub profile: RoastProfile,
}

/// Compute the stall watchdog threshold in milliseconds.
///
/// 4x the per-read timeout, but never shorter than two sampling periods so a
/// single missed read doesn't trip it, and always strictly below the run cap
/// (at least 1 ms).
#[inline]
fn compute_stall_threshold_ms(read_timeout_ms: u64, period_ms: u64, max_run_ms: u64) -> u64 {
    let fast = fast_threshold_ms(read_timeout_ms);
    let two_p = two_periods_ms(period_ms);

    if max_run_ms < two_p {
        return cap_below_max_run(fast, max_run_ms);
    }

    let safe = std::cmp::max(fast, two_p);
    cap_below_max_run(safe, max_run_ms)
}

#[inline]
fn fast_threshold_ms(read_timeout_ms: u64) -> u64 {
    read_timeout_ms.saturating_mul(4)
}

#[inline]
fn two_periods_ms(period_ms: u64) -> u64 {
    period_ms.saturating_mul(2)
}

#[inline]
fn cap_below_max_run(threshold: u64, max_run_ms: u64) -> u64 {
    threshold.min(max_run_ms.saturating_sub(1)).max(1)
}

#[inline]
fn stalled_now(elapsed_ms: u64, stalled_ms: u64, threshold_ms: u64) -> bool {
    elapsed_ms >= threshold_ms && stalled_ms > threshold_ms
}

fn duration_ms(d: Duration) -> u64 {
    d.as_millis().min(u128::from(u64::MAX)) as u64
}

/// Bookkeeping shared by both sampling modes.
struct Recorder {
    samples: usize,
    alarms_fired: Vec<f64>,
    post_drop_secs: i64,
    shutdown: Option<Arc<AtomicBool>>,
}

impl Recorder {
    fn new(params: &RunParams) -> Self {
        Self {
            samples: 0,
            alarms_fired: Vec::new(),
            post_drop_secs: params.post_drop_secs,
            shutdown: params.shutdown.clone(),
        }
    }

    fn shutdown_requested(&self) -> bool {
        self.shutdown
            .as_ref()
            .is_some_and(|f| f.load(Ordering::Relaxed))
    }

    fn record(&mut self, session: &mut RoastSession, readings: &Readings, arrival_ms: u64) {
        let report: TickReport = session.tick(readings, arrival_ms);
        self.samples += 1;
        for ev in &report.detected {
            tracing::info!(
                kind = %ev.kind,
                at = %crate::util::format_elapsed(ev.timestamp + session.time_delta()),
                value = ev.value,
                "milestone"
            );
        }
        if let Some(t) = report.alarm {
            self.alarms_fired.push(t);
        }
        tracing::trace!(timer = report.timer, samples = self.samples, "tick");
    }

    fn drop_finished(&self, session: &RoastSession) -> bool {
        session
            .events()
            .get(EventKind::Drop)
            .is_some_and(|d| session.timer() >= d.timestamp + self.post_drop_secs)
    }

    fn finish(self, session: &mut RoastSession, stop: StopReason) -> RoastSummary {
        session.set_status(SessionStatus::On);
        tracing::info!(?stop, samples = self.samples, "roast finished");
        RoastSummary {
            stop,
            events: *session.events(),
            phases: *session.phases(),
            alarms_fired: self.alarms_fired,
            samples: self.samples,
            last_smoothed: session.primary().last_smoothed(),
            profile: session.to_profile(),
        }
    }
}

fn start_recording(session: &mut RoastSession) {
    if session.status() == SessionStatus::Off {
        session.set_status(SessionStatus::On);
    }
    session.set_status(SessionStatus::Recording);
}

/// Record a roast from `probe` on the real-time clock until DROP (plus
/// `post_drop_secs`), the duration cap, shutdown, or probe exhaustion.
pub fn run<P>(probe: P, session: &mut RoastSession, params: RunParams) -> CoreResult<RoastSummary>
where
    P: Probe + Send + 'static,
{
    run_with_clock(probe, session, params, MonotonicClock::new())
}

/// Same as [`run`] on a caller-supplied clock. With a `VirtualClock` in
/// `Direct` mode every period is simulated, so a full roast replays at once.
pub fn run_with_clock<P, C>(
    probe: P,
    session: &mut RoastSession,
    params: RunParams,
    clock: C,
) -> CoreResult<RoastSummary>
where
    P: Probe + Send + 'static,
    C: Clock + Clone + Send + Sync + 'static,
{
    match params.mode {
        SamplingMode::Direct => run_direct(probe, session, &params, &clock),
        SamplingMode::Paced(hz) => run_with_sampler(probe, session, &params, clock, hz),
    }
}

fn run_direct<P, C>(
    mut probe: P,
    session: &mut RoastSession,
    params: &RunParams,
    clock: &C,
) -> CoreResult<RoastSummary>
where
    P: Probe,
    C: Clock,
{
    let hz = params.sampling.sample_rate_hz;
    let period = Duration::from_micros(period_us(hz));
    let max_ms = duration_ms(params.max_duration);
    let stall_threshold_ms =
        compute_stall_threshold_ms(params.sampling.read_timeout_ms, period_ms(hz), max_ms);
    let timeout = Duration::from_millis(params.sampling.read_timeout_ms);

    start_recording(session);
    let mut rec = Recorder::new(params);
    tracing::info!(hz, mode = "direct", "roast start");

    let epoch = clock.now();
    let mut last_ok_ms = 0_u64;
    loop {
        if rec.shutdown_requested() {
            return Ok(rec.finish(session, StopReason::Shutdown));
        }
        let elapsed_ms = clock.ms_since(epoch);
        if elapsed_ms >= max_ms {
            return Ok(rec.finish(session, StopReason::MaxDuration));
        }
        if stalled_now(elapsed_ms, elapsed_ms.saturating_sub(last_ok_ms), stall_threshold_ms) {
            session.set_status(SessionStatus::On);
            tracing::error!(stalled_ms = elapsed_ms - last_ok_ms, "probe stalled");
            return Err(crate::error::Report::new(RoastError::Timeout));
        }

        session.set_timer(i64::try_from(clock.secs_since(epoch)).unwrap_or(i64::MAX));
        match probe.read(timeout) {
            Ok(readings) => {
                last_ok_ms = clock.ms_since(epoch);
                rec.record(session, &readings, last_ok_ms);
            }
            Err(e) => match crate::probe_error::map_probe_error(&*e) {
                RoastError::Exhausted => {
                    return Ok(rec.finish(session, StopReason::ProbeExhausted));
                }
                other => tracing::debug!(error = %other, "probe read failed"),
            },
        }
        if rec.drop_finished(session) {
            return Ok(rec.finish(session, StopReason::Dropped));
        }
        clock.sleep(period);
    }
}

fn run_with_sampler<P, C>(
    probe: P,
    session: &mut RoastSession,
    params: &RunParams,
    clock: C,
    hz: u32,
) -> CoreResult<RoastSummary>
where
    P: Probe + Send + 'static,
    C: Clock + Clone + Send + Sync + 'static,
{
    let period = Duration::from_millis(period_ms(hz));
    let max_ms = duration_ms(params.max_duration);
    let stall_threshold_ms =
        compute_stall_threshold_ms(params.sampling.read_timeout_ms, period_ms(hz), max_ms);
    let timeout = Duration::from_millis(params.sampling.read_timeout_ms);

    let sampler = Sampler::spawn(probe, hz, timeout, clock.clone());
    let epoch = sampler.epoch();

    start_recording(session);
    let mut rec = Recorder::new(params);
    tracing::info!(hz, mode = "sampler", "roast start");

    loop {
        if rec.shutdown_requested() {
            return Ok(rec.finish(session, StopReason::Shutdown));
        }
        let elapsed_ms = clock.ms_since(epoch);
        if elapsed_ms >= max_ms {
            return Ok(rec.finish(session, StopReason::MaxDuration));
        }
        if stalled_now(elapsed_ms, sampler.stalled_for(elapsed_ms), stall_threshold_ms) {
            session.set_status(SessionStatus::On);
            tracing::error!(stalled_ms = sampler.stalled_for(elapsed_ms), "probe stalled");
            return Err(crate::error::Report::new(RoastError::Timeout));
        }

        match sampler.next(period) {
            Some(Ok(r)) => {
                session.set_timer(i64::try_from(r.arrival_ms / 1000).unwrap_or(i64::MAX));
                rec.record(session, &r.readings, r.arrival_ms);
            }
            Some(Err(RoastError::Exhausted)) => {
                return Ok(rec.finish(session, StopReason::ProbeExhausted));
            }
            Some(Err(e)) => {
                session.set_status(SessionStatus::On);
                return Err(crate::error::Report::new(e));
            }
            None => {}
        }
        if rec.drop_finished(session) {
            return Ok(rec.finish(session, StopReason::Dropped));
        }
    }
}
