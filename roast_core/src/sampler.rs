//! Background probe sampling.
//!
//! Spawns a thread that owns the `Probe`, pushes each reading with its
//! arrival time through a bounded channel, and tracks the last-ok timestamp
//! for the stall watchdog.
//!
//! Each `Sampler` owns exactly one thread, which is shut down and joined
//! when the `Sampler` is dropped.
use crossbeam_channel as xch;
use roast_traits::clock::Clock;
use roast_traits::{Probe, Readings};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::error::RoastError;
use crate::probe_error::map_probe_error;

/// One successful probe read.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledReading {
    pub readings: Readings,
    /// Milliseconds since the sampler's epoch.
    pub arrival_ms: u64,
}

pub struct Sampler {
    rx: xch::Receiver<Result<SampledReading, RoastError>>,
    last_ok: Arc<AtomicU64>,
    epoch: Instant,
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Sampler {
    pub fn spawn<P: Probe + Send + 'static, C: Clock + Send + Sync + 'static>(
        mut probe: P,
        hz: u32,
        timeout: Duration,
        clock: C,
    ) -> Self {
        let (tx, rx) = xch::bounded(1);
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let last_ok = Arc::new(AtomicU64::new(0));
        let last_ok_clone = last_ok.clone();
        let period = Duration::from_micros(crate::util::period_us(hz));
        let epoch = clock.now();

        let join_handle = std::thread::spawn(move || {
            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("sampler thread received shutdown signal");
                    break;
                }

                match probe.read(timeout) {
                    Ok(readings) => {
                        let arrival_ms = clock.ms_since(epoch);
                        let msg = SampledReading {
                            readings,
                            arrival_ms,
                        };
                        if tx.send(Ok(msg)).is_err() {
                            tracing::debug!("sampler consumer disconnected, exiting thread");
                            break;
                        }
                        last_ok_clone.store(arrival_ms, Ordering::Relaxed);
                    }
                    Err(e) => match map_probe_error(&*e) {
                        RoastError::Exhausted => {
                            let _ = tx.send(Err(RoastError::Exhausted));
                            break;
                        }
                        other => {
                            // transient; the consumer's stall watchdog decides
                            tracing::trace!(error = %other, "probe read failed");
                        }
                    },
                }

                if shutdown_clone.load(Ordering::Relaxed) {
                    break;
                }
                clock.sleep(period);
            }
            tracing::trace!("sampler thread exiting cleanly");
        });

        Self {
            rx,
            last_ok,
            epoch,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// The instant arrival times are measured from.
    pub const fn epoch(&self) -> Instant {
        self.epoch
    }

    /// Wait up to `wait` for the next reading. `None` on timeout or after the
    /// thread has exited.
    pub fn next(&self, wait: Duration) -> Option<Result<SampledReading, RoastError>> {
        self.rx.recv_timeout(wait).ok()
    }

    /// Non-blocking: most recent pending reading, if any.
    pub fn latest(&self) -> Option<Result<SampledReading, RoastError>> {
        self.rx.try_iter().last()
    }

    pub fn stalled_for(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_ok.load(Ordering::Relaxed))
    }
}

impl Drop for Sampler {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        // Unblock a pending send so the thread can observe the flag.
        while self.rx.try_recv().is_ok() {}
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("sampler thread joined successfully");
                }
                Err(e) => {
                    tracing::warn!(?e, "sampler thread panicked during shutdown");
                }
            }
        }
    }
}
