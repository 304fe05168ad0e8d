//! Simulated drum roaster.
//!
//! Time advances one second per `read`. The bean-temperature curve is:
//!
//! - preheat: slowly rising plateau ending at 200°C at `charge_at`
//! - after charge: beans pull the probe down exponentially while the drum
//!   heats them back up, giving a turning point near 86°C about 38 s in and a
//!   steadily decaying rate of rise
//! - after drop (`drop_at` roast seconds after charge): exponential cooldown
//!   toward ambient
//!
//! With the default thresholds this curve triggers auto-charge, turning
//! point, dry end (~215 s) and auto-drop.

use std::collections::BTreeMap;
use std::time::Duration;

use roast_traits::{Probe, Readings};

use crate::error::DeviceError;

const CHARGE_TEMP: f64 = 200.0;
const PREHEAT_SLOPE: f64 = 0.05;
const AMBIENT: f64 = 30.0;
const BEAN_FLOOR: f64 = 60.0;
const DIP_TAU: f64 = 12.0;
const RISE_SPAN: f64 = 200.0;
const RISE_TAU: f64 = 360.0;
const COOL_TAU: f64 = 20.0;

#[derive(Debug, Clone, PartialEq)]
pub struct SimCfg {
    /// Seconds of preheat before the beans go in.
    pub charge_at: i64,
    /// Roast seconds (after charge) at which the beans are dropped.
    pub drop_at: Option<i64>,
    /// Uniform jitter amplitude (°C) added to every reading.
    pub noise: f64,
    pub seed: u32,
    /// After this many reads every read times out.
    pub stall_after: Option<u64>,
}

impl Default for SimCfg {
    fn default() -> Self {
        Self {
            charge_at: 30,
            drop_at: Some(600),
            noise: 0.0,
            seed: 1,
            stall_after: None,
        }
    }
}

// Deterministic tiny PRNG (xorshift32)
#[derive(Debug, Clone)]
struct XorShift32 {
    state: u32,
}

impl XorShift32 {
    fn new(seed: u32) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// [-1, 1)
    fn next_signed(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0) * 2.0 - 1.0
    }
}

#[derive(Debug, Clone)]
pub struct SimulatedRoaster {
    cfg: SimCfg,
    t: i64,
    reads: u64,
    rng: XorShift32,
}

impl SimulatedRoaster {
    pub fn new(cfg: SimCfg) -> Self {
        let rng = XorShift32::new(cfg.seed);
        Self {
            cfg,
            t: 0,
            reads: 0,
            rng,
        }
    }

    /// Noise-free bean temperature at simulator second `t`.
    pub fn bt_at(&self, t: i64) -> f64 {
        let tc = self.cfg.charge_at;
        if t <= tc {
            return CHARGE_TEMP - PREHEAT_SLOPE * (tc - t) as f64;
        }
        let roast = |secs: f64| {
            BEAN_FLOOR
                + (CHARGE_TEMP - BEAN_FLOOR) * (-secs / DIP_TAU).exp()
                + RISE_SPAN * (1.0 - (-secs / RISE_TAU).exp())
        };
        let tr = (t - tc) as f64;
        match self.cfg.drop_at {
            Some(d) if t - tc > d => {
                let at_drop = roast(d as f64);
                let since = (t - tc - d) as f64;
                AMBIENT + (at_drop - AMBIENT) * (-since / COOL_TAU).exp()
            }
            _ => roast(tr),
        }
    }

    /// Noise-free environment temperature at simulator second `t`.
    pub fn et_at(&self, t: i64) -> f64 {
        let tc = self.cfg.charge_at;
        if t <= tc {
            return self.bt_at(t) + 20.0;
        }
        let tr = (t - tc) as f64;
        self.bt_at(t) + 35.0 - 15.0 * (-tr / 60.0).exp()
    }

    /// Seconds simulated so far.
    pub const fn elapsed(&self) -> i64 {
        self.t
    }
}

impl Default for SimulatedRoaster {
    fn default() -> Self {
        Self::new(SimCfg::default())
    }
}

impl Probe for SimulatedRoaster {
    fn read(
        &mut self,
        _timeout: Duration,
    ) -> Result<Readings, Box<dyn std::error::Error + Send + Sync>> {
        if self.cfg.stall_after.is_some_and(|n| self.reads >= n) {
            return Err(Box::new(DeviceError::Timeout));
        }
        let t = self.t;
        let (bt, et) = (self.bt_at(t), self.et_at(t));
        let (bt, et) = if self.cfg.noise > 0.0 {
            (
                bt + self.cfg.noise * self.rng.next_signed(),
                et + self.cfg.noise * self.rng.next_signed(),
            )
        } else {
            (bt, et)
        };
        self.t += 1;
        self.reads += 1;
        tracing::trace!(t, bt, et, "simulated read");
        Ok(BTreeMap::from([("BT".to_string(), bt), ("ET".to_string(), et)]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn continuous_at_charge_and_drop() {
        let sim = SimulatedRoaster::default();
        assert_eq!(sim.bt_at(30), CHARGE_TEMP);
        let before = sim.bt_at(30 + 600);
        let after = sim.bt_at(30 + 601);
        assert!(after < before);
        assert!(before - after < 15.0);
    }

    #[test]
    fn turning_point_is_a_deep_minimum() {
        let sim = SimulatedRoaster::default();
        let (t_min, v_min) = (31..200)
            .map(|t| (t, sim.bt_at(t)))
            .fold((0, f64::MAX), |acc, p| if p.1 < acc.1 { p } else { acc });
        assert!((60..=80).contains(&t_min), "t_min={t_min}");
        assert!(CHARGE_TEMP - v_min > 50.0);
    }

    #[test]
    fn reads_advance_one_second() {
        let mut sim = SimulatedRoaster::default();
        let a = sim.read(Duration::from_millis(1)).expect("read");
        let b = sim.read(Duration::from_millis(1)).expect("read");
        assert_eq!(sim.elapsed(), 2);
        assert!(b["BT"] > a["BT"]);
        assert!(a.contains_key("ET"));
    }

    #[test]
    fn seeded_noise_is_reproducible() {
        let cfg = SimCfg {
            noise: 0.5,
            seed: 7,
            ..SimCfg::default()
        };
        let mut a = SimulatedRoaster::new(cfg.clone());
        let mut b = SimulatedRoaster::new(cfg);
        for _ in 0..10 {
            let ra = a.read(Duration::ZERO).expect("read");
            let rb = b.read(Duration::ZERO).expect("read");
            assert_eq!(ra, rb);
        }
    }

    #[test]
    fn stall_after_times_out() {
        let mut sim = SimulatedRoaster::new(SimCfg {
            stall_after: Some(1),
            ..SimCfg::default()
        });
        assert!(sim.read(Duration::ZERO).is_ok());
        let err = sim.read(Duration::ZERO).expect_err("stalled");
        assert!(matches!(
            err.downcast_ref::<DeviceError>(),
            Some(DeviceError::Timeout)
        ));
    }
}
