pub mod clock;

use std::collections::BTreeMap;

pub use clock::{Clock, MonotonicClock, VirtualClock};

/// One read from the sensor collaborator: channel id -> reading.
///
/// A `BTreeMap` keeps iteration order stable across runs.
pub type Readings = BTreeMap<String, f64>;

/// Source of temperature readings (thermocouple bridge, serial/modbus
/// device, HTTP gateway, simulator, replay of a saved roast, ...).
pub trait Probe {
    fn read(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<Readings, Box<dyn std::error::Error + Send + Sync>>;
}

impl<P: Probe + ?Sized> Probe for Box<P> {
    fn read(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<Readings, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read(timeout)
    }
}
