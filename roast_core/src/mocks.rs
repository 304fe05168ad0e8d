//! Test and helper probes for roast_core

use std::collections::VecDeque;

use roast_traits::{Probe, Readings};

/// A probe that always errors on read; useful when ticks are fed from a
/// `Sampler` instead of reading directly.
pub struct NoopProbe;

impl Probe for NoopProbe {
    fn read(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<Readings, Box<dyn std::error::Error + Send + Sync>> {
        Err(Box::new(std::io::Error::other("noop probe")))
    }
}

/// Plays a fixed list of primary-channel values, one per read, then reports
/// exhaustion.
pub struct ScriptedProbe {
    channel: String,
    values: VecDeque<f64>,
}

impl ScriptedProbe {
    pub fn new(channel: impl Into<String>, values: impl IntoIterator<Item = f64>) -> Self {
        Self {
            channel: channel.into(),
            values: values.into_iter().collect(),
        }
    }
}

impl Probe for ScriptedProbe {
    fn read(
        &mut self,
        _timeout: std::time::Duration,
    ) -> Result<Readings, Box<dyn std::error::Error + Send + Sync>> {
        match self.values.pop_front() {
            Some(v) => Ok(Readings::from([(self.channel.clone(), v)])),
            None => Err(Box::new(std::io::Error::other("scripted probe exhausted"))),
        }
    }
}
