//! Replays a saved roast profile as if it were a live probe.

use std::collections::BTreeSet;
use std::time::Duration;

use roast_config::RoastProfile;
use roast_traits::{Probe, Readings};

use crate::error::DeviceError;

/// Emits one read per distinct timestamp in the profile, in order. Each read
/// carries every channel that has a sample at that timestamp. After the last
/// timestamp every read fails with [`DeviceError::Exhausted`].
#[derive(Debug, Clone)]
pub struct ReplayProbe {
    frames: Vec<(i64, Readings)>,
    next: usize,
}

impl ReplayProbe {
    pub fn from_profile(profile: &RoastProfile) -> Self {
        let stamps: BTreeSet<i64> = profile
            .channel_arr
            .iter()
            .flat_map(|c| c.data.iter().map(|p| p.timestamp))
            .collect();
        let mut frames: Vec<(i64, Readings)> =
            stamps.into_iter().map(|t| (t, Readings::new())).collect();
        for ch in &profile.channel_arr {
            for p in &ch.data {
                if let Ok(i) = frames.binary_search_by_key(&p.timestamp, |(t, _)| *t) {
                    frames[i].1.insert(ch.id.clone(), p.value);
                }
            }
        }
        tracing::debug!(frames = frames.len(), "replay probe loaded");
        Self { frames, next: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len().saturating_sub(self.next)
    }

    /// Timestamp of the frame the next read will return.
    pub fn peek_timestamp(&self) -> Option<i64> {
        self.frames.get(self.next).map(|(t, _)| *t)
    }
}

impl Probe for ReplayProbe {
    fn read(
        &mut self,
        _timeout: Duration,
    ) -> Result<Readings, Box<dyn std::error::Error + Send + Sync>> {
        let Some((_, readings)) = self.frames.get(self.next) else {
            return Err(Box::new(DeviceError::Exhausted));
        };
        self.next += 1;
        Ok(readings.clone())
    }
}
