//! Maps `Box<dyn Error>` from the probe boundary to typed `RoastError`.
//!
//! `roast_traits::Probe` returns `Box<dyn Error + Send + Sync>`; this module
//! converts it to our error enum, downcasting `roast_devices::DeviceError`
//! when the `device-errors` feature is on.

use crate::error::RoastError;

/// Map a trait-boundary error to a typed `RoastError`.
pub fn map_probe_error(e: &(dyn std::error::Error + 'static)) -> RoastError {
    #[cfg(feature = "device-errors")]
    {
        if let Some(dev) = e.downcast_ref::<roast_devices::DeviceError>() {
            return match dev {
                roast_devices::DeviceError::Timeout => RoastError::Timeout,
                roast_devices::DeviceError::Exhausted => RoastError::Exhausted,
                other => RoastError::ProbeFault(other.to_string()),
            };
        }
    }

    // Fallback: string-based detection
    let s = e.to_string();
    let lower = s.to_lowercase();
    if lower.contains("timeout") || lower.contains("timed out") {
        RoastError::Timeout
    } else if lower.contains("exhausted") {
        RoastError::Exhausted
    } else {
        RoastError::Probe(s)
    }
}
