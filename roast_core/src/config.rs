//! Runtime configuration for the analytics engine.
//!
//! These are the structs the engine functions take. They are separate from
//! the TOML-deserialized config in `roast_config`; see `conversions`.
//! Defaults reproduce the reference roasting app's constants.

/// Rate-of-rise and outlier settings.
#[derive(Debug, Clone, PartialEq)]
pub struct RorCfg {
    /// Trailing samples per ROR point (first to last of the window).
    pub window: usize,
    /// Trailing ROR points (excluding the candidate) for the z-score.
    pub outlier_window: usize,
    /// A point is an outlier when its z-score is strictly above this.
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

/// Convolution smoothing of the inlier ROR series.
#[derive(Debug, Clone, PartialEq)]
pub struct SmoothingCfg {
    /// Hann kernel length. Odd so the kernel has a center tap.
    pub kernel_len: usize,
    /// Points dropped from the smoothed tail while recording.
    pub live_lag: usize,
}

impl SmoothingCfg {
    #[inline]
    pub fn half_window(&self) -> usize {
        self.kernel_len.saturating_sub(1) / 2
    }
}

impl Default for SmoothingCfg {
    fn default() -> Self {
        Self {
            kernel_len: 11,
            live_lag: 3,
        }
    }
}

/// Milestone auto-detection thresholds.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionCfg {
    /// Trailing raw ROR points inspected by the charge/drop heuristic.
    pub charge_window: usize,
    /// Required swing between running max and running min for a turning point.
    pub turning_point_min_drop: f64,
    /// Dry end fires once the last two readings exceed this temperature.
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

/// Everything the per-tick pipeline needs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineCfg {
    pub ror: RorCfg,
    pub smoothing: SmoothingCfg,
    pub detection: DetectionCfg,
}

/// Probe pacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplingCfg {
    /// Tick cadence in Hz (roasting probes typically report once a second).
    pub sample_rate_hz: u32,
    /// Max wait per probe read (ms).
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
