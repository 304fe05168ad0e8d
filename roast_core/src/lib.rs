#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_precision_loss
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Roast-curve analytics engine (probe-agnostic).
//!
//! This crate turns a live temperature stream into the numbers a roaster
//! steers by. All sensor interaction goes through `roast_traits::Probe`.
//!
//! ## Pipeline
//!
//! - **Rate of rise**: trailing-window ROR per sample, truncated at DROP (`ror`)
//! - **Outliers**: trailing z-score split into outliers and inliers (`outlier`)
//! - **Smoothing**: Hann-windowed convolution with reflective padding (`smoother`)
//! - **Detection**: CHARGE / TURNING_POINT / DRY_END / DROP heuristics (`detector`)
//! - **Phases**: drying / maillard / development breakdown (`phase`)
//! - **Alarms**: one-shot ascending temperature thresholds (`alarm`)
//!
//! Every derived series is recomputed from the raw history on each tick, so a
//! profile reloaded from disk yields exactly the series it had when saved.
//! No derived value is ever NaN or infinite.

pub mod alarm;
pub mod atomic;
pub mod builder;
pub mod channel;
pub mod config;
pub mod conversions;
pub mod detector;
pub mod error;
pub mod events;
pub mod ghost;
pub mod mocks;
pub mod notes;
pub mod outlier;
pub mod phase;
pub mod pipeline;
pub mod probe_error;
pub mod ror;
pub mod runner;
pub mod sampler;
pub mod session;
pub mod smoother;
pub mod status;
pub mod types;
pub mod util;
pub mod window;

pub use alarm::Alarms;
pub use builder::RoastSessionBuilder;
pub use channel::{Channel, ManualChannel};
pub use config::{DetectionCfg, EngineCfg, RorCfg, SamplingCfg, SmoothingCfg};
pub use error::{BuildError, RoastError};
pub use events::RoastEventSet;
pub use ghost::Ghost;
pub use notes::RoastNotes;
pub use phase::calculate_phases;
pub use pipeline::{DerivedSeries, derive_series};
pub use session::{Direction, RoastSession};
pub use status::{SessionStatus, TickReport};
pub use types::{AlarmThreshold, EventKind, Phase, Phases, RoastEvent, Sample};
