//! Full-history derivation: ROR, outlier split, smoothing.
//!
//! Always recomputed from scratch so that a history fed one sample at a time
//! and the same history loaded at once produce identical series.

use crate::config::EngineCfg;
use crate::outlier::split_outliers;
use crate::ror::build_ror_series;
use crate::smoother::smooth;
use crate::types::{RoastEvent, Sample};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedSeries {
    pub ror: Vec<Sample>,
    pub outliers: Vec<Sample>,
    pub filtered: Vec<Sample>,
    pub convolved: Vec<Sample>,
}

impl DerivedSeries {
    pub fn last_smoothed(&self) -> Option<Sample> {
        self.convolved.last().copied()
    }
}

pub fn derive_series(
    history: &[Sample],
    drop: Option<&RoastEvent>,
    cfg: &EngineCfg,
    live: bool,
) -> DerivedSeries {
    let ror = build_ror_series(history, cfg.ror.window, drop);
    let split = split_outliers(&ror, cfg.ror.outlier_window, cfg.ror.outlier_z);
    let convolved = smooth(&split.filtered, &cfg.smoothing, live);
    tracing::trace!(
        samples = history.len(),
        ror = ror.len(),
        outliers = split.outliers.len(),
        convolved = convolved.len(),
        "recomputed derived series"
    );
    DerivedSeries {
        ror,
        outliers: split.outliers,
        filtered: split.filtered,
        convolved,
    }
}
