//! Trailing z-score outlier rejection for ROR series.

use crate::types::Sample;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OutlierSplit {
    pub outliers: Vec<Sample>,
    pub filtered: Vec<Sample>,
}

/// Population mean and standard deviation.
fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Split `ror` into outliers and inliers.
///
/// Point 0 has no history and is skipped (in neither list). Every later point
/// is scored against up to `window` points strictly before it; a flat window
/// (zero deviation) never flags anything.
pub fn split_outliers(ror: &[Sample], window: usize, z_threshold: f64) -> OutlierSplit {
    let mut split = OutlierSplit {
        outliers: Vec::new(),
        filtered: Vec::with_capacity(ror.len()),
    };
    let mut scratch = Vec::with_capacity(window);
    for (i, cand) in ror.iter().enumerate().skip(1) {
        scratch.clear();
        scratch.extend(ror[i.saturating_sub(window)..i].iter().map(|p| p.value));
        let (mean, sd) = mean_std(&scratch);
        let is_outlier = sd > 0.0 && ((cand.value - mean) / sd).abs() > z_threshold;
        if is_outlier {
            split.outliers.push(*cand);
        } else {
            split.filtered.push(*cand);
        }
    }
    split
}
