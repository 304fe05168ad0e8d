//! Hann-window convolution smoothing.

use crate::config::SmoothingCfg;
use crate::types::Sample;

/// Normalized Hann kernel of `len` taps (sums to 1).
pub fn hann_kernel(len: usize) -> Vec<f64> {
    if len < 2 {
        return vec![1.0; len];
    }
    let denom = (len - 1) as f64;
    let raw: Vec<f64> = (0..len)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f64::consts::PI * i as f64 / denom).cos()))
        .collect();
    let sum: f64 = raw.iter().sum();
    if sum > 0.0 {
        raw.into_iter().map(|w| w / sum).collect()
    } else {
        raw
    }
}

/// "Valid" convolution: one output per full overlap of `kernel` on `input`.
/// Empty when `input` is shorter than `kernel`.
pub fn conv_valid(kernel: &[f64], input: &[f64]) -> Vec<f64> {
    let nk = kernel.len();
    if nk == 0 || input.len() < nk {
        return Vec::new();
    }
    (0..=input.len() - nk)
        .map(|i| {
            kernel
                .iter()
                .rev()
                .zip(&input[i..i + nk])
                .map(|(k, x)| k * x)
                .sum()
        })
        .collect()
}

/// Smooth an inlier ROR series.
///
/// The values are padded on both sides with a mirror of their neighbourhood
/// (edge point excluded), convolved, and trimmed by half a kernel at each
/// end. Results are paired with the input timestamps in order; while `live`
/// the trailing `live_lag` timestamps get no smoothed value. Short inputs can
/// yield fewer points than timestamps, or none at all.
pub fn smooth(filtered: &[Sample], cfg: &SmoothingCfg, live: bool) -> Vec<Sample> {
    let k = cfg.kernel_len;
    let n = filtered.len();
    let values: Vec<f64> = filtered.iter().map(|p| p.value).collect();

    let left = values.get(1..k.min(n)).unwrap_or_default();
    let right = values
        .get(n.saturating_sub(k)..n.saturating_sub(1))
        .unwrap_or_default();
    let mut padded = Vec::with_capacity(left.len() + n + right.len());
    padded.extend(left.iter().rev());
    padded.extend_from_slice(&values);
    padded.extend(right.iter().rev());

    let conv = conv_valid(&hann_kernel(k), &padded);
    let half = cfg.half_window();
    let trimmed = if conv.len() > 2 * half {
        &conv[half..conv.len() - half]
    } else {
        &[][..]
    };

    let lag = if live { cfg.live_lag } else { 0 };
    filtered
        .iter()
        .take(n.saturating_sub(lag))
        .zip(trimmed)
        .map(|(p, v)| Sample::new(p.timestamp, *v))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(n: usize, v: f64) -> Vec<Sample> {
        (0..n).map(|i| Sample::new(i as i64, v)).collect()
    }

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        let k = hann_kernel(11);
        assert!((k.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert_eq!(k[0], 0.0);
        for i in 0..11 {
            assert!((k[i] - k[10 - i]).abs() < 1e-15);
        }
    }

    #[test]
    fn conv_valid_lengths() {
        assert_eq!(conv_valid(&[0.5, 0.5], &[1.0, 3.0, 5.0]), vec![2.0, 4.0]);
        assert!(conv_valid(&[1.0, 1.0, 1.0], &[1.0]).is_empty());
    }

    #[test]
    fn constant_series_stays_constant() {
        let cfg = SmoothingCfg::default();
        let out = smooth(&flat(30, 12.0), &cfg, false);
        assert_eq!(out.len(), 30);
        assert!(out.iter().all(|p| (p.value - 12.0).abs() < 1e-9));
    }

    #[test]
    fn live_mode_lags_tail() {
        let cfg = SmoothingCfg::default();
        let out = smooth(&flat(30, 12.0), &cfg, true);
        assert_eq!(out.len(), 27);
        assert_eq!(out.last().map(|p| p.timestamp), Some(26));
    }

    #[test]
    fn short_and_empty_inputs() {
        let cfg = SmoothingCfg::default();
        assert!(smooth(&[], &cfg, false).is_empty());
        assert!(smooth(&flat(1, 5.0), &cfg, false).is_empty());
        let out = smooth(&flat(6, 5.0), &cfg, false);
        assert!(out.len() < 6);
    }
}
