//! SNR and uniformity arithmetic
//!
//! Statistics are computed over the pixels selected by a boolean mask. An
//! empty selection yields all-zero statistics rather than an error; callers
//! must treat such rows as unusable.

use ndarray::Array2;

/// Statistics of the pixels under a mask
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskedStats {
    pub max: f64,
    pub min: f64,
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub count: usize,
}

impl MaskedStats {
    const ZERO: MaskedStats = MaskedStats {
        max: 0.0,
        min: 0.0,
        mean: 0.0,
        std: 0.0,
        count: 0,
    };
}

/// Computes max/min/mean/std of the pixels selected by `mask`
pub fn masked_stats(image: &Array2<f64>, mask: &Array2<bool>) -> MaskedStats {
    debug_assert_eq!(image.dim(), mask.dim());

    let mut count = 0usize;
    let mut sum = 0.0;
    let mut max = f64::MIN;
    let mut min = f64::MAX;
    for (&v, &m) in image.iter().zip(mask.iter()) {
        if m {
            count += 1;
            sum += v;
            max = max.max(v);
            min = min.min(v);
        }
    }
    if count == 0 {
        return MaskedStats::ZERO;
    }

    let mean = sum / count as f64;
    let mut sq_sum = 0.0;
    for (&v, &m) in image.iter().zip(mask.iter()) {
        if m {
            sq_sum += (v - mean) * (v - mean);
        }
    }

    MaskedStats {
        max,
        min,
        mean,
        std: (sq_sum / count as f64).sqrt(),
        count,
    }
}

/// Signal-to-noise ratio: `multiplier * signal_mean / noise_std`, one decimal
///
/// Defined as 0.0 when `noise_std` is zero.
pub fn snr(signal_mean: f64, noise_std: f64, multiplier: f64) -> f64 {
    if noise_std == 0.0 {
        return 0.0;
    }
    round1(multiplier * signal_mean / noise_std)
}

/// Percent integral uniformity: `100 * (1 - (max - min) / (max + min))`
///
/// Defined as 0.0 when the denominator is zero.
pub fn uniformity(signal_max: f64, signal_min: f64) -> f64 {
    let denom = signal_max + signal_min;
    if denom == 0.0 {
        return 0.0;
    }
    round1(100.0 * (1.0 - (signal_max - signal_min) / denom))
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
