//! Per-observation sampling variance.

/// Binomial sampling variance of a proportion, with boundary adjustment.
///
/// The proportion is first clamped to `[0.5/n, 1 - 0.5/n]`, so a reported
/// rate of exactly 0 or 1, or a single-subject observation, still gets a
/// finite and modest variance instead of zero. The result is then floored at
/// `floor`. Both adjustments are part of the pooling contract: without them a
/// single boundary observation would take all the weight.
///
/// `n = 0` is treated as `n = 1`; validated observations never have it.
#[must_use]
pub fn binomial_variance(rate: f64, n: u32, floor: f64) -> f64 {
    let n = f64::from(n.max(1));
    let edge = 0.5 / n;
    let p = rate.clamp(edge, 1.0 - edge);
    (p * (1.0 - p) / n).max(floor)
}

/// Inverse-variance weight.
#[must_use]
pub fn weight(rate: f64, n: u32, floor: f64) -> f64 {
    1.0 / binomial_variance(rate, n, floor)
}
