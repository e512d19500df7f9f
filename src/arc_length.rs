//! Numerical arc-length estimation over a [`FilamentSpline`].
//!
//! The equidistant sampler walks the curve in its own units; physical track
//! lengths are instead recovered by an independent high-resolution pass:
//! sample the curve densely, sum consecutive chord lengths, and treat the
//! result as the true arc length. The dense step is fixed and small enough
//! that chord summation converges regardless of the requested particle
//! spacing.

use crate::spline::FilamentSpline;

/// Estimate the total arc length of `spline` by dense chord summation.
///
/// Arguments
/// -----------------
/// * `spline`: the curve to measure.
/// * `step`: dense sampling step in the curve's coordinate unit; must be
///   strictly positive. The control polygon sets the sample density, the
///   summed chords set the value.
///
/// Return
/// ----------
/// * Total length in the curve's coordinate unit.
pub fn estimate_total_length(spline: &FilamentSpline, step: f64) -> f64 {
    debug_assert!(step > 0.0, "dense sampling step must be positive");
    let n = dense_sample_count(spline, step);
    cumulative_lengths(spline, n).last().copied().unwrap_or(0.0)
}

/// Cumulative chord lengths at `n_samples` uniform parameter values.
///
/// The sequence starts at 0, is non-decreasing, and its final value
/// converges to [`estimate_total_length`] as `n_samples` grows.
pub fn cumulative_lengths(spline: &FilamentSpline, n_samples: usize) -> Vec<f64> {
    let n = n_samples.max(2);
    let mut lengths = Vec::with_capacity(n);
    lengths.push(0.0);

    let mut previous = spline.position(0.0);
    let mut total = 0.0;
    for i in 1..n {
        let current = spline.position(i as f64 / (n - 1) as f64);
        total += (current - previous).norm();
        lengths.push(total);
        previous = current;
    }
    lengths
}

/// Number of uniform samples needed so that consecutive samples are at most
/// `step` apart along the control polygon.
pub(crate) fn dense_sample_count(spline: &FilamentSpline, step: f64) -> usize {
    ((spline.polygon_length() / step).ceil() as usize).max(1) + 1
}
