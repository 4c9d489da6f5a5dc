//! Phase wrapping and unwrapping.
//!
//! Interaural phase is reported wrapped to the half-open interval (-π, π].
//! Unwrapping walks across frequency and removes the 2π steps between
//! neighbouring bins, so that a pure delay shows up as a straight line.

use rustfft::num_complex::Complex;
use std::f32::consts::{PI, TAU};

/// Remove 2π discontinuities between consecutive values.
///
/// Each step is reduced to the nearest value in [-π, π] by subtracting a
/// whole number of turns; the corrections accumulate along the slice. The
/// first value is kept as is, so `unwrap_phase(x)[i] ≡ x[i] (mod 2π)`.
///
/// ```rust
/// use binaspect_analysis::{unwrap_phase, wrap_to_pi};
///
/// let wrapped: Vec<f32> = (0..32).map(|k| wrap_to_pi(k as f32 * 1.2)).collect();
/// let unwrapped = unwrap_phase(&wrapped);
/// assert!((unwrapped[31] - 31.0 * 1.2).abs() < 1e-3);
/// ```
pub fn unwrap_phase(phase: &[f32]) -> Vec<f32> {
    let Some(&first) = phase.first() else {
        return Vec::new();
    };

    let mut turns = 0.0f32;
    let mut out = Vec::with_capacity(phase.len());
    out.push(first);
    for (prev, &next) in phase.iter().zip(&phase[1..]) {
        turns -= ((next - prev) / TAU).round();
        out.push(next + turns * TAU);
    }
    out
}

/// Wrap an angle to (-π, π].
///
/// Angles already in range are returned bit-exact; non-finite input is
/// passed through.
pub fn wrap_to_pi(angle: f32) -> f32 {
    if !angle.is_finite() || (angle > -PI && angle <= PI) {
        return angle;
    }
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { PI } else { wrapped }
}

/// Phase of `left · conj(right)` in (-π, π].
///
/// Positive when the left channel leads. Zero for a silent bin.
pub fn phase_difference(left: Complex<f32>, right: Complex<f32>) -> f32 {
    let angle = (left * right.conj()).arg();
    if angle <= -PI { PI } else { angle }
}
