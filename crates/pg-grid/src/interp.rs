//! Interpolation kernel behind the query entry point.
//!
//! One entry point evaluates a (subgrid, flavor, canonical 5-point)
//! triple. The shipped kernel is dimension-agnostic multilinear
//! interpolation with a per-axis coordinate mapping chosen by the set's
//! interpolator type; singleton axes contribute no interpolation
//! dimension, so the same kernel covers 2-D collinear members through
//! fully 5-D nuclear TMD members. It reproduces tabulated values
//! exactly at knots. Spline-accurate kernels slot in behind
//! [`evaluate`] without touching the callers.

use pg_core::{AxisKind, InterpolatorType};

use crate::subgrid::SubGrid;

/// Per-axis coordinate mapping for the kernel.
#[derive(Debug, Clone, Copy)]
pub(crate) struct InterpConfig {
    /// Map kT, x, and Q² through ln() before weighting.
    log_kinematics: bool,
}

impl InterpConfig {
    /// Kernel configuration for a set's declared interpolator type.
    pub(crate) fn for_type(interpolator: InterpolatorType) -> Self {
        let log_kinematics = match interpolator {
            InterpolatorType::Bilinear | InterpolatorType::NdLinear => false,
            InterpolatorType::LogBilinear
            | InterpolatorType::LogBicubic
            | InterpolatorType::LogTricubic => true,
        };
        Self { log_kinematics }
    }

    /// Whether coordinates on `axis` are weighted in log space.
    ///
    /// A and alpha_s axes are always linear; logarithmic kinematic axes
    /// fall back to linear when their coordinates reach zero or below.
    fn maps_log(&self, axis: AxisKind, coords: &[f64]) -> bool {
        let kinematic = matches!(axis, AxisKind::Kt | AxisKind::X | AxisKind::Q2);
        self.log_kinematics && kinematic && coords[0] > 0.0
    }
}

/// Interpolate one flavor of one subgrid at a canonical 5-point.
///
/// The caller guarantees the point lies inside the subgrid on every
/// axis (`SubGrid::contains`); out-of-range handling happens at the
/// query layer.
pub(crate) fn evaluate(
    subgrid: &SubGrid,
    pid_index: usize,
    point: &[f64; 5],
    config: &InterpConfig,
) -> f64 {
    // Per axis: lower knot index and fractional position in [0, 1].
    let mut lo = [0usize; 5];
    let mut frac = [0.0f64; 5];
    let mut varying: [usize; 5] = [0; 5];
    let mut n_varying = 0;

    for (dim, &axis) in AxisKind::ALL.iter().enumerate() {
        let coords = subgrid.axis(axis);
        if coords.len() == 1 {
            continue;
        }
        let (i, t) = bracket(coords, point[dim], config.maps_log(axis, coords));
        lo[dim] = i;
        frac[dim] = t;
        // Exact knots (t == 0) stay out of the corner sum so knot
        // queries stay bit-exact.
        if t != 0.0 {
            varying[n_varying] = dim;
            n_varying += 1;
        }
    }

    // Sum over the 2^n corners of the varying dimensions.
    let corners = 1usize << n_varying;
    let mut acc = 0.0;
    for corner in 0..corners {
        let mut weight = 1.0;
        let mut idx = lo;
        for (bit, &dim) in varying[..n_varying].iter().enumerate() {
            if corner & (1 << bit) != 0 {
                weight *= frac[dim];
                idx[dim] += 1;
            } else {
                weight *= 1.0 - frac[dim];
            }
        }
        acc += weight
            * subgrid.value_at(idx[0], idx[1], idx[2], pid_index, idx[3], idx[4]);
    }
    acc
}

/// Locate the knot interval containing `value` and the fractional
/// position within it, in mapped coordinates.
///
/// `coords` is strictly ascending with at least two knots and `value`
/// lies within `[coords[0], coords[last]]`.
fn bracket(coords: &[f64], value: f64, log_mapped: bool) -> (usize, f64) {
    let hi = coords.partition_point(|&c| c < value);
    let i = hi.clamp(1, coords.len() - 1) - 1;

    if value == coords[i] {
        return (i, 0.0);
    }
    if value == coords[i + 1] {
        return (i, 1.0);
    }

    let map = |v: f64| if log_mapped { v.ln() } else { v };
    let t = (map(value) - map(coords[i])) / (map(coords[i + 1]) - map(coords[i]));
    (i, t)
}
