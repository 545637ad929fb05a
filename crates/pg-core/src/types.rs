//! Small cross-boundary value types shared by the writer and reader sides.

use serde::{Deserialize, Serialize};

/// Identifies one of the five subgrid axes.
///
/// Every subgrid carries all five axes; axes that do not vary for a given
/// distribution (e.g. kT for a collinear PDF) are stored with a single
/// coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisKind {
    /// Nucleon mass number A.
    Nucleons,
    /// Strong coupling value the member was determined with.
    AlphaS,
    /// Transverse momentum kT.
    Kt,
    /// Momentum fraction x.
    X,
    /// Energy scale squared Q².
    Q2,
}

impl AxisKind {
    /// All axis kinds in canonical nesting order (outermost first).
    pub const ALL: [AxisKind; 5] =
        [AxisKind::Nucleons, AxisKind::AlphaS, AxisKind::Kt, AxisKind::X, AxisKind::Q2];
}

impl std::fmt::Display for AxisKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AxisKind::Nucleons => "A",
            AxisKind::AlphaS => "alpha_s",
            AxisKind::Kt => "kT",
            AxisKind::X => "x",
            AxisKind::Q2 => "Q2",
        };
        f.write_str(name)
    }
}

/// Closed interval covered by one axis across a member's subgrids.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    /// Smallest tabulated coordinate.
    pub min: f64,
    /// Largest tabulated coordinate.
    pub max: f64,
}

impl ParamRange {
    /// Create a new range.
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Whether `value` lies within the closed interval.
    #[inline]
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Smallest range enclosing both `self` and `other`.
    pub fn merge(&self, other: &ParamRange) -> ParamRange {
        ParamRange { min: self.min.min(other.min), max: self.max.max(other.max) }
    }
}

/// Post-interpolation clipping policy applied by a query handle.
///
/// The policy lives on the handle only; persisted grid values are never
/// modified. Both clipping modes are idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ForcePositive {
    /// Return raw interpolated values.
    #[default]
    None,
    /// Zero out negative results.
    ClipNegative,
    /// Zero out results below a small positive threshold.
    ClipSmall,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_contains_and_merge() {
        let r = ParamRange::new(1e-5, 1.0);
        assert!(r.contains(1e-5));
        assert!(r.contains(1.0));
        assert!(!r.contains(1.1));

        let merged = r.merge(&ParamRange::new(0.5, 2.0));
        assert_eq!(merged.min, 1e-5);
        assert_eq!(merged.max, 2.0);
    }

    #[test]
    fn canonical_axis_order() {
        assert_eq!(AxisKind::ALL[0], AxisKind::Nucleons);
        assert_eq!(AxisKind::ALL[4], AxisKind::Q2);
    }
}
