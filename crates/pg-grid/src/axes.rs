//! Axis coordinate validation shared by every subgrid constructor.

use pg_core::{AxisKind, Error, ParamRange, Result};

/// Check that `coords` is a non-empty, strictly ascending sequence.
///
/// Strict ascent implies duplicate-freeness; both violations report the
/// same `NonMonotonicAxis` code.
pub(crate) fn validate_axis(kind: AxisKind, coords: &[f64]) -> Result<()> {
    if coords.is_empty() {
        return Err(Error::EmptyAxis { axis: kind });
    }
    if coords.windows(2).any(|w| w[0] >= w[1]) {
        return Err(Error::NonMonotonicAxis { axis: kind });
    }
    Ok(())
}

/// Range of a validated (non-empty, ascending) coordinate sequence.
pub(crate) fn axis_range(coords: &[f64]) -> ParamRange {
    ParamRange::new(coords[0], coords[coords.len() - 1])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty() {
        assert!(matches!(
            validate_axis(AxisKind::X, &[]),
            Err(Error::EmptyAxis { axis: AxisKind::X })
        ));
    }

    #[test]
    fn rejects_descending_and_duplicates() {
        assert!(matches!(
            validate_axis(AxisKind::Q2, &[1.0, 3.0, 2.0]),
            Err(Error::NonMonotonicAxis { axis: AxisKind::Q2 })
        ));
        assert!(matches!(
            validate_axis(AxisKind::X, &[0.1, 0.1, 0.5]),
            Err(Error::NonMonotonicAxis { axis: AxisKind::X })
        ));
    }

    #[test]
    fn accepts_singleton_and_ascending() {
        assert!(validate_axis(AxisKind::Kt, &[0.0]).is_ok());
        assert!(validate_axis(AxisKind::X, &[1e-5, 1e-3, 0.1, 1.0]).is_ok());
        let r = axis_range(&[1e-5, 1.0]);
        assert_eq!((r.min, r.max), (1e-5, 1.0));
    }
}
