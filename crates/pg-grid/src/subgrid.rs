//! One rectangular block of tabulated distribution values.
//!
//! A subgrid owns five coordinate axes (nucleon number A, alpha_s,
//! transverse momentum kT, momentum fraction x, and energy scale Q²)
//! plus one flat value buffer covering every axis combination for every
//! flavor of the member it belongs to.
//!
//! # Canonical flattening order
//!
//! The buffer nests `A → alpha_s → kT → flavor → x → Q²`, Q² fastest:
//!
//! ```text
//! index = ((((ia·n_as + ias)·n_kt + ikt)·n_flav + ipid)·n_x + ix)·n_q2 + iq2
//! ```
//!
//! Writer and reader both use this order; it is part of the wire format.

use pg_core::{AxisKind, Error, ParamRange, Result};

use crate::axes::{axis_range, validate_axis};

/// A rectangular block of tabulated points over one kinematic region.
///
/// The flavor count is owned by the enclosing member; a subgrid only
/// records how many flavor blocks its buffer implies.
#[derive(Debug, Clone, PartialEq)]
pub struct SubGrid {
    nucleons: Vec<f64>,
    alphas: Vec<f64>,
    kts: Vec<f64>,
    xs: Vec<f64>,
    q2s: Vec<f64>,
    values: Vec<f64>,
    flavor_blocks: usize,
}

impl SubGrid {
    /// Build a subgrid from five axes and a flattened value buffer.
    ///
    /// Every axis must be non-empty and strictly ascending. The buffer
    /// length must be a whole multiple of the knot-point product; the
    /// quotient is the implied flavor count, checked against the
    /// member's flavor list at finalization.
    pub fn new(
        nucleons: Vec<f64>,
        alphas: Vec<f64>,
        kts: Vec<f64>,
        xs: Vec<f64>,
        q2s: Vec<f64>,
        values: Vec<f64>,
    ) -> Result<Self> {
        validate_axis(AxisKind::Nucleons, &nucleons)?;
        validate_axis(AxisKind::AlphaS, &alphas)?;
        validate_axis(AxisKind::Kt, &kts)?;
        validate_axis(AxisKind::X, &xs)?;
        validate_axis(AxisKind::Q2, &q2s)?;

        let points = nucleons.len() * alphas.len() * kts.len() * xs.len() * q2s.len();
        if values.is_empty() || values.len() % points != 0 {
            return Err(Error::ShapeMismatch { expected: points, actual: values.len() });
        }
        let flavor_blocks = values.len() / points;

        Ok(Self { nucleons, alphas, kts, xs, q2s, values, flavor_blocks })
    }

    /// 4-axis convenience form for collinear distributions: equivalent
    /// to [`SubGrid::new`] with a singleton kT axis at 0.
    pub fn new_collinear(
        nucleons: Vec<f64>,
        alphas: Vec<f64>,
        xs: Vec<f64>,
        q2s: Vec<f64>,
        values: Vec<f64>,
    ) -> Result<Self> {
        Self::new(nucleons, alphas, vec![0.0], xs, q2s, values)
    }

    /// Coordinates of one axis.
    pub fn axis(&self, kind: AxisKind) -> &[f64] {
        match kind {
            AxisKind::Nucleons => &self.nucleons,
            AxisKind::AlphaS => &self.alphas,
            AxisKind::Kt => &self.kts,
            AxisKind::X => &self.xs,
            AxisKind::Q2 => &self.q2s,
        }
    }

    /// Axis lengths in canonical order `[A, alpha_s, kT, x, Q²]`.
    pub fn shape(&self) -> [usize; 5] {
        [self.nucleons.len(), self.alphas.len(), self.kts.len(), self.xs.len(), self.q2s.len()]
    }

    /// Number of knot points (product of axis lengths, without flavors).
    pub fn num_points(&self) -> usize {
        self.shape().iter().product()
    }

    /// Flavor count implied by the buffer length.
    pub fn flavor_blocks(&self) -> usize {
        self.flavor_blocks
    }

    /// The flattened value buffer.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Range covered by one axis.
    pub fn range(&self, kind: AxisKind) -> ParamRange {
        axis_range(self.axis(kind))
    }

    /// Whether a canonical 5-point `[A, alpha_s, kT, x, Q²]` lies inside
    /// this subgrid on every axis.
    pub fn contains(&self, point: &[f64; 5]) -> bool {
        AxisKind::ALL.iter().zip(point).all(|(&kind, &v)| self.range(kind).contains(v))
    }

    /// Flat buffer index of one knot, canonical nesting order.
    #[inline]
    pub(crate) fn flat_index(
        &self,
        ia: usize,
        ias: usize,
        ikt: usize,
        ipid: usize,
        ix: usize,
        iq2: usize,
    ) -> usize {
        ((((ia * self.alphas.len() + ias) * self.kts.len() + ikt) * self.flavor_blocks + ipid)
            * self.xs.len()
            + ix)
            * self.q2s.len()
            + iq2
    }

    /// Tabulated value at one knot, no interpolation.
    pub fn value_at(
        &self,
        ia: usize,
        ias: usize,
        ikt: usize,
        ipid: usize,
        ix: usize,
        iq2: usize,
    ) -> f64 {
        self.values[self.flat_index(ia, ias, ikt, ipid, ix, iq2)]
    }
}
