//! The query handle: one loaded member, ready for repeated evaluation.

use std::path::Path;
use std::sync::Arc;

use rayon::prelude::*;

use pg_core::{AxisKind, Error, ForcePositive, MetaData, ParamRange, Result};

use crate::alphas::AlphaS;
use crate::format;
use crate::interp::{self, InterpConfig};
use crate::member::GridMember;
use crate::reader::ContainerStream;

/// Results below this threshold clip to zero under
/// [`ForcePositive::ClipSmall`].
const CLIP_SMALL_THRESHOLD: f64 = 1e-10;

/// One member of a set, loaded for evaluation.
///
/// Owns its sealed grid exclusively and shares the set metadata with
/// sibling members. State is read-only after construction apart from
/// the force-positive policy, so independent handles may be queried
/// from independent threads.
pub struct PdfMember {
    meta: Arc<MetaData>,
    grid: GridMember,
    interp: InterpConfig,
    alphas: AlphaS,
    force_positive: ForcePositive,
}

impl PdfMember {
    /// Build a handle around a sealed member and its set metadata,
    /// without touching the filesystem.
    ///
    /// This is what the loaders return; building one directly allows
    /// querying a member before it has ever been persisted.
    pub fn new(meta: Arc<MetaData>, grid: GridMember) -> Result<Self> {
        let alphas = AlphaS::from_metadata(&meta)?;
        let interp = InterpConfig::for_type(meta.interpolator_type);
        Ok(Self { meta, grid, interp, alphas, force_positive: ForcePositive::None })
    }

    /// Load one member of a container, by index.
    ///
    /// Streams past earlier members without parsing them.
    pub fn load<P: AsRef<Path>>(path: P, member: usize) -> Result<Self> {
        let mut stream = ContainerStream::open(path.as_ref())?;
        let count = stream.total() as usize;
        if member >= count {
            return Err(Error::IndexOutOfBounds { index: member, count });
        }
        for _ in 0..member {
            stream.skip_member()?;
        }
        let grid = stream
            .next_member()?
            .ok_or_else(|| Error::Corrupt("container ended before the requested member".into()))?;
        Self::new(Arc::clone(stream.meta()), grid)
    }

    /// Load every member of a container eagerly.
    ///
    /// The container is streamed once; member decoding fans out across
    /// the rayon pool.
    pub fn load_all<P: AsRef<Path>>(path: P) -> Result<Vec<Self>> {
        let mut stream = ContainerStream::open(path.as_ref())?;
        let meta = Arc::clone(stream.meta());

        let mut payloads = Vec::with_capacity(stream.total() as usize);
        while let Some(payload) = stream.next_payload()? {
            payloads.push(payload);
        }

        payloads
            .into_par_iter()
            .map(|payload| {
                let grid = format::decode_member(&payload)?;
                Self::new(Arc::clone(&meta), grid)
            })
            .collect()
    }

    /// Set metadata shared by every member of the container.
    pub fn metadata(&self) -> &MetaData {
        &self.meta
    }

    /// The sealed grid backing this handle.
    ///
    /// Cloning it into a fresh collection allows re-compressing a
    /// loaded set unchanged.
    pub fn grid(&self) -> &GridMember {
        &self.grid
    }

    // ── introspection ───────────────────────────────────────────

    /// Smallest tabulated momentum fraction.
    pub fn x_min(&self) -> f64 {
        self.grid.range(AxisKind::X).min
    }

    /// Largest tabulated momentum fraction.
    pub fn x_max(&self) -> f64 {
        self.grid.range(AxisKind::X).max
    }

    /// Smallest tabulated energy scale squared.
    pub fn q2_min(&self) -> f64 {
        self.grid.range(AxisKind::Q2).min
    }

    /// Largest tabulated energy scale squared.
    pub fn q2_max(&self) -> f64 {
        self.grid.range(AxisKind::Q2).max
    }

    /// Number of tabulated flavors.
    pub fn num_pids(&self) -> usize {
        self.grid.num_pids()
    }

    /// Ordered PDG ids of the tabulated flavors.
    pub fn pids(&self) -> &[i32] {
        self.grid.pids()
    }

    /// Number of subgrids.
    pub fn num_subgrids(&self) -> usize {
        self.grid.num_subgrids()
    }

    /// Range of one axis merged across all subgrids.
    pub fn param_range(&self, axis: AxisKind) -> ParamRange {
        self.grid.range(axis)
    }

    /// Per-subgrid knot counts along one axis.
    pub fn subgrid_shape_for(&self, axis: AxisKind) -> Vec<usize> {
        self.grid.subgrids().iter().map(|sg| sg.axis(axis).len()).collect()
    }

    /// Knot coordinates of one axis of one subgrid.
    pub fn subgrid_values_for(&self, axis: AxisKind, subgrid: usize) -> Result<&[f64]> {
        self.grid
            .subgrids()
            .get(subgrid)
            .map(|sg| sg.axis(axis))
            .ok_or(Error::IndexOutOfBounds { index: subgrid, count: self.grid.num_subgrids() })
    }

    /// Tabulated value at one knot of one subgrid, no interpolation.
    #[allow(clippy::too_many_arguments)]
    pub fn xf_at_knot(
        &self,
        pid: i32,
        subgrid: usize,
        ia: usize,
        ias: usize,
        ikt: usize,
        ix: usize,
        iq2: usize,
    ) -> Result<f64> {
        let pid_index = self.grid.pid_index(pid).ok_or(Error::UnknownPid { pid })?;
        let sg = self
            .grid
            .subgrids()
            .get(subgrid)
            .ok_or(Error::IndexOutOfBounds { index: subgrid, count: self.grid.num_subgrids() })?;
        let shape = sg.shape();
        for (index, count) in [ia, ias, ikt, ix, iq2].into_iter().zip(shape) {
            if index >= count {
                return Err(Error::IndexOutOfBounds { index, count });
            }
        }
        Ok(sg.value_at(ia, ias, ikt, pid_index, ix, iq2))
    }

    // ── evaluation ──────────────────────────────────────────────

    /// Interpolate `x·f(x, Q², …)` at an explicit canonical 5-point
    /// `[A, alpha_s, kT, x, Q²]`.
    ///
    /// This is the one interpolation entry point; every other form is
    /// an adapter over it. Fails with `UnknownPid` for a flavor the
    /// member does not tabulate and `OutOfRange` when the point lies
    /// outside every subgrid; no extrapolation, no clamping.
    pub fn xfx_q2_nd(&self, pid: i32, coords: &[f64]) -> Result<f64> {
        let point: &[f64; 5] = coords
            .try_into()
            .map_err(|_| Error::CoordinateDimension { expected: 5, actual: coords.len() })?;
        let pid_index = self.grid.pid_index(pid).ok_or(Error::UnknownPid { pid })?;
        let subgrid = self
            .grid
            .find_subgrid(point)
            .ok_or_else(|| self.out_of_range(point))?;

        let raw = interp::evaluate(&self.grid.subgrids()[subgrid], pid_index, point, &self.interp);
        Ok(self.clip(raw))
    }

    /// 2-D convenience form: A, alpha_s, and kT default to the first
    /// coordinate of the leading subgrid's axes.
    pub fn xfx_q2(&self, pid: i32, x: f64, q2: f64) -> Result<f64> {
        let lead = &self.grid.subgrids()[0];
        self.xfx_q2_nd(
            pid,
            &[
                lead.axis(AxisKind::Nucleons)[0],
                lead.axis(AxisKind::AlphaS)[0],
                lead.axis(AxisKind::Kt)[0],
                x,
                q2,
            ],
        )
    }

    /// Evaluate a grid of (pid, x, Q²) combinations in parallel.
    ///
    /// Returns values row-major over `[pids × points]`.
    pub fn xfx_q2_batch(&self, pids: &[i32], points: &[(f64, f64)]) -> Result<Vec<f64>> {
        pids.par_iter()
            .flat_map_iter(|&pid| points.iter().map(move |&(x, q2)| (pid, x, q2)))
            .map(|(pid, x, q2)| self.xfx_q2(pid, x, q2))
            .collect()
    }

    /// Strong coupling at the given Q².
    pub fn alphas_q2(&self, q2: f64) -> Result<f64> {
        self.alphas.alphas_q2(q2)
    }

    // ── force-positive policy ───────────────────────────────────

    /// Current post-interpolation clipping policy.
    pub fn force_positive(&self) -> ForcePositive {
        self.force_positive
    }

    /// Set the post-interpolation clipping policy on this handle.
    ///
    /// Affects returned values only; persisted data is untouched.
    pub fn set_force_positive(&mut self, policy: ForcePositive) {
        self.force_positive = policy;
    }

    fn clip(&self, value: f64) -> f64 {
        match self.force_positive {
            ForcePositive::None => value,
            ForcePositive::ClipNegative => {
                if value < 0.0 {
                    0.0
                } else {
                    value
                }
            }
            ForcePositive::ClipSmall => {
                if value < CLIP_SMALL_THRESHOLD {
                    0.0
                } else {
                    value
                }
            }
        }
    }

    /// Build the `OutOfRange` error naming the offending axis.
    ///
    /// When every coordinate sits inside the merged per-axis ranges the
    /// point fell into a gap between subgrids; the x axis is reported
    /// with the member-wide range in that case.
    fn out_of_range(&self, point: &[f64; 5]) -> Error {
        for (&axis, &value) in AxisKind::ALL.iter().zip(point) {
            let range = self.grid.range(axis);
            if !range.contains(value) {
                return Error::OutOfRange { axis, value, min: range.min, max: range.max };
            }
        }
        let range = self.grid.range(AxisKind::X);
        Error::OutOfRange { axis: AxisKind::X, value: point[3], min: range.min, max: range.max }
    }
}

/// Broadcast one clipping policy across a slice of handles.
///
/// Equivalent to calling [`PdfMember::set_force_positive`] on each
/// element.
pub fn set_force_positive_all(members: &mut [PdfMember], policy: ForcePositive) {
    for member in members {
        member.set_force_positive(policy);
    }
}
