//! One member of a set: an ordered sequence of subgrids sealed together
//! with the flavor list they share.

use std::collections::HashSet;

use pg_core::{AxisKind, Error, ParamRange, Result};

use crate::subgrid::SubGrid;

/// Accumulates subgrids for one member, then seals them with a flavor
/// list.
///
/// The flavor list is declared exactly once, after every subgrid has
/// been added; adding a subgrid afterwards is an invalid state. A
/// sealed [`GridMember`] is immutable.
#[derive(Debug, Default)]
pub struct GridMemberBuilder {
    subgrids: Vec<SubGrid>,
    pids: Option<Vec<i32>>,
}

impl GridMemberBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one subgrid from five axes and a flattened value buffer.
    ///
    /// See [`SubGrid::new`] for the canonical buffer layout. All
    /// subgrids of one member must imply the same flavor count.
    pub fn add_subgrid(
        &mut self,
        nucleons: Vec<f64>,
        alphas: Vec<f64>,
        kts: Vec<f64>,
        xs: Vec<f64>,
        q2s: Vec<f64>,
        values: Vec<f64>,
    ) -> Result<()> {
        if self.pids.is_some() {
            return Err(Error::InvalidState("subgrids cannot be added after flavors are set"));
        }
        let subgrid = SubGrid::new(nucleons, alphas, kts, xs, q2s, values)?;
        if let Some(first) = self.subgrids.first() {
            if subgrid.flavor_blocks() != first.flavor_blocks() {
                return Err(Error::ShapeMismatch {
                    expected: subgrid.num_points() * first.flavor_blocks(),
                    actual: subgrid.values().len(),
                });
            }
        }
        self.subgrids.push(subgrid);
        Ok(())
    }

    /// 4-axis convenience form of [`Self::add_subgrid`] for collinear
    /// distributions (singleton kT axis at 0).
    pub fn add_subgrid_collinear(
        &mut self,
        nucleons: Vec<f64>,
        alphas: Vec<f64>,
        xs: Vec<f64>,
        q2s: Vec<f64>,
        values: Vec<f64>,
    ) -> Result<()> {
        self.add_subgrid(nucleons, alphas, vec![0.0], xs, q2s, values)
    }

    /// Declare the ordered flavor list shared by every subgrid.
    ///
    /// Rejects empty lists, duplicate ids, a count inconsistent with
    /// the subgrids' buffers, and repeated calls.
    pub fn set_flavors(&mut self, pids: &[i32]) -> Result<()> {
        if self.pids.is_some() {
            return Err(Error::InvalidState("flavors already set for this member"));
        }
        validate_flavors(pids, &self.subgrids)?;
        self.pids = Some(pids.to_vec());
        Ok(())
    }

    /// Seal the member. Fails if no subgrid was added or flavors were
    /// never declared.
    pub fn finish(self) -> Result<GridMember> {
        if self.subgrids.is_empty() {
            return Err(Error::EmptyMember);
        }
        let pids = self
            .pids
            .ok_or(Error::InvalidState("flavors must be set before finishing a member"))?;
        Ok(GridMember { pids, subgrids: self.subgrids })
    }
}

fn validate_flavors(pids: &[i32], subgrids: &[SubGrid]) -> Result<()> {
    if pids.is_empty() {
        return Err(Error::EmptyFlavors);
    }
    let mut seen = HashSet::with_capacity(pids.len());
    for &pid in pids {
        if !seen.insert(pid) {
            return Err(Error::DuplicateFlavor { pid });
        }
    }
    for subgrid in subgrids {
        if subgrid.flavor_blocks() != pids.len() {
            return Err(Error::ShapeMismatch {
                expected: subgrid.num_points() * pids.len(),
                actual: subgrid.values().len(),
            });
        }
    }
    Ok(())
}

/// A sealed member: ordered subgrids over disjoint kinematic regions
/// plus the flavor list defining the flavor axis of every buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct GridMember {
    pids: Vec<i32>,
    subgrids: Vec<SubGrid>,
}

impl GridMember {
    /// Reassemble a member from decoded parts, re-running the builder
    /// validations. Used by the container reader.
    pub(crate) fn from_parts(pids: Vec<i32>, subgrids: Vec<SubGrid>) -> Result<Self> {
        if subgrids.is_empty() {
            return Err(Error::EmptyMember);
        }
        validate_flavors(&pids, &subgrids)?;
        Ok(Self { pids, subgrids })
    }

    /// Ordered PDG ids of the tabulated flavors.
    pub fn pids(&self) -> &[i32] {
        &self.pids
    }

    /// Number of tabulated flavors.
    pub fn num_pids(&self) -> usize {
        self.pids.len()
    }

    /// The member's subgrids, in storage order.
    pub fn subgrids(&self) -> &[SubGrid] {
        &self.subgrids
    }

    /// Number of subgrids.
    pub fn num_subgrids(&self) -> usize {
        self.subgrids.len()
    }

    /// Position of `pid` in the flavor list.
    pub fn pid_index(&self, pid: i32) -> Option<usize> {
        self.pids.iter().position(|&p| p == pid)
    }

    /// Index of the first subgrid containing the canonical 5-point.
    pub fn find_subgrid(&self, point: &[f64; 5]) -> Option<usize> {
        self.subgrids.iter().position(|sg| sg.contains(point))
    }

    /// Range of one axis merged across all subgrids.
    pub fn range(&self, kind: AxisKind) -> ParamRange {
        let mut range = self.subgrids[0].range(kind);
        for subgrid in &self.subgrids[1..] {
            range = range.merge(&subgrid.range(kind));
        }
        range
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(n: usize) -> Vec<f64> {
        (0..n).map(|i| i as f64).collect()
    }

    fn one_subgrid(builder: &mut GridMemberBuilder) {
        builder
            .add_subgrid_collinear(
                vec![1.0],
                vec![0.118],
                vec![0.01, 0.1, 0.5],
                vec![2.0, 10.0],
                buffer(18),
            )
            .unwrap();
    }

    #[test]
    fn builder_happy_path() {
        let mut b = GridMemberBuilder::new();
        one_subgrid(&mut b);
        b.set_flavors(&[21, 1, 2]).unwrap();
        let member = b.finish().unwrap();
        assert_eq!(member.num_pids(), 3);
        assert_eq!(member.num_subgrids(), 1);
        assert_eq!(member.pid_index(1), Some(1));
    }

    #[test]
    fn add_after_flavors_is_invalid_state() {
        let mut b = GridMemberBuilder::new();
        one_subgrid(&mut b);
        b.set_flavors(&[21, 1, 2]).unwrap();
        let err = b
            .add_subgrid_collinear(
                vec![1.0],
                vec![0.118],
                vec![0.5, 0.9],
                vec![2.0, 10.0],
                buffer(12),
            )
            .unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn set_flavors_twice_is_invalid_state() {
        let mut b = GridMemberBuilder::new();
        one_subgrid(&mut b);
        b.set_flavors(&[21, 1, 2]).unwrap();
        assert!(matches!(b.set_flavors(&[21, 1, 2]), Err(Error::InvalidState(_))));
    }

    #[test]
    fn duplicate_and_empty_flavors_rejected() {
        let mut b = GridMemberBuilder::new();
        one_subgrid(&mut b);
        assert!(matches!(
            b.set_flavors(&[21, 1, 21]),
            Err(Error::DuplicateFlavor { pid: 21 })
        ));
        assert!(matches!(b.set_flavors(&[]), Err(Error::EmptyFlavors)));
        // Builder still usable after rejected calls.
        b.set_flavors(&[21, 1, 2]).unwrap();
    }

    #[test]
    fn flavor_count_must_match_buffers() {
        let mut b = GridMemberBuilder::new();
        one_subgrid(&mut b); // implies 3 flavors
        assert!(matches!(b.set_flavors(&[21, 1]), Err(Error::ShapeMismatch { .. })));
    }

    #[test]
    fn inconsistent_subgrid_flavor_blocks_rejected() {
        let mut b = GridMemberBuilder::new();
        one_subgrid(&mut b); // 3 flavor blocks
        let err = b
            .add_subgrid_collinear(
                vec![1.0],
                vec![0.118],
                vec![0.5, 0.9],
                vec![2.0, 10.0],
                buffer(8), // 4 points → 2 flavor blocks
            )
            .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn finish_requires_subgrids_and_flavors() {
        assert!(matches!(GridMemberBuilder::new().finish(), Err(Error::EmptyMember)));

        let mut b = GridMemberBuilder::new();
        one_subgrid(&mut b);
        assert!(matches!(b.finish(), Err(Error::InvalidState(_))));
    }

    #[test]
    fn merged_range_spans_subgrids() {
        let mut b = GridMemberBuilder::new();
        b.add_subgrid_collinear(
            vec![1.0],
            vec![0.118],
            vec![0.01, 0.1],
            vec![2.0, 10.0],
            buffer(8),
        )
        .unwrap();
        b.add_subgrid_collinear(
            vec![1.0],
            vec![0.118],
            vec![0.1, 0.9],
            vec![10.0, 100.0],
            buffer(8),
        )
        .unwrap();
        b.set_flavors(&[21, 1]).unwrap();
        let member = b.finish().unwrap();

        let x = member.range(AxisKind::X);
        assert_eq!((x.min, x.max), (0.01, 0.9));
        let q2 = member.range(AxisKind::Q2);
        assert_eq!((q2.min, q2.max), (2.0, 100.0));
        assert_eq!(member.find_subgrid(&[1.0, 0.118, 0.0, 0.05, 5.0]), Some(0));
        assert_eq!(member.find_subgrid(&[1.0, 0.118, 0.0, 0.5, 50.0]), Some(1));
        assert_eq!(member.find_subgrid(&[1.0, 0.118, 0.0, 0.5, 5.0]), None);
    }
}
