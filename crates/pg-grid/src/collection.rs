//! Ordered accumulation of sealed members ahead of compression.

use std::path::Path;

use pg_core::{MetaData, Result};

use crate::member::GridMember;
use crate::writer;

/// Accumulates the members of one set, in order, sharing one metadata
/// header. Mutable only while building; consumed by [`Self::compress`].
#[derive(Debug, Default)]
pub struct GridCollection {
    members: Vec<GridMember>,
}

impl GridCollection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sealed member. Order is preserved into the container.
    pub fn push(&mut self, member: GridMember) {
        self.members.push(member);
    }

    /// Number of accumulated members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the collection holds no members.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// The accumulated members, in order.
    pub fn members(&self) -> &[GridMember] {
        &self.members
    }

    /// Serialize metadata plus every member, apply one lossless
    /// compression pass, and atomically publish the container at
    /// `path`.
    ///
    /// Fails with `EmptyCollection` on an empty collection,
    /// `MemberCountMismatch` when `meta.num_members` disagrees with
    /// [`Self::len`], and `Io` on filesystem errors. `meta` is
    /// read-only to this call.
    pub fn compress<P: AsRef<Path>>(self, meta: &MetaData, path: P) -> Result<()> {
        writer::write_container(&self.members, meta, path.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::GridMemberBuilder;
    use pg_core::Error;

    fn member() -> GridMember {
        let mut b = GridMemberBuilder::new();
        b.add_subgrid_collinear(
            vec![1.0],
            vec![0.118],
            vec![0.01, 0.5],
            vec![2.0, 10.0],
            (0..8).map(|i| i as f64).collect(),
        )
        .unwrap();
        b.set_flavors(&[21, 1]).unwrap();
        b.finish().unwrap()
    }

    #[test]
    fn push_preserves_order_and_len() {
        let mut c = GridCollection::new();
        assert!(c.is_empty());
        c.push(member());
        c.push(member());
        assert_eq!(c.len(), 2);
        assert_eq!(c.members().len(), 2);
    }

    #[test]
    fn compress_empty_collection_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = GridCollection::new()
            .compress(&MetaData::default(), dir.path().join("empty.pgrid"))
            .unwrap_err();
        assert!(matches!(err, Error::EmptyCollection));
    }

    #[test]
    fn compress_checks_declared_member_count() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = GridCollection::new();
        c.push(member());

        let meta = MetaData { num_members: 5, ..MetaData::default() };
        let err = c.compress(&meta, dir.path().join("set.pgrid")).unwrap_err();
        assert!(matches!(err, Error::MemberCountMismatch { declared: 5, actual: 1 }));
    }
}
