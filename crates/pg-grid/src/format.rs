//! Logical layout of the persisted container.
//!
//! ```text
//! 8-byte magic "PGRIDv01"
//! one LZ4 frame of:
//!     u64 metadata_len | metadata JSON
//!     u64 member_count
//!     per member: u64 member_len | member payload
//! member payload:
//!     i32 pid array (u32 length prefix)
//!     u32 n_subgrids
//!     per subgrid:
//!         f64 array per axis, canonical order (A, alpha_s, kT, x, Q²)
//!         u64 n_values | f64 × n_values
//! ```
//!
//! Everything little-endian, doubles at full precision. The
//! `member_len` framing lets readers skip a member without parsing it.

use pg_core::{AxisKind, Error, MetaData, Result};

use crate::member::GridMember;
use crate::rbuffer::RBuffer;
use crate::subgrid::SubGrid;
use crate::wbuffer::WBuffer;

/// File magic ahead of the compressed frame.
pub(crate) const MAGIC: [u8; 8] = *b"PGRIDv01";

/// Serialize the metadata header block.
pub(crate) fn encode_metadata(meta: &MetaData) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(meta)?)
}

/// Deserialize the metadata header block.
pub(crate) fn decode_metadata(bytes: &[u8]) -> Result<MetaData> {
    serde_json::from_slice(bytes)
        .map_err(|e| Error::Corrupt(format!("metadata block is not valid JSON: {e}")))
}

/// Encode one sealed member into its container payload.
pub(crate) fn encode_member(member: &GridMember) -> Vec<u8> {
    let value_bytes: usize = member.subgrids().iter().map(|sg| sg.values().len() * 8).sum();
    let mut w = WBuffer::with_capacity(value_bytes + 256);

    w.write_array_i32(member.pids());
    w.write_u32(member.num_subgrids() as u32);
    for subgrid in member.subgrids() {
        for kind in AxisKind::ALL {
            w.write_array_f64(subgrid.axis(kind));
        }
        w.write_u64(subgrid.values().len() as u64);
        for &v in subgrid.values() {
            w.write_f64(v);
        }
    }
    w.into_bytes()
}

/// Decode one member payload, re-running the shape validations.
pub(crate) fn decode_member(bytes: &[u8]) -> Result<GridMember> {
    let mut r = RBuffer::new(bytes);

    let pids = r.read_array_i32()?;
    let n_subgrids = r.read_u32()? as usize;
    let mut subgrids = Vec::with_capacity(n_subgrids);
    for _ in 0..n_subgrids {
        let nucleons = r.read_array_f64()?;
        let alphas = r.read_array_f64()?;
        let kts = r.read_array_f64()?;
        let xs = r.read_array_f64()?;
        let q2s = r.read_array_f64()?;
        let n_values = r.read_u64()? as usize;
        let values = r.read_f64_exact(n_values)?;

        let subgrid = SubGrid::new(nucleons, alphas, kts, xs, q2s, values)
            .map_err(|e| Error::Corrupt(format!("invalid subgrid payload: {e}")))?;
        subgrids.push(subgrid);
    }
    if r.remaining() != 0 {
        return Err(Error::Corrupt(format!(
            "{} trailing bytes after member payload",
            r.remaining()
        )));
    }

    GridMember::from_parts(pids, subgrids)
        .map_err(|e| Error::Corrupt(format!("invalid member payload: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::GridMemberBuilder;

    fn member() -> GridMember {
        let mut b = GridMemberBuilder::new();
        b.add_subgrid(
            vec![1.0],
            vec![0.118],
            vec![0.0, 1.5],
            vec![0.01, 0.1, 0.5],
            vec![2.0, 10.0],
            (0..24).map(|i| i as f64 * 0.25).collect(),
        )
        .unwrap();
        b.add_subgrid(
            vec![1.0],
            vec![0.118],
            vec![0.0, 1.5],
            vec![0.5, 0.9],
            vec![10.0, 90.0],
            (0..16).map(|i| -(i as f64)).collect(),
        )
        .unwrap();
        b.set_flavors(&[21, 2]).unwrap();
        b.finish().unwrap()
    }

    #[test]
    fn member_payload_round_trip() {
        let original = member();
        let bytes = encode_member(&original);
        let decoded = decode_member(&bytes).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn truncated_member_payload_is_corrupt() {
        let bytes = encode_member(&member());
        let err = decode_member(&bytes[..bytes.len() - 3]).unwrap_err();
        assert!(matches!(err, Error::Corrupt(_)));
    }

    #[test]
    fn trailing_bytes_are_corrupt() {
        let mut bytes = encode_member(&member());
        bytes.push(0);
        assert!(matches!(decode_member(&bytes), Err(Error::Corrupt(_))));
    }

    #[test]
    fn metadata_block_round_trip() {
        let meta = MetaData {
            set_desc: "codec".to_string(),
            num_members: 2,
            flavors: vec![21, 2],
            ..MetaData::default()
        };
        let bytes = encode_metadata(&meta).unwrap();
        assert_eq!(decode_metadata(&bytes).unwrap(), meta);
        assert!(matches!(decode_metadata(b"not json"), Err(Error::Corrupt(_))));
    }
}
