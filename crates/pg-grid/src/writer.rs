//! Container write path: serialize, compress once, publish atomically.

use std::io::Write;
use std::path::Path;

use lz4_flex::frame::FrameEncoder;
use tempfile::NamedTempFile;
use tracing::debug;

use pg_core::{Error, MetaData, Result};

use crate::format;
use crate::member::GridMember;

/// Serialize `members` behind `meta` into one LZ4 frame at `path`.
///
/// The container is assembled in a temp file next to the destination
/// and renamed into place, so a crash mid-write never leaves a
/// truncated container behind.
pub(crate) fn write_container(
    members: &[GridMember],
    meta: &MetaData,
    path: &Path,
) -> Result<()> {
    if members.is_empty() {
        return Err(Error::EmptyCollection);
    }
    if meta.num_members as usize != members.len() {
        return Err(Error::MemberCountMismatch {
            declared: meta.num_members,
            actual: members.len(),
        });
    }

    let meta_bytes = format::encode_metadata(meta)?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;

    let file = tmp.as_file_mut();
    file.write_all(&format::MAGIC)?;

    let mut encoder = FrameEncoder::new(file);
    encoder.write_all(&(meta_bytes.len() as u64).to_le_bytes())?;
    encoder.write_all(&meta_bytes)?;
    encoder.write_all(&(members.len() as u64).to_le_bytes())?;
    for member in members {
        let payload = format::encode_member(member);
        encoder.write_all(&(payload.len() as u64).to_le_bytes())?;
        encoder.write_all(&payload)?;
    }
    encoder.finish().map_err(frame_error)?;

    tmp.persist(path).map_err(|e| Error::Io(e.error))?;
    debug!(path = %path.display(), members = members.len(), "container written");
    Ok(())
}

fn frame_error(e: lz4_flex::frame::Error) -> Error {
    match e {
        lz4_flex::frame::Error::IoError(io) => Error::Io(io),
        other => Error::Corrupt(format!("lz4 frame: {other}")),
    }
}
