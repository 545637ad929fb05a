//! Container read path.
//!
//! One streaming core backs both access styles: the eager loaders pull
//! whole members (skipping earlier frames without parsing them), while
//! [`LazyMemberIter`] hands out one member per `next()` call so memory
//! stays bounded by a single member regardless of set size.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;
use std::sync::Arc;

use lz4_flex::frame::FrameDecoder;
use tracing::debug;

use pg_core::{Error, MetaData, Result};

use crate::format;
use crate::member::GridMember;
use crate::query::PdfMember;

/// Upper bound on the metadata block; anything larger is a corrupt
/// length prefix, not a real header.
const MAX_METADATA_BYTES: u64 = 64 << 20;

/// Extract the metadata header without decoding any member.
pub fn read_metadata<P: AsRef<Path>>(path: P) -> Result<MetaData> {
    let stream = ContainerStream::open(path.as_ref())?;
    Ok(stream.meta().as_ref().clone())
}

/// Forward-only decoding cursor over one container.
///
/// Owns the single decompression stream; dropping it closes the file.
#[derive(Debug)]
pub(crate) struct ContainerStream {
    decoder: FrameDecoder<BufReader<File>>,
    meta: Arc<MetaData>,
    total: u64,
    remaining: u64,
}

impl ContainerStream {
    /// Open a container, check its magic, and decode the header block.
    pub(crate) fn open(path: &Path) -> Result<Self> {
        let mut file = File::open(path)?;

        let mut magic = [0u8; 8];
        file.read_exact(&mut magic)
            .map_err(|_| Error::Corrupt("file too short to hold a container magic".into()))?;
        if magic != format::MAGIC {
            return Err(Error::Corrupt("unrecognized container magic".into()));
        }

        let mut decoder = FrameDecoder::new(BufReader::new(file));
        let meta_len = read_u64(&mut decoder)?;
        if meta_len > MAX_METADATA_BYTES {
            return Err(Error::Corrupt(format!("metadata block claims {meta_len} bytes")));
        }
        let mut meta_bytes = vec![0u8; meta_len as usize];
        read_exact(&mut decoder, &mut meta_bytes)?;
        let meta = format::decode_metadata(&meta_bytes)?;

        let total = read_u64(&mut decoder)?;
        debug!(path = %path.display(), members = total, "container opened");

        Ok(Self { decoder, meta: Arc::new(meta), total, remaining: total })
    }

    pub(crate) fn meta(&self) -> &Arc<MetaData> {
        &self.meta
    }

    /// Members declared by the container.
    pub(crate) fn total(&self) -> u64 {
        self.total
    }

    /// Members not yet consumed.
    pub(crate) fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Stop yielding members (after a mid-stream error).
    pub(crate) fn exhaust(&mut self) {
        self.remaining = 0;
    }

    /// Read the next member's raw payload, or `None` once exhausted.
    pub(crate) fn next_payload(&mut self) -> Result<Option<Vec<u8>>> {
        if self.remaining == 0 {
            return Ok(None);
        }
        let len = read_u64(&mut self.decoder)?;
        // Grow with the stream instead of trusting the length prefix, so
        // a corrupt prefix surfaces as truncation, not a giant allocation.
        let mut payload = Vec::new();
        let copied = (&mut self.decoder)
            .take(len)
            .read_to_end(&mut payload)
            .map_err(stream_error)?;
        if copied as u64 != len {
            return Err(Error::Corrupt(format!(
                "member frame claims {len} bytes but only {copied} remain"
            )));
        }
        self.remaining -= 1;
        Ok(Some(payload))
    }

    /// Decode the next member, or `None` once exhausted.
    pub(crate) fn next_member(&mut self) -> Result<Option<GridMember>> {
        match self.next_payload()? {
            Some(payload) => Ok(Some(format::decode_member(&payload)?)),
            None => Ok(None),
        }
    }

    /// Advance past one member without parsing it.
    pub(crate) fn skip_member(&mut self) -> Result<()> {
        if self.remaining == 0 {
            return Err(Error::Corrupt("skip past the last member".into()));
        }
        let len = read_u64(&mut self.decoder)?;
        let copied = std::io::copy(&mut (&mut self.decoder).take(len), &mut std::io::sink())
            .map_err(stream_error)?;
        if copied != len {
            return Err(Error::Corrupt(format!(
                "member frame claims {len} bytes but only {copied} remain"
            )));
        }
        self.remaining -= 1;
        Ok(())
    }
}

fn read_u64<R: Read>(reader: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    read_exact(reader, &mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

fn read_exact<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<()> {
    reader.read_exact(buf).map_err(stream_error)
}

/// Decompression-stream read failures are corruption of the container,
/// not environmental I/O problems.
fn stream_error(e: std::io::Error) -> Error {
    match e.kind() {
        ErrorKind::UnexpectedEof => Error::Corrupt("container stream truncated".into()),
        ErrorKind::InvalidData | ErrorKind::Other => {
            Error::Corrupt(format!("compressed stream unreadable: {e}"))
        }
        _ => Error::Io(e),
    }
}

/// Forward-only, one-member-at-a-time reader over a container.
///
/// State machine: `open` → repeated [`next`](Iterator::next) yielding
/// one decoded member per call → permanent `None` once every member
/// has been produced. A failed `open` is an explicit error value,
/// distinct from a container with zero members. The iterator owns
/// exactly one decompression stream; dropping the iterator closes it.
///
/// Strictly sequential. Parallel consumption needs independent
/// iterators or an eagerly loaded collection.
#[derive(Debug)]
pub struct LazyMemberIter {
    stream: ContainerStream,
}

impl LazyMemberIter {
    /// Open `path` for lazy iteration.
    ///
    /// Fails with [`Error::Corrupt`] when the file is not a recognized
    /// container and [`Error::Io`] when it cannot be read at all.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self { stream: ContainerStream::open(path.as_ref())? })
    }

    /// Shared metadata header of the set.
    pub fn metadata(&self) -> &Arc<MetaData> {
        self.stream.meta()
    }

    /// Members not yet yielded.
    pub fn remaining(&self) -> usize {
        self.stream.remaining() as usize
    }
}

impl Iterator for LazyMemberIter {
    type Item = Result<PdfMember>;

    fn next(&mut self) -> Option<Self::Item> {
        let meta = Arc::clone(self.stream.meta());
        match self.stream.next_member() {
            Ok(Some(member)) => Some(PdfMember::new(meta, member)),
            Ok(None) => None,
            Err(e) => {
                // A mid-stream error is not recoverable on a forward-only
                // stream; yield it once and become exhausted.
                self.stream.exhaust();
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.remaining();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LazyMemberIter {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn open_missing_file_is_io() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContainerStream::open(&dir.path().join("nope.pgrid")).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn open_non_container_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.txt");
        let mut f = File::create(&path).unwrap();
        f.write_all(b"this is not a grid container at all").unwrap();
        drop(f);

        let err = ContainerStream::open(&path).unwrap_err();
        assert!(matches!(err, Error::Corrupt(_)));
    }

    #[test]
    fn open_short_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.pgrid");
        std::fs::write(&path, b"PG").unwrap();
        assert!(matches!(ContainerStream::open(&path), Err(Error::Corrupt(_))));
    }

    #[test]
    fn absurd_member_length_is_corrupt_not_fatal() {
        use lz4_flex::frame::FrameEncoder;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("liar.pgrid");

        // Valid header, one declared member whose frame claims far more
        // bytes than the stream holds.
        let meta_bytes = serde_json::to_vec(&MetaData::default()).unwrap();
        let mut file = File::create(&path).unwrap();
        file.write_all(&format::MAGIC).unwrap();
        let mut encoder = FrameEncoder::new(&mut file);
        encoder.write_all(&(meta_bytes.len() as u64).to_le_bytes()).unwrap();
        encoder.write_all(&meta_bytes).unwrap();
        encoder.write_all(&1u64.to_le_bytes()).unwrap();
        encoder.write_all(&u64::MAX.to_le_bytes()).unwrap();
        encoder.finish().unwrap();
        drop(file);

        let mut stream = ContainerStream::open(&path).unwrap();
        assert!(matches!(stream.next_payload(), Err(Error::Corrupt(_))));
    }

    #[test]
    fn magic_followed_by_garbage_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("garbage.pgrid");
        let mut bytes = format::MAGIC.to_vec();
        bytes.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef, 0x00, 0x11, 0x22, 0x33]);
        std::fs::write(&path, bytes).unwrap();
        assert!(matches!(ContainerStream::open(&path), Err(Error::Corrupt(_))));
    }
}
