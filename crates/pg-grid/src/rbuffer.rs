//! Binary reader for the container's little-endian payload encoding.

use pg_core::{Error, Result};

/// A cursor-based reader over a byte slice, using the container's
/// little-endian conventions.
pub struct RBuffer<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> RBuffer<'a> {
    /// Create a new reader over the given bytes.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current read position.
    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Remaining bytes from current position.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Read a sub-slice of `n` bytes, advancing the cursor.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        self.ensure(n)?;
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    /// Read a little-endian u32.
    pub fn read_u32(&mut self) -> Result<u32> {
        let b = self.read_bytes(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a little-endian u64.
    pub fn read_u64(&mut self) -> Result<u64> {
        let b = self.read_bytes(8)?;
        Ok(u64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
    }

    /// Read a little-endian i32.
    pub fn read_i32(&mut self) -> Result<i32> {
        let b = self.read_bytes(4)?;
        Ok(i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Read a little-endian f64.
    pub fn read_f64(&mut self) -> Result<f64> {
        let b = self.read_bytes(8)?;
        Ok(f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
    }

    /// Read a u32 length prefix followed by that many f64 values.
    pub fn read_array_f64(&mut self) -> Result<Vec<f64>> {
        let n = self.read_u32()? as usize;
        self.read_f64_exact(n)
    }

    /// Read a u32 length prefix followed by that many i32 values.
    pub fn read_array_i32(&mut self) -> Result<Vec<i32>> {
        let n = self.read_u32()? as usize;
        // The underflow check precedes the allocation, so a corrupt
        // length prefix cannot request an absurd buffer.
        self.ensure(n.saturating_mul(4))?;
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.read_i32()?);
        }
        Ok(out)
    }

    /// Read `n` f64 values without a length prefix.
    pub fn read_f64_exact(&mut self, n: usize) -> Result<Vec<f64>> {
        self.ensure(n.saturating_mul(8))?;
        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            out.push(self.read_f64()?);
        }
        Ok(out)
    }

    // ── internal ────────────────────────────────────────────────

    fn ensure(&self, n: usize) -> Result<()> {
        if n > self.data.len().saturating_sub(self.pos) {
            return Err(Error::Corrupt(format!(
                "payload truncated at offset {}: need {} bytes, have {}",
                self.pos,
                n,
                self.data.len().saturating_sub(self.pos)
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncated_read_reports_corrupt() {
        let data = [0x01, 0x02, 0x03];
        let mut r = RBuffer::new(&data);
        let err = r.read_u32().unwrap_err();
        assert!(matches!(err, Error::Corrupt(_)));
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn array_length_prefix_is_honored() {
        // prefix says 2 doubles, payload has only 1 → corrupt.
        let mut data = Vec::new();
        data.extend_from_slice(&2u32.to_le_bytes());
        data.extend_from_slice(&1.0f64.to_le_bytes());
        let mut r = RBuffer::new(&data);
        assert!(matches!(r.read_array_f64(), Err(Error::Corrupt(_))));
    }
}
