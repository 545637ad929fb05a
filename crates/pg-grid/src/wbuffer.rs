//! Binary writer for the container's little-endian payload encoding.

/// An append-only byte buffer using the container's little-endian
/// conventions. The mirror of [`crate::rbuffer::RBuffer`].
#[derive(Debug, Default)]
pub struct WBuffer {
    data: Vec<u8>,
}

impl WBuffer {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a writer with preallocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self { data: Vec::with_capacity(capacity) }
    }

    /// Bytes written so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consume the writer, yielding the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Append raw bytes.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.data.extend_from_slice(bytes);
    }

    /// Append a little-endian u32.
    pub fn write_u32(&mut self, v: u32) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    /// Append a little-endian u64.
    pub fn write_u64(&mut self, v: u64) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    /// Append a little-endian i32.
    pub fn write_i32(&mut self, v: i32) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    /// Append a little-endian f64 at full precision.
    pub fn write_f64(&mut self, v: f64) {
        self.data.extend_from_slice(&v.to_le_bytes());
    }

    /// Append a u32 length prefix followed by each value as f64.
    pub fn write_array_f64(&mut self, values: &[f64]) {
        self.write_u32(values.len() as u32);
        for &v in values {
            self.write_f64(v);
        }
    }

    /// Append a u32 length prefix followed by each value as i32.
    pub fn write_array_i32(&mut self, values: &[i32]) {
        self.write_u32(values.len() as u32);
        for &v in values {
            self.write_i32(v);
        }
    }
}
