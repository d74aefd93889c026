//! Cursor over a pre-sized byte buffer for packed vertex records

/// Append-only little-endian writer over a buffer allocated once up front
///
/// The final length is known before packing starts, so the buffer never
/// reallocates; [`VertexWriter::finish`] checks the estimate was exact.
#[derive(Debug)]
pub struct VertexWriter {
    buf: Vec<u8>,
    expected: usize,
}

impl VertexWriter {
    /// Create a writer for exactly `len` bytes
    pub fn with_len(len: usize) -> Self {
        Self { buf: Vec::with_capacity(len), expected: len }
    }

    pub fn write_u16(&mut self, v: u16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i16(&mut self, v: i16) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Take the written bytes
    pub fn finish(self) -> Vec<u8> {
        debug_assert_eq!(
            self.buf.len(),
            self.expected,
            "vertex buffer size estimate was off"
        );
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_little_endian_fields() {
        let mut w = VertexWriter::with_len(9);
        w.write_i16(-2);
        w.write_u16(0x0102);
        w.write_u32(0xAABBCCDD);
        w.write_bytes(&[7]);
        assert_eq!(w.finish(), vec![0xFE, 0xFF, 0x02, 0x01, 0xDD, 0xCC, 0xBB, 0xAA, 7]);
    }

    #[test]
    fn test_empty_writer() {
        let w = VertexWriter::with_len(0);
        assert!(w.finish().is_empty());
    }
}
