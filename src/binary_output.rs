use crate::error::Result;
use crate::Error;
use bytes::{BufMut, BytesMut};
use flate2::write::DeflateEncoder;
use flate2::Compression;
use std::io::Write;

/// Primitive, fixed big-endian byte output. `write_var_i32`/`write_var_u32` are the only
/// variable-length encodings; everything else is a fixed number of bytes.
pub trait BinaryOutput {
    fn write_u8(&mut self, value: u8);
    fn write_bytes(&mut self, bytes: &[u8]);

    fn write_i8(&mut self, value: i8) {
        self.write_u8(value as u8);
    }

    fn write_u16(&mut self, value: u16) {
        self.write_bytes(&value.to_be_bytes())
    }

    fn write_i16(&mut self, value: i16) {
        self.write_bytes(&value.to_be_bytes())
    }

    fn write_u32(&mut self, value: u32) {
        self.write_bytes(&value.to_be_bytes())
    }

    fn write_i32(&mut self, value: i32) {
        self.write_bytes(&value.to_be_bytes())
    }

    fn write_u64(&mut self, value: u64) {
        self.write_bytes(&value.to_be_bytes())
    }

    fn write_i64(&mut self, value: i64) {
        self.write_bytes(&value.to_be_bytes())
    }

    fn write_u128(&mut self, value: u128) {
        self.write_bytes(&value.to_be_bytes())
    }

    fn write_i128(&mut self, value: i128) {
        self.write_bytes(&value.to_be_bytes())
    }

    fn write_f32(&mut self, value: f32) {
        self.write_bytes(&value.to_be_bytes())
    }

    fn write_f64(&mut self, value: f64) {
        self.write_bytes(&value.to_be_bytes())
    }

    /// Unsigned var-int, no zigzag: base-128 little-endian groups of 7 bits, high bit set on
    /// every group but the last. Used for lengths and other values known to be non-negative.
    fn write_var_u32(&mut self, value: u32) {
        if value >> 7 == 0 {
            self.write_u8(value as u8);
        } else if value >> 14 == 0 {
            let buf = [((value & 0x7F) | 0x80) as u8, (value >> 7) as u8];
            self.write_bytes(&buf);
        } else if value >> 21 == 0 {
            let buf = [
                ((value & 0x7F) | 0x80) as u8,
                ((value >> 7) | 0x80) as u8,
                (value >> 14) as u8,
            ];
            self.write_bytes(&buf);
        } else if value >> 28 == 0 {
            let buf = [
                ((value & 0x7F) | 0x80) as u8,
                ((value >> 7) | 0x80) as u8,
                ((value >> 14) | 0x80) as u8,
                (value >> 21) as u8,
            ];
            self.write_bytes(&buf);
        } else {
            let buf = [
                ((value & 0x7F) | 0x80) as u8,
                ((value >> 7) | 0x80) as u8,
                ((value >> 14) | 0x80) as u8,
                ((value >> 21) | 0x80) as u8,
                (value >> 28) as u8,
            ];
            self.write_bytes(&buf);
        }
    }

    /// Signed var-int with zigzag: `(v << 1) ^ (v >> 31)`, then encoded as `write_var_u32`.
    fn write_var_i32(&mut self, value: i32) {
        let adjusted = ((value << 1) ^ (value >> 31)) as u32;
        self.write_var_u32(adjusted);
    }

    /// Empty input writes `varint(0)` and nothing else. Otherwise: uncompressed length,
    /// compressed length, then the deflated bytes.
    fn write_compressed_byte_array(&mut self, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            self.write_var_u32(0);
            return Ok(());
        }
        let mut deflater = DeflateEncoder::new(Vec::new(), Compression::default());
        deflater
            .write_all(data)
            .map_err(|err| Error::CompressionFailure(format!("{err}")))?;
        let compressed = deflater
            .finish()
            .map_err(|err| Error::CompressionFailure(format!("{err}")))?;
        self.write_var_u32(data.len().try_into()?);
        self.write_var_u32(compressed.len().try_into()?);
        self.write_bytes(&compressed);
        Ok(())
    }
}

impl BinaryOutput for BytesMut {
    fn write_u8(&mut self, value: u8) {
        self.put_u8(value);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.put_slice(bytes);
    }
}

impl BinaryOutput for Vec<u8> {
    fn write_u8(&mut self, value: u8) {
        self.push(value);
    }

    fn write_bytes(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn var_u32_single_byte() {
        let mut buf = Vec::new();
        buf.write_var_u32(100);
        assert_eq!(buf, vec![0x64]);
    }

    #[test]
    fn int32_is_big_endian() {
        let mut buf = Vec::new();
        buf.write_i32(100);
        assert_eq!(buf, vec![0x00, 0x00, 0x00, 0x64]);
    }

    #[test]
    fn empty_compressed_array_is_one_byte() {
        let mut buf = Vec::new();
        buf.write_compressed_byte_array(&[]).unwrap();
        assert_eq!(buf, vec![0x00]);
    }
}
