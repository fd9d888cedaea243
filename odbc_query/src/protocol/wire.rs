//! Little-endian primitives shared by every message.

use crate::error::{OdbcError, Result};

#[derive(Debug, Default)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    pub fn new() -> Self {
        Self { buf: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn write_u8(&mut self, v: u8) {
        self.buf.push(v);
    }

    pub fn write_bool(&mut self, v: bool) {
        self.buf.push(u8::from(v));
    }

    pub fn write_i32(&mut self, v: i32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_u32(&mut self, v: u32) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_i64(&mut self, v: i64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    pub fn write_f64(&mut self, v: f64) {
        self.buf.extend_from_slice(&v.to_le_bytes());
    }

    /// Length-prefixed byte string.
    pub fn write_bytes(&mut self, v: &[u8]) -> Result<()> {
        self.write_len(v.len())?;
        self.buf.extend_from_slice(v);
        Ok(())
    }

    pub fn write_str(&mut self, v: &str) -> Result<()> {
        self.write_bytes(v.as_bytes())
    }

    pub fn write_len(&mut self, len: usize) -> Result<()> {
        let len = u32::try_from(len)
            .map_err(|_| OdbcError::ValidationError(format!("Length {} exceeds u32", len)))?;
        self.write_u32(len);
        Ok(())
    }

    pub fn write_raw(&mut self, v: &[u8]) {
        self.buf.extend_from_slice(v);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[derive(Debug)]
pub struct WireReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    pub fn position(&self) -> usize {
        self.offset
    }

    pub fn read_exact(&mut self, n: usize, what: &str) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(OdbcError::Decode(format!(
                "Buffer truncated reading {}: need {} bytes, have {}",
                what,
                n,
                self.remaining()
            )));
        }
        let out = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(out)
    }

    fn read_array<const N: usize>(&mut self, what: &str) -> Result<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_exact(N, what)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_exact(1, "u8")?[0])
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(OdbcError::Decode(format!("Invalid bool byte: {}", other))),
        }
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.read_array("i32")?))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array("u32")?))
    }

    pub fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array("i64")?))
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array("f64")?))
    }

    pub fn read_len(&mut self) -> Result<usize> {
        Ok(self.read_u32()? as usize)
    }

    pub fn read_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_len()?;
        self.read_exact(len, "byte string")
    }

    pub fn read_string(&mut self) -> Result<String> {
        let bytes = self.read_bytes()?;
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|_| OdbcError::Decode("Invalid UTF-8 in string".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitives_are_little_endian() {
        let mut w = WireWriter::new();
        w.write_i32(1);
        w.write_u8(0xAB);
        assert_eq!(w.into_bytes(), vec![1, 0, 0, 0, 0xAB]);
    }

    #[test]
    fn test_reader_reads_what_writer_wrote() {
        let mut w = WireWriter::new();
        w.write_bool(true);
        w.write_i64(-5);
        w.write_str("PUBLIC").unwrap();
        w.write_f64(2.5);
        let bytes = w.into_bytes();

        let mut r = WireReader::new(&bytes);
        assert!(r.read_bool().unwrap());
        assert_eq!(r.read_i64().unwrap(), -5);
        assert_eq!(r.read_string().unwrap(), "PUBLIC");
        assert_eq!(r.read_f64().unwrap(), 2.5);
        assert!(r.is_exhausted());
    }

    #[test]
    fn test_reader_truncated() {
        let mut r = WireReader::new(&[1, 2]);
        let err = r.read_i32().unwrap_err();
        assert!(matches!(err, OdbcError::Decode(_)));
    }

    #[test]
    fn test_reader_string_length_past_end() {
        let mut w = WireWriter::new();
        w.write_u32(10);
        w.write_raw(b"abc");
        let bytes = w.into_bytes();

        let mut r = WireReader::new(&bytes);
        assert!(r.read_string().is_err());
    }

    #[test]
    fn test_reader_invalid_bool() {
        let mut r = WireReader::new(&[2]);
        assert!(r.read_bool().is_err());
    }

    #[test]
    fn test_reader_invalid_utf8() {
        let mut w = WireWriter::new();
        w.write_bytes(&[0xff, 0xfe]).unwrap();
        let bytes = w.into_bytes();
        assert!(WireReader::new(&bytes).read_string().is_err());
    }
}
