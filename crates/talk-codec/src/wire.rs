//! Big-endian primitives shared by every layout.
//!
//! ```text
//! int32 / int64     big-endian two's complement
//! float32           IEEE-754, big-endian
//! blob              int32 length, then that many bytes
//! text              uint16 byte length, then UTF-8
//! ```

use bytes::{Buf, BufMut};

use crate::error::{CodecError, CodecResult};

/// Longest text field the 16-bit length prefix can describe.
pub const MAX_TEXT_BYTES: usize = u16::MAX as usize;

/// Largest blob length or element count an `int32` prefix can describe.
pub const MAX_LENGTH: usize = i32::MAX as usize;

/// Append-only buffer for encoding.
#[derive(Debug, Default)]
pub struct WireWriter {
    buf: Vec<u8>,
}

impl WireWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn put_i32(&mut self, value: i32) {
        self.buf.put_i32(value);
    }

    pub fn put_i64(&mut self, value: i64) {
        self.buf.put_i64(value);
    }

    pub fn put_f32(&mut self, value: f32) {
        self.buf.put_f32(value);
    }

    pub fn put_raw(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    /// Write an `int32` element count.
    pub fn put_count(&mut self, field: &'static str, count: usize) -> CodecResult<()> {
        let count = to_i32(count).ok_or(CodecError::TooManyEntries {
            field,
            count,
            max: MAX_LENGTH,
        })?;
        self.put_i32(count);
        Ok(())
    }

    /// Write an `int32` length followed by the bytes.
    pub fn put_blob(&mut self, field: &'static str, bytes: &[u8]) -> CodecResult<()> {
        let len = to_i32(bytes.len()).ok_or(CodecError::FieldTooLong {
            field,
            len: bytes.len(),
            max: MAX_LENGTH,
        })?;
        self.put_i32(len);
        self.put_raw(bytes);
        Ok(())
    }

    /// Write a `uint16` byte length followed by UTF-8.
    pub fn put_text(&mut self, field: &'static str, text: &str) -> CodecResult<()> {
        let len = u16::try_from(text.len()).map_err(|_| CodecError::FieldTooLong {
            field,
            len: text.len(),
            max: MAX_TEXT_BYTES,
        })?;
        self.buf.put_u16(len);
        self.put_raw(text.as_bytes());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

fn to_i32(n: usize) -> Option<i32> {
    i32::try_from(n).ok()
}

/// Bounds-checked cursor for decoding.
///
/// Every read checks the remaining input first, so a short or lying stream
/// surfaces as [`CodecError::Malformed`] instead of a panic or an oversized
/// allocation.
#[derive(Debug)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    total: usize,
}

impl<'a> WireReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            buf: data,
            total: data.len(),
        }
    }

    /// Bytes consumed so far.
    pub fn offset(&self) -> usize {
        self.total - self.buf.remaining()
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    pub fn is_exhausted(&self) -> bool {
        !self.buf.has_remaining()
    }

    fn ensure(&self, needed: usize, what: &str) -> CodecResult<()> {
        if self.buf.remaining() < needed {
            return Err(CodecError::malformed(
                self.offset(),
                format!(
                    "unexpected end of stream reading {what}: need {needed} bytes, have {}",
                    self.buf.remaining()
                ),
            ));
        }
        Ok(())
    }

    pub fn read_i32(&mut self, what: &str) -> CodecResult<i32> {
        self.ensure(4, what)?;
        Ok(self.buf.get_i32())
    }

    pub fn read_i64(&mut self, what: &str) -> CodecResult<i64> {
        self.ensure(8, what)?;
        Ok(self.buf.get_i64())
    }

    pub fn read_f32(&mut self, what: &str) -> CodecResult<f32> {
        self.ensure(4, what)?;
        Ok(self.buf.get_f32())
    }

    pub fn read_array<const N: usize>(&mut self, what: &str) -> CodecResult<[u8; N]> {
        self.ensure(N, what)?;
        let mut out = [0u8; N];
        self.buf.copy_to_slice(&mut out);
        Ok(out)
    }

    /// Borrow the next `len` bytes.
    pub fn read_raw(&mut self, len: usize, what: &str) -> CodecResult<&'a [u8]> {
        self.ensure(len, what)?;
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    /// Read an `int32` length prefix and validate it against the input left.
    pub fn read_len(&mut self, what: &str) -> CodecResult<usize> {
        let at = self.offset();
        let len = self.read_i32(what)?;
        let len = usize::try_from(len).map_err(|_| {
            CodecError::malformed(at, format!("negative length {len} for {what}"))
        })?;
        if len > self.buf.remaining() {
            return Err(CodecError::malformed(
                at,
                format!(
                    "length {len} for {what} exceeds the {} bytes remaining",
                    self.buf.remaining()
                ),
            ));
        }
        Ok(len)
    }

    /// Read an `int32` element count whose entries each occupy at least
    /// `min_entry_bytes`, rejecting counts the remaining input cannot hold.
    pub fn read_count(&mut self, what: &str, min_entry_bytes: usize) -> CodecResult<usize> {
        let at = self.offset();
        let count = self.read_i32(what)?;
        let count = usize::try_from(count).map_err(|_| {
            CodecError::malformed(at, format!("negative count {count} for {what}"))
        })?;
        let needed = count.saturating_mul(min_entry_bytes);
        if needed > self.buf.remaining() {
            return Err(CodecError::malformed(
                at,
                format!(
                    "{count} {what} cannot fit in the {} bytes remaining",
                    self.buf.remaining()
                ),
            ));
        }
        Ok(count)
    }

    /// Read an `int32`-prefixed blob.
    pub fn read_blob(&mut self, what: &str) -> CodecResult<Vec<u8>> {
        let len = self.read_len(what)?;
        Ok(self.read_raw(len, what)?.to_vec())
    }

    /// Read a `uint16`-prefixed UTF-8 string.
    pub fn read_text(&mut self, what: &str) -> CodecResult<String> {
        self.ensure(2, what)?;
        let len = self.buf.get_u16() as usize;
        let at = self.offset();
        let raw = self.read_raw(len, what)?;
        String::from_utf8(raw.to_vec())
            .map_err(|e| CodecError::malformed(at, format!("{what} is not valid UTF-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_are_big_endian() {
        let mut w = WireWriter::new();
        w.put_i32(1);
        w.put_i64(-2);
        assert_eq!(&w.as_slice()[..4], &[0, 0, 0, 1]);
        assert_eq!(&w.as_slice()[4..], &[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFE]);
    }

    #[test]
    fn float_is_ieee754_big_endian() {
        let mut w = WireWriter::new();
        w.put_f32(1.0);
        assert_eq!(w.as_slice(), &[0x3F, 0x80, 0x00, 0x00]);
    }

    #[test]
    fn text_uses_u16_prefix() {
        let mut w = WireWriter::new();
        w.put_text("name", "hé").unwrap();
        assert_eq!(w.as_slice(), &[0, 3, b'h', 0xC3, 0xA9]);
        let mut r = WireReader::new(w.as_slice());
        assert_eq!(r.read_text("name").unwrap(), "hé");
        assert!(r.is_exhausted());
    }

    #[test]
    fn oversized_text_is_rejected() {
        let long = "x".repeat(MAX_TEXT_BYTES + 1);
        let err = WireWriter::new().put_text("tag", &long).unwrap_err();
        assert!(matches!(err, CodecError::FieldTooLong { field: "tag", .. }));
    }

    #[test]
    fn short_read_reports_offset() {
        let mut r = WireReader::new(&[0, 0, 0, 1, 0xAA]);
        assert_eq!(r.read_i32("tag").unwrap(), 1);
        let err = r.read_i32("count").unwrap_err();
        assert!(matches!(err, CodecError::Malformed { offset: 4, .. }));
    }

    #[test]
    fn negative_length_is_malformed() {
        let data = (-5i32).to_be_bytes();
        let err = WireReader::new(&data).read_len("clip").unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn length_beyond_input_is_malformed() {
        let mut data = 100i32.to_be_bytes().to_vec();
        data.extend_from_slice(&[1, 2, 3]);
        let err = WireReader::new(&data).read_len("clip").unwrap_err();
        assert!(matches!(err, CodecError::Malformed { offset: 0, .. }));
    }

    #[test]
    fn absurd_count_is_malformed_before_allocation() {
        let data = i32::MAX.to_be_bytes();
        let err = WireReader::new(&data).read_count("clips", 8).unwrap_err();
        assert!(err.is_malformed());
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let data = [0, 2, 0xC3, 0x28];
        let err = WireReader::new(&data).read_text("name").unwrap_err();
        assert!(matches!(err, CodecError::Malformed { offset: 2, .. }));
    }

    #[test]
    fn blob_roundtrip_borrows_exactly() {
        let mut w = WireWriter::new();
        w.put_blob("image", &[9, 8, 7]).unwrap();
        w.put_i32(42);
        let mut r = WireReader::new(w.as_slice());
        assert_eq!(r.read_blob("image").unwrap(), vec![9, 8, 7]);
        assert_eq!(r.read_i32("after").unwrap(), 42);
        assert_eq!(r.offset(), 11);
    }
}
