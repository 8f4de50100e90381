//! # Primitive Codec
//!
//! Byte-cursor reader and growable writer for the scalar wire primitives every packet
//! is built from.
//!
//! ## Wire Rules
//! - Fixed-width integers and floats: explicit width, little-endian unless the accessor
//!   name says `_be`
//! - Varints: little-endian base-128 groups, continuation bit `0x80`; at most 5 bytes
//!   for 32-bit values and 10 bytes for 64-bit values
//! - Signed varints: zig-zag mapped before encoding (`n >= 0 -> 2n`, `n < 0 -> -2n-1`)
//! - Strings: unsigned varint byte length, then UTF-8 bytes
//!
//! A read that cannot be satisfied returns an error and leaves the cursor where the
//! failing read started. Callers must not keep reading after an error.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ProtocolError, Result};

/// Maximum encoded length of a 32-bit varint.
pub const MAX_VAR_INT_BYTES: usize = 5;

/// Maximum encoded length of a 64-bit varint.
pub const MAX_VAR_LONG_BYTES: usize = 10;

/// Default cap on string and byte-string lengths (2 MiB, large enough for skin images)
pub const DEFAULT_MAX_STRING_LENGTH: usize = 2 * 1024 * 1024;

/// Default cap on list element counts
pub const DEFAULT_MAX_LIST_LENGTH: usize = 65_536;

/// Default cap on records per packet batch
pub const DEFAULT_MAX_BATCH_PACKETS: usize = 1_024;

/// Limits applied to lengths read off the wire before anything is allocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CodecLimits {
    /// Longest accepted string or byte string, in bytes
    pub max_string_length: usize,
    /// Largest accepted element count for a length-prefixed list
    pub max_list_length: usize,
    /// Largest accepted number of packets in one batch
    pub max_batch_packets: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
            max_list_length: DEFAULT_MAX_LIST_LENGTH,
            max_batch_packets: DEFAULT_MAX_BATCH_PACKETS,
        }
    }
}

/// Zig-zag map a signed 32-bit value onto an unsigned one.
#[inline]
pub fn zigzag_encode_32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// Inverse of [`zigzag_encode_32`].
#[inline]
pub fn zigzag_decode_32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

/// Zig-zag map a signed 64-bit value onto an unsigned one.
#[inline]
pub fn zigzag_encode_64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

/// Inverse of [`zigzag_encode_64`].
#[inline]
pub fn zigzag_decode_64(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}

/// Cursor over an input buffer.
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    buf: &'a [u8],
    offset: usize,
    limits: CodecLimits,
}

impl<'a> BinaryReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self::with_limits(buf, CodecLimits::default())
    }

    pub fn with_limits(buf: &'a [u8], limits: CodecLimits) -> Self {
        Self {
            buf,
            offset: 0,
            limits,
        }
    }

    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.offset
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.offset >= self.buf.len()
    }

    pub fn limits(&self) -> &CodecLimits {
        &self.limits
    }

    /// Borrow the next `len` bytes and advance past them.
    pub fn get_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(ProtocolError::BufferUnderrun {
                needed: len,
                remaining,
            });
        }
        let start = self.offset;
        self.offset += len;
        Ok(&self.buf[start..start + len])
    }

    /// Consume everything left in the buffer.
    pub fn get_remaining(&mut self) -> &'a [u8] {
        let start = self.offset;
        self.offset = self.buf.len();
        &self.buf[start..]
    }

    #[inline]
    fn get_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.get_bytes(N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(bytes);
        Ok(out)
    }

    pub fn get_u8(&mut self) -> Result<u8> {
        Ok(self.get_array::<1>()?[0])
    }

    /// Any non-zero byte reads as true.
    pub fn get_bool(&mut self) -> Result<bool> {
        Ok(self.get_u8()? != 0)
    }

    pub fn get_u16_le(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.get_array()?))
    }

    pub fn get_i16_le(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.get_array()?))
    }

    pub fn get_i16_be(&mut self) -> Result<i16> {
        Ok(i16::from_be_bytes(self.get_array()?))
    }

    pub fn get_u32_le(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.get_array()?))
    }

    pub fn get_i32_le(&mut self) -> Result<i32> {
        Ok(i32::from_le_bytes(self.get_array()?))
    }

    pub fn get_i32_be(&mut self) -> Result<i32> {
        Ok(i32::from_be_bytes(self.get_array()?))
    }

    pub fn get_u64_le(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.get_array()?))
    }

    pub fn get_i64_le(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.get_array()?))
    }

    pub fn get_i64_be(&mut self) -> Result<i64> {
        Ok(i64::from_be_bytes(self.get_array()?))
    }

    pub fn get_f32_le(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.get_array()?))
    }

    pub fn get_f64_le(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.get_array()?))
    }

    /// Unsigned 32-bit varint. Fails with `CorruptVarint` once more than five bytes
    /// carry the continuation bit; the rest of the buffer is left untouched.
    pub fn get_var_u32(&mut self) -> Result<u32> {
        let start = self.offset;
        let mut value: u32 = 0;
        for i in 0..MAX_VAR_INT_BYTES {
            let byte = match self.get_u8() {
                Ok(byte) => byte,
                Err(e) => {
                    self.offset = start;
                    return Err(e);
                }
            };
            value |= u32::from(byte & 0x7f) << (i * 7);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(ProtocolError::CorruptVarint {
            max_bytes: MAX_VAR_INT_BYTES,
        })
    }

    pub fn get_var_i32(&mut self) -> Result<i32> {
        Ok(zigzag_decode_32(self.get_var_u32()?))
    }

    /// Unsigned 64-bit varint, at most ten bytes.
    pub fn get_var_u64(&mut self) -> Result<u64> {
        let start = self.offset;
        let mut value: u64 = 0;
        for i in 0..MAX_VAR_LONG_BYTES {
            let byte = match self.get_u8() {
                Ok(byte) => byte,
                Err(e) => {
                    self.offset = start;
                    return Err(e);
                }
            };
            value |= u64::from(byte & 0x7f) << (i * 7);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(ProtocolError::CorruptVarint {
            max_bytes: MAX_VAR_LONG_BYTES,
        })
    }

    pub fn get_var_i64(&mut self) -> Result<i64> {
        Ok(zigzag_decode_64(self.get_var_u64()?))
    }

    /// Read a length that will size an allocation, enforcing `max`.
    pub fn get_length(&mut self, kind: &'static str, max: usize) -> Result<usize> {
        let len = self.get_var_u32()? as usize;
        if len > max {
            return Err(ProtocolError::OversizedValue { kind, len, max });
        }
        Ok(len)
    }

    /// Element count for a uvarint-prefixed list.
    pub fn get_list_length(&mut self) -> Result<usize> {
        self.get_length("list", self.limits.max_list_length)
    }

    /// Element count carried as a little-endian `i32`.
    pub fn get_list_length_i32_le(&mut self) -> Result<usize> {
        let raw = self.get_i32_le()?;
        let max = self.limits.max_list_length;
        let len = usize::try_from(raw)
            .map_err(|_| ProtocolError::InvalidValue(format!("negative list length {raw}")))?;
        if len > max {
            return Err(ProtocolError::OversizedValue {
                kind: "list",
                len,
                max,
            });
        }
        Ok(len)
    }

    /// Varint-length-prefixed opaque bytes.
    pub fn get_byte_string(&mut self) -> Result<&'a [u8]> {
        let len = self.get_length("string", self.limits.max_string_length)?;
        self.get_bytes(len)
    }

    /// Varint-length-prefixed UTF-8 string.
    pub fn get_string(&mut self) -> Result<String> {
        let bytes = self.get_byte_string()?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|_| ProtocolError::InvalidUtf8)
    }
}

/// Growable output buffer.
///
/// Fixed-width writes never fail. Length-prefixed writes are held to the same
/// [`CodecLimits`] a reader enforces, so nothing is written that the peer would
/// reject as oversized.
#[derive(Debug, Default, Clone)]
pub struct BinaryWriter {
    buf: BytesMut,
    limits: CodecLimits,
}

impl BinaryWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            limits: CodecLimits::default(),
        }
    }

    pub fn with_limits(limits: CodecLimits) -> Self {
        Self {
            buf: BytesMut::new(),
            limits,
        }
    }

    #[inline]
    pub fn limits(&self) -> CodecLimits {
        self.limits
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Freeze the written bytes.
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.buf.to_vec()
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    pub fn put_u8(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn put_bool(&mut self, value: bool) {
        self.buf.put_u8(u8::from(value));
    }

    pub fn put_u16_le(&mut self, value: u16) {
        self.buf.put_u16_le(value);
    }

    pub fn put_i16_le(&mut self, value: i16) {
        self.buf.put_i16_le(value);
    }

    pub fn put_i16_be(&mut self, value: i16) {
        self.buf.put_i16(value);
    }

    pub fn put_u32_le(&mut self, value: u32) {
        self.buf.put_u32_le(value);
    }

    pub fn put_i32_le(&mut self, value: i32) {
        self.buf.put_i32_le(value);
    }

    pub fn put_i32_be(&mut self, value: i32) {
        self.buf.put_i32(value);
    }

    pub fn put_u64_le(&mut self, value: u64) {
        self.buf.put_u64_le(value);
    }

    pub fn put_i64_le(&mut self, value: i64) {
        self.buf.put_i64_le(value);
    }

    pub fn put_i64_be(&mut self, value: i64) {
        self.buf.put_i64(value);
    }

    pub fn put_f32_le(&mut self, value: f32) {
        self.buf.put_f32_le(value);
    }

    pub fn put_f64_le(&mut self, value: f64) {
        self.buf.put_f64_le(value);
    }

    pub fn put_var_u32(&mut self, mut value: u32) {
        while value >= 0x80 {
            self.buf.put_u8((value as u8 & 0x7f) | 0x80);
            value >>= 7;
        }
        self.buf.put_u8(value as u8);
    }

    pub fn put_var_i32(&mut self, value: i32) {
        self.put_var_u32(zigzag_encode_32(value));
    }

    pub fn put_var_u64(&mut self, mut value: u64) {
        while value >= 0x80 {
            self.buf.put_u8((value as u8 & 0x7f) | 0x80);
            value >>= 7;
        }
        self.buf.put_u8(value as u8);
    }

    pub fn put_var_i64(&mut self, value: i64) {
        self.put_var_u64(zigzag_encode_64(value));
    }

    /// Convert a length to its prefix type, enforcing `max`.
    pub fn length_prefix<T: TryFrom<usize>>(
        &self,
        kind: &'static str,
        len: usize,
        max: usize,
    ) -> Result<T> {
        if len > max {
            return Err(ProtocolError::OversizedValue { kind, len, max });
        }
        T::try_from(len).map_err(|_| ProtocolError::OversizedValue { kind, len, max })
    }

    /// Element count for a uvarint-prefixed list.
    pub fn put_list_length(&mut self, len: usize) -> Result<()> {
        let len = self.length_prefix("list", len, self.limits.max_list_length)?;
        self.put_var_u32(len);
        Ok(())
    }

    /// Element count carried as a little-endian `i32`.
    pub fn put_list_length_i32_le(&mut self, len: usize) -> Result<()> {
        let len = self.length_prefix("list", len, self.limits.max_list_length)?;
        self.put_i32_le(len);
        Ok(())
    }

    /// Element count carried as a zig-zag varint.
    pub fn put_list_length_var_i32(&mut self, len: usize) -> Result<()> {
        let len = self.length_prefix("list", len, self.limits.max_list_length)?;
        self.put_var_i32(len);
        Ok(())
    }

    pub fn put_byte_string(&mut self, bytes: &[u8]) -> Result<()> {
        let len = self.length_prefix("string", bytes.len(), self.limits.max_string_length)?;
        self.put_var_u32(len);
        self.buf.put_slice(bytes);
        Ok(())
    }

    pub fn put_string(&mut self, value: &str) -> Result<()> {
        self.put_byte_string(value.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn written(f: impl FnOnce(&mut BinaryWriter)) -> Vec<u8> {
        let mut w = BinaryWriter::new();
        f(&mut w);
        w.into_vec()
    }

    #[test]
    fn test_unsigned_varint_known_encodings() {
        assert_eq!(written(|w| w.put_var_u32(0)), [0x00]);
        assert_eq!(written(|w| w.put_var_u32(127)), [0x7f]);
        assert_eq!(written(|w| w.put_var_u32(128)), [0x80, 0x01]);
        assert_eq!(written(|w| w.put_var_u32(300)), [0xac, 0x02]);
        assert_eq!(
            written(|w| w.put_var_u32(u32::MAX)),
            [0xff, 0xff, 0xff, 0xff, 0x0f]
        );
    }

    #[test]
    fn test_zigzag_mapping() {
        assert_eq!(zigzag_encode_32(0), 0);
        assert_eq!(zigzag_encode_32(-1), 1);
        assert_eq!(zigzag_encode_32(1), 2);
        assert_eq!(zigzag_encode_32(-2), 3);
        assert_eq!(zigzag_encode_32(i32::MIN), u32::MAX);
        assert_eq!(zigzag_decode_32(u32::MAX), i32::MIN);
        assert_eq!(zigzag_encode_64(-3), 5);
        assert_eq!(zigzag_decode_64(zigzag_encode_64(i64::MIN)), i64::MIN);
    }

    #[test]
    fn test_signed_varint_small_magnitudes_stay_short() {
        assert_eq!(written(|w| w.put_var_i32(-1)), [0x01]);
        assert_eq!(written(|w| w.put_var_i32(63)), [0x7e]);
        assert_eq!(written(|w| w.put_var_i32(-64)), [0x7f]);
        assert_eq!(written(|w| w.put_var_i32(64)), [0x80, 0x01]);
    }

    #[test]
    fn test_varint_corrupt_continuation() {
        let bytes = [0xff, 0xff, 0xff, 0xff, 0xff, 0x01, 0xaa, 0xbb];
        let mut r = BinaryReader::new(&bytes);
        match r.get_var_u32() {
            Err(ProtocolError::CorruptVarint { max_bytes: 5 }) => {}
            other => panic!("unexpected {other:?}"),
        }
        // only the five capped bytes were touched
        assert_eq!(r.remaining(), 3);
    }

    #[test]
    fn test_varlong_corrupt_continuation() {
        let bytes = [0x80u8; 12];
        let mut r = BinaryReader::new(&bytes);
        assert!(matches!(
            r.get_var_u64(),
            Err(ProtocolError::CorruptVarint { max_bytes: 10 })
        ));
        assert_eq!(r.remaining(), 2);
    }

    #[test]
    fn test_truncated_varint_is_underrun() {
        let mut r = BinaryReader::new(&[0x80, 0x80]);
        assert!(matches!(
            r.get_var_u32(),
            Err(ProtocolError::BufferUnderrun { .. })
        ));
        assert_eq!(r.offset(), 0);
    }

    #[test]
    fn test_fixed_width_underrun() {
        let mut r = BinaryReader::new(&[1, 2, 3]);
        match r.get_i32_le() {
            Err(ProtocolError::BufferUnderrun {
                needed: 4,
                remaining: 3,
            }) => {}
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(r.offset(), 0);
    }

    #[test]
    fn test_fixed_width_endianness() {
        let bytes = written(|w| {
            w.put_i32_le(0x0102_0304);
            w.put_i32_be(0x0102_0304);
            w.put_u16_le(0xbeef);
        });
        assert_eq!(bytes, [4, 3, 2, 1, 1, 2, 3, 4, 0xef, 0xbe]);
        let mut r = BinaryReader::new(&bytes);
        assert_eq!(r.get_i32_le().unwrap(), 0x0102_0304);
        assert_eq!(r.get_i32_be().unwrap(), 0x0102_0304);
        assert_eq!(r.get_u16_le().unwrap(), 0xbeef);
        assert!(r.is_at_end());
    }

    #[test]
    fn test_string_prefix_and_utf8() {
        let bytes = written(|w| w.put_string("héllo").unwrap());
        assert_eq!(bytes[0], 6);
        let mut r = BinaryReader::new(&bytes);
        assert_eq!(r.get_string().unwrap(), "héllo");

        let mut bad = BinaryReader::new(&[2, 0xc3, 0x28]);
        assert!(matches!(bad.get_string(), Err(ProtocolError::InvalidUtf8)));
    }

    #[test]
    fn test_string_length_past_end() {
        let mut r = BinaryReader::new(&[10, b'a', b'b']);
        assert!(matches!(
            r.get_string(),
            Err(ProtocolError::BufferUnderrun {
                needed: 10,
                remaining: 2
            })
        ));
    }

    #[test]
    fn test_string_length_limit() {
        let limits = CodecLimits {
            max_string_length: 4,
            ..CodecLimits::default()
        };
        let bytes = written(|w| w.put_string("too long").unwrap());
        let mut r = BinaryReader::with_limits(&bytes, limits);
        assert!(matches!(
            r.get_string(),
            Err(ProtocolError::OversizedValue { len: 8, max: 4, .. })
        ));
    }

    #[test]
    fn test_writer_refuses_what_the_reader_would_reject() {
        let limits = CodecLimits {
            max_string_length: 4,
            max_list_length: 2,
            ..CodecLimits::default()
        };
        let mut w = BinaryWriter::with_limits(limits);
        assert!(matches!(
            w.put_string("too long"),
            Err(ProtocolError::OversizedValue { kind: "string", len: 8, max: 4 })
        ));
        assert!(matches!(
            w.put_list_length(3),
            Err(ProtocolError::OversizedValue { kind: "list", len: 3, max: 2 })
        ));
        assert!(matches!(
            w.put_list_length_i32_le(3),
            Err(ProtocolError::OversizedValue { kind: "list", .. })
        ));
        // nothing reached the buffer
        assert!(w.is_empty());

        w.put_string("fits").unwrap();
        w.put_list_length(2).unwrap();
        let bytes = w.into_vec();
        let mut r = BinaryReader::with_limits(&bytes, limits);
        assert_eq!(r.get_string().unwrap(), "fits");
        assert_eq!(r.get_list_length().unwrap(), 2);
    }

    #[test]
    fn test_length_prefix_narrowing() {
        let w = BinaryWriter::new();
        assert_eq!(w.length_prefix::<u16>("string", 7, usize::MAX).unwrap(), 7u16);
        assert!(matches!(
            w.length_prefix::<u16>("string", 70_000, usize::MAX),
            Err(ProtocolError::OversizedValue { len: 70_000, .. })
        ));
        assert!(w.length_prefix::<i32>("list", usize::MAX, usize::MAX).is_err());
    }

    #[test]
    fn test_bool_reads_any_nonzero() {
        let mut r = BinaryReader::new(&[0, 1, 7]);
        assert!(!r.get_bool().unwrap());
        assert!(r.get_bool().unwrap());
        assert!(r.get_bool().unwrap());
    }
}
