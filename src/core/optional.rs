//! Presence-flag-then-value framing, generic over the inner codec.
//!
//! On the wire an optional value is one boolean byte followed by the value's own
//! encoding iff the flag is true. The inner reader is never invoked when the flag is
//! false, so an absent value consumes exactly one byte.
//!
//! Where the presence bit lives elsewhere (a shared [`BitSet`](crate::core::bitset::BitSet)
//! of input flags, for instance) use [`read_if`] / [`write_if`] instead.

use crate::core::binary::{BinaryReader, BinaryWriter};
use crate::error::Result;

/// Anything that can read a presence flag.
pub trait FlagSource {
    fn read_flag(&mut self) -> Result<bool>;
}

/// Anything that can write a presence flag.
pub trait FlagSink {
    fn write_flag(&mut self, present: bool);
}

impl FlagSource for BinaryReader<'_> {
    fn read_flag(&mut self) -> Result<bool> {
        self.get_bool()
    }
}

impl FlagSink for BinaryWriter {
    fn write_flag(&mut self, present: bool) {
        self.put_bool(present);
    }
}

/// Read a presence flag, then the value iff present.
pub fn read_optional<S, T, F>(src: &mut S, inner: F) -> Result<Option<T>>
where
    S: FlagSource + ?Sized,
    F: FnOnce(&mut S) -> Result<T>,
{
    if src.read_flag()? {
        inner(src).map(Some)
    } else {
        Ok(None)
    }
}

/// Write a presence flag, then the value iff present.
pub fn write_optional<S, T, F>(dst: &mut S, value: Option<&T>, inner: F) -> Result<()>
where
    S: FlagSink + ?Sized,
    T: ?Sized,
    F: FnOnce(&mut S, &T) -> Result<()>,
{
    dst.write_flag(value.is_some());
    match value {
        Some(v) => inner(dst, v),
        None => Ok(()),
    }
}

/// Read the value iff an externally held presence bit is set.
pub fn read_if<S, T, F>(present: bool, src: &mut S, inner: F) -> Result<Option<T>>
where
    S: ?Sized,
    F: FnOnce(&mut S) -> Result<T>,
{
    if present {
        inner(src).map(Some)
    } else {
        Ok(None)
    }
}

/// Write the value if present; the presence bit is the caller's business.
pub fn write_if<S, T, F>(dst: &mut S, value: Option<&T>, inner: F) -> Result<()>
where
    S: ?Sized,
    T: ?Sized,
    F: FnOnce(&mut S, &T) -> Result<()>,
{
    match value {
        Some(v) => inner(dst, v),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_absent_consumes_one_flag_byte() {
        let mut w = BinaryWriter::new();
        write_optional(&mut w, None::<&i32>, |w, v| {
            w.put_i32_le(*v);
            Ok(())
        })
        .unwrap();
        let bytes = w.into_vec();
        assert_eq!(bytes, [0]);

        let calls = Cell::new(0);
        let mut r = BinaryReader::new(&bytes);
        let value = read_optional(&mut r, |r| {
            calls.set(calls.get() + 1);
            r.get_i32_le()
        })
        .unwrap();
        assert_eq!(value, None);
        assert_eq!(calls.get(), 0);
        assert_eq!(r.offset(), 1);
    }

    #[test]
    fn test_present_consumes_flag_and_inner() {
        let mut w = BinaryWriter::new();
        write_optional(&mut w, Some(&-7i32), |w, v| {
            w.put_i32_le(*v);
            Ok(())
        })
        .unwrap();
        let bytes = w.into_vec();
        assert_eq!(bytes.len(), 5);

        let mut r = BinaryReader::new(&bytes);
        assert_eq!(read_optional(&mut r, |r| r.get_i32_le()).unwrap(), Some(-7));
        assert!(r.is_at_end());
    }

    #[test]
    fn test_inner_error_propagates() {
        let bytes = [1, 0xaa];
        let mut r = BinaryReader::new(&bytes);
        assert!(read_optional(&mut r, |r| r.get_i32_le()).is_err());
    }

    #[test]
    fn test_external_presence_bit() {
        let bytes = [9];
        let mut r = BinaryReader::new(&bytes);
        assert_eq!(read_if(false, &mut r, |r| r.get_u8()).unwrap(), None);
        assert_eq!(r.offset(), 0);
        assert_eq!(read_if(true, &mut r, |r| r.get_u8()).unwrap(), Some(9));
    }
}
