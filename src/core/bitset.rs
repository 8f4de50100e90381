//! Fixed-length packed boolean vector.
//!
//! `N` flags occupy `ceil(N / 8)` bytes on the wire; flag `i` lives in byte `i / 8` at
//! bit `i % 8`, least significant bit first. The caller decides `N` at both read and
//! write time from the protocol version, so both ends must agree on it or every field
//! after the set is misaligned.
//!
//! Setting a flag at an index `>= N` is rejected with `IndexOutOfRange`. Padding bits
//! in the final byte are ignored on read.

use crate::core::binary::{BinaryReader, BinaryWriter};
use crate::error::{ProtocolError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BitSet {
    len: usize,
    words: Vec<u64>,
}

impl BitSet {
    /// All-clear set of `len` flags.
    pub fn new(len: usize) -> Self {
        Self {
            len,
            words: vec![0; len.div_ceil(64)],
        }
    }

    /// Number of bytes `len` flags occupy on the wire.
    #[inline]
    pub const fn byte_len(len: usize) -> usize {
        len.div_ceil(8)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn check(&self, index: usize) -> Result<()> {
        if index >= self.len {
            return Err(ProtocolError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        Ok(())
    }

    pub fn get(&self, index: usize) -> Result<bool> {
        self.check(index)?;
        Ok(self.words[index / 64] & (1u64 << (index % 64)) != 0)
    }

    pub fn set(&mut self, index: usize, value: bool) -> Result<()> {
        self.check(index)?;
        let mask = 1u64 << (index % 64);
        if value {
            self.words[index / 64] |= mask;
        } else {
            self.words[index / 64] &= !mask;
        }
        Ok(())
    }

    /// Builder form of [`BitSet::set`].
    pub fn with(mut self, index: usize, value: bool) -> Result<Self> {
        self.set(index, value)?;
        Ok(self)
    }

    /// Indices of every set flag, ascending.
    pub fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.words[i / 64] & (1u64 << (i % 64)) != 0)
    }

    /// Copy of this set with a different length. Fails if shrinking would drop a set
    /// flag.
    pub fn resized(&self, len: usize) -> Result<Self> {
        let mut out = BitSet::new(len);
        for index in self.ones() {
            out.set(index, true)?;
        }
        Ok(out)
    }

    pub fn read(reader: &mut BinaryReader<'_>, len: usize) -> Result<Self> {
        let bytes = reader.get_bytes(Self::byte_len(len))?;
        let mut out = BitSet::new(len);
        for (i, &byte) in bytes.iter().enumerate() {
            out.words[i / 8] |= u64::from(byte) << ((i % 8) * 8);
        }
        // drop padding bits past `len` in the last byte
        let tail = len % 64;
        if tail != 0 {
            if let Some(last) = out.words.last_mut() {
                *last &= (1u64 << tail) - 1;
            }
        }
        Ok(out)
    }

    pub fn write(&self, writer: &mut BinaryWriter) {
        for i in 0..Self::byte_len(self.len) {
            writer.put_u8((self.words[i / 8] >> ((i % 8) * 8)) as u8);
        }
    }
}
