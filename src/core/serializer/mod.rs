//! # Packet Serializer
//!
//! Version-aware cursors that packet codecs are written against.
//!
//! A [`PacketReader`] or [`PacketWriter`] is bound to exactly one
//! [`ProtocolVersion`] when it is created and keeps it for its whole life, so a
//! payload can never be half-read under one revision and half under another. Both
//! dereference to the primitive cursor, so `reader.get_var_u32()` and friends work
//! directly; the methods defined here add the composites the game protocol is built
//! from and the [`VersionGate`] helpers.
//!
//! ## Example
//! ```rust
//! use bedrock_protocol::core::serializer::{PacketReader, PacketWriter};
//! use bedrock_protocol::core::version::{ProtocolVersion, VersionGate};
//! use bedrock_protocol::Result;
//!
//! const ADDON_FLAG: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_21_20);
//!
//! fn main() -> Result<()> {
//!     let mut out = PacketWriter::new(ProtocolVersion::PROTOCOL_1_21_0);
//!     out.put_string("pack")?;
//!     out.write_gated(ADDON_FLAG, |out| {
//!         out.put_bool(true);
//!         Ok(())
//!     })?;
//!     let bytes = out.into_vec();
//!     assert_eq!(bytes.len(), 5);
//!
//!     let mut input = PacketReader::new(&bytes, ProtocolVersion::PROTOCOL_1_21_0);
//!     assert_eq!(input.get_string()?, "pack");
//!     assert!(!input.read_gated_or(ADDON_FLAG, false, |r| r.get_bool())?);
//!     Ok(())
//! }
//! ```

mod item;
mod skin;

use std::ops::{Deref, DerefMut};

use bytes::Bytes;
use uuid::Uuid;

use crate::core::binary::{BinaryReader, BinaryWriter, CodecLimits};
use crate::core::optional::{self, FlagSink, FlagSource};
use crate::core::version::{ProtocolVersion, VersionGate};
use crate::error::Result;
use crate::nbt::{self, CompoundTag, NbtFlavor};
use crate::types::math::{BlockPosition, Vec2, Vec3};

/// Read cursor bound to one protocol revision.
#[derive(Debug, Clone)]
pub struct PacketReader<'a> {
    inner: BinaryReader<'a>,
    version: ProtocolVersion,
}

impl<'a> PacketReader<'a> {
    pub fn new(buf: &'a [u8], version: ProtocolVersion) -> Self {
        Self {
            inner: BinaryReader::new(buf),
            version,
        }
    }

    pub fn with_limits(buf: &'a [u8], version: ProtocolVersion, limits: CodecLimits) -> Self {
        Self {
            inner: BinaryReader::with_limits(buf, limits),
            version,
        }
    }

    #[inline]
    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    #[inline]
    pub fn is_at_least(&self, threshold: ProtocolVersion) -> bool {
        self.version.is_at_least(threshold)
    }

    /// Read a field that is only on the wire where `gate` applies.
    pub fn read_gated<T, F>(&mut self, gate: VersionGate, read: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        if gate.applies(self.version) {
            read(self).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Like [`read_gated`](Self::read_gated), substituting `default` where the field
    /// is absent.
    pub fn read_gated_or<T, F>(&mut self, gate: VersionGate, default: T, read: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        Ok(self.read_gated(gate, read)?.unwrap_or(default))
    }

    pub fn read_optional<T, F>(&mut self, read: F) -> Result<Option<T>>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        optional::read_optional(self, read)
    }

    /// List with an unsigned varint element count.
    pub fn read_list<T, F>(&mut self, read: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let count = self.get_list_length()?;
        self.read_exact_list(count, read)
    }

    /// List with a little-endian `i32` element count.
    pub fn read_list_i32_le<T, F>(&mut self, read: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let count = self.get_list_length_i32_le()?;
        self.read_exact_list(count, read)
    }

    /// `count` elements whose count was carried elsewhere.
    pub fn read_exact_list<T, F>(&mut self, count: usize, mut read: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        // The count is attacker controlled; let the vector grow as elements arrive.
        let mut out = Vec::with_capacity(count.min(64));
        for _ in 0..count {
            out.push(read(self)?);
        }
        Ok(out)
    }

    pub fn get_vector3(&mut self) -> Result<Vec3> {
        let x = self.get_f32_le()?;
        let y = self.get_f32_le()?;
        let z = self.get_f32_le()?;
        Ok(Vec3::new(x, y, z))
    }

    pub fn get_vector2(&mut self) -> Result<Vec2> {
        let x = self.get_f32_le()?;
        let y = self.get_f32_le()?;
        Ok(Vec2::new(x, y))
    }

    /// Two 8-byte halves, each stored byte-reversed.
    pub fn get_uuid(&mut self) -> Result<Uuid> {
        let raw = self.get_bytes(16)?;
        let mut bytes = [0u8; 16];
        for (i, b) in raw[..8].iter().rev().enumerate() {
            bytes[i] = *b;
        }
        for (i, b) in raw[8..].iter().rev().enumerate() {
            bytes[8 + i] = *b;
        }
        Ok(Uuid::from_bytes(bytes))
    }

    /// Signed x and z, unsigned y.
    pub fn get_block_position(&mut self) -> Result<BlockPosition> {
        let x = self.get_var_i32()?;
        let y = self.get_var_u32()? as i32;
        let z = self.get_var_i32()?;
        Ok(BlockPosition::new(x, y, z))
    }

    /// All three coordinates signed.
    pub fn get_signed_block_position(&mut self) -> Result<BlockPosition> {
        let x = self.get_var_i32()?;
        let y = self.get_var_i32()?;
        let z = self.get_var_i32()?;
        Ok(BlockPosition::new(x, y, z))
    }

    pub fn get_actor_unique_id(&mut self) -> Result<i64> {
        self.get_var_i64()
    }

    pub fn get_actor_runtime_id(&mut self) -> Result<u64> {
        self.get_var_u64()
    }

    pub fn get_generic_type_network_id(&mut self) -> Result<i32> {
        self.get_var_i32()
    }

    /// Network-flavoured tree root; the root name is discarded.
    pub fn get_nbt_compound_root(&mut self) -> Result<CompoundTag> {
        let (_, root) = nbt::read_root(&mut self.inner, NbtFlavor::Network)?;
        Ok(root)
    }
}

impl<'a> Deref for PacketReader<'a> {
    type Target = BinaryReader<'a>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for PacketReader<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl FlagSource for PacketReader<'_> {
    fn read_flag(&mut self) -> Result<bool> {
        self.inner.get_bool()
    }
}

/// Write cursor bound to one protocol revision.
#[derive(Debug, Clone)]
pub struct PacketWriter {
    inner: BinaryWriter,
    version: ProtocolVersion,
}

impl PacketWriter {
    pub fn new(version: ProtocolVersion) -> Self {
        Self {
            inner: BinaryWriter::new(),
            version,
        }
    }

    pub fn with_capacity(version: ProtocolVersion, capacity: usize) -> Self {
        Self {
            inner: BinaryWriter::with_capacity(capacity),
            version,
        }
    }

    /// Writer whose length prefixes are held to `limits`.
    pub fn with_limits(version: ProtocolVersion, limits: CodecLimits) -> Self {
        Self {
            inner: BinaryWriter::with_limits(limits),
            version,
        }
    }

    #[inline]
    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    #[inline]
    pub fn is_at_least(&self, threshold: ProtocolVersion) -> bool {
        self.version.is_at_least(threshold)
    }

    pub fn into_bytes(self) -> Bytes {
        self.inner.into_bytes()
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.inner.into_vec()
    }

    /// Write a field only where `gate` applies.
    pub fn write_gated<F>(&mut self, gate: VersionGate, write: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        if gate.applies(self.version) {
            write(self)
        } else {
            Ok(())
        }
    }

    pub fn write_optional<T, F>(&mut self, value: Option<&T>, write: F) -> Result<()>
    where
        T: ?Sized,
        F: FnOnce(&mut Self, &T) -> Result<()>,
    {
        optional::write_optional(self, value, write)
    }

    /// List with an unsigned varint element count.
    pub fn write_list<T, F>(&mut self, items: &[T], mut write: F) -> Result<()>
    where
        F: FnMut(&mut Self, &T) -> Result<()>,
    {
        self.put_list_length(items.len())?;
        items.iter().try_for_each(|item| write(self, item))
    }

    /// List with a little-endian `i32` element count.
    pub fn write_list_i32_le<T, F>(&mut self, items: &[T], mut write: F) -> Result<()>
    where
        F: FnMut(&mut Self, &T) -> Result<()>,
    {
        self.put_list_length_i32_le(items.len())?;
        items.iter().try_for_each(|item| write(self, item))
    }

    pub fn put_vector3(&mut self, v: &Vec3) {
        self.put_f32_le(v.x);
        self.put_f32_le(v.y);
        self.put_f32_le(v.z);
    }

    pub fn put_vector2(&mut self, v: &Vec2) {
        self.put_f32_le(v.x);
        self.put_f32_le(v.y);
    }

    pub fn put_uuid(&mut self, uuid: &Uuid) {
        let bytes = uuid.as_bytes();
        let mut wire = [0u8; 16];
        for (i, b) in bytes[..8].iter().rev().enumerate() {
            wire[i] = *b;
        }
        for (i, b) in bytes[8..].iter().rev().enumerate() {
            wire[8 + i] = *b;
        }
        self.put_bytes(&wire);
    }

    pub fn put_block_position(&mut self, pos: &BlockPosition) {
        self.put_var_i32(pos.x);
        self.put_var_u32(pos.y as u32);
        self.put_var_i32(pos.z);
    }

    pub fn put_signed_block_position(&mut self, pos: &BlockPosition) {
        self.put_var_i32(pos.x);
        self.put_var_i32(pos.y);
        self.put_var_i32(pos.z);
    }

    pub fn put_actor_unique_id(&mut self, id: i64) {
        self.put_var_i64(id);
    }

    pub fn put_actor_runtime_id(&mut self, id: u64) {
        self.put_var_u64(id);
    }

    pub fn put_generic_type_network_id(&mut self, id: i32) {
        self.put_var_i32(id);
    }

    pub fn put_nbt_compound_root(&mut self, root: &CompoundTag) -> Result<()> {
        nbt::write_root(&mut self.inner, NbtFlavor::Network, "", root)
    }
}

impl Deref for PacketWriter {
    type Target = BinaryWriter;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for PacketWriter {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl FlagSink for PacketWriter {
    fn write_flag(&mut self, present: bool) {
        self.inner.put_bool(present);
    }
}
