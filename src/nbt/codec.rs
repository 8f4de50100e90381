//! Byte encodings of the named tree.
//!
//! Two flavours are in use:
//! - [`NbtFlavor::Network`]: ints and longs as zig-zag varints, string lengths as
//!   unsigned varints. Used for tree roots embedded directly in packet payloads.
//! - [`NbtFlavor::LittleEndian`]: fixed-width little-endian numbers, `u16` string
//!   lengths. Used inside item stack user data.
//!
//! A root is `[tag type][name][payload]` and must be a compound.

use crate::core::binary::{BinaryReader, BinaryWriter};
use crate::error::{constants, ProtocolError, Result};
use crate::nbt::{CompoundTag, ListTag, Tag, TagType};

/// Deepest nesting of lists and compounds accepted on read.
pub const MAX_DEPTH: usize = 512;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NbtFlavor {
    Network,
    LittleEndian,
}

/// Read a named root compound. Returns the root name and its contents.
pub fn read_root(
    reader: &mut BinaryReader<'_>,
    flavor: NbtFlavor,
) -> Result<(String, CompoundTag)> {
    let tag_type = TagType::from_u8(reader.get_u8()?)?;
    if tag_type != TagType::Compound {
        return Err(ProtocolError::malformed(constants::ERR_NBT_ROOT_NOT_COMPOUND));
    }
    let mut codec = TreeReader { reader, flavor };
    let name = codec.string()?;
    let root = codec.compound(0)?;
    Ok((name, root))
}

/// Write a named root compound.
///
/// Fails with [`ProtocolError::OversizedValue`] when a string or array is too long
/// for its length prefix or for the writer's limits.
pub fn write_root(
    writer: &mut BinaryWriter,
    flavor: NbtFlavor,
    name: &str,
    root: &CompoundTag,
) -> Result<()> {
    writer.put_u8(TagType::Compound as u8);
    let mut codec = TreeWriter { writer, flavor };
    codec.string(name)?;
    codec.compound(root)
}

struct TreeReader<'r, 'a> {
    reader: &'r mut BinaryReader<'a>,
    flavor: NbtFlavor,
}

impl TreeReader<'_, '_> {
    fn int(&mut self) -> Result<i32> {
        match self.flavor {
            NbtFlavor::Network => self.reader.get_var_i32(),
            NbtFlavor::LittleEndian => self.reader.get_i32_le(),
        }
    }

    fn long(&mut self) -> Result<i64> {
        match self.flavor {
            NbtFlavor::Network => self.reader.get_var_i64(),
            NbtFlavor::LittleEndian => self.reader.get_i64_le(),
        }
    }

    fn string(&mut self) -> Result<String> {
        let bytes = match self.flavor {
            NbtFlavor::Network => self.reader.get_byte_string()?,
            NbtFlavor::LittleEndian => {
                let len = usize::from(self.reader.get_u16_le()?);
                self.reader.get_bytes(len)?
            }
        };
        String::from_utf8(bytes.to_vec()).map_err(|_| ProtocolError::InvalidUtf8)
    }

    fn count(&mut self, kind: &'static str) -> Result<usize> {
        let raw = self.int()?;
        let max = self.reader.limits().max_list_length;
        let len = usize::try_from(raw).map_err(|_| {
            ProtocolError::malformed(format!("negative {kind} length {raw}"))
        })?;
        if len > max {
            return Err(ProtocolError::OversizedValue { kind, len, max });
        }
        Ok(len)
    }

    fn payload(&mut self, tag_type: TagType, depth: usize) -> Result<Tag> {
        Ok(match tag_type {
            TagType::End => {
                return Err(ProtocolError::malformed("unexpected end tag"));
            }
            TagType::Byte => Tag::Byte(self.reader.get_u8()? as i8),
            TagType::Short => Tag::Short(self.reader.get_i16_le()?),
            TagType::Int => Tag::Int(self.int()?),
            TagType::Long => Tag::Long(self.long()?),
            TagType::Float => Tag::Float(self.reader.get_f32_le()?),
            TagType::Double => Tag::Double(self.reader.get_f64_le()?),
            TagType::ByteArray => {
                let len = self.count("byte array")?;
                Tag::ByteArray(self.reader.get_bytes(len)?.to_vec())
            }
            TagType::String => Tag::String(self.string()?),
            TagType::List => Tag::List(self.list(depth + 1)?),
            TagType::Compound => Tag::Compound(self.compound(depth + 1)?),
            TagType::IntArray => {
                let len = self.count("int array")?;
                let mut values = Vec::with_capacity(len.min(1024));
                for _ in 0..len {
                    values.push(self.int()?);
                }
                Tag::IntArray(values)
            }
            TagType::LongArray => {
                let len = self.count("long array")?;
                let mut values = Vec::with_capacity(len.min(1024));
                for _ in 0..len {
                    values.push(self.long()?);
                }
                Tag::LongArray(values)
            }
        })
    }

    fn list(&mut self, depth: usize) -> Result<ListTag> {
        if depth > MAX_DEPTH {
            return Err(ProtocolError::malformed(constants::ERR_NBT_TOO_DEEP));
        }
        let element = TagType::from_u8(self.reader.get_u8()?)?;
        let len = self.count("list")?;
        let mut list = ListTag::new(element);
        if element == TagType::End {
            if len != 0 {
                return Err(ProtocolError::malformed("non-empty list of end tags"));
            }
            return Ok(list);
        }
        for _ in 0..len {
            let value = self.payload(element, depth)?;
            list.push(value)?;
        }
        Ok(list)
    }

    fn compound(&mut self, depth: usize) -> Result<CompoundTag> {
        if depth > MAX_DEPTH {
            return Err(ProtocolError::malformed(constants::ERR_NBT_TOO_DEEP));
        }
        let mut compound = CompoundTag::new();
        loop {
            let tag_type = TagType::from_u8(self.reader.get_u8()?)?;
            if tag_type == TagType::End {
                return Ok(compound);
            }
            let name = self.string()?;
            let value = self.payload(tag_type, depth)?;
            compound.set(name, value);
        }
    }
}

struct TreeWriter<'w> {
    writer: &'w mut BinaryWriter,
    flavor: NbtFlavor,
}

impl TreeWriter<'_> {
    fn int(&mut self, value: i32) {
        match self.flavor {
            NbtFlavor::Network => self.writer.put_var_i32(value),
            NbtFlavor::LittleEndian => self.writer.put_i32_le(value),
        }
    }

    fn long(&mut self, value: i64) {
        match self.flavor {
            NbtFlavor::Network => self.writer.put_var_i64(value),
            NbtFlavor::LittleEndian => self.writer.put_i64_le(value),
        }
    }

    fn string(&mut self, value: &str) -> Result<()> {
        match self.flavor {
            NbtFlavor::Network => self.writer.put_string(value),
            NbtFlavor::LittleEndian => {
                let len: u16 = self.writer.length_prefix(
                    "string",
                    value.len(),
                    usize::from(u16::MAX),
                )?;
                self.writer.put_u16_le(len);
                self.writer.put_bytes(value.as_bytes());
                Ok(())
            }
        }
    }

    /// Mirror of the reader's `count`: an int prefix held to the list limit.
    fn count(&mut self, kind: &'static str, len: usize) -> Result<()> {
        let max = self.writer.limits().max_list_length;
        let len: i32 = self.writer.length_prefix(kind, len, max)?;
        self.int(len);
        Ok(())
    }

    fn payload(&mut self, tag: &Tag) -> Result<()> {
        match tag {
            Tag::Byte(v) => self.writer.put_u8(*v as u8),
            Tag::Short(v) => self.writer.put_i16_le(*v),
            Tag::Int(v) => self.int(*v),
            Tag::Long(v) => self.long(*v),
            Tag::Float(v) => self.writer.put_f32_le(*v),
            Tag::Double(v) => self.writer.put_f64_le(*v),
            Tag::ByteArray(v) => {
                self.count("byte array", v.len())?;
                self.writer.put_bytes(v);
            }
            Tag::String(v) => self.string(v)?,
            Tag::List(list) => {
                self.writer.put_u8(list.element_type() as u8);
                self.count("list", list.len())?;
                for value in list.values() {
                    self.payload(value)?;
                }
            }
            Tag::Compound(c) => self.compound(c)?,
            Tag::IntArray(v) => {
                self.count("int array", v.len())?;
                for value in v {
                    self.int(*value);
                }
            }
            Tag::LongArray(v) => {
                self.count("long array", v.len())?;
                for value in v {
                    self.long(*value);
                }
            }
        }
        Ok(())
    }

    fn compound(&mut self, compound: &CompoundTag) -> Result<()> {
        for (name, tag) in compound.iter() {
            self.writer.put_u8(tag.tag_type() as u8);
            self.string(name)?;
            self.payload(tag)?;
        }
        self.writer.put_u8(TagType::End as u8);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::core::binary::CodecLimits;

    fn sample() -> CompoundTag {
        let pos = ListTag::from_values(vec![Tag::Float(1.0), Tag::Float(2.0), Tag::Float(3.0)])
            .unwrap();
        CompoundTag::new()
            .with("clear", Tag::Byte(1))
            .with("count", Tag::Int(-300))
            .with("stamp", Tag::Long(1 << 40))
            .with("name", Tag::String("camera".into()))
            .with("pos", Tag::List(pos))
            .with("nested", Tag::Compound(CompoundTag::new().with("s", Tag::Short(-2))))
            .with("ids", Tag::IntArray(vec![1, -1]))
    }

    #[test]
    fn test_both_flavors_read_back_what_they_wrote() {
        for flavor in [NbtFlavor::Network, NbtFlavor::LittleEndian] {
            let mut w = BinaryWriter::new();
            write_root(&mut w, flavor, "", &sample()).unwrap();
            let bytes = w.into_vec();
            let mut r = BinaryReader::new(&bytes);
            let (name, root) = read_root(&mut r, flavor).unwrap();
            assert_eq!(name, "");
            assert_eq!(root, sample());
            assert!(r.is_at_end(), "{flavor:?} left bytes behind");
        }
    }

    #[test]
    fn test_network_flavor_uses_varints() {
        let root = CompoundTag::new().with("i", Tag::Int(-1));
        let mut w = BinaryWriter::new();
        write_root(&mut w, NbtFlavor::Network, "", &root).unwrap();
        // compound, empty name, int tag, name "i", zigzag(-1) = 1, end
        assert_eq!(w.into_vec(), [10, 0, 3, 1, b'i', 1, 0]);
    }

    #[test]
    fn test_little_endian_flavor_uses_fixed_width() {
        let root = CompoundTag::new().with("i", Tag::Int(-1));
        let mut w = BinaryWriter::new();
        write_root(&mut w, NbtFlavor::LittleEndian, "", &root).unwrap();
        assert_eq!(
            w.into_vec(),
            [10, 0, 0, 3, 1, 0, b'i', 0xff, 0xff, 0xff, 0xff, 0]
        );
    }

    #[test]
    fn test_little_endian_string_longer_than_prefix() {
        let root = CompoundTag::new().with("s", Tag::String("x".repeat(70_000)));
        let mut w = BinaryWriter::new();
        assert!(matches!(
            write_root(&mut w, NbtFlavor::LittleEndian, "", &root),
            Err(ProtocolError::OversizedValue { kind: "string", len: 70_000, .. })
        ));
        // the network flavour prefixes with a varint and has room for it
        let mut w = BinaryWriter::new();
        write_root(&mut w, NbtFlavor::Network, "", &root).unwrap();
    }

    #[test]
    fn test_array_counts_respect_writer_limits() {
        let limits = CodecLimits {
            max_list_length: 2,
            ..CodecLimits::default()
        };
        let root = CompoundTag::new().with("ids", Tag::IntArray(vec![1, 2, 3]));
        let mut w = BinaryWriter::with_limits(limits);
        assert!(matches!(
            write_root(&mut w, NbtFlavor::Network, "", &root),
            Err(ProtocolError::OversizedValue { kind: "int array", len: 3, max: 2 })
        ));
    }

    #[test]
    fn test_root_must_be_compound() {
        let mut r = BinaryReader::new(&[8, 0, 0]);
        assert!(matches!(
            read_root(&mut r, NbtFlavor::Network),
            Err(ProtocolError::MalformedStructuralValue(_))
        ));
    }

    #[test]
    fn test_unknown_tag_type() {
        let mut r = BinaryReader::new(&[10, 0, 99]);
        assert!(matches!(
            read_root(&mut r, NbtFlavor::Network),
            Err(ProtocolError::UnknownEnumValue { value: 99, .. })
        ));
    }

    #[test]
    fn test_depth_limit() {
        // a chain of nested compounds deeper than MAX_DEPTH
        let mut bytes = vec![10, 0];
        for _ in 0..(MAX_DEPTH + 2) {
            bytes.extend_from_slice(&[10, 1, b'c']);
        }
        let mut r = BinaryReader::new(&bytes);
        assert!(matches!(
            read_root(&mut r, NbtFlavor::Network),
            Err(ProtocolError::MalformedStructuralValue(_))
        ));
    }

    #[test]
    fn test_truncated_tree_underruns() {
        let mut r = BinaryReader::new(&[10, 0, 5, 1, b'f', 0, 0]);
        assert!(matches!(
            read_root(&mut r, NbtFlavor::Network),
            Err(ProtocolError::BufferUnderrun { .. })
        ));
    }
}
