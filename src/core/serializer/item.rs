//! Item stack layouts.
//!
//! From 1.16.220 on the variable part of a stack (tree data, placement lists) is
//! packed into one length-prefixed blob using fixed-width little-endian numbers.
//! Earlier revisions write the same information inline with varints and pack count
//! and meta into a single "aux" value.

use crate::core::binary::{BinaryReader, BinaryWriter};
use crate::core::serializer::{PacketReader, PacketWriter};
use crate::core::version::ProtocolVersion;
use crate::error::{constants, ProtocolError, Result};
use crate::nbt::{self, CompoundTag, NbtFlavor};
use crate::types::item::{ItemStack, ItemStackWrapper};

/// Marker meaning "a tree follows".
const NBT_PRESENT: u16 = 0xffff;
const NBT_VERSION: u8 = 1;

/// Largest meta value that still fits the legacy aux encoding.
const LEGACY_MAX_META: u32 = 0x7f_ffff;

impl PacketReader<'_> {
    /// Read a stack, handing the cursor to `stack_id_hook` between meta and block
    /// runtime id. The hook is skipped for air. Only valid from 1.16.220 on; older
    /// revisions use [`get_item_stack_without_stack_id`](Self::get_item_stack_without_stack_id).
    pub fn get_item_stack<T, F>(&mut self, stack_id_hook: F) -> Result<(ItemStack, Option<T>)>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let id = self.get_var_i32()?;
        if id == 0 {
            return Ok((ItemStack::null(), None));
        }
        let count = self.get_u16_le()?;
        let meta = self.get_var_u32()?;
        let hooked = stack_id_hook(self)?;
        let block_runtime_id = self.get_var_i32()?;

        let extra = self.get_byte_string()?;
        let mut extra = BinaryReader::with_limits(extra, *self.limits());
        let nbt = read_nbt_marker(&mut extra, NbtFlavor::LittleEndian)?;
        let can_place_on = read_short_strings(&mut extra)?;
        let can_destroy = read_short_strings(&mut extra)?;
        if !extra.is_at_end() {
            return Err(ProtocolError::TrailingBytes {
                packet: "item extra data",
                remaining: extra.remaining(),
            });
        }

        let stack = ItemStack {
            id,
            meta,
            count,
            block_runtime_id,
            nbt,
            can_place_on,
            can_destroy,
        };
        Ok((stack, Some(hooked)))
    }

    pub fn get_item_stack_without_stack_id(&mut self) -> Result<ItemStack> {
        if self.is_at_least(ProtocolVersion::PROTOCOL_1_16_220) {
            return self.get_item_stack(|_| Ok(())).map(|(stack, _)| stack);
        }

        let id = self.get_var_i32()?;
        if id == 0 {
            return Ok(ItemStack::null());
        }
        let aux = self.get_var_i32()?;
        let nbt = read_nbt_marker(self, NbtFlavor::Network)?;
        let can_place_on = self.read_list_signed(|input| input.get_string())?;
        let can_destroy = self.read_list_signed(|input| input.get_string())?;
        Ok(ItemStack {
            id,
            meta: (aux >> 8) as u32 & LEGACY_MAX_META,
            count: (aux & 0xff) as u16,
            block_runtime_id: 0,
            nbt,
            can_place_on,
            can_destroy,
        })
    }

    pub fn get_item_stack_wrapper(&mut self) -> Result<ItemStackWrapper> {
        ItemStackWrapper::read(self, false)
    }

    /// List counted by a zig-zag varint, as the inline legacy stack layout does.
    pub(crate) fn read_list_signed<T, F>(&mut self, read: F) -> Result<Vec<T>>
    where
        F: FnMut(&mut Self) -> Result<T>,
    {
        let raw = self.get_var_i32()?;
        let count = usize::try_from(raw)
            .map_err(|_| ProtocolError::InvalidValue(format!("negative list length {raw}")))?;
        let max = self.limits().max_list_length;
        if count > max {
            return Err(ProtocolError::OversizedValue {
                kind: "list",
                len: count,
                max,
            });
        }
        self.read_exact_list(count, read)
    }
}

impl PacketWriter {
    /// Mirror of [`PacketReader::get_item_stack`]; `stack_id_hook` runs only for
    /// non-air stacks.
    pub fn put_item_stack<F>(&mut self, stack: &ItemStack, stack_id_hook: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        self.put_var_i32(stack.id);
        if stack.is_null() {
            return Ok(());
        }
        self.put_u16_le(stack.count);
        self.put_var_u32(stack.meta);
        stack_id_hook(self)?;
        self.put_var_i32(stack.block_runtime_id);

        let mut extra = BinaryWriter::with_limits(self.limits());
        write_nbt_marker(&mut extra, NbtFlavor::LittleEndian, stack.nbt.as_ref())?;
        write_short_strings(&mut extra, &stack.can_place_on)?;
        write_short_strings(&mut extra, &stack.can_destroy)?;
        self.put_byte_string(extra.as_slice())
    }

    pub fn put_item_stack_without_stack_id(&mut self, stack: &ItemStack) -> Result<()> {
        if self.is_at_least(ProtocolVersion::PROTOCOL_1_16_220) {
            return self.put_item_stack(stack, |_| Ok(()));
        }

        self.put_var_i32(stack.id);
        if stack.is_null() {
            return Ok(());
        }
        if stack.count > 0xff {
            return Err(ProtocolError::InvalidValue(format!(
                "item count {} does not fit the legacy aux value",
                stack.count
            )));
        }
        if stack.meta > LEGACY_MAX_META {
            return Err(ProtocolError::InvalidValue(format!(
                "item meta {} does not fit the legacy aux value",
                stack.meta
            )));
        }
        self.put_var_i32(((stack.meta as i32) << 8) | i32::from(stack.count));
        write_nbt_marker(self, NbtFlavor::Network, stack.nbt.as_ref())?;
        for list in [&stack.can_place_on, &stack.can_destroy] {
            self.put_list_length_var_i32(list.len())?;
            for entry in list {
                self.put_string(entry)?;
            }
        }
        Ok(())
    }

    pub fn put_item_stack_wrapper(&mut self, wrapper: &ItemStackWrapper) -> Result<()> {
        wrapper.write(self, false)
    }
}

fn read_nbt_marker(reader: &mut BinaryReader<'_>, flavor: NbtFlavor) -> Result<Option<CompoundTag>> {
    match reader.get_u16_le()? {
        0 => Ok(None),
        NBT_PRESENT => {
            let version = reader.get_u8()?;
            if version != NBT_VERSION {
                return Err(ProtocolError::malformed(format!(
                    "{} {version}",
                    constants::ERR_ITEM_NBT_VERSION
                )));
            }
            let (_, root) = nbt::read_root(reader, flavor)?;
            Ok(Some(root))
        }
        other => Err(ProtocolError::malformed(format!(
            "{} {other:#06x}",
            constants::ERR_ITEM_NBT_MARKER
        ))),
    }
}

fn write_nbt_marker(
    writer: &mut BinaryWriter,
    flavor: NbtFlavor,
    nbt: Option<&CompoundTag>,
) -> Result<()> {
    match nbt {
        None => {
            writer.put_u16_le(0);
            Ok(())
        }
        Some(root) => {
            writer.put_u16_le(NBT_PRESENT);
            writer.put_u8(NBT_VERSION);
            nbt::write_root(writer, flavor, "", root)
        }
    }
}

/// `i32` count of strings, each with a `u16` length.
fn read_short_strings(reader: &mut BinaryReader<'_>) -> Result<Vec<String>> {
    let count = reader.get_list_length_i32_le()?;
    let mut out = Vec::with_capacity(count.min(64));
    for _ in 0..count {
        let len = usize::from(reader.get_u16_le()?);
        let bytes = reader.get_bytes(len)?;
        out.push(String::from_utf8(bytes.to_vec()).map_err(|_| ProtocolError::InvalidUtf8)?);
    }
    Ok(out)
}

fn write_short_strings(writer: &mut BinaryWriter, values: &[String]) -> Result<()> {
    writer.put_list_length_i32_le(values.len())?;
    for value in values {
        let len: u16 = writer.length_prefix("item string", value.len(), usize::from(u16::MAX))?;
        writer.put_u16_le(len);
        writer.put_bytes(value.as_bytes());
    }
    Ok(())
}
