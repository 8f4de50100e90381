//! Item stacks and inventory addressing.

use crate::core::serializer::{PacketReader, PacketWriter};
use crate::core::version::{ProtocolVersion, VersionGate};
use crate::error::Result;
use crate::nbt::CompoundTag;

/// One stack of items as the network sees it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemStack {
    pub id: i32,
    pub meta: u32,
    pub count: u16,
    /// Not carried before 1.16.220.
    pub block_runtime_id: i32,
    pub nbt: Option<CompoundTag>,
    pub can_place_on: Vec<String>,
    pub can_destroy: Vec<String>,
}

impl ItemStack {
    /// The empty ("air") stack.
    pub fn null() -> Self {
        Self::default()
    }

    pub fn new(id: i32, meta: u32, count: u16) -> Self {
        Self {
            id,
            meta,
            count,
            ..Self::default()
        }
    }

    pub fn is_null(&self) -> bool {
        self.id == 0
    }

    pub fn with_block_runtime_id(mut self, block_runtime_id: i32) -> Self {
        self.block_runtime_id = block_runtime_id;
        self
    }

    pub fn with_nbt(mut self, nbt: CompoundTag) -> Self {
        self.nbt = Some(nbt);
        self
    }
}

/// Item stack plus the server-assigned stack id the client echoes back.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ItemStackWrapper {
    pub stack_id: i32,
    pub item_stack: ItemStack,
}

impl ItemStackWrapper {
    pub fn new(stack_id: i32, item_stack: ItemStack) -> Self {
        Self {
            stack_id,
            item_stack,
        }
    }

    /// Wrapper for revisions that carried no stack id at all. Any non-air stack gets
    /// id 1 so it still reads as "present".
    pub fn legacy(item_stack: ItemStack) -> Self {
        let stack_id = if item_stack.is_null() { 0 } else { 1 };
        Self::new(stack_id, item_stack)
    }

    /// `has_legacy_net_id` selects the 1.16.0 to 1.16.210 layout that sent the id up
    /// front, used by a handful of inventory packets.
    pub fn read(input: &mut PacketReader<'_>, has_legacy_net_id: bool) -> Result<Self> {
        if input.is_at_least(ProtocolVersion::PROTOCOL_1_16_220) {
            let (item_stack, stack_id) = input.get_item_stack(|input| {
                input.read_optional(|input| input.get_generic_type_network_id())
            })?;
            return Ok(Self::new(stack_id.flatten().unwrap_or(0), item_stack));
        }
        if input.is_at_least(ProtocolVersion::PROTOCOL_1_16_0) && has_legacy_net_id {
            let stack_id = input.get_generic_type_network_id()?;
            let item_stack = input.get_item_stack_without_stack_id()?;
            return Ok(Self::new(stack_id, item_stack));
        }
        Ok(Self::legacy(input.get_item_stack_without_stack_id()?))
    }

    pub fn write(&self, out: &mut PacketWriter, has_legacy_net_id: bool) -> Result<()> {
        if out.is_at_least(ProtocolVersion::PROTOCOL_1_16_220) {
            let stack_id = (self.stack_id != 0).then_some(self.stack_id);
            return out.put_item_stack(&self.item_stack, |out| {
                out.write_optional(stack_id.as_ref(), |out, id| {
                    out.put_generic_type_network_id(*id);
                    Ok(())
                })
            });
        }
        if out.is_at_least(ProtocolVersion::PROTOCOL_1_16_0) && has_legacy_net_id {
            out.put_generic_type_network_id(self.stack_id);
        }
        out.put_item_stack_without_stack_id(&self.item_stack)
    }
}

/// Container id plus the optional id of a dynamically sized container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FullContainerName {
    pub container_id: u8,
    pub dynamic_id: Option<u32>,
}

const DYNAMIC_ID_OPTIONAL: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_21_30);
const DYNAMIC_ID_PLAIN: VersionGate = VersionGate::between(
    ProtocolVersion::PROTOCOL_1_21_20,
    ProtocolVersion::PROTOCOL_1_21_30,
);

impl FullContainerName {
    pub fn new(container_id: u8, dynamic_id: Option<u32>) -> Self {
        Self {
            container_id,
            dynamic_id,
        }
    }

    pub fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        let container_id = input.get_u8()?;
        let mut dynamic_id = input
            .read_gated(DYNAMIC_ID_OPTIONAL, |input| {
                input.read_optional(|input| input.get_u32_le())
            })?
            .flatten();
        if let Some(id) = input.read_gated(DYNAMIC_ID_PLAIN, |input| input.get_u32_le())? {
            dynamic_id = Some(id);
        }
        Ok(Self::new(container_id, dynamic_id))
    }

    pub fn write(&self, out: &mut PacketWriter) -> Result<()> {
        out.put_u8(self.container_id);
        out.write_gated(DYNAMIC_ID_OPTIONAL, |out| {
            out.write_optional(self.dynamic_id.as_ref(), |out, id| {
                out.put_u32_le(*id);
                Ok(())
            })
        })?;
        out.write_gated(DYNAMIC_ID_PLAIN, |out| {
            out.put_u32_le(self.dynamic_id.unwrap_or(0));
            Ok(())
        })
    }
}
