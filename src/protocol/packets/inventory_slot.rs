use crate::core::serializer::{PacketReader, PacketWriter};
use crate::core::version::{ProtocolVersion, VersionGate};
use crate::error::Result;
use crate::protocol::packet::Packet;
use crate::types::item::{FullContainerName, ItemStackWrapper};

const CONTAINER_NAME: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_21_30);
const DYNAMIC_ID_ONLY: VersionGate = VersionGate::between(
    ProtocolVersion::PROTOCOL_1_21_20,
    ProtocolVersion::PROTOCOL_1_21_30,
);

/// Replaces the contents of one inventory slot.
#[derive(Debug, Clone, PartialEq)]
pub struct InventorySlotPacket {
    pub window_id: u32,
    pub inventory_slot: u32,
    /// Only the dynamic id is carried from 1.21.20 to 1.21.30; nothing before.
    pub container_name: FullContainerName,
    /// Not carried before 1.21.30.
    pub dynamic_container_size: u32,
    pub item: ItemStackWrapper,
}

impl InventorySlotPacket {
    pub fn new(window_id: u32, inventory_slot: u32, item: ItemStackWrapper) -> Self {
        Self {
            window_id,
            inventory_slot,
            container_name: FullContainerName::default(),
            dynamic_container_size: 0,
            item,
        }
    }

    pub fn with_container(mut self, container_name: FullContainerName, size: u32) -> Self {
        self.container_name = container_name;
        self.dynamic_container_size = size;
        self
    }
}

impl Packet for InventorySlotPacket {
    const NETWORK_ID: u32 = 0x32;
    const NAME: &'static str = "InventorySlotPacket";

    fn decode_payload(input: &mut PacketReader<'_>) -> Result<Self> {
        let window_id = input.get_var_u32()?;
        let inventory_slot = input.get_var_u32()?;
        let (mut container_name, dynamic_container_size) = input.read_gated_or(
            CONTAINER_NAME,
            (FullContainerName::default(), 0),
            |r| Ok((FullContainerName::read(r)?, r.get_var_u32()?)),
        )?;
        if let Some(dynamic_id) = input.read_gated(DYNAMIC_ID_ONLY, |r| r.get_var_u32())? {
            container_name = FullContainerName::new(0, Some(dynamic_id));
        }
        let item = input.get_item_stack_wrapper()?;
        Ok(Self {
            window_id,
            inventory_slot,
            container_name,
            dynamic_container_size,
            item,
        })
    }

    fn encode_payload(&self, out: &mut PacketWriter) -> Result<()> {
        out.put_var_u32(self.window_id);
        out.put_var_u32(self.inventory_slot);
        out.write_gated(CONTAINER_NAME, |w| {
            self.container_name.write(w)?;
            w.put_var_u32(self.dynamic_container_size);
            Ok(())
        })?;
        out.write_gated(DYNAMIC_ID_ONLY, |w| {
            w.put_var_u32(self.container_name.dynamic_id.unwrap_or(0));
            Ok(())
        })?;
        out.put_item_stack_wrapper(&self.item)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::types::item::ItemStack;

    fn stone(version: ProtocolVersion) -> ItemStackWrapper {
        let stack = ItemStack::new(1, 0, 64);
        if version.is_at_least(ProtocolVersion::PROTOCOL_1_16_220) {
            ItemStackWrapper::new(5, stack.with_block_runtime_id(2532))
        } else {
            ItemStackWrapper::legacy(stack)
        }
    }

    #[test]
    fn test_reads_back_across_revisions() {
        for version in [
            ProtocolVersion::PROTOCOL_1_14_60,
            ProtocolVersion::PROTOCOL_1_16_220,
            ProtocolVersion::PROTOCOL_1_21_30,
            ProtocolVersion::CURRENT,
        ] {
            let mut packet = InventorySlotPacket::new(0, 9, stone(version));
            if version.is_at_least(ProtocolVersion::PROTOCOL_1_21_30) {
                packet = packet.with_container(FullContainerName::new(28, Some(4)), 27);
            }
            let bytes = packet.to_payload(version).unwrap();
            assert_eq!(
                InventorySlotPacket::from_payload(&bytes, version).unwrap(),
                packet,
                "at {version}"
            );
        }
    }

    #[test]
    fn test_dynamic_id_only_revision() {
        let version = ProtocolVersion::PROTOCOL_1_21_20;
        let packet = InventorySlotPacket::new(1, 2, ItemStackWrapper::default())
            .with_container(FullContainerName::new(0, Some(300)), 0);
        let bytes = packet.to_payload(version).unwrap();
        // window, slot, dynamic id as uvarint, then air
        assert_eq!(bytes, [1, 2, 0xAC, 0x02, 0]);
        assert_eq!(
            InventorySlotPacket::from_payload(&bytes, version).unwrap(),
            packet
        );
    }

    #[test]
    fn test_container_fields_dropped_on_old_revisions() {
        let packet = InventorySlotPacket::new(1, 2, ItemStackWrapper::default())
            .with_container(FullContainerName::new(7, Some(1)), 9);
        let bytes = packet.to_payload(ProtocolVersion::PROTOCOL_1_21_2).unwrap();
        assert_eq!(bytes, [1, 2, 0]);
    }
}
