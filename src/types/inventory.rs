//! Inventory transaction pieces embedded in player input.

use crate::core::serializer::{PacketReader, PacketWriter};
use crate::core::version::{ProtocolVersion, VersionGate};
use crate::error::{ProtocolError, Result};
use crate::types::item::{FullContainerName, ItemStackWrapper};
use crate::types::math::{BlockPosition, Vec3};

const FULL_CONTAINER_NAME: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_21_20);
const TRIGGER_TYPE: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_21_20);

/// Where an inventory action's items come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventorySource {
    Container { window_id: i32 },
    Global,
    WorldInteraction { flags: u32 },
    Creative,
    /// Placeholder source the client uses for crafting-grid style slots.
    Todo { window_id: i32 },
}

impl InventorySource {
    const CONTAINER: u32 = 0;
    const GLOBAL: u32 = 1;
    const WORLD_INTERACTION: u32 = 2;
    const CREATIVE: u32 = 3;
    const TODO: u32 = 99999;

    fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        Ok(match input.get_var_u32()? {
            Self::CONTAINER => InventorySource::Container {
                window_id: input.get_var_i32()?,
            },
            Self::GLOBAL => InventorySource::Global,
            Self::WORLD_INTERACTION => InventorySource::WorldInteraction {
                flags: input.get_var_u32()?,
            },
            Self::CREATIVE => InventorySource::Creative,
            Self::TODO => InventorySource::Todo {
                window_id: input.get_var_i32()?,
            },
            other => {
                return Err(ProtocolError::UnknownEnumValue {
                    kind: "inventory source type",
                    value: i64::from(other),
                })
            }
        })
    }

    fn write(&self, out: &mut PacketWriter) {
        match self {
            InventorySource::Container { window_id } => {
                out.put_var_u32(Self::CONTAINER);
                out.put_var_i32(*window_id);
            }
            InventorySource::Global => out.put_var_u32(Self::GLOBAL),
            InventorySource::WorldInteraction { flags } => {
                out.put_var_u32(Self::WORLD_INTERACTION);
                out.put_var_u32(*flags);
            }
            InventorySource::Creative => out.put_var_u32(Self::CREATIVE),
            InventorySource::Todo { window_id } => {
                out.put_var_u32(Self::TODO);
                out.put_var_i32(*window_id);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NetworkInventoryAction {
    pub source: InventorySource,
    pub inventory_slot: u32,
    pub old_item: ItemStackWrapper,
    pub new_item: ItemStackWrapper,
}

impl NetworkInventoryAction {
    pub fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            source: InventorySource::read(input)?,
            inventory_slot: input.get_var_u32()?,
            old_item: ItemStackWrapper::read(input, false)?,
            new_item: ItemStackWrapper::read(input, false)?,
        })
    }

    pub fn write(&self, out: &mut PacketWriter) -> Result<()> {
        self.source.write(out);
        out.put_var_u32(self.inventory_slot);
        self.old_item.write(out, false)?;
        self.new_item.write(out, false)
    }
}

/// Slots the client has already changed locally for a pending request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedSlots {
    pub container_name: FullContainerName,
    pub slots: Vec<u8>,
}

impl ChangedSlots {
    pub fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        let container_name = match input.read_gated(FULL_CONTAINER_NAME, FullContainerName::read)? {
            Some(name) => name,
            None => FullContainerName::new(input.get_u8()?, None),
        };
        let slots = input.get_byte_string()?.to_vec();
        Ok(Self {
            container_name,
            slots,
        })
    }

    pub fn write(&self, out: &mut PacketWriter) -> Result<()> {
        if FULL_CONTAINER_NAME.applies(out.version()) {
            self.container_name.write(out)?;
        } else {
            out.put_u8(self.container_name.container_id);
        }
        out.put_byte_string(&self.slots)?;
        Ok(())
    }
}

/// Using the held item on a block or in the air.
#[derive(Debug, Clone, PartialEq)]
pub struct UseItemTransactionData {
    pub action_type: u32,
    /// Not carried before 1.21.20.
    pub trigger_type: u32,
    pub block_position: BlockPosition,
    pub face: i32,
    pub hotbar_slot: i32,
    pub item_in_hand: ItemStackWrapper,
    pub player_position: Vec3,
    pub click_position: Vec3,
    pub block_runtime_id: u32,
    /// Not carried before 1.21.20.
    pub client_interact_prediction: u32,
}

impl UseItemTransactionData {
    pub const ACTION_CLICK_BLOCK: u32 = 0;
    pub const ACTION_CLICK_AIR: u32 = 1;
    pub const ACTION_BREAK_BLOCK: u32 = 2;

    pub fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        let action_type = input.get_var_u32()?;
        let trigger_type = input.read_gated_or(TRIGGER_TYPE, 0, |r| r.get_var_u32())?;
        let block_position = input.get_block_position()?;
        let face = input.get_var_i32()?;
        let hotbar_slot = input.get_var_i32()?;
        let item_in_hand = ItemStackWrapper::read(input, false)?;
        let player_position = input.get_vector3()?;
        let click_position = input.get_vector3()?;
        let block_runtime_id = input.get_var_u32()?;
        let client_interact_prediction =
            input.read_gated_or(TRIGGER_TYPE, 0, |r| r.get_var_u32())?;
        Ok(Self {
            action_type,
            trigger_type,
            block_position,
            face,
            hotbar_slot,
            item_in_hand,
            player_position,
            click_position,
            block_runtime_id,
            client_interact_prediction,
        })
    }

    pub fn write(&self, out: &mut PacketWriter) -> Result<()> {
        out.put_var_u32(self.action_type);
        out.write_gated(TRIGGER_TYPE, |w| {
            w.put_var_u32(self.trigger_type);
            Ok(())
        })?;
        out.put_block_position(&self.block_position);
        out.put_var_i32(self.face);
        out.put_var_i32(self.hotbar_slot);
        self.item_in_hand.write(out, false)?;
        out.put_vector3(&self.player_position);
        out.put_vector3(&self.click_position);
        out.put_var_u32(self.block_runtime_id);
        out.write_gated(TRIGGER_TYPE, |w| {
            w.put_var_u32(self.client_interact_prediction);
            Ok(())
        })
    }
}

/// Item use reported through player input instead of a separate transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemInteractionData {
    pub request_id: i32,
    /// Only sent when `request_id` is non-zero.
    pub request_changed_slots: Vec<ChangedSlots>,
    pub actions: Vec<NetworkInventoryAction>,
    pub transaction: UseItemTransactionData,
}

impl ItemInteractionData {
    pub fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        let request_id = input.get_var_i32()?;
        let request_changed_slots = if request_id != 0 {
            input.read_list(ChangedSlots::read)?
        } else {
            Vec::new()
        };
        let actions = input.read_list(NetworkInventoryAction::read)?;
        let transaction = UseItemTransactionData::read(input)?;
        Ok(Self {
            request_id,
            request_changed_slots,
            actions,
            transaction,
        })
    }

    pub fn write(&self, out: &mut PacketWriter) -> Result<()> {
        out.put_var_i32(self.request_id);
        if self.request_id != 0 {
            out.write_list(&self.request_changed_slots, |w, s| s.write(w))?;
        }
        out.write_list(&self.actions, |w, a| a.write(w))?;
        self.transaction.write(out)
    }
}
