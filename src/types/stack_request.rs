//! Item stack requests: the client asking the server to move items between slots.
//!
//! Only the slot-to-slot actions are modelled. Crafting and trading actions are
//! rejected as unknown discriminants.

use crate::core::serializer::{PacketReader, PacketWriter};
use crate::core::version::{ProtocolVersion, VersionGate};
use crate::error::{ProtocolError, Result};
use crate::types::item::FullContainerName;

const FULL_CONTAINER_NAME: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_21_20);
const FILTER_STRINGS: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_16_200);
const FILTER_STRING_CAUSE: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_19_10);

/// A slot addressed by a stack request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemStackRequestSlotInfo {
    pub container_name: FullContainerName,
    pub slot_id: u8,
    pub stack_id: i32,
}

impl ItemStackRequestSlotInfo {
    pub fn new(container_name: FullContainerName, slot_id: u8, stack_id: i32) -> Self {
        Self {
            container_name,
            slot_id,
            stack_id,
        }
    }

    pub fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        let container_name = match input.read_gated(FULL_CONTAINER_NAME, FullContainerName::read)? {
            Some(name) => name,
            None => FullContainerName::new(input.get_u8()?, None),
        };
        let slot_id = input.get_u8()?;
        let stack_id = input.get_var_i32()?;
        Ok(Self::new(container_name, slot_id, stack_id))
    }

    pub fn write(&self, out: &mut PacketWriter) -> Result<()> {
        if FULL_CONTAINER_NAME.applies(out.version()) {
            self.container_name.write(out)?;
        } else {
            out.put_u8(self.container_name.container_id);
        }
        out.put_u8(self.slot_id);
        out.put_var_i32(self.stack_id);
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemStackRequestAction {
    Take {
        count: u8,
        source: ItemStackRequestSlotInfo,
        destination: ItemStackRequestSlotInfo,
    },
    Place {
        count: u8,
        source: ItemStackRequestSlotInfo,
        destination: ItemStackRequestSlotInfo,
    },
    Swap {
        slot1: ItemStackRequestSlotInfo,
        slot2: ItemStackRequestSlotInfo,
    },
    Drop {
        count: u8,
        source: ItemStackRequestSlotInfo,
        randomly: bool,
    },
    Destroy {
        count: u8,
        source: ItemStackRequestSlotInfo,
    },
    CraftingConsumeInput {
        count: u8,
        source: ItemStackRequestSlotInfo,
    },
}

impl ItemStackRequestAction {
    const TAKE: u8 = 0;
    const PLACE: u8 = 1;
    const SWAP: u8 = 2;
    const DROP: u8 = 3;
    const DESTROY: u8 = 4;
    const CRAFTING_CONSUME_INPUT: u8 = 5;

    pub fn type_id(&self) -> u8 {
        match self {
            ItemStackRequestAction::Take { .. } => Self::TAKE,
            ItemStackRequestAction::Place { .. } => Self::PLACE,
            ItemStackRequestAction::Swap { .. } => Self::SWAP,
            ItemStackRequestAction::Drop { .. } => Self::DROP,
            ItemStackRequestAction::Destroy { .. } => Self::DESTROY,
            ItemStackRequestAction::CraftingConsumeInput { .. } => Self::CRAFTING_CONSUME_INPUT,
        }
    }

    pub fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        Ok(match input.get_u8()? {
            Self::TAKE => ItemStackRequestAction::Take {
                count: input.get_u8()?,
                source: ItemStackRequestSlotInfo::read(input)?,
                destination: ItemStackRequestSlotInfo::read(input)?,
            },
            Self::PLACE => ItemStackRequestAction::Place {
                count: input.get_u8()?,
                source: ItemStackRequestSlotInfo::read(input)?,
                destination: ItemStackRequestSlotInfo::read(input)?,
            },
            Self::SWAP => ItemStackRequestAction::Swap {
                slot1: ItemStackRequestSlotInfo::read(input)?,
                slot2: ItemStackRequestSlotInfo::read(input)?,
            },
            Self::DROP => ItemStackRequestAction::Drop {
                count: input.get_u8()?,
                source: ItemStackRequestSlotInfo::read(input)?,
                randomly: input.get_bool()?,
            },
            Self::DESTROY => ItemStackRequestAction::Destroy {
                count: input.get_u8()?,
                source: ItemStackRequestSlotInfo::read(input)?,
            },
            Self::CRAFTING_CONSUME_INPUT => ItemStackRequestAction::CraftingConsumeInput {
                count: input.get_u8()?,
                source: ItemStackRequestSlotInfo::read(input)?,
            },
            other => {
                return Err(ProtocolError::UnknownEnumValue {
                    kind: "item stack request action",
                    value: i64::from(other),
                })
            }
        })
    }

    pub fn write(&self, out: &mut PacketWriter) -> Result<()> {
        out.put_u8(self.type_id());
        match self {
            ItemStackRequestAction::Take {
                count,
                source,
                destination,
            }
            | ItemStackRequestAction::Place {
                count,
                source,
                destination,
            } => {
                out.put_u8(*count);
                source.write(out)?;
                destination.write(out)
            }
            ItemStackRequestAction::Swap { slot1, slot2 } => {
                slot1.write(out)?;
                slot2.write(out)
            }
            ItemStackRequestAction::Drop {
                count,
                source,
                randomly,
            } => {
                out.put_u8(*count);
                source.write(out)?;
                out.put_bool(*randomly);
                Ok(())
            }
            ItemStackRequestAction::Destroy { count, source }
            | ItemStackRequestAction::CraftingConsumeInput { count, source } => {
                out.put_u8(*count);
                source.write(out)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemStackRequest {
    pub request_id: i32,
    pub actions: Vec<ItemStackRequestAction>,
    /// Not carried before 1.16.200.
    pub filter_strings: Vec<String>,
    /// Not carried before 1.19.10.
    pub filter_string_cause: i32,
}

impl ItemStackRequest {
    pub fn new(request_id: i32, actions: Vec<ItemStackRequestAction>) -> Self {
        Self {
            request_id,
            actions,
            filter_strings: Vec::new(),
            filter_string_cause: 0,
        }
    }

    pub fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        let request_id = input.get_var_i32()?;
        let actions = input.read_list(ItemStackRequestAction::read)?;
        let filter_strings =
            input.read_gated_or(FILTER_STRINGS, Vec::new(), |r| r.read_list(|r| r.get_string()))?;
        let filter_string_cause = input.read_gated_or(FILTER_STRING_CAUSE, 0, |r| r.get_i32_le())?;
        Ok(Self {
            request_id,
            actions,
            filter_strings,
            filter_string_cause,
        })
    }

    pub fn write(&self, out: &mut PacketWriter) -> Result<()> {
        out.put_var_i32(self.request_id);
        out.write_list(&self.actions, |w, a| a.write(w))?;
        out.write_gated(FILTER_STRINGS, |w| {
            w.write_list(&self.filter_strings, |w, s| {
                w.put_string(s)?;
                Ok(())
            })
        })?;
        out.write_gated(FILTER_STRING_CAUSE, |w| {
            w.put_i32_le(self.filter_string_cause);
            Ok(())
        })
    }
}
