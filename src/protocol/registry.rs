//! Static id table for the packets this crate understands.

use std::fmt;

use crate::core::serializer::PacketReader;
use crate::error::Result;
use crate::protocol::envelope::GamePacket;
use crate::protocol::packet::Packet;
use crate::protocol::packets::*;

type DecodeFn = fn(&mut PacketReader<'_>) -> Result<GamePacket>;

/// One registered packet kind.
#[derive(Clone, Copy)]
pub struct RegistryEntry {
    pub id: u32,
    pub name: &'static str,
    pub decode: DecodeFn,
}

impl fmt::Debug for RegistryEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryEntry")
            .field("id", &format_args!("{:#x}", self.id))
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

fn decode_as<P>(input: &mut PacketReader<'_>) -> Result<GamePacket>
where
    P: Packet,
    GamePacket: From<P>,
{
    P::decode_payload(input).map(GamePacket::from)
}

const fn entry<P>() -> RegistryEntry
where
    P: Packet,
    GamePacket: From<P>,
{
    RegistryEntry {
        id: P::NETWORK_ID,
        name: P::NAME,
        decode: decode_as::<P>,
    }
}

// sorted by id for binary search
static ENTRIES: [RegistryEntry; 8] = [
    entry::<ResourcePacksInfoPacket>(),
    entry::<ResourcePackStackPacket>(),
    entry::<ActorFallPacket>(),
    entry::<InventorySlotPacket>(),
    entry::<PlayerListPacket>(),
    entry::<PlayerSkinPacket>(),
    entry::<PlayerAuthInputPacket>(),
    entry::<CameraInstructionPacket>(),
];

/// Lookup over the static packet table.
pub struct PacketRegistry;

impl PacketRegistry {
    pub fn lookup(id: u32) -> Option<&'static RegistryEntry> {
        ENTRIES
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &ENTRIES[i])
    }

    pub fn name_of(id: u32) -> Option<&'static str> {
        Self::lookup(id).map(|e| e.name)
    }

    pub fn is_registered(id: u32) -> bool {
        Self::lookup(id).is_some()
    }

    /// Registered ids, ascending.
    pub fn ids() -> impl Iterator<Item = u32> {
        ENTRIES.iter().map(|e| e.id)
    }

    pub fn entries() -> &'static [RegistryEntry] {
        &ENTRIES
    }
}
