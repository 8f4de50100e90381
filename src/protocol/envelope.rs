//! # Packet Envelope
//!
//! Outer framing shared by every packet:
//!
//! ```text
//! [uvarint header][payload]
//!
//! header = packet_id | sender_sub_id << 10 | recipient_sub_id << 12
//!          (10-bit id, 2-bit sub-client ids)
//! ```
//!
//! Decoding looks the id up in the [`registry`](super::registry) before touching the
//! payload, so an unknown id fails with [`ProtocolError::UnknownPacketId`] having read
//! nothing but the header. A frame must be consumed exactly; leftover bytes are a
//! [`ProtocolError::TrailingBytes`] error.

use bytes::Bytes;
use tracing::{debug, instrument};

use crate::core::binary::{BinaryReader, BinaryWriter, CodecLimits};
use crate::core::serializer::{PacketReader, PacketWriter};
use crate::core::version::ProtocolVersion;
use crate::error::{ProtocolError, Result};
use crate::protocol::handler::PacketHandler;
use crate::protocol::packet::Packet;
use crate::protocol::packets::*;
use crate::protocol::registry::PacketRegistry;

const PID_MASK: u32 = 0x3FF;
const SUB_CLIENT_MASK: u32 = 0x03;
const SENDER_SUB_CLIENT_SHIFT: u32 = 10;
const RECIPIENT_SUB_CLIENT_SHIFT: u32 = 12;

/// Decoded packet header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PacketHeader {
    pub packet_id: u32,
    pub sender_sub_id: u8,
    pub recipient_sub_id: u8,
}

impl PacketHeader {
    /// Header for the primary client on both ends.
    pub fn new(packet_id: u32) -> Self {
        Self {
            packet_id,
            sender_sub_id: 0,
            recipient_sub_id: 0,
        }
    }

    pub fn with_sub_ids(mut self, sender_sub_id: u8, recipient_sub_id: u8) -> Self {
        self.sender_sub_id = sender_sub_id;
        self.recipient_sub_id = recipient_sub_id;
        self
    }

    pub fn read(reader: &mut BinaryReader<'_>) -> Result<Self> {
        let raw = reader.get_var_u32()?;
        Ok(Self {
            packet_id: raw & PID_MASK,
            sender_sub_id: ((raw >> SENDER_SUB_CLIENT_SHIFT) & SUB_CLIENT_MASK) as u8,
            recipient_sub_id: ((raw >> RECIPIENT_SUB_CLIENT_SHIFT) & SUB_CLIENT_MASK) as u8,
        })
    }

    /// Ids wider than 10 bits and sub ids wider than 2 bits are rejected rather than
    /// silently masked.
    pub fn write(&self, writer: &mut BinaryWriter) -> Result<()> {
        if self.packet_id > PID_MASK {
            return Err(ProtocolError::InvalidValue(format!(
                "packet id {:#x} does not fit in 10 bits",
                self.packet_id
            )));
        }
        for sub_id in [self.sender_sub_id, self.recipient_sub_id] {
            if u32::from(sub_id) > SUB_CLIENT_MASK {
                return Err(ProtocolError::InvalidValue(format!(
                    "sub-client id {sub_id} does not fit in 2 bits"
                )));
            }
        }
        writer.put_var_u32(
            self.packet_id
                | u32::from(self.sender_sub_id) << SENDER_SUB_CLIENT_SHIFT
                | u32::from(self.recipient_sub_id) << RECIPIENT_SUB_CLIENT_SHIFT,
        );
        Ok(())
    }
}

/// Every packet kind this crate can decode and encode.
#[derive(Debug, Clone, PartialEq)]
pub enum GamePacket {
    ResourcePacksInfo(ResourcePacksInfoPacket),
    ResourcePackStack(ResourcePackStackPacket),
    ActorFall(ActorFallPacket),
    InventorySlot(InventorySlotPacket),
    PlayerList(PlayerListPacket),
    PlayerSkin(PlayerSkinPacket),
    PlayerAuthInput(Box<PlayerAuthInputPacket>),
    CameraInstruction(CameraInstructionPacket),
}

macro_rules! impl_from_packet {
    ($($variant:ident($ty:ty)),+ $(,)?) => {
        $(
            impl From<$ty> for GamePacket {
                fn from(packet: $ty) -> Self {
                    GamePacket::$variant(packet.into())
                }
            }
        )+
    };
}

impl_from_packet!(
    ResourcePacksInfo(ResourcePacksInfoPacket),
    ResourcePackStack(ResourcePackStackPacket),
    ActorFall(ActorFallPacket),
    InventorySlot(InventorySlotPacket),
    PlayerList(PlayerListPacket),
    PlayerSkin(PlayerSkinPacket),
    PlayerAuthInput(PlayerAuthInputPacket),
    CameraInstruction(CameraInstructionPacket),
);

impl GamePacket {
    pub fn id(&self) -> u32 {
        match self {
            GamePacket::ResourcePacksInfo(_) => ResourcePacksInfoPacket::NETWORK_ID,
            GamePacket::ResourcePackStack(_) => ResourcePackStackPacket::NETWORK_ID,
            GamePacket::ActorFall(_) => ActorFallPacket::NETWORK_ID,
            GamePacket::InventorySlot(_) => InventorySlotPacket::NETWORK_ID,
            GamePacket::PlayerList(_) => PlayerListPacket::NETWORK_ID,
            GamePacket::PlayerSkin(_) => PlayerSkinPacket::NETWORK_ID,
            GamePacket::PlayerAuthInput(_) => PlayerAuthInputPacket::NETWORK_ID,
            GamePacket::CameraInstruction(_) => CameraInstructionPacket::NETWORK_ID,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            GamePacket::ResourcePacksInfo(_) => ResourcePacksInfoPacket::NAME,
            GamePacket::ResourcePackStack(_) => ResourcePackStackPacket::NAME,
            GamePacket::ActorFall(_) => ActorFallPacket::NAME,
            GamePacket::InventorySlot(_) => InventorySlotPacket::NAME,
            GamePacket::PlayerList(_) => PlayerListPacket::NAME,
            GamePacket::PlayerSkin(_) => PlayerSkinPacket::NAME,
            GamePacket::PlayerAuthInput(_) => PlayerAuthInputPacket::NAME,
            GamePacket::CameraInstruction(_) => CameraInstructionPacket::NAME,
        }
    }

    /// Decode one frame with the default limits, discarding the sub-client ids.
    pub fn decode(bytes: &[u8], version: ProtocolVersion) -> Result<Self> {
        Self::decode_with_limits(bytes, version, CodecLimits::default())
    }

    pub fn decode_with_limits(
        bytes: &[u8],
        version: ProtocolVersion,
        limits: CodecLimits,
    ) -> Result<Self> {
        Self::decode_frame(bytes, version, limits).map(|(_, packet)| packet)
    }

    /// Decode one frame, keeping its header.
    #[instrument(level = "debug", skip(bytes, limits), fields(len = bytes.len(), version = %version))]
    pub fn decode_frame(
        bytes: &[u8],
        version: ProtocolVersion,
        limits: CodecLimits,
    ) -> Result<(PacketHeader, Self)> {
        let mut input = PacketReader::with_limits(bytes, version, limits);
        let header = PacketHeader::read(&mut input)?;
        let entry = PacketRegistry::lookup(header.packet_id)
            .ok_or(ProtocolError::UnknownPacketId(header.packet_id))?;
        let packet = (entry.decode)(&mut input)?;
        if !input.is_at_end() {
            return Err(ProtocolError::TrailingBytes {
                packet: entry.name,
                remaining: input.remaining(),
            });
        }
        debug!(packet = entry.name, id = header.packet_id, "decoded packet");
        Ok((header, packet))
    }

    /// Encode header and payload for the primary client.
    pub fn encode(&self, version: ProtocolVersion) -> Result<Bytes> {
        self.encode_with_header(version, 0, 0)
    }

    /// Like [`encode`](Self::encode), holding length prefixes to `limits`.
    pub fn encode_with_limits(&self, version: ProtocolVersion, limits: CodecLimits) -> Result<Bytes> {
        self.write_frame(PacketWriter::with_limits(version, limits), 0, 0)
    }

    pub fn encode_with_header(
        &self,
        version: ProtocolVersion,
        sender_sub_id: u8,
        recipient_sub_id: u8,
    ) -> Result<Bytes> {
        self.write_frame(PacketWriter::new(version), sender_sub_id, recipient_sub_id)
    }

    #[instrument(level = "debug", skip(self, out), fields(packet = self.name(), version = %out.version()))]
    fn write_frame(
        &self,
        mut out: PacketWriter,
        sender_sub_id: u8,
        recipient_sub_id: u8,
    ) -> Result<Bytes> {
        PacketHeader::new(self.id())
            .with_sub_ids(sender_sub_id, recipient_sub_id)
            .write(&mut out)?;
        match self {
            GamePacket::ResourcePacksInfo(p) => p.encode_payload(&mut out)?,
            GamePacket::ResourcePackStack(p) => p.encode_payload(&mut out)?,
            GamePacket::ActorFall(p) => p.encode_payload(&mut out)?,
            GamePacket::InventorySlot(p) => p.encode_payload(&mut out)?,
            GamePacket::PlayerList(p) => p.encode_payload(&mut out)?,
            GamePacket::PlayerSkin(p) => p.encode_payload(&mut out)?,
            GamePacket::PlayerAuthInput(p) => p.encode_payload(&mut out)?,
            GamePacket::CameraInstruction(p) => p.encode_payload(&mut out)?,
        }
        let bytes = out.into_bytes();
        debug!(len = bytes.len(), "encoded packet");
        Ok(bytes)
    }

    /// Hand the packet to the one handler method for its kind.
    pub fn handle(&self, handler: &mut dyn PacketHandler) -> bool {
        match self {
            GamePacket::ResourcePacksInfo(p) => handler.handle_resource_packs_info(p),
            GamePacket::ResourcePackStack(p) => handler.handle_resource_pack_stack(p),
            GamePacket::ActorFall(p) => handler.handle_actor_fall(p),
            GamePacket::InventorySlot(p) => handler.handle_inventory_slot(p),
            GamePacket::PlayerList(p) => handler.handle_player_list(p),
            GamePacket::PlayerSkin(p) => handler.handle_player_skin(p),
            GamePacket::PlayerAuthInput(p) => handler.handle_player_auth_input(p),
            GamePacket::CameraInstruction(p) => handler.handle_camera_instruction(p),
        }
    }
}
