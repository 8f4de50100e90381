use crate::core::serializer::{PacketReader, PacketWriter};
use crate::error::Result;
use crate::protocol::packet::Packet;

/// An actor finished a fall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorFallPacket {
    pub actor_runtime_id: u64,
    pub fall_distance: f32,
    pub in_void: bool,
}

impl ActorFallPacket {
    pub fn new(actor_runtime_id: u64, fall_distance: f32, in_void: bool) -> Self {
        Self {
            actor_runtime_id,
            fall_distance,
            in_void,
        }
    }
}

impl Packet for ActorFallPacket {
    const NETWORK_ID: u32 = 0x25;
    const NAME: &'static str = "ActorFallPacket";

    fn decode_payload(input: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            actor_runtime_id: input.get_actor_runtime_id()?,
            fall_distance: input.get_f32_le()?,
            in_void: input.get_bool()?,
        })
    }

    fn encode_payload(&self, out: &mut PacketWriter) -> Result<()> {
        out.put_actor_runtime_id(self.actor_runtime_id);
        out.put_f32_le(self.fall_distance);
        out.put_bool(self.in_void);
        Ok(())
    }
}
