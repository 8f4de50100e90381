use uuid::Uuid;

use crate::core::serializer::{PacketReader, PacketWriter};
use crate::core::version::{ProtocolVersion, VersionGate};
use crate::error::Result;
use crate::protocol::packet::Packet;
use crate::types::skin::SkinData;

const VERIFIED: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_14_60);

/// A player changed skin.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSkinPacket {
    pub uuid: Uuid,
    pub old_skin_name: String,
    pub new_skin_name: String,
    pub skin: SkinData,
}

impl PlayerSkinPacket {
    pub fn new(uuid: Uuid, skin: SkinData) -> Self {
        Self {
            uuid,
            old_skin_name: String::new(),
            new_skin_name: String::new(),
            skin,
        }
    }
}

impl Packet for PlayerSkinPacket {
    const NETWORK_ID: u32 = 0x5D;
    const NAME: &'static str = "PlayerSkinPacket";

    fn decode_payload(input: &mut PacketReader<'_>) -> Result<Self> {
        let uuid = input.get_uuid()?;
        if input.is_at_least(ProtocolVersion::PROTOCOL_1_13_0) {
            let mut skin = input.get_skin()?;
            let new_skin_name = input.get_string()?;
            let old_skin_name = input.get_string()?;
            skin.verified = input.read_gated_or(VERIFIED, false, |r| r.get_bool())?;
            return Ok(Self {
                uuid,
                old_skin_name,
                new_skin_name,
                skin,
            });
        }

        // the legacy skin layout has no id or premium flag of its own
        let skin_id = input.get_string()?;
        let new_skin_name = input.get_string()?;
        let old_skin_name = input.get_string()?;
        let mut skin = input.get_skin()?;
        skin.skin_id = skin_id;
        skin.premium = input.get_bool()?;
        Ok(Self {
            uuid,
            old_skin_name,
            new_skin_name,
            skin,
        })
    }

    fn encode_payload(&self, out: &mut PacketWriter) -> Result<()> {
        out.put_uuid(&self.uuid);
        if out.is_at_least(ProtocolVersion::PROTOCOL_1_13_0) {
            out.put_skin(&self.skin)?;
            out.put_string(&self.new_skin_name)?;
            out.put_string(&self.old_skin_name)?;
            return out.write_gated(VERIFIED, |w| {
                w.put_bool(self.skin.verified);
                Ok(())
            });
        }

        out.put_string(&self.skin.skin_id)?;
        out.put_string(&self.new_skin_name)?;
        out.put_string(&self.old_skin_name)?;
        out.put_skin(&self.skin)?;
        out.put_bool(self.skin.premium);
        Ok(())
    }
}
