use uuid::Uuid;

use crate::core::serializer::{PacketReader, PacketWriter};
use crate::error::{ProtocolError, Result};
use crate::protocol::packet::Packet;
use crate::types::skin::SkinData;

const TYPE_ADD: u8 = 0;
const TYPE_REMOVE: u8 = 1;

/// A player shown in the tab list.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerListAdditionEntry {
    pub uuid: Uuid,
    pub actor_unique_id: i64,
    pub username: String,
    pub xbox_user_id: String,
    pub platform_chat_id: String,
    pub build_platform: i32,
    /// `verified` travels in a block after all entries.
    pub skin_data: SkinData,
    pub is_teacher: bool,
    pub is_host: bool,
}

impl PlayerListAdditionEntry {
    pub fn new(
        uuid: Uuid,
        actor_unique_id: i64,
        username: impl Into<String>,
        skin_data: SkinData,
    ) -> Self {
        Self {
            uuid,
            actor_unique_id,
            username: username.into(),
            xbox_user_id: String::new(),
            platform_chat_id: String::new(),
            build_platform: -1,
            skin_data,
            is_teacher: false,
            is_host: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerListAction {
    Add(Vec<PlayerListAdditionEntry>),
    Remove(Vec<Uuid>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerListPacket {
    pub action: PlayerListAction,
}

impl PlayerListPacket {
    pub fn add(entries: Vec<PlayerListAdditionEntry>) -> Self {
        Self {
            action: PlayerListAction::Add(entries),
        }
    }

    pub fn remove(uuids: Vec<Uuid>) -> Self {
        Self {
            action: PlayerListAction::Remove(uuids),
        }
    }
}

impl Packet for PlayerListPacket {
    const NETWORK_ID: u32 = 0x3F;
    const NAME: &'static str = "PlayerListPacket";

    fn decode_payload(input: &mut PacketReader<'_>) -> Result<Self> {
        let action_type = input.get_u8()?;
        let count = input.get_list_length()?;
        let action = match action_type {
            TYPE_ADD => {
                let mut entries = input.read_exact_list(count, |r| {
                    Ok(PlayerListAdditionEntry {
                        uuid: r.get_uuid()?,
                        actor_unique_id: r.get_actor_unique_id()?,
                        username: r.get_string()?,
                        xbox_user_id: r.get_string()?,
                        platform_chat_id: r.get_string()?,
                        build_platform: r.get_i32_le()?,
                        skin_data: r.get_skin()?,
                        is_teacher: r.get_bool()?,
                        is_host: r.get_bool()?,
                    })
                })?;
                for entry in &mut entries {
                    entry.skin_data.verified = input.get_bool()?;
                }
                PlayerListAction::Add(entries)
            }
            TYPE_REMOVE => {
                PlayerListAction::Remove(input.read_exact_list(count, |r| r.get_uuid())?)
            }
            other => {
                return Err(ProtocolError::UnknownEnumValue {
                    kind: "player list action",
                    value: i64::from(other),
                })
            }
        };
        Ok(Self { action })
    }

    fn encode_payload(&self, out: &mut PacketWriter) -> Result<()> {
        match &self.action {
            PlayerListAction::Add(entries) => {
                out.put_u8(TYPE_ADD);
                out.put_list_length(entries.len())?;
                for entry in entries {
                    out.put_uuid(&entry.uuid);
                    out.put_actor_unique_id(entry.actor_unique_id);
                    out.put_string(&entry.username)?;
                    out.put_string(&entry.xbox_user_id)?;
                    out.put_string(&entry.platform_chat_id)?;
                    out.put_i32_le(entry.build_platform);
                    out.put_skin(&entry.skin_data)?;
                    out.put_bool(entry.is_teacher);
                    out.put_bool(entry.is_host);
                }
                for entry in entries {
                    out.put_bool(entry.skin_data.verified);
                }
            }
            PlayerListAction::Remove(uuids) => {
                out.put_u8(TYPE_REMOVE);
                out.put_list_length(uuids.len())?;
                for uuid in uuids {
                    out.put_uuid(uuid);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::core::version::ProtocolVersion;
    use crate::types::skin::SkinImage;

    fn entry(n: u8, verified: bool) -> PlayerListAdditionEntry {
        let image = SkinImage::new(32, 64, vec![n; 8192]).unwrap();
        let mut skin = SkinData::new(format!("skin-{n}"), image);
        skin.verified = verified;
        let uuid = Uuid::from_u128(u128::from(n));
        let mut entry = PlayerListAdditionEntry::new(uuid, i64::from(n), format!("player{n}"), skin);
        entry.xbox_user_id = "2535".into();
        entry.build_platform = 7;
        entry.is_host = n == 1;
        entry
    }

    #[test]
    fn test_add_reads_back_with_verified_block() {
        let packet = PlayerListPacket::add(vec![entry(1, true), entry(2, false)]);
        for version in [ProtocolVersion::PROTOCOL_1_14_60, ProtocolVersion::CURRENT] {
            let bytes = packet.to_payload(version).unwrap();
            // the last two bytes are the verified flags, in entry order
            assert_eq!(&bytes[bytes.len() - 2..], &[1, 0]);
            assert_eq!(
                PlayerListPacket::from_payload(&bytes, version).unwrap(),
                packet
            );
        }
    }

    #[test]
    fn test_remove_layout() {
        let uuid = Uuid::from_u128(0x0011_2233_4455_6677_8899_aabb_ccdd_eeff);
        let bytes = PlayerListPacket::remove(vec![uuid])
            .to_payload(ProtocolVersion::CURRENT)
            .unwrap();
        assert_eq!(bytes[..2], [TYPE_REMOVE, 1]);
        assert_eq!(
            bytes[2..],
            [
                0x77, 0x66, 0x55, 0x44, 0x33, 0x22, 0x11, 0x00, 0xff, 0xee, 0xdd, 0xcc, 0xbb,
                0xaa, 0x99, 0x88
            ]
        );
    }

    #[test]
    fn test_unknown_action_type() {
        assert!(matches!(
            PlayerListPacket::from_payload(&[2, 0], ProtocolVersion::CURRENT),
            Err(ProtocolError::UnknownEnumValue { value: 2, .. })
        ));
    }
}
