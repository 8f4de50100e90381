//! Camera presets, fades and targets pushed to the client.
//!
//! From 1.20.30 the payload is a run of optional fields. Older clients take a single
//! network-flavoured tree instead; see [`crate::types::camera`] for its shape. The
//! target instructions only exist in the binary layout and are dropped when
//! encoding a tree.

use crate::core::serializer::{PacketReader, PacketWriter};
use crate::core::version::{ProtocolVersion, VersionGate};
use crate::error::Result;
use crate::nbt::{CompoundTag, Tag};
use crate::protocol::packet::Packet;
use crate::types::camera::{CameraFadeInstruction, CameraSetInstruction, CameraTargetInstruction};

const BINARY_LAYOUT: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_20_30);
const TARGET: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_21_20);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraInstructionPacket {
    pub set: Option<CameraSetInstruction>,
    pub clear: Option<bool>,
    pub fade: Option<CameraFadeInstruction>,
    /// Not carried before 1.21.20.
    pub target: Option<CameraTargetInstruction>,
    /// Not carried before 1.21.20.
    pub remove_target: Option<bool>,
}

impl CameraInstructionPacket {
    pub fn new(
        set: Option<CameraSetInstruction>,
        clear: Option<bool>,
        fade: Option<CameraFadeInstruction>,
    ) -> Self {
        Self {
            set,
            clear,
            fade,
            target: None,
            remove_target: None,
        }
    }

    /// Build from the tree sent to pre-1.20.30 clients.
    pub fn from_nbt(nbt: &CompoundTag) -> Result<Self> {
        let set = nbt
            .get_compound("set")?
            .map(CameraSetInstruction::from_nbt)
            .transpose()?;
        let clear = nbt.get_byte("clear")?.map(|b| b != 0);
        let fade = nbt
            .get_compound("fade")?
            .map(CameraFadeInstruction::from_nbt)
            .transpose()?;
        Ok(Self::new(set, clear, fade))
    }

    pub fn to_nbt(&self) -> Result<CompoundTag> {
        let mut nbt = CompoundTag::new();
        if let Some(set) = &self.set {
            nbt.set("set", Tag::Compound(set.to_nbt()?));
        }
        if let Some(clear) = self.clear {
            nbt.set("clear", Tag::Byte(i8::from(clear)));
        }
        if let Some(fade) = &self.fade {
            nbt.set("fade", Tag::Compound(fade.to_nbt()?));
        }
        Ok(nbt)
    }
}

impl Packet for CameraInstructionPacket {
    const NETWORK_ID: u32 = 0x12C;
    const NAME: &'static str = "CameraInstructionPacket";

    fn decode_payload(input: &mut PacketReader<'_>) -> Result<Self> {
        if !BINARY_LAYOUT.applies(input.version()) {
            let root = input.get_nbt_compound_root()?;
            return Self::from_nbt(&root);
        }

        let set = input.read_optional(CameraSetInstruction::read)?;
        let clear = input.read_optional(|r| r.get_bool())?;
        let fade = input.read_optional(CameraFadeInstruction::read)?;
        let (target, remove_target) = input.read_gated_or(TARGET, (None, None), |r| {
            Ok((
                r.read_optional(CameraTargetInstruction::read)?,
                r.read_optional(|r| r.get_bool())?,
            ))
        })?;
        Ok(Self {
            set,
            clear,
            fade,
            target,
            remove_target,
        })
    }

    fn encode_payload(&self, out: &mut PacketWriter) -> Result<()> {
        if !BINARY_LAYOUT.applies(out.version()) {
            let root = self.to_nbt()?;
            out.put_nbt_compound_root(&root)?;
            return Ok(());
        }

        out.write_optional(self.set.as_ref(), |w, v| v.write(w))?;
        out.write_optional(self.clear.as_ref(), |w, v| {
            w.put_bool(*v);
            Ok(())
        })?;
        out.write_optional(self.fade.as_ref(), |w, v| v.write(w))?;
        out.write_gated(TARGET, |w| {
            w.write_optional(self.target.as_ref(), |w, v| v.write(w))?;
            w.write_optional(self.remove_target.as_ref(), |w, v| {
                w.put_bool(*v);
                Ok(())
            })
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::error::ProtocolError;
    use crate::nbt::ListTag;
    use crate::types::camera::{
        CameraFadeInstructionColor, CameraFadeInstructionTime, CameraSetInstructionEase,
        CameraSetInstructionRotation, EaseType,
    };
    use crate::types::math::Vec3;

    fn preset() -> CameraSetInstruction {
        CameraSetInstruction {
            ease: Some(CameraSetInstructionEase {
                ease_type: EaseType::InOutSine,
                duration: 1.5,
            }),
            camera_position: Some(Vec3::new(1.0, 70.0, -4.0)),
            rotation: Some(CameraSetInstructionRotation {
                pitch: 30.0,
                yaw: 180.0,
            }),
            facing_position: None,
        }
    }

    fn fade() -> CameraFadeInstruction {
        CameraFadeInstruction {
            time: Some(CameraFadeInstructionTime {
                fade_in_time: 0.5,
                stay_time: 1.0,
                fade_out_time: 0.5,
            }),
            color: Some(CameraFadeInstructionColor {
                red: 0.0,
                green: 0.0,
                blue: 0.0,
            }),
        }
    }

    #[test]
    fn test_all_absent_is_three_zero_bytes() {
        let packet = CameraInstructionPacket::default();
        assert_eq!(
            packet.to_payload(ProtocolVersion::PROTOCOL_1_20_30).unwrap(),
            [0, 0, 0]
        );
        assert_eq!(
            packet.to_payload(ProtocolVersion::PROTOCOL_1_21_20).unwrap(),
            [0, 0, 0, 0, 0]
        );
    }

    #[test]
    fn test_binary_layout_reads_back() {
        let mut packet = CameraInstructionPacket::new(Some(preset()), Some(false), Some(fade()));
        packet.target = Some(CameraTargetInstruction {
            target_center_offset: Some(Vec3::new(0.0, 1.6, 0.0)),
            actor_unique_id: -12,
        });
        packet.remove_target = Some(true);
        let version = ProtocolVersion::CURRENT;
        let bytes = packet.to_payload(version).unwrap();
        assert_eq!(
            CameraInstructionPacket::from_payload(&bytes, version).unwrap(),
            packet
        );
    }

    #[test]
    fn test_legacy_tree_reads_back() {
        let packet = CameraInstructionPacket::new(Some(preset()), Some(true), Some(fade()));
        let version = ProtocolVersion::PROTOCOL_1_20_10;
        let bytes = packet.to_payload(version).unwrap();
        // compound tag id first
        assert_eq!(bytes[0], 10);
        assert_eq!(
            CameraInstructionPacket::from_payload(&bytes, version).unwrap(),
            packet
        );
    }

    #[test]
    fn test_legacy_tree_drops_target() {
        let mut packet = CameraInstructionPacket::new(None, Some(true), None);
        packet.remove_target = Some(true);
        let version = ProtocolVersion::PROTOCOL_1_20_10;
        let bytes = packet.to_payload(version).unwrap();
        let decoded = CameraInstructionPacket::from_payload(&bytes, version).unwrap();
        assert_eq!(decoded, CameraInstructionPacket::new(None, Some(true), None));
    }

    #[test]
    fn test_legacy_tree_with_short_position_is_rejected() {
        let list = ListTag::from_values(vec![Tag::Float(1.0), Tag::Float(2.0)]).unwrap();
        let set = CompoundTag::new().with(
            "pos",
            Tag::Compound(CompoundTag::new().with("pos", Tag::List(list))),
        );
        let root = CompoundTag::new().with("set", Tag::Compound(set));
        let mut out = PacketWriter::new(ProtocolVersion::PROTOCOL_1_20_10);
        out.put_nbt_compound_root(&root).unwrap();
        let bytes = out.into_vec();
        assert!(matches!(
            CameraInstructionPacket::from_payload(&bytes, ProtocolVersion::PROTOCOL_1_20_10),
            Err(ProtocolError::MalformedStructuralValue(_))
        ));
    }

    #[test]
    fn test_non_finite_values_refused_in_tree() {
        let mut set = preset();
        set.camera_position = Some(Vec3::new(f32::NAN, 0.0, 0.0));
        let packet = CameraInstructionPacket::new(Some(set), None, None);
        assert!(matches!(
            packet.to_payload(ProtocolVersion::PROTOCOL_1_20_10),
            Err(ProtocolError::MalformedStructuralValue(_))
        ));
        // the binary layout carries whatever floats it is given
        assert!(packet.to_payload(ProtocolVersion::CURRENT).is_ok());
    }
}
