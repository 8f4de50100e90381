//! # Camera Instructions
//!
//! Values carried by the camera instruction packet, in both of their encodings:
//! the binary optional-field layout used from 1.20.30 on, and the named-tree
//! compound older clients expect.
//!
//! ## Tree Shape
//! ```text
//! set:   { ease: { type: "linear", time: 1.0 },
//!          pos: { pos: [x, y, z] }, rot: { x: pitch, y: yaw },
//!          facing: { facing: [x, y, z] } }
//! clear: 1b
//! fade:  { time: { fadeIn, hold, fadeOut }, color: { r, g, b } }
//! ```
//!
//! Reading a tree is strict: every float must be finite and every position list
//! must hold exactly three floats, otherwise the packet is rejected with
//! [`ProtocolError::MalformedStructuralValue`]. Writing refuses non-finite values the
//! same way, so a tree built here always reads back.

use crate::core::serializer::{PacketReader, PacketWriter};
use crate::error::{constants, ProtocolError, Result};
use crate::nbt::{finite, finite_float_tag, CompoundTag, ListTag, Tag, TagType};
use crate::types::math::Vec3;

/// Interpolation curve of a camera transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EaseType {
    Linear = 0,
    Spring,
    InQuad,
    OutQuad,
    InOutQuad,
    InCubic,
    OutCubic,
    InOutCubic,
    InQuart,
    OutQuart,
    InOutQuart,
    InQuint,
    OutQuint,
    InOutQuint,
    InSine,
    OutSine,
    InOutSine,
    InExpo,
    OutExpo,
    InOutExpo,
    InCirc,
    OutCirc,
    InOutCirc,
    InBounce,
    OutBounce,
    InOutBounce,
    InBack,
    OutBack,
    InOutBack,
    InElastic,
    OutElastic,
    InOutElastic,
}

impl EaseType {
    const ALL: [EaseType; 32] = [
        EaseType::Linear,
        EaseType::Spring,
        EaseType::InQuad,
        EaseType::OutQuad,
        EaseType::InOutQuad,
        EaseType::InCubic,
        EaseType::OutCubic,
        EaseType::InOutCubic,
        EaseType::InQuart,
        EaseType::OutQuart,
        EaseType::InOutQuart,
        EaseType::InQuint,
        EaseType::OutQuint,
        EaseType::InOutQuint,
        EaseType::InSine,
        EaseType::OutSine,
        EaseType::InOutSine,
        EaseType::InExpo,
        EaseType::OutExpo,
        EaseType::InOutExpo,
        EaseType::InCirc,
        EaseType::OutCirc,
        EaseType::InOutCirc,
        EaseType::InBounce,
        EaseType::OutBounce,
        EaseType::InOutBounce,
        EaseType::InBack,
        EaseType::OutBack,
        EaseType::InOutBack,
        EaseType::InElastic,
        EaseType::OutElastic,
        EaseType::InOutElastic,
    ];

    const NAMES: [&'static str; 32] = [
        "linear",
        "spring",
        "in_quad",
        "out_quad",
        "in_out_quad",
        "in_cubic",
        "out_cubic",
        "in_out_cubic",
        "in_quart",
        "out_quart",
        "in_out_quart",
        "in_quint",
        "out_quint",
        "in_out_quint",
        "in_sine",
        "out_sine",
        "in_out_sine",
        "in_expo",
        "out_expo",
        "in_out_expo",
        "in_circ",
        "out_circ",
        "in_out_circ",
        "in_bounce",
        "out_bounce",
        "in_out_bounce",
        "in_back",
        "out_back",
        "in_out_back",
        "in_elastic",
        "out_elastic",
        "in_out_elastic",
    ];

    pub fn from_u8(value: u8) -> Result<Self> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or(ProtocolError::UnknownEnumValue {
                kind: "camera ease type",
                value: i64::from(value),
            })
    }

    /// Name used in the tree encoding.
    pub fn name(self) -> &'static str {
        Self::NAMES[self as usize]
    }

    pub fn from_name(name: &str) -> Result<Self> {
        Self::NAMES
            .iter()
            .position(|n| *n == name)
            .map(|i| Self::ALL[i])
            .ok_or_else(|| ProtocolError::malformed(format!("unknown ease type '{name}'")))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSetInstructionEase {
    pub ease_type: EaseType,
    pub duration: f32,
}

impl CameraSetInstructionEase {
    pub fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        let ease_type = EaseType::from_u8(input.get_u8()?)?;
        let duration = input.get_f32_le()?;
        Ok(Self {
            ease_type,
            duration,
        })
    }

    pub fn write(&self, out: &mut PacketWriter) -> Result<()> {
        out.put_u8(self.ease_type as u8);
        out.put_f32_le(self.duration);
        Ok(())
    }

    pub fn from_nbt(nbt: &CompoundTag) -> Result<Self> {
        let name = required(nbt.get_string("type")?, "type")?;
        let duration = required(nbt.get_finite_float("time")?, "time")?;
        Ok(Self {
            ease_type: EaseType::from_name(name)?,
            duration,
        })
    }

    pub fn to_nbt(&self) -> Result<CompoundTag> {
        Ok(CompoundTag::new()
            .with("type", Tag::String(self.ease_type.name().to_owned()))
            .with("time", finite_float_tag("time", self.duration)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraSetInstructionRotation {
    pub pitch: f32,
    pub yaw: f32,
}

impl CameraSetInstructionRotation {
    pub fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        let pitch = input.get_f32_le()?;
        let yaw = input.get_f32_le()?;
        Ok(Self { pitch, yaw })
    }

    pub fn write(&self, out: &mut PacketWriter) -> Result<()> {
        out.put_f32_le(self.pitch);
        out.put_f32_le(self.yaw);
        Ok(())
    }

    pub fn from_nbt(nbt: &CompoundTag) -> Result<Self> {
        Ok(Self {
            pitch: required(nbt.get_finite_float("x")?, "x")?,
            yaw: required(nbt.get_finite_float("y")?, "y")?,
        })
    }

    pub fn to_nbt(&self) -> Result<CompoundTag> {
        Ok(CompoundTag::new()
            .with("x", finite_float_tag("x", self.pitch)?)
            .with("y", finite_float_tag("y", self.yaw)?))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraSetInstruction {
    pub ease: Option<CameraSetInstructionEase>,
    pub camera_position: Option<Vec3>,
    pub rotation: Option<CameraSetInstructionRotation>,
    pub facing_position: Option<Vec3>,
}

impl CameraSetInstruction {
    pub fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            ease: input.read_optional(CameraSetInstructionEase::read)?,
            camera_position: input.read_optional(|r| r.get_vector3())?,
            rotation: input.read_optional(CameraSetInstructionRotation::read)?,
            facing_position: input.read_optional(|r| r.get_vector3())?,
        })
    }

    pub fn write(&self, out: &mut PacketWriter) -> Result<()> {
        out.write_optional(self.ease.as_ref(), |w, v| v.write(w))?;
        out.write_optional(self.camera_position.as_ref(), put_vector3)?;
        out.write_optional(self.rotation.as_ref(), |w, v| v.write(w))?;
        out.write_optional(self.facing_position.as_ref(), put_vector3)
    }

    pub fn from_nbt(nbt: &CompoundTag) -> Result<Self> {
        let ease = nbt
            .get_compound("ease")?
            .map(CameraSetInstructionEase::from_nbt)
            .transpose()?;
        let camera_position = match nbt.get_compound("pos")? {
            Some(tag) => parse_vec3(tag, "pos")?,
            None => None,
        };
        let rotation = nbt
            .get_compound("rot")?
            .map(CameraSetInstructionRotation::from_nbt)
            .transpose()?;
        let facing_position = match nbt.get_compound("facing")? {
            Some(tag) => parse_vec3(tag, "facing")?,
            None => None,
        };
        Ok(Self {
            ease,
            camera_position,
            rotation,
            facing_position,
        })
    }

    pub fn to_nbt(&self) -> Result<CompoundTag> {
        let mut nbt = CompoundTag::new();
        if let Some(ease) = &self.ease {
            nbt.set("ease", Tag::Compound(ease.to_nbt()?));
        }
        if let Some(pos) = &self.camera_position {
            nbt.set("pos", Tag::Compound(vec3_compound("pos", pos)?));
        }
        if let Some(rotation) = &self.rotation {
            nbt.set("rot", Tag::Compound(rotation.to_nbt()?));
        }
        if let Some(facing) = &self.facing_position {
            nbt.set("facing", Tag::Compound(vec3_compound("facing", facing)?));
        }
        Ok(nbt)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFadeInstructionTime {
    pub fade_in_time: f32,
    pub stay_time: f32,
    pub fade_out_time: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFadeInstructionColor {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CameraFadeInstruction {
    pub time: Option<CameraFadeInstructionTime>,
    pub color: Option<CameraFadeInstructionColor>,
}

impl CameraFadeInstruction {
    pub fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        let time = input.read_optional(|r| {
            Ok(CameraFadeInstructionTime {
                fade_in_time: r.get_f32_le()?,
                stay_time: r.get_f32_le()?,
                fade_out_time: r.get_f32_le()?,
            })
        })?;
        let color = input.read_optional(|r| {
            Ok(CameraFadeInstructionColor {
                red: r.get_f32_le()?,
                green: r.get_f32_le()?,
                blue: r.get_f32_le()?,
            })
        })?;
        Ok(Self { time, color })
    }

    pub fn write(&self, out: &mut PacketWriter) -> Result<()> {
        out.write_optional(self.time.as_ref(), |w, t| {
            w.put_f32_le(t.fade_in_time);
            w.put_f32_le(t.stay_time);
            w.put_f32_le(t.fade_out_time);
            Ok(())
        })?;
        out.write_optional(self.color.as_ref(), |w, c| {
            w.put_f32_le(c.red);
            w.put_f32_le(c.green);
            w.put_f32_le(c.blue);
            Ok(())
        })
    }

    pub fn from_nbt(nbt: &CompoundTag) -> Result<Self> {
        let time = match nbt.get_compound("time")? {
            Some(t) => Some(CameraFadeInstructionTime {
                fade_in_time: required(t.get_finite_float("fadeIn")?, "fadeIn")?,
                stay_time: required(t.get_finite_float("hold")?, "hold")?,
                fade_out_time: required(t.get_finite_float("fadeOut")?, "fadeOut")?,
            }),
            None => None,
        };
        let color = match nbt.get_compound("color")? {
            Some(c) => Some(CameraFadeInstructionColor {
                red: required(c.get_finite_float("r")?, "r")?,
                green: required(c.get_finite_float("g")?, "g")?,
                blue: required(c.get_finite_float("b")?, "b")?,
            }),
            None => None,
        };
        Ok(Self { time, color })
    }

    pub fn to_nbt(&self) -> Result<CompoundTag> {
        let mut nbt = CompoundTag::new();
        if let Some(t) = &self.time {
            nbt.set(
                "time",
                Tag::Compound(
                    CompoundTag::new()
                        .with("fadeIn", finite_float_tag("fadeIn", t.fade_in_time)?)
                        .with("hold", finite_float_tag("hold", t.stay_time)?)
                        .with("fadeOut", finite_float_tag("fadeOut", t.fade_out_time)?),
                ),
            );
        }
        if let Some(c) = &self.color {
            nbt.set(
                "color",
                Tag::Compound(
                    CompoundTag::new()
                        .with("r", finite_float_tag("r", c.red)?)
                        .with("g", finite_float_tag("g", c.green)?)
                        .with("b", finite_float_tag("b", c.blue)?),
                ),
            );
        }
        Ok(nbt)
    }
}

/// Lock the camera onto an actor. Only exists in the binary layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTargetInstruction {
    pub target_center_offset: Option<Vec3>,
    pub actor_unique_id: i64,
}

impl CameraTargetInstruction {
    pub fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        let target_center_offset = input.read_optional(|r| r.get_vector3())?;
        let actor_unique_id = input.get_i64_le()?;
        Ok(Self {
            target_center_offset,
            actor_unique_id,
        })
    }

    pub fn write(&self, out: &mut PacketWriter) -> Result<()> {
        out.write_optional(self.target_center_offset.as_ref(), put_vector3)?;
        out.put_i64_le(self.actor_unique_id);
        Ok(())
    }
}

/// Parse the three-float list named `tag_name` inside `nbt`.
///
/// Absent is `Ok(None)`. Anything other than a list of exactly three finite floats
/// is a [`ProtocolError::MalformedStructuralValue`].
pub fn parse_vec3(nbt: &CompoundTag, tag_name: &str) -> Result<Option<Vec3>> {
    let Some(tag) = nbt.get(tag_name) else {
        return Ok(None);
    };
    let list = match tag {
        Tag::List(list) if list.element_type() == TagType::Float => list,
        // an empty list has no element type to check
        Tag::List(list) if list.is_empty() => list,
        _ => {
            return Err(ProtocolError::malformed(format!(
                "'{tag_name}' {}",
                constants::ERR_VECTOR_NOT_LIST
            )))
        }
    };
    let values = list.values();
    if values.len() != 3 {
        return Err(ProtocolError::malformed(format!(
            "'{tag_name}': {}, found {}",
            constants::ERR_VECTOR_LENGTH,
            values.len()
        )));
    }
    let mut xyz = [0.0f32; 3];
    for (slot, (value, component)) in xyz.iter_mut().zip(values.iter().zip(["x", "y", "z"])) {
        let Tag::Float(v) = value else {
            return Err(ProtocolError::malformed(format!(
                "'{tag_name}' {}",
                constants::ERR_VECTOR_NOT_LIST
            )));
        };
        *slot = finite(&format!("{component} component of {tag_name}"), *v)?;
    }
    Ok(Some(Vec3::new(xyz[0], xyz[1], xyz[2])))
}

fn vec3_compound(tag_name: &str, v: &Vec3) -> Result<CompoundTag> {
    let list = ListTag::from_values(vec![
        finite_float_tag(tag_name, v.x)?,
        finite_float_tag(tag_name, v.y)?,
        finite_float_tag(tag_name, v.z)?,
    ])?;
    Ok(CompoundTag::new().with(tag_name, Tag::List(list)))
}

fn put_vector3(out: &mut PacketWriter, v: &Vec3) -> Result<()> {
    out.put_vector3(v);
    Ok(())
}

fn required<T>(value: Option<T>, name: &str) -> Result<T> {
    value.ok_or_else(|| ProtocolError::malformed(format!("missing '{name}' tag")))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn floats(values: &[f32]) -> Tag {
        Tag::List(ListTag::from_values(values.iter().map(|v| Tag::Float(*v)).collect()).unwrap())
    }

    #[test]
    fn test_parse_vec3_accepts_three_finite_floats() {
        let nbt = CompoundTag::new().with("pos", floats(&[1.0, 2.0, 3.0]));
        assert_eq!(
            parse_vec3(&nbt, "pos").unwrap(),
            Some(Vec3::new(1.0, 2.0, 3.0))
        );
        assert_eq!(parse_vec3(&nbt, "facing").unwrap(), None);
    }

    #[test]
    fn test_parse_vec3_rejections() {
        let cases = [
            CompoundTag::new().with("pos", floats(&[1.0, 2.0])),
            CompoundTag::new().with("pos", floats(&[1.0, 2.0, 3.0, 4.0])),
            CompoundTag::new().with("pos", floats(&[1.0, f32::NAN, 3.0])),
            CompoundTag::new().with("pos", floats(&[f32::INFINITY, 2.0, 3.0])),
            CompoundTag::new().with("pos", Tag::Int(3)),
            CompoundTag::new().with(
                "pos",
                Tag::List(ListTag::from_values(vec![Tag::Int(1), Tag::Int(2), Tag::Int(3)]).unwrap()),
            ),
        ];
        for nbt in &cases {
            assert!(
                matches!(
                    parse_vec3(nbt, "pos"),
                    Err(ProtocolError::MalformedStructuralValue(_))
                ),
                "{nbt:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_set_instruction_tree_shape() {
        let set = CameraSetInstruction {
            ease: Some(CameraSetInstructionEase {
                ease_type: EaseType::InOutSine,
                duration: 1.5,
            }),
            camera_position: Some(Vec3::new(1.0, 64.0, -3.0)),
            rotation: Some(CameraSetInstructionRotation {
                pitch: 10.0,
                yaw: 90.0,
            }),
            facing_position: None,
        };
        let nbt = set.to_nbt().unwrap();
        let pos = nbt.get_compound("pos").unwrap().unwrap();
        assert!(pos.get_list("pos").unwrap().is_some());
        assert_eq!(
            nbt.get_compound("ease").unwrap().unwrap().get_string("type").unwrap(),
            Some("in_out_sine")
        );
        assert!(!nbt.contains("facing"));
        assert_eq!(CameraSetInstruction::from_nbt(&nbt).unwrap(), set);
    }

    #[test]
    fn test_to_nbt_refuses_non_finite() {
        let set = CameraSetInstruction {
            camera_position: Some(Vec3::new(f32::NAN, 0.0, 0.0)),
            ..CameraSetInstruction::default()
        };
        assert!(matches!(
            set.to_nbt(),
            Err(ProtocolError::MalformedStructuralValue(_))
        ));
    }

    #[test]
    fn test_fade_tree_round_trip() {
        let fade = CameraFadeInstruction {
            time: Some(CameraFadeInstructionTime {
                fade_in_time: 0.5,
                stay_time: 1.0,
                fade_out_time: 0.25,
            }),
            color: Some(CameraFadeInstructionColor {
                red: 1.0,
                green: 0.0,
                blue: 0.5,
            }),
        };
        assert_eq!(CameraFadeInstruction::from_nbt(&fade.to_nbt().unwrap()).unwrap(), fade);
    }

    #[test]
    fn test_ease_type_names() {
        assert_eq!(EaseType::from_name("spring").unwrap(), EaseType::Spring);
        assert_eq!(EaseType::InOutElastic.name(), "in_out_elastic");
        assert_eq!(EaseType::from_u8(31).unwrap(), EaseType::InOutElastic);
        assert!(matches!(
            EaseType::from_u8(32),
            Err(ProtocolError::UnknownEnumValue { value: 32, .. })
        ));
        assert!(EaseType::from_name("wobble").is_err());
    }
}
