//! Player input state: flag indices, modes, block actions and vehicle prediction.

use crate::core::bitset::BitSet;
use crate::core::serializer::{PacketReader, PacketWriter};
use crate::core::version::{ProtocolVersion, VersionGate};
use crate::error::{ProtocolError, Result};
use crate::types::math::BlockPosition;

/// Bit indices into the player input flag set.
///
/// Revisions before 1.21.50 carry 64 bits; 1.21.50 added the 65th.
pub struct PlayerAuthInputFlags;

impl PlayerAuthInputFlags {
    pub const ASCEND: usize = 0;
    pub const DESCEND: usize = 1;
    pub const NORTH_JUMP: usize = 2;
    pub const JUMP_DOWN: usize = 3;
    pub const SPRINT_DOWN: usize = 4;
    pub const CHANGE_HEIGHT: usize = 5;
    pub const JUMPING: usize = 6;
    pub const AUTO_JUMPING_IN_WATER: usize = 7;
    pub const SNEAKING: usize = 8;
    pub const SNEAK_DOWN: usize = 9;
    pub const UP: usize = 10;
    pub const DOWN: usize = 11;
    pub const LEFT: usize = 12;
    pub const RIGHT: usize = 13;
    pub const UP_LEFT: usize = 14;
    pub const UP_RIGHT: usize = 15;
    pub const WANT_UP: usize = 16;
    pub const WANT_DOWN: usize = 17;
    pub const WANT_DOWN_SLOW: usize = 18;
    pub const WANT_UP_SLOW: usize = 19;
    pub const SPRINTING: usize = 20;
    pub const ASCEND_BLOCK: usize = 21;
    pub const DESCEND_BLOCK: usize = 22;
    pub const SNEAK_TOGGLE_DOWN: usize = 23;
    pub const PERSIST_SNEAK: usize = 24;
    pub const START_SPRINTING: usize = 25;
    pub const STOP_SPRINTING: usize = 26;
    pub const START_SNEAKING: usize = 27;
    pub const STOP_SNEAKING: usize = 28;
    pub const START_SWIMMING: usize = 29;
    pub const STOP_SWIMMING: usize = 30;
    pub const START_JUMPING: usize = 31;
    pub const START_GLIDING: usize = 32;
    pub const STOP_GLIDING: usize = 33;
    pub const PERFORM_ITEM_INTERACTION: usize = 34;
    pub const PERFORM_BLOCK_ACTIONS: usize = 35;
    pub const PERFORM_ITEM_STACK_REQUEST: usize = 36;
    pub const HANDLED_TELEPORT: usize = 37;
    pub const EMOTING: usize = 38;
    pub const MISSED_SWING: usize = 39;
    pub const START_CRAWLING: usize = 40;
    pub const STOP_CRAWLING: usize = 41;
    pub const START_FLYING: usize = 42;
    pub const STOP_FLYING: usize = 43;
    pub const ACK_ACTOR_DATA: usize = 44;
    pub const IN_CLIENT_PREDICTED_VEHICLE: usize = 45;
    pub const PADDLING_LEFT: usize = 46;
    pub const PADDLING_RIGHT: usize = 47;
    pub const BLOCK_BREAKING_DELAY_ENABLED: usize = 48;
    pub const HORIZONTAL_COLLISION: usize = 49;
    pub const VERTICAL_COLLISION: usize = 50;
    pub const DOWN_LEFT: usize = 51;
    pub const DOWN_RIGHT: usize = 52;
    pub const START_USING_ITEM: usize = 53;
    pub const IS_CAMERA_RELATIVE_MOVEMENT_ENABLED: usize = 54;
    pub const IS_ROT_CONTROLLED_BY_MOVE_DIRECTION: usize = 55;
    pub const START_SPIN_ATTACK: usize = 56;
    pub const STOP_SPIN_ATTACK: usize = 57;
    pub const IS_HOTBAR_ONLY_TOUCH: usize = 58;
    pub const JUMP_RELEASED_RAW: usize = 59;
    pub const JUMP_PRESSED_RAW: usize = 60;
    pub const JUMP_CURRENT_RAW: usize = 61;
    pub const SNEAK_RELEASED_RAW: usize = 62;
    pub const SNEAK_PRESSED_RAW: usize = 63;
    pub const SNEAK_CURRENT_RAW: usize = 64;

    /// Width of the in-memory flag set; wide enough for every revision.
    pub const COUNT: usize = 65;

    /// Number of flag bits on the wire for `version`.
    pub fn wire_width(version: ProtocolVersion) -> usize {
        if version.is_at_least(ProtocolVersion::PROTOCOL_1_21_50) {
            65
        } else {
            64
        }
    }

    /// An all-clear flag set of [`COUNT`](Self::COUNT) bits.
    pub fn empty() -> BitSet {
        BitSet::new(Self::COUNT)
    }
}

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident, $kind:literal { $($variant:ident = $value:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant = $value),+
        }

        impl $name {
            pub fn from_u32(value: u32) -> Result<Self> {
                match value {
                    $($value => Ok($name::$variant),)+
                    other => Err(ProtocolError::UnknownEnumValue {
                        kind: $kind,
                        value: i64::from(other),
                    }),
                }
            }

            pub fn id(self) -> u32 {
                self as u32
            }
        }
    };
}

wire_enum!(
    /// How the client is being played. `Vr` carries a gaze direction below 1.21.40.
    PlayMode, "play mode" {
        Normal = 0,
        Teaser = 1,
        Screen = 2,
        Viewer = 3,
        Vr = 4,
        Placement = 5,
        LivingRoom = 6,
        ExitLevel = 7,
        ExitLevelLivingRoom = 8,
    }
);

wire_enum!(
    InputMode, "input mode" {
        MouseKeyboard = 1,
        Touchscreen = 2,
        GamePad = 3,
        MotionController = 4,
    }
);

wire_enum!(
    InteractionMode, "interaction mode" {
        Touch = 0,
        Crosshair = 1,
        Classic = 2,
    }
);

/// Block action discriminants accepted in player input.
pub mod player_action {
    pub const START_BREAK: i32 = 0;
    pub const ABORT_BREAK: i32 = 1;
    pub const STOP_BREAK: i32 = 2;
    pub const CRACK_BREAK: i32 = 18;
    pub const PREDICT_DESTROY_BLOCK: i32 = 26;
    pub const CONTINUE_DESTROY_BLOCK: i32 = 27;
}

/// One block-breaking step reported alongside movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerBlockAction {
    StopBreak,
    WithBlockInfo {
        action_type: i32,
        block_position: BlockPosition,
        face: i32,
    },
}

impl PlayerBlockAction {
    fn carries_block_info(action_type: i32) -> bool {
        matches!(
            action_type,
            player_action::START_BREAK
                | player_action::ABORT_BREAK
                | player_action::CRACK_BREAK
                | player_action::PREDICT_DESTROY_BLOCK
                | player_action::CONTINUE_DESTROY_BLOCK
        )
    }

    pub fn action_type(&self) -> i32 {
        match self {
            PlayerBlockAction::StopBreak => player_action::STOP_BREAK,
            PlayerBlockAction::WithBlockInfo { action_type, .. } => *action_type,
        }
    }

    pub fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        let action_type = input.get_var_i32()?;
        if Self::carries_block_info(action_type) {
            let block_position = input.get_signed_block_position()?;
            let face = input.get_var_i32()?;
            return Ok(PlayerBlockAction::WithBlockInfo {
                action_type,
                block_position,
                face,
            });
        }
        if action_type == player_action::STOP_BREAK {
            return Ok(PlayerBlockAction::StopBreak);
        }
        Err(ProtocolError::UnknownEnumValue {
            kind: "player block action",
            value: i64::from(action_type),
        })
    }

    pub fn write(&self, out: &mut PacketWriter) -> Result<()> {
        match self {
            PlayerBlockAction::StopBreak => out.put_var_i32(player_action::STOP_BREAK),
            PlayerBlockAction::WithBlockInfo {
                action_type,
                block_position,
                face,
            } => {
                if !Self::carries_block_info(*action_type) {
                    return Err(ProtocolError::InvalidValue(format!(
                        "block action {action_type} carries no block info"
                    )));
                }
                out.put_var_i32(*action_type);
                out.put_signed_block_position(block_position);
                out.put_var_i32(*face);
            }
        }
        Ok(())
    }
}

const VEHICLE_ROTATION: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_20_70);

/// Client-side vehicle prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerAuthInputVehicleInfo {
    /// Not carried before 1.20.70.
    pub vehicle_rotation_x: f32,
    /// Not carried before 1.20.70.
    pub vehicle_rotation_z: f32,
    pub predicted_vehicle_actor_unique_id: i64,
}

impl PlayerAuthInputVehicleInfo {
    pub fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        let (vehicle_rotation_x, vehicle_rotation_z) = input
            .read_gated_or(VEHICLE_ROTATION, (0.0, 0.0), |r| {
                Ok((r.get_f32_le()?, r.get_f32_le()?))
            })?;
        let predicted_vehicle_actor_unique_id = input.get_actor_unique_id()?;
        Ok(Self {
            vehicle_rotation_x,
            vehicle_rotation_z,
            predicted_vehicle_actor_unique_id,
        })
    }

    pub fn write(&self, out: &mut PacketWriter) -> Result<()> {
        out.write_gated(VEHICLE_ROTATION, |w| {
            w.put_f32_le(self.vehicle_rotation_x);
            w.put_f32_le(self.vehicle_rotation_z);
            Ok(())
        })?;
        out.put_actor_unique_id(self.predicted_vehicle_actor_unique_id);
        Ok(())
    }
}
