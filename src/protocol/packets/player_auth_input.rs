//! Per-tick client movement and input, the busiest packet in the protocol.
//!
//! The input flag set doubles as a presence map: the item interaction, item stack
//! request, block action and vehicle sections are only on the wire when their flag
//! is set. Packets are built through [`PlayerAuthInputBuilder`], which derives those
//! flags from the sections actually supplied, so the two can never disagree.

use crate::core::bitset::BitSet;
use crate::core::optional::{read_if, write_if};
use crate::core::serializer::{PacketReader, PacketWriter};
use crate::core::version::{ProtocolVersion, VersionGate};
use crate::error::{ProtocolError, Result};
use crate::protocol::packet::Packet;
use crate::types::input::{
    InputMode, InteractionMode, PlayMode, PlayerAuthInputFlags, PlayerAuthInputVehicleInfo,
    PlayerBlockAction,
};
use crate::types::inventory::ItemInteractionData;
use crate::types::math::{Vec2, Vec3};
use crate::types::stack_request::ItemStackRequest;

const INTERACT_ROTATION: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_21_40);
const VEHICLE_INFO: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_20_60);
const CAMERA_ORIENTATION: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_21_40);
const RAW_MOVE: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_21_50);

const GAZE_REQUIRED: ProtocolError = ProtocolError::RequiredFieldMissing {
    field: "vr_gaze_direction",
    reason: "required in VR play mode",
};

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerAuthInputPacket {
    position: Vec3,
    pitch: f32,
    yaw: f32,
    head_yaw: f32,
    move_vec_x: f32,
    move_vec_z: f32,
    input_flags: BitSet,
    input_mode: InputMode,
    play_mode: PlayMode,
    interaction_mode: InteractionMode,
    vr_gaze_direction: Option<Vec3>,
    interact_rotation: Vec2,
    tick: u64,
    delta: Vec3,
    item_interaction_data: Option<ItemInteractionData>,
    item_stack_request: Option<ItemStackRequest>,
    block_actions: Option<Vec<PlayerBlockAction>>,
    vehicle_info: Option<PlayerAuthInputVehicleInfo>,
    analog_move_vec_x: f32,
    analog_move_vec_z: f32,
    camera_orientation: Vec3,
    raw_move: Vec2,
}

/// Field-by-field description of a [`PlayerAuthInputPacket`].
///
/// `input_flags` may be any width up to [`PlayerAuthInputFlags::COUNT`]; the four
/// section flags are overwritten by [`build`](Self::build).
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerAuthInputBuilder {
    pub position: Vec3,
    pub pitch: f32,
    pub yaw: f32,
    pub head_yaw: f32,
    pub move_vec_x: f32,
    pub move_vec_z: f32,
    pub input_flags: BitSet,
    pub input_mode: InputMode,
    pub play_mode: PlayMode,
    pub interaction_mode: InteractionMode,
    /// Mandatory when `play_mode` is [`PlayMode::Vr`].
    pub vr_gaze_direction: Option<Vec3>,
    pub interact_rotation: Vec2,
    pub tick: u64,
    pub delta: Vec3,
    pub item_interaction_data: Option<ItemInteractionData>,
    pub item_stack_request: Option<ItemStackRequest>,
    pub block_actions: Option<Vec<PlayerBlockAction>>,
    pub vehicle_info: Option<PlayerAuthInputVehicleInfo>,
    pub analog_move_vec_x: f32,
    pub analog_move_vec_z: f32,
    pub camera_orientation: Vec3,
    pub raw_move: Vec2,
}

impl Default for PlayerAuthInputBuilder {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            pitch: 0.0,
            yaw: 0.0,
            head_yaw: 0.0,
            move_vec_x: 0.0,
            move_vec_z: 0.0,
            input_flags: PlayerAuthInputFlags::empty(),
            input_mode: InputMode::MouseKeyboard,
            play_mode: PlayMode::Normal,
            interaction_mode: InteractionMode::Crosshair,
            vr_gaze_direction: None,
            interact_rotation: Vec2::ZERO,
            tick: 0,
            delta: Vec3::ZERO,
            item_interaction_data: None,
            item_stack_request: None,
            block_actions: None,
            vehicle_info: None,
            analog_move_vec_x: 0.0,
            analog_move_vec_z: 0.0,
            camera_orientation: Vec3::ZERO,
            raw_move: Vec2::ZERO,
        }
    }
}

impl PlayerAuthInputBuilder {
    /// Validate and freeze the packet.
    ///
    /// Fails with [`ProtocolError::RequiredFieldMissing`] for VR play without a gaze
    /// direction, and with [`ProtocolError::IndexOutOfRange`] if `input_flags` is wider
    /// than any revision carries.
    pub fn build(self) -> Result<PlayerAuthInputPacket> {
        if self.play_mode == PlayMode::Vr && self.vr_gaze_direction.is_none() {
            return Err(GAZE_REQUIRED);
        }
        let mut input_flags = self.input_flags.resized(PlayerAuthInputFlags::COUNT)?;
        input_flags.set(
            PlayerAuthInputFlags::PERFORM_ITEM_INTERACTION,
            self.item_interaction_data.is_some(),
        )?;
        input_flags.set(
            PlayerAuthInputFlags::PERFORM_ITEM_STACK_REQUEST,
            self.item_stack_request.is_some(),
        )?;
        input_flags.set(
            PlayerAuthInputFlags::PERFORM_BLOCK_ACTIONS,
            self.block_actions.is_some(),
        )?;
        input_flags.set(
            PlayerAuthInputFlags::IN_CLIENT_PREDICTED_VEHICLE,
            self.vehicle_info.is_some(),
        )?;

        Ok(PlayerAuthInputPacket {
            position: self.position,
            pitch: self.pitch,
            yaw: self.yaw,
            head_yaw: self.head_yaw,
            move_vec_x: self.move_vec_x,
            move_vec_z: self.move_vec_z,
            input_flags,
            input_mode: self.input_mode,
            play_mode: self.play_mode,
            interaction_mode: self.interaction_mode,
            vr_gaze_direction: self.vr_gaze_direction,
            interact_rotation: self.interact_rotation,
            tick: self.tick,
            delta: self.delta,
            item_interaction_data: self.item_interaction_data,
            item_stack_request: self.item_stack_request,
            block_actions: self.block_actions,
            vehicle_info: self.vehicle_info,
            analog_move_vec_x: self.analog_move_vec_x,
            analog_move_vec_z: self.analog_move_vec_z,
            camera_orientation: self.camera_orientation,
            raw_move: self.raw_move,
        })
    }
}

impl PlayerAuthInputPacket {
    pub fn builder() -> PlayerAuthInputBuilder {
        PlayerAuthInputBuilder::default()
    }

    /// Stored flags with the section bits matched to what `version` will carry.
    ///
    /// Below 1.20.60 the vehicle bit is a plain input flag and is kept as stored.
    fn section_flags(&self, version: ProtocolVersion) -> Result<BitSet> {
        let mut flags = self.input_flags.clone();
        flags.set(
            PlayerAuthInputFlags::PERFORM_ITEM_INTERACTION,
            self.item_interaction_data.is_some(),
        )?;
        flags.set(
            PlayerAuthInputFlags::PERFORM_ITEM_STACK_REQUEST,
            self.item_stack_request.is_some(),
        )?;
        flags.set(
            PlayerAuthInputFlags::PERFORM_BLOCK_ACTIONS,
            self.block_actions.is_some(),
        )?;
        if VEHICLE_INFO.applies(version) {
            flags.set(
                PlayerAuthInputFlags::IN_CLIENT_PREDICTED_VEHICLE,
                self.vehicle_info.is_some(),
            )?;
        }
        Ok(flags)
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn head_yaw(&self) -> f32 {
        self.head_yaw
    }

    pub fn move_vec_x(&self) -> f32 {
        self.move_vec_x
    }

    pub fn move_vec_z(&self) -> f32 {
        self.move_vec_z
    }

    /// Flags held at [`PlayerAuthInputFlags::COUNT`] bits whatever the revision.
    pub fn input_flags(&self) -> &BitSet {
        &self.input_flags
    }

    /// Shorthand for testing one flag; out-of-range indices read as unset.
    pub fn has_flag(&self, index: usize) -> bool {
        self.input_flags.get(index).unwrap_or(false)
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    pub fn interaction_mode(&self) -> InteractionMode {
        self.interaction_mode
    }

    pub fn vr_gaze_direction(&self) -> Option<Vec3> {
        self.vr_gaze_direction
    }

    pub fn interact_rotation(&self) -> Vec2 {
        self.interact_rotation
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn delta(&self) -> Vec3 {
        self.delta
    }

    pub fn item_interaction_data(&self) -> Option<&ItemInteractionData> {
        self.item_interaction_data.as_ref()
    }

    pub fn item_stack_request(&self) -> Option<&ItemStackRequest> {
        self.item_stack_request.as_ref()
    }

    pub fn block_actions(&self) -> Option<&[PlayerBlockAction]> {
        self.block_actions.as_deref()
    }

    pub fn vehicle_info(&self) -> Option<&PlayerAuthInputVehicleInfo> {
        self.vehicle_info.as_ref()
    }

    pub fn analog_move_vec_x(&self) -> f32 {
        self.analog_move_vec_x
    }

    pub fn analog_move_vec_z(&self) -> f32 {
        self.analog_move_vec_z
    }

    pub fn camera_orientation(&self) -> Vec3 {
        self.camera_orientation
    }

    pub fn raw_move(&self) -> Vec2 {
        self.raw_move
    }
}

impl Packet for PlayerAuthInputPacket {
    const NETWORK_ID: u32 = 0x90;
    const NAME: &'static str = "PlayerAuthInputPacket";

    fn decode_payload(input: &mut PacketReader<'_>) -> Result<Self> {
        let pitch = input.get_f32_le()?;
        let yaw = input.get_f32_le()?;
        let position = input.get_vector3()?;
        let move_vec_x = input.get_f32_le()?;
        let move_vec_z = input.get_f32_le()?;
        let head_yaw = input.get_f32_le()?;

        let wire_width = PlayerAuthInputFlags::wire_width(input.version());
        let input_flags = BitSet::read(input, wire_width)?.resized(PlayerAuthInputFlags::COUNT)?;

        let input_mode = InputMode::from_u32(input.get_var_u32()?)?;
        let play_mode = PlayMode::from_u32(input.get_var_u32()?)?;
        let interaction_mode = InteractionMode::from_u32(input.get_var_u32()?)?;

        let mut interact_rotation = Vec2::ZERO;
        let mut vr_gaze_direction = None;
        if INTERACT_ROTATION.applies(input.version()) {
            interact_rotation = input.get_vector2()?;
        } else if play_mode == PlayMode::Vr {
            vr_gaze_direction = Some(input.get_vector3()?);
        }

        let tick = input.get_var_u64()?;
        let delta = input.get_vector3()?;

        let flag = |index| input_flags.get(index);
        let item_interaction_data = read_if(
            flag(PlayerAuthInputFlags::PERFORM_ITEM_INTERACTION)?,
            input,
            ItemInteractionData::read,
        )?;
        let item_stack_request = read_if(
            flag(PlayerAuthInputFlags::PERFORM_ITEM_STACK_REQUEST)?,
            input,
            ItemStackRequest::read,
        )?;
        let block_actions = read_if(
            flag(PlayerAuthInputFlags::PERFORM_BLOCK_ACTIONS)?,
            input,
            |r: &mut PacketReader<'_>| r.read_list_signed(PlayerBlockAction::read),
        )?;
        let vehicle_info = if flag(PlayerAuthInputFlags::IN_CLIENT_PREDICTED_VEHICLE)? {
            input.read_gated(VEHICLE_INFO, PlayerAuthInputVehicleInfo::read)?
        } else {
            None
        };

        let analog_move_vec_x = input.get_f32_le()?;
        let analog_move_vec_z = input.get_f32_le()?;
        let camera_orientation =
            input.read_gated_or(CAMERA_ORIENTATION, Vec3::ZERO, |r| r.get_vector3())?;
        let raw_move = input.read_gated_or(RAW_MOVE, Vec2::ZERO, |r| r.get_vector2())?;

        Ok(Self {
            position,
            pitch,
            yaw,
            head_yaw,
            move_vec_x,
            move_vec_z,
            input_flags,
            input_mode,
            play_mode,
            interaction_mode,
            vr_gaze_direction,
            interact_rotation,
            tick,
            delta,
            item_interaction_data,
            item_stack_request,
            block_actions,
            vehicle_info,
            analog_move_vec_x,
            analog_move_vec_z,
            camera_orientation,
            raw_move,
        })
    }

    fn encode_payload(&self, out: &mut PacketWriter) -> Result<()> {
        // resolve everything that can fail before the first byte goes out
        let version = out.version();
        let wire_flags = self
            .section_flags(version)?
            .resized(PlayerAuthInputFlags::wire_width(version))?;
        let gaze = if !INTERACT_ROTATION.applies(version) && self.play_mode == PlayMode::Vr {
            Some(self.vr_gaze_direction.ok_or(GAZE_REQUIRED)?)
        } else {
            None
        };

        out.put_f32_le(self.pitch);
        out.put_f32_le(self.yaw);
        out.put_vector3(&self.position);
        out.put_f32_le(self.move_vec_x);
        out.put_f32_le(self.move_vec_z);
        out.put_f32_le(self.head_yaw);
        wire_flags.write(out);
        out.put_var_u32(self.input_mode.id());
        out.put_var_u32(self.play_mode.id());
        out.put_var_u32(self.interaction_mode.id());
        if INTERACT_ROTATION.applies(version) {
            out.put_vector2(&self.interact_rotation);
        } else if let Some(gaze) = &gaze {
            out.put_vector3(gaze);
        }
        out.put_var_u64(self.tick);
        out.put_vector3(&self.delta);

        write_if(out, self.item_interaction_data.as_ref(), |w, data| data.write(w))?;
        write_if(out, self.item_stack_request.as_ref(), |w, request| request.write(w))?;
        write_if(out, self.block_actions.as_deref(), |w, actions| {
            w.put_list_length_var_i32(actions.len())?;
            actions.iter().try_for_each(|action| action.write(w))
        })?;
        if let Some(vehicle) = &self.vehicle_info {
            out.write_gated(VEHICLE_INFO, |w| vehicle.write(w))?;
        }

        out.put_f32_le(self.analog_move_vec_x);
        out.put_f32_le(self.analog_move_vec_z);
        out.write_gated(CAMERA_ORIENTATION, |w| {
            w.put_vector3(&self.camera_orientation);
            Ok(())
        })?;
        out.write_gated(RAW_MOVE, |w| {
            w.put_vector2(&self.raw_move);
            Ok(())
        })
    }
}
