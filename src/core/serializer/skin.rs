//! Skin layouts.
//!
//! Three shapes exist:
//! - before 1.13.0: raw skin bytes, raw cape bytes, geometry name, geometry data;
//!   dimensions are inferred from the byte counts and the skin id travels outside
//!   the skin
//! - 1.13.0 up to 1.14.60: the image based layout with a short trailer
//! - 1.14.60 on: the same head with persona pieces and tint colours in the trailer
//!
//! Smaller additions are gated per field.

use crate::core::serializer::{PacketReader, PacketWriter};
use crate::core::version::{ProtocolVersion, VersionGate};
use crate::error::Result;
use crate::types::skin::{
    resource_patch_for, PersonaPieceTintColor, PersonaSkinPiece, SkinAnimation, SkinData,
    SkinImage, DEFAULT_GEOMETRY_NAME,
};

const PLAY_FAB_ID: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_16_210);
const ANIMATION_EXPRESSION: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_16_100);
const ENGINE_VERSION: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_17_30);
const OVERRIDE_APPEARANCE: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_19_62);

impl PacketReader<'_> {
    pub fn get_skin_image(&mut self) -> Result<SkinImage> {
        let width = self.get_u32_le()?;
        let height = self.get_u32_le()?;
        let data = self.get_byte_string()?.to_vec();
        SkinImage::new(height, width, data)
    }

    pub fn get_skin(&mut self) -> Result<SkinData> {
        if !self.is_at_least(ProtocolVersion::PROTOCOL_1_13_0) {
            return self.get_legacy_skin();
        }

        let skin_id = self.get_string()?;
        let play_fab_id = self.read_gated_or(PLAY_FAB_ID, String::new(), |r| r.get_string())?;
        let resource_patch = self.get_string()?;
        let skin_image = self.get_skin_image()?;
        let animations = self.read_list_i32_le(|r| {
            let image = r.get_skin_image()?;
            let animation_type = r.get_i32_le()?;
            let frames = r.get_f32_le()?;
            let expression_type = r.read_gated_or(ANIMATION_EXPRESSION, 0, |r| r.get_i32_le())?;
            Ok(SkinAnimation {
                image,
                animation_type,
                frames,
                expression_type,
            })
        })?;
        let cape_image = self.get_skin_image()?;
        let geometry_data = self.get_string()?;
        let geometry_data_engine_version =
            self.read_gated_or(ENGINE_VERSION, String::new(), |r| r.get_string())?;
        let animation_data = self.get_string()?;

        let mut skin = SkinData {
            skin_id,
            play_fab_id,
            resource_patch,
            skin_image,
            animations,
            cape_image,
            geometry_data,
            geometry_data_engine_version,
            animation_data,
            ..SkinData::new("", SkinImage::empty())
        };

        if self.is_at_least(ProtocolVersion::PROTOCOL_1_14_60) {
            skin.cape_id = self.get_string()?;
            skin.full_skin_id = self.get_string()?;
            skin.arm_size = self.get_string()?;
            skin.skin_color = self.get_string()?;
            skin.persona_pieces = self.read_list_i32_le(|r| {
                Ok(PersonaSkinPiece {
                    piece_id: r.get_string()?,
                    piece_type: r.get_string()?,
                    pack_id: r.get_string()?,
                    is_default_piece: r.get_bool()?,
                    product_id: r.get_string()?,
                })
            })?;
            skin.piece_tint_colors = self.read_list_i32_le(|r| {
                let piece_type = r.get_string()?;
                let colors = r.read_list_i32_le(|r| r.get_string())?;
                Ok(PersonaPieceTintColor { piece_type, colors })
            })?;
            skin.premium = self.get_bool()?;
            skin.persona = self.get_bool()?;
            skin.persona_cape_on_classic = self.get_bool()?;
            skin.is_primary_user = self.get_bool()?;
            skin.override_appearance =
                self.read_gated_or(OVERRIDE_APPEARANCE, true, |r| r.get_bool())?;
        } else {
            skin.premium = self.get_bool()?;
            skin.persona = self.get_bool()?;
            skin.persona_cape_on_classic = self.get_bool()?;
            skin.cape_id = self.get_string()?;
            skin.full_skin_id = self.get_string()?;
        }
        Ok(skin)
    }

    fn get_legacy_skin(&mut self) -> Result<SkinData> {
        let skin_image = SkinImage::from_legacy(self.get_byte_string()?.to_vec())?;
        let cape_image = SkinImage::from_legacy(self.get_byte_string()?.to_vec())?;
        let geometry_name = self.get_string()?;
        let geometry_data = self.get_string()?;
        Ok(SkinData {
            resource_patch: resource_patch_for(&geometry_name),
            cape_image,
            geometry_data,
            ..SkinData::new("", skin_image)
        })
    }
}

impl PacketWriter {
    pub fn put_skin_image(&mut self, image: &SkinImage) -> Result<()> {
        self.put_u32_le(image.width());
        self.put_u32_le(image.height());
        self.put_byte_string(image.data())
    }

    pub fn put_skin(&mut self, skin: &SkinData) -> Result<()> {
        if !self.is_at_least(ProtocolVersion::PROTOCOL_1_13_0) {
            return self.put_legacy_skin(skin);
        }

        self.put_string(&skin.skin_id)?;
        self.write_gated(PLAY_FAB_ID, |w| w.put_string(&skin.play_fab_id))?;
        self.put_string(&skin.resource_patch)?;
        self.put_skin_image(&skin.skin_image)?;
        self.write_list_i32_le(&skin.animations, |w, animation| {
            w.put_skin_image(&animation.image)?;
            w.put_i32_le(animation.animation_type);
            w.put_f32_le(animation.frames);
            w.write_gated(ANIMATION_EXPRESSION, |w| {
                w.put_i32_le(animation.expression_type);
                Ok(())
            })
        })?;
        self.put_skin_image(&skin.cape_image)?;
        self.put_string(&skin.geometry_data)?;
        self.write_gated(ENGINE_VERSION, |w| {
            w.put_string(&skin.geometry_data_engine_version)
        })?;
        self.put_string(&skin.animation_data)?;

        if self.is_at_least(ProtocolVersion::PROTOCOL_1_14_60) {
            self.put_string(&skin.cape_id)?;
            self.put_string(&skin.full_skin_id)?;
            self.put_string(&skin.arm_size)?;
            self.put_string(&skin.skin_color)?;
            self.write_list_i32_le(&skin.persona_pieces, |w, piece| {
                w.put_string(&piece.piece_id)?;
                w.put_string(&piece.piece_type)?;
                w.put_string(&piece.pack_id)?;
                w.put_bool(piece.is_default_piece);
                w.put_string(&piece.product_id)
            })?;
            self.write_list_i32_le(&skin.piece_tint_colors, |w, tint| {
                w.put_string(&tint.piece_type)?;
                w.write_list_i32_le(&tint.colors, |w, color| w.put_string(color))
            })?;
            self.put_bool(skin.premium);
            self.put_bool(skin.persona);
            self.put_bool(skin.persona_cape_on_classic);
            self.put_bool(skin.is_primary_user);
            self.write_gated(OVERRIDE_APPEARANCE, |w| {
                w.put_bool(skin.override_appearance);
                Ok(())
            })?;
        } else {
            self.put_bool(skin.premium);
            self.put_bool(skin.persona);
            self.put_bool(skin.persona_cape_on_classic);
            self.put_string(&skin.cape_id)?;
            self.put_string(&skin.full_skin_id)?;
        }
        Ok(())
    }

    fn put_legacy_skin(&mut self, skin: &SkinData) -> Result<()> {
        let geometry_name = skin
            .geometry_name()?
            .unwrap_or_else(|| DEFAULT_GEOMETRY_NAME.to_owned());
        self.put_byte_string(skin.skin_image.data())?;
        self.put_byte_string(skin.cape_image.data())?;
        self.put_string(&geometry_name)?;
        self.put_string(&skin.geometry_data)
    }
}
