//! # Login Client Data
//!
//! The JSON document a client sends inside its login chain, describing the device
//! and the skin it wants to use. Field names follow the client's PascalCase keys.
//! Fields the client has not always sent are `Option`s; a document missing a
//! required field fails to parse.
//!
//! Skin payloads in the document are base64 encoded. [`ClientData::to_skin_data`]
//! decodes them into a [`SkinData`] ready to be sent in skin and player list packets.
//!
//! ## Example
//! ```rust,no_run
//! use bedrock_protocol::types::login::ClientData;
//!
//! # fn demo(json: &str) -> bedrock_protocol::Result<()> {
//! let client = ClientData::from_json(json)?;
//! let skin = client.to_skin_data()?;
//! tracing::debug!(skin_id = %skin.skin_id, "client skin decoded");
//! # Ok(())
//! # }
//! ```

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::core::version::ProtocolVersion;
use crate::error::{constants, ProtocolError, Result};
use crate::types::skin::{
    resource_patch_for, PersonaPieceTintColor, PersonaSkinPiece, SkinAnimation, SkinData,
    SkinImage, DEFAULT_GEOMETRY_NAME,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClientDataAnimationFrame {
    pub image_height: u32,
    pub image_width: u32,
    pub frames: f32,
    #[serde(rename = "Type")]
    pub animation_type: i32,
    pub image: String,
    pub animation_expression: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClientDataPersonaSkinPiece {
    pub piece_id: String,
    pub piece_type: String,
    pub pack_id: String,
    pub is_default: bool,
    pub product_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClientDataPersonaPieceTintColor {
    pub piece_type: String,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ClientData {
    #[serde(default)]
    pub animated_image_data: Vec<ClientDataAnimationFrame>,
    pub arm_size: Option<String>,
    pub cape_data: String,
    pub cape_id: Option<String>,
    pub cape_image_height: Option<u32>,
    pub cape_image_width: Option<u32>,
    pub cape_on_classic_skin: Option<bool>,
    pub client_random_id: i64,
    pub current_input_mode: i32,
    pub default_input_mode: i32,
    pub device_id: String,
    pub device_model: String,
    #[serde(rename = "DeviceOS")]
    pub device_os: i32,
    pub game_version: String,
    pub gui_scale: i32,
    pub is_editor_mode: Option<bool>,
    pub language_code: String,
    pub override_skin: Option<bool>,
    pub persona_pieces: Option<Vec<ClientDataPersonaSkinPiece>>,
    pub persona_skin: Option<bool>,
    pub piece_tint_colors: Option<Vec<ClientDataPersonaPieceTintColor>>,
    pub platform_offline_id: String,
    pub platform_online_id: String,
    /// Only sent by Xbox clients.
    #[serde(default)]
    pub platform_user_id: String,
    pub play_fab_id: Option<String>,
    pub premium_skin: bool,
    pub self_signed_id: String,
    pub server_address: String,
    pub skin_animation_data: Option<String>,
    pub skin_color: Option<String>,
    pub skin_data: String,
    pub skin_geometry_name: Option<String>,
    pub skin_geometry: Option<String>,
    pub skin_geometry_data: Option<String>,
    pub skin_geometry_data_engine_version: Option<String>,
    pub skin_id: String,
    pub skin_image_height: Option<u32>,
    pub skin_image_width: Option<u32>,
    pub skin_resource_patch: Option<String>,
    pub third_party_name: String,
    pub third_party_name_only: Option<bool>,
    pub trusted_skin: Option<bool>,
    #[serde(rename = "UIProfile")]
    pub ui_profile: i32,
}

impl ClientData {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode the skin described by this document.
    pub fn to_skin_data(&self) -> Result<SkinData> {
        let animations = self
            .animated_image_data
            .iter()
            .enumerate()
            .map(|(i, frame)| {
                let data = decode_base64(&frame.image, &format!("AnimatedImageData.{i}.Image"))?;
                Ok(SkinAnimation {
                    image: SkinImage::new(frame.image_height, frame.image_width, data)?,
                    animation_type: frame.animation_type,
                    frames: frame.frames,
                    expression_type: frame.animation_expression.unwrap_or(0),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // the engine version is base64 encoded as well
        let geometry_data_engine_version = match &self.skin_geometry_data_engine_version {
            Some(encoded) => decode_base64_string(encoded, "SkinGeometryDataEngineVersion")?,
            None => ProtocolVersion::CURRENT
                .game_version()
                .unwrap_or_default()
                .to_owned(),
        };

        let skin_bytes = decode_base64(&self.skin_data, "SkinData")?;
        let skin_image = match (self.skin_image_height, self.skin_image_width) {
            (Some(height), Some(width)) => SkinImage::new(height, width, skin_bytes)?,
            _ => SkinImage::from_legacy(skin_bytes)?,
        };

        let cape_bytes = decode_base64(&self.cape_data, "CapeData")?;
        let cape_image = match (self.cape_image_height, self.cape_image_width) {
            _ if cape_bytes.is_empty() => SkinImage::empty(),
            (Some(height), Some(width)) => SkinImage::new(height, width, cape_bytes)?,
            _ => SkinImage::from_legacy(cape_bytes)?,
        };

        let geometry = self
            .skin_geometry_data
            .as_ref()
            .or(self.skin_geometry.as_ref())
            .ok_or(ProtocolError::RequiredFieldMissing {
                field: "SkinGeometryData",
                reason: "client data carries no skin geometry",
            })?;
        let geometry_data = decode_base64_string(geometry, "SkinGeometryData")?;

        let resource_patch = match &self.skin_resource_patch {
            Some(encoded) => decode_base64_string(encoded, "SkinResourcePatch")?,
            None => resource_patch_for(
                self.skin_geometry_name
                    .as_deref()
                    .unwrap_or(DEFAULT_GEOMETRY_NAME),
            ),
        };

        let animation_data = match &self.skin_animation_data {
            Some(encoded) => decode_base64_string(encoded, "SkinAnimationData")?,
            None => String::new(),
        };

        Ok(SkinData {
            skin_id: self.skin_id.clone(),
            play_fab_id: self.play_fab_id.clone().unwrap_or_default(),
            resource_patch,
            skin_image,
            animations,
            cape_image,
            geometry_data,
            geometry_data_engine_version,
            animation_data,
            cape_id: self.cape_id.clone().unwrap_or_default(),
            full_skin_id: self.skin_id.clone(),
            arm_size: self.arm_size.clone().unwrap_or_default(),
            skin_color: self.skin_color.clone().unwrap_or_default(),
            persona_pieces: self
                .persona_pieces
                .iter()
                .flatten()
                .map(|p| PersonaSkinPiece {
                    piece_id: p.piece_id.clone(),
                    piece_type: p.piece_type.clone(),
                    pack_id: p.pack_id.clone(),
                    is_default_piece: p.is_default,
                    product_id: p.product_id.clone(),
                })
                .collect(),
            piece_tint_colors: self
                .piece_tint_colors
                .iter()
                .flatten()
                .map(|t| PersonaPieceTintColor {
                    piece_type: t.piece_type.clone(),
                    colors: t.colors.clone(),
                })
                .collect(),
            premium: self.premium_skin,
            persona: self.persona_skin.unwrap_or(false),
            persona_cape_on_classic: self.cape_on_classic_skin.unwrap_or(false),
            // the document has no field for it
            is_primary_user: true,
            override_appearance: self.override_skin.unwrap_or(true),
            verified: true,
        })
    }
}

fn decode_base64(encoded: &str, context: &str) -> Result<Vec<u8>> {
    STANDARD.decode(encoded).map_err(|_| {
        ProtocolError::InvalidValue(format!("{context}: {}", constants::ERR_MALFORMED_BASE64))
    })
}

fn decode_base64_string(encoded: &str, context: &str) -> Result<String> {
    String::from_utf8(decode_base64(encoded, context)?).map_err(|_| ProtocolError::InvalidUtf8)
}
