//! Player skin values.
//!
//! A [`SkinData`] is the full appearance description a client uploads: the RGBA
//! skin texture, an optional cape, geometry, animations and persona pieces. The wire
//! layout changes a lot across revisions; see
//! [`PacketReader::get_skin`](crate::core::serializer::PacketReader::get_skin).

use serde_json::{json, Value};

use crate::error::{ProtocolError, Result};

/// Geometry used when a skin names none.
pub const DEFAULT_GEOMETRY_NAME: &str = "geometry.humanoid.custom";

/// RGBA image, four bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SkinImage {
    height: u32,
    width: u32,
    data: Vec<u8>,
}

impl SkinImage {
    /// Fails if `data` is not exactly `height * width * 4` bytes.
    pub fn new(height: u32, width: u32, data: Vec<u8>) -> Result<Self> {
        let expected = u64::from(height) * u64::from(width) * 4;
        if data.len() as u64 != expected {
            return Err(ProtocolError::InvalidValue(format!(
                "skin image {width}x{height} needs {expected} bytes, got {}",
                data.len()
            )));
        }
        Ok(Self {
            height,
            width,
            data,
        })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Infer dimensions from the byte count of a pre-1.13 skin or cape.
    pub fn from_legacy(data: Vec<u8>) -> Result<Self> {
        match data.len() {
            0 => Ok(Self::empty()),
            8192 => Self::new(32, 64, data),
            16384 => Self::new(64, 64, data),
            65536 => Self::new(128, 128, data),
            other => Err(ProtocolError::InvalidValue(format!(
                "unknown legacy skin size {other}"
            ))),
        }
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkinAnimation {
    pub image: SkinImage,
    pub animation_type: i32,
    pub frames: f32,
    /// Not carried before 1.16.100.
    pub expression_type: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaSkinPiece {
    pub piece_id: String,
    pub piece_type: String,
    pub pack_id: String,
    pub is_default_piece: bool,
    pub product_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonaPieceTintColor {
    pub piece_type: String,
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkinData {
    pub skin_id: String,
    pub play_fab_id: String,
    /// JSON naming the geometry to use.
    pub resource_patch: String,
    pub skin_image: SkinImage,
    pub animations: Vec<SkinAnimation>,
    pub cape_image: SkinImage,
    pub geometry_data: String,
    pub geometry_data_engine_version: String,
    pub animation_data: String,
    pub cape_id: String,
    pub full_skin_id: String,
    pub arm_size: String,
    pub skin_color: String,
    pub persona_pieces: Vec<PersonaSkinPiece>,
    pub piece_tint_colors: Vec<PersonaPieceTintColor>,
    pub premium: bool,
    pub persona: bool,
    pub persona_cape_on_classic: bool,
    pub is_primary_user: bool,
    pub override_appearance: bool,
    /// Set by the packet that carries the skin, not by the skin layout itself.
    pub verified: bool,
}

impl SkinData {
    /// Minimal skin around an image; everything else takes its neutral value.
    pub fn new(skin_id: impl Into<String>, skin_image: SkinImage) -> Self {
        Self {
            skin_id: skin_id.into(),
            play_fab_id: String::new(),
            resource_patch: resource_patch_for(DEFAULT_GEOMETRY_NAME),
            skin_image,
            animations: Vec::new(),
            cape_image: SkinImage::empty(),
            geometry_data: String::new(),
            geometry_data_engine_version: String::new(),
            animation_data: String::new(),
            cape_id: String::new(),
            full_skin_id: String::new(),
            arm_size: String::new(),
            skin_color: String::new(),
            persona_pieces: Vec::new(),
            piece_tint_colors: Vec::new(),
            premium: false,
            persona: false,
            persona_cape_on_classic: false,
            is_primary_user: true,
            override_appearance: true,
            verified: false,
        }
    }

    /// The default geometry named by the resource patch, if it names one.
    pub fn geometry_name(&self) -> Result<Option<String>> {
        let patch: Value = serde_json::from_str(&self.resource_patch)?;
        Ok(patch
            .get("geometry")
            .and_then(|g| g.get("default"))
            .and_then(Value::as_str)
            .map(str::to_owned))
    }
}

/// Resource patch JSON selecting `geometry_name` as the default geometry.
pub fn resource_patch_for(geometry_name: &str) -> String {
    json!({ "geometry": { "default": geometry_name } }).to_string()
}
