//! Resource and behaviour pack descriptors sent during world join.

use uuid::Uuid;

use crate::core::serializer::{PacketReader, PacketWriter};
use crate::core::version::{ProtocolVersion, VersionGate};
use crate::error::{ProtocolError, Result};

const PACK_ID_AS_UUID: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_21_50);
const ADDON_PACK: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_21_20);
const ENTRY_CDN_URL: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_21_40);

/// A resource pack offered to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePackInfoEntry {
    pub pack_id: Uuid,
    pub version: String,
    pub size_bytes: i64,
    pub encryption_key: String,
    pub sub_pack_name: String,
    pub content_id: String,
    pub has_scripts: bool,
    pub is_addon_pack: bool,
    pub is_rtx_capable: bool,
    pub cdn_url: String,
}

impl ResourcePackInfoEntry {
    pub fn new(pack_id: Uuid, version: impl Into<String>, size_bytes: i64) -> Self {
        Self {
            pack_id,
            version: version.into(),
            size_bytes,
            encryption_key: String::new(),
            sub_pack_name: String::new(),
            content_id: String::new(),
            has_scripts: false,
            is_addon_pack: false,
            is_rtx_capable: false,
            cdn_url: String::new(),
        }
    }

    pub fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        let pack_id = match input.read_gated(PACK_ID_AS_UUID, |r| r.get_uuid())? {
            Some(uuid) => uuid,
            None => parse_pack_id(&input.get_string()?)?,
        };
        Ok(Self {
            pack_id,
            version: input.get_string()?,
            size_bytes: input.get_i64_le()?,
            encryption_key: input.get_string()?,
            sub_pack_name: input.get_string()?,
            content_id: input.get_string()?,
            has_scripts: input.get_bool()?,
            is_addon_pack: input.read_gated_or(ADDON_PACK, false, |r| r.get_bool())?,
            is_rtx_capable: input.get_bool()?,
            cdn_url: input.read_gated_or(ENTRY_CDN_URL, String::new(), |r| r.get_string())?,
        })
    }

    pub fn write(&self, out: &mut PacketWriter) -> Result<()> {
        if PACK_ID_AS_UUID.applies(out.version()) {
            out.put_uuid(&self.pack_id);
        } else {
            out.put_string(&self.pack_id.to_string())?;
        }
        out.put_string(&self.version)?;
        out.put_i64_le(self.size_bytes);
        out.put_string(&self.encryption_key)?;
        out.put_string(&self.sub_pack_name)?;
        out.put_string(&self.content_id)?;
        out.put_bool(self.has_scripts);
        out.write_gated(ADDON_PACK, |w| {
            w.put_bool(self.is_addon_pack);
            Ok(())
        })?;
        out.put_bool(self.is_rtx_capable);
        out.write_gated(ENTRY_CDN_URL, |w| {
            w.put_string(&self.cdn_url)?;
            Ok(())
        })
    }
}

/// A behaviour pack offered to the client. Only sent before 1.21.30.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviorPackInfoEntry {
    pub pack_id: String,
    pub version: String,
    pub size_bytes: i64,
    pub encryption_key: String,
    pub sub_pack_name: String,
    pub content_id: String,
    pub has_scripts: bool,
}

impl BehaviorPackInfoEntry {
    pub fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            pack_id: input.get_string()?,
            version: input.get_string()?,
            size_bytes: input.get_i64_le()?,
            encryption_key: input.get_string()?,
            sub_pack_name: input.get_string()?,
            content_id: input.get_string()?,
            has_scripts: input.get_bool()?,
        })
    }

    pub fn write(&self, out: &mut PacketWriter) -> Result<()> {
        out.put_string(&self.pack_id)?;
        out.put_string(&self.version)?;
        out.put_i64_le(self.size_bytes);
        out.put_string(&self.encryption_key)?;
        out.put_string(&self.sub_pack_name)?;
        out.put_string(&self.content_id)?;
        out.put_bool(self.has_scripts);
        Ok(())
    }
}

/// One entry of the pack stack the client should apply, lowest priority last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePackStackEntry {
    pub pack_id: String,
    pub version: String,
    pub sub_pack_name: String,
}

impl ResourcePackStackEntry {
    pub fn new(
        pack_id: impl Into<String>,
        version: impl Into<String>,
        sub_pack_name: impl Into<String>,
    ) -> Self {
        Self {
            pack_id: pack_id.into(),
            version: version.into(),
            sub_pack_name: sub_pack_name.into(),
        }
    }

    pub fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        Ok(Self {
            pack_id: input.get_string()?,
            version: input.get_string()?,
            sub_pack_name: input.get_string()?,
        })
    }

    pub fn write(&self, out: &mut PacketWriter) -> Result<()> {
        out.put_string(&self.pack_id)?;
        out.put_string(&self.version)?;
        out.put_string(&self.sub_pack_name)?;
        Ok(())
    }
}

/// Experimental gameplay toggles, in the order they were sent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Experiments {
    pub experiments: Vec<(String, bool)>,
    pub has_previously_used_experiments: bool,
}

impl Experiments {
    pub fn new(experiments: Vec<(String, bool)>, has_previously_used_experiments: bool) -> Self {
        Self {
            experiments,
            has_previously_used_experiments,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    pub fn read(input: &mut PacketReader<'_>) -> Result<Self> {
        let experiments = input.read_list_i32_le(|r| Ok((r.get_string()?, r.get_bool()?)))?;
        let has_previously_used_experiments = input.get_bool()?;
        Ok(Self::new(experiments, has_previously_used_experiments))
    }

    pub fn write(&self, out: &mut PacketWriter) -> Result<()> {
        out.write_list_i32_le(&self.experiments, |w, (name, enabled)| {
            w.put_string(name)?;
            w.put_bool(*enabled);
            Ok(())
        })?;
        out.put_bool(self.has_previously_used_experiments);
        Ok(())
    }
}

fn parse_pack_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|e| ProtocolError::InvalidValue(format!("pack id {raw:?}: {e}")))
}
