use uuid::Uuid;

use crate::core::serializer::{PacketReader, PacketWriter};
use crate::core::version::{ProtocolVersion, VersionGate};
use crate::error::{ProtocolError, Result};
use crate::protocol::packet::Packet;
use crate::types::resource_packs::{BehaviorPackInfoEntry, ResourcePackInfoEntry};

const HAS_ADDONS: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_21_30);
const WORLD_TEMPLATE: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_21_50);
const BEHAVIOR_PACKS: VersionGate = VersionGate::until(ProtocolVersion::PROTOCOL_1_21_30);
const CDN_URLS: VersionGate = VersionGate::between(
    ProtocolVersion::PROTOCOL_1_16_200,
    ProtocolVersion::PROTOCOL_1_21_40,
);

/// Packs the server offers before the client joins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePacksInfoPacket {
    pub must_accept: bool,
    /// Not carried before 1.21.30.
    pub has_addons: bool,
    pub has_scripts: bool,
    /// Not carried before 1.21.50.
    pub world_template_id: Uuid,
    /// Not carried before 1.21.50.
    pub world_template_version: String,
    /// Only carried before 1.21.30.
    pub force_server_packs: bool,
    /// Only carried before 1.21.30.
    pub behavior_pack_entries: Vec<BehaviorPackInfoEntry>,
    pub resource_pack_entries: Vec<ResourcePackInfoEntry>,
    /// Pack id to CDN url, carried from 1.16.200 up to 1.21.40 where it moved into
    /// the entries.
    pub cdn_urls: Vec<(String, String)>,
}

impl ResourcePacksInfoPacket {
    pub fn new(must_accept: bool, resource_pack_entries: Vec<ResourcePackInfoEntry>) -> Self {
        Self {
            must_accept,
            has_addons: false,
            has_scripts: false,
            world_template_id: Uuid::nil(),
            world_template_version: String::new(),
            force_server_packs: false,
            behavior_pack_entries: Vec::new(),
            resource_pack_entries,
            cdn_urls: Vec::new(),
        }
    }
}

impl Packet for ResourcePacksInfoPacket {
    const NETWORK_ID: u32 = 0x06;
    const NAME: &'static str = "ResourcePacksInfoPacket";

    fn decode_payload(input: &mut PacketReader<'_>) -> Result<Self> {
        let must_accept = input.get_bool()?;
        let has_addons = input.read_gated_or(HAS_ADDONS, false, |r| r.get_bool())?;
        let has_scripts = input.get_bool()?;
        let (world_template_id, world_template_version) =
            input.read_gated_or(WORLD_TEMPLATE, (Uuid::nil(), String::new()), |r| {
                Ok((r.get_uuid()?, r.get_string()?))
            })?;
        let (force_server_packs, behavior_pack_entries) =
            input.read_gated_or(BEHAVIOR_PACKS, (false, Vec::new()), |r| {
                Ok((r.get_bool()?, read_list_u16_le(r, BehaviorPackInfoEntry::read)?))
            })?;
        let resource_pack_entries = read_list_u16_le(input, ResourcePackInfoEntry::read)?;
        let cdn_urls = input.read_gated_or(CDN_URLS, Vec::new(), |r| {
            r.read_list(|r| Ok((r.get_string()?, r.get_string()?)))
        })?;
        Ok(Self {
            must_accept,
            has_addons,
            has_scripts,
            world_template_id,
            world_template_version,
            force_server_packs,
            behavior_pack_entries,
            resource_pack_entries,
            cdn_urls,
        })
    }

    fn encode_payload(&self, out: &mut PacketWriter) -> Result<()> {
        out.put_bool(self.must_accept);
        out.write_gated(HAS_ADDONS, |w| {
            w.put_bool(self.has_addons);
            Ok(())
        })?;
        out.put_bool(self.has_scripts);
        out.write_gated(WORLD_TEMPLATE, |w| {
            w.put_uuid(&self.world_template_id);
            w.put_string(&self.world_template_version)?;
            Ok(())
        })?;
        out.write_gated(BEHAVIOR_PACKS, |w| {
            w.put_bool(self.force_server_packs);
            write_list_u16_le(w, &self.behavior_pack_entries, |w, e| e.write(w))
        })?;
        write_list_u16_le(out, &self.resource_pack_entries, |w, e| e.write(w))?;
        out.write_gated(CDN_URLS, |w| {
            w.write_list(&self.cdn_urls, |w, (pack_id, url)| {
                w.put_string(pack_id)?;
                w.put_string(url)?;
                Ok(())
            })
        })
    }
}

fn read_list_u16_le<T, F>(input: &mut PacketReader<'_>, read: F) -> Result<Vec<T>>
where
    F: FnMut(&mut PacketReader<'_>) -> Result<T>,
{
    let count = usize::from(input.get_u16_le()?);
    let max = input.limits().max_list_length;
    if count > max {
        return Err(ProtocolError::OversizedValue {
            kind: "list",
            len: count,
            max,
        });
    }
    input.read_exact_list(count, read)
}

fn write_list_u16_le<T, F>(out: &mut PacketWriter, items: &[T], mut write: F) -> Result<()>
where
    F: FnMut(&mut PacketWriter, &T) -> Result<()>,
{
    let max = out.limits().max_list_length.min(usize::from(u16::MAX));
    let count: u16 = out.length_prefix("list", items.len(), max)?;
    out.put_u16_le(count);
    for item in items {
        write(out, item)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;

    fn pack() -> ResourcePackInfoEntry {
        let mut entry = ResourcePackInfoEntry::new(
            Uuid::from_u128(0x1234_5678_9abc_def0_1234_5678_9abc_def0),
            "1.0.0",
            4096,
        );
        entry.content_id = "content".into();
        entry
    }

    fn behavior_pack() -> BehaviorPackInfoEntry {
        BehaviorPackInfoEntry {
            pack_id: "5c1a2b3c-0000-4000-8000-000000000001".into(),
            version: "0.1.0".into(),
            size_bytes: 12,
            encryption_key: String::new(),
            sub_pack_name: String::new(),
            content_id: String::new(),
            has_scripts: true,
        }
    }

    #[test]
    fn test_reads_back_per_revision() {
        let mut old = ResourcePacksInfoPacket::new(true, vec![pack()]);
        old.force_server_packs = true;
        old.behavior_pack_entries = vec![behavior_pack()];
        old.cdn_urls = vec![("pack".into(), "https://cdn.example/pack.zip".into())];

        let mut current = ResourcePacksInfoPacket::new(false, vec![pack()]);
        current.has_addons = true;
        current.world_template_id = Uuid::from_u128(9);
        current.world_template_version = "1.0.0".into();

        for (version, packet) in [
            (ProtocolVersion::PROTOCOL_1_16_200, &old),
            (ProtocolVersion::PROTOCOL_1_21_20, &old),
            (ProtocolVersion::CURRENT, &current),
        ] {
            let mut packet = packet.clone();
            if version.is_at_least(ProtocolVersion::PROTOCOL_1_21_20) {
                packet.resource_pack_entries[0].is_addon_pack = true;
            }
            let bytes = packet.to_payload(version).unwrap();
            assert_eq!(
                ResourcePacksInfoPacket::from_payload(&bytes, version).unwrap(),
                packet,
                "at {version}"
            );
        }
    }

    #[test]
    fn test_pack_counts_are_u16() {
        let packet = ResourcePacksInfoPacket::new(false, Vec::new());
        let bytes = packet.to_payload(ProtocolVersion::PROTOCOL_1_21_2).unwrap();
        // must accept, has scripts, force server packs, 0u16, 0u16, no cdn urls
        assert_eq!(bytes, [0, 0, 0, 0, 0, 0, 0, 0]);
        let bytes = packet.to_payload(ProtocolVersion::CURRENT).unwrap();
        // must accept, has addons, has scripts, nil uuid, empty version, 0u16
        assert_eq!(bytes.len(), 3 + 16 + 1 + 2);
    }
}
