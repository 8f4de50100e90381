use crate::core::serializer::{PacketReader, PacketWriter};
use crate::core::version::{ProtocolVersion, VersionGate};
use crate::error::Result;
use crate::protocol::packet::Packet;
use crate::types::resource_packs::{Experiments, ResourcePackStackEntry};

const IS_EXPERIMENTAL: VersionGate = VersionGate::until(ProtocolVersion::PROTOCOL_1_16_100);
const BASE_GAME_VERSION: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_13_0);
const EXPERIMENTS: VersionGate = VersionGate::since(ProtocolVersion::PROTOCOL_1_16_100);

/// Any base game version.
pub const ANY_BASE_GAME_VERSION: &str = "*";

/// The ordered pack stack the client must apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourcePackStackPacket {
    pub must_accept: bool,
    pub behavior_pack_stack: Vec<ResourcePackStackEntry>,
    pub resource_pack_stack: Vec<ResourcePackStackEntry>,
    /// Not carried before 1.13.0; reads back as [`ANY_BASE_GAME_VERSION`].
    pub base_game_version: String,
    /// Not carried before 1.16.100, where only "any experiments?" is sent.
    pub experiments: Experiments,
}

impl ResourcePackStackPacket {
    pub fn new(
        must_accept: bool,
        behavior_pack_stack: Vec<ResourcePackStackEntry>,
        resource_pack_stack: Vec<ResourcePackStackEntry>,
    ) -> Self {
        Self {
            must_accept,
            behavior_pack_stack,
            resource_pack_stack,
            base_game_version: ANY_BASE_GAME_VERSION.to_owned(),
            experiments: Experiments::default(),
        }
    }
}

impl Packet for ResourcePackStackPacket {
    const NETWORK_ID: u32 = 0x07;
    const NAME: &'static str = "ResourcePackStackPacket";

    fn decode_payload(input: &mut PacketReader<'_>) -> Result<Self> {
        let must_accept = input.get_bool()?;
        let behavior_pack_stack = input.read_list(ResourcePackStackEntry::read)?;
        let resource_pack_stack = input.read_list(ResourcePackStackEntry::read)?;
        // the old "is experimental" switch carries nothing the list form does not
        input.read_gated(IS_EXPERIMENTAL, |r| r.get_bool())?;
        let base_game_version = input.read_gated_or(
            BASE_GAME_VERSION,
            ANY_BASE_GAME_VERSION.to_owned(),
            |r| r.get_string(),
        )?;
        let experiments =
            input.read_gated_or(EXPERIMENTS, Experiments::default(), Experiments::read)?;
        Ok(Self {
            must_accept,
            behavior_pack_stack,
            resource_pack_stack,
            base_game_version,
            experiments,
        })
    }

    fn encode_payload(&self, out: &mut PacketWriter) -> Result<()> {
        out.put_bool(self.must_accept);
        out.write_list(&self.behavior_pack_stack, |w, e| e.write(w))?;
        out.write_list(&self.resource_pack_stack, |w, e| e.write(w))?;
        out.write_gated(IS_EXPERIMENTAL, |w| {
            w.put_bool(!self.experiments.is_empty());
            Ok(())
        })?;
        out.write_gated(BASE_GAME_VERSION, |w| {
            w.put_string(&self.base_game_version)?;
            Ok(())
        })?;
        out.write_gated(EXPERIMENTS, |w| self.experiments.write(w))
    }
}
