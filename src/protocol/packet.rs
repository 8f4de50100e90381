//! The contract every packet payload implements.

use crate::core::serializer::{PacketReader, PacketWriter};
use crate::core::version::ProtocolVersion;
use crate::error::{ProtocolError, Result};

/// A single packet kind: its wire id, a display name and the payload codec.
///
/// The header is not part of the payload; [`GamePacket`](super::GamePacket) writes
/// and reads it. Implementations must never read past their own payload and must
/// leave the reader exactly where the payload ends.
pub trait Packet: Sized + Clone + PartialEq + std::fmt::Debug + Send + Sync {
    /// Packet id on the wire, at most 10 bits.
    const NETWORK_ID: u32;

    /// Name used in logs and errors.
    const NAME: &'static str;

    /// Decode the payload fields in wire order.
    fn decode_payload(input: &mut PacketReader<'_>) -> Result<Self>;

    /// Encode the payload fields in wire order.
    fn encode_payload(&self, out: &mut PacketWriter) -> Result<()>;

    /// Decode a bare payload, rejecting any bytes left behind.
    fn from_payload(payload: &[u8], version: ProtocolVersion) -> Result<Self> {
        let mut input = PacketReader::new(payload, version);
        let packet = Self::decode_payload(&mut input)?;
        if !input.is_at_end() {
            return Err(ProtocolError::TrailingBytes {
                packet: Self::NAME,
                remaining: input.remaining(),
            });
        }
        Ok(packet)
    }

    /// Encode a bare payload without the header.
    fn to_payload(&self, version: ProtocolVersion) -> Result<Vec<u8>> {
        let mut out = PacketWriter::new(version);
        self.encode_payload(&mut out)?;
        Ok(out.into_vec())
    }
}
