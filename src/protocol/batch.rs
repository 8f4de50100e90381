//! # Packet Batches
//!
//! Several packets travel together as length-prefixed records:
//!
//! ```text
//! [uvarint len][header + payload] [uvarint len][header + payload] ...
//! ```
//!
//! Batches are what the transport layer compresses and encrypts; this module only
//! deals with the framing inside one.

use bytes::Bytes;

use crate::core::binary::{BinaryReader, BinaryWriter, CodecLimits};
use crate::core::version::ProtocolVersion;
use crate::error::{ProtocolError, Result};
use crate::protocol::envelope::GamePacket;

/// Encoder and decoder for batch framing.
pub struct PacketBatch;

impl PacketBatch {
    /// Encode `packets` into one batch.
    pub fn encode(packets: &[GamePacket], version: ProtocolVersion) -> Result<Bytes> {
        Self::encode_with_limits(packets, version, CodecLimits::default())
    }

    /// Encode with every record and the record count held to `limits`.
    pub fn encode_with_limits(
        packets: &[GamePacket],
        version: ProtocolVersion,
        limits: CodecLimits,
    ) -> Result<Bytes> {
        if packets.len() > limits.max_batch_packets {
            return Err(ProtocolError::OversizedValue {
                kind: "batch",
                len: packets.len(),
                max: limits.max_batch_packets,
            });
        }
        let mut out = BinaryWriter::with_limits(limits);
        for packet in packets {
            let frame = packet.encode_with_limits(version, limits)?;
            out.put_byte_string(&frame)?;
        }
        Ok(out.into_bytes())
    }

    /// Decode every packet in a batch with the default limits.
    pub fn decode(bytes: &[u8], version: ProtocolVersion) -> Result<Vec<GamePacket>> {
        Self::decode_with_limits(bytes, version, CodecLimits::default())
    }

    pub fn decode_with_limits(
        bytes: &[u8],
        version: ProtocolVersion,
        limits: CodecLimits,
    ) -> Result<Vec<GamePacket>> {
        Self::frames_with_limits(bytes, limits)
            .map(|frame| GamePacket::decode_with_limits(frame?, version, limits))
            .collect()
    }

    /// Iterate over the raw frames of a batch without decoding them.
    pub fn frames(bytes: &[u8]) -> BatchFrames<'_> {
        Self::frames_with_limits(bytes, CodecLimits::default())
    }

    pub fn frames_with_limits(bytes: &[u8], limits: CodecLimits) -> BatchFrames<'_> {
        BatchFrames {
            reader: BinaryReader::with_limits(bytes, limits),
            yielded: 0,
            failed: false,
        }
    }
}

/// Lazy iterator over the frames of a batch.
///
/// Yields at most `max_batch_packets` frames; one more is an
/// [`OversizedValue`](ProtocolError::OversizedValue) error. Iteration stops after the
/// first error.
pub struct BatchFrames<'a> {
    reader: BinaryReader<'a>,
    yielded: usize,
    failed: bool,
}

impl<'a> Iterator for BatchFrames<'a> {
    type Item = Result<&'a [u8]>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.reader.is_at_end() {
            return None;
        }
        let max = self.reader.limits().max_batch_packets;
        if self.yielded >= max {
            self.failed = true;
            return Some(Err(ProtocolError::OversizedValue {
                kind: "batch",
                len: self.yielded + 1,
                max,
            }));
        }
        match self.reader.get_byte_string() {
            Ok(frame) => {
                self.yielded += 1;
                Some(Ok(frame))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use crate::protocol::packets::{ActorFallPacket, CameraInstructionPacket};

    fn packets() -> Vec<GamePacket> {
        vec![
            ActorFallPacket::new(1, 4.0, false).into(),
            CameraInstructionPacket::default().into(),
            ActorFallPacket::new(2, 0.5, true).into(),
        ]
    }

    #[test]
    fn test_batch_reads_back_in_order() {
        let version = ProtocolVersion::CURRENT;
        let bytes = PacketBatch::encode(&packets(), version).unwrap();
        assert_eq!(PacketBatch::decode(&bytes, version).unwrap(), packets());
        assert_eq!(PacketBatch::frames(&bytes).count(), 3);
    }

    #[test]
    fn test_record_length_prefix() {
        let bytes =
            PacketBatch::encode(&[ActorFallPacket::new(1, 0.0, false).into()], ProtocolVersion::CURRENT)
                .unwrap();
        // header + runtime id + f32 + bool
        assert_eq!(bytes[0], 7);
        assert_eq!(bytes[1], 0x25);
        assert_eq!(bytes.len(), 8);
    }

    #[test]
    fn test_record_count_is_bounded() {
        let version = ProtocolVersion::CURRENT;
        let bytes = PacketBatch::encode(&packets(), version).unwrap();
        let limits = CodecLimits {
            max_batch_packets: 2,
            ..CodecLimits::default()
        };
        let frames: Vec<_> = PacketBatch::frames_with_limits(&bytes, limits).collect();
        assert_eq!(frames.len(), 3);
        assert!(matches!(
            frames[2],
            Err(ProtocolError::OversizedValue { kind: "batch", max: 2, .. })
        ));
        assert!(PacketBatch::decode_with_limits(&bytes, version, limits).is_err());
    }

    #[test]
    fn test_encoder_honours_the_same_bounds() {
        let limits = CodecLimits {
            max_batch_packets: 2,
            ..CodecLimits::default()
        };
        assert!(matches!(
            PacketBatch::encode_with_limits(&packets(), ProtocolVersion::CURRENT, limits),
            Err(ProtocolError::OversizedValue { kind: "batch", len: 3, max: 2 })
        ));
        let two = &packets()[..2];
        let bytes = PacketBatch::encode_with_limits(two, ProtocolVersion::CURRENT, limits).unwrap();
        assert_eq!(
            PacketBatch::decode_with_limits(&bytes, ProtocolVersion::CURRENT, limits).unwrap(),
            two
        );
    }

    #[test]
    fn test_truncated_record_stops_iteration() {
        let bytes = [5, 0x25, 0x01];
        let mut frames = PacketBatch::frames(&bytes);
        assert!(matches!(
            frames.next(),
            Some(Err(ProtocolError::BufferUnderrun { .. }))
        ));
        assert!(frames.next().is_none());
    }

    #[test]
    fn test_empty_batch() {
        assert!(PacketBatch::decode(&[], ProtocolVersion::CURRENT)
            .unwrap()
            .is_empty());
    }
}
