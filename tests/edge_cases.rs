#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
//! Edge-case tests for malformed input and limits
//! Tests corrupt varints, truncation, unknown ids, trailing bytes and length caps

use bedrock_protocol::core::binary::{BinaryReader, BinaryWriter, CodecLimits};
use bedrock_protocol::core::version::ProtocolVersion;
use bedrock_protocol::error::ProtocolError;
use bedrock_protocol::protocol::packets::{ActorFallPacket, PlayerListPacket, PlayerSkinPacket};
use bedrock_protocol::protocol::{GamePacket, PacketBatch};
use bedrock_protocol::types::{SkinData, SkinImage};
use uuid::Uuid;

// ============================================================================
// VARINT EDGE CASES
// ============================================================================

#[test]
fn test_varint_sixth_continuation_byte_is_corrupt() {
    let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01];
    let mut reader = BinaryReader::new(&bytes);
    assert!(matches!(
        reader.get_var_u32(),
        Err(ProtocolError::CorruptVarint { max_bytes: 5 })
    ));
}

#[test]
fn test_var_long_eleventh_byte_is_corrupt() {
    let mut bytes = vec![0x80; 10];
    bytes.push(0x01);
    let mut reader = BinaryReader::new(&bytes);
    assert!(matches!(
        reader.get_var_u64(),
        Err(ProtocolError::CorruptVarint { max_bytes: 10 })
    ));
}

#[test]
fn test_corrupt_header_varint() {
    let bytes = [0x80, 0x80, 0x80, 0x80, 0x80, 0x80];
    assert!(matches!(
        GamePacket::decode(&bytes, ProtocolVersion::CURRENT),
        Err(ProtocolError::CorruptVarint { .. })
    ));
}

#[test]
fn test_varint_extremes() {
    let mut writer = BinaryWriter::new();
    writer.put_var_u32(u32::MAX);
    writer.put_var_i32(i32::MIN);
    writer.put_var_u64(u64::MAX);
    writer.put_var_i64(i64::MIN);
    let bytes = writer.into_vec();
    assert_eq!(bytes.len(), 5 + 5 + 10 + 10);

    let mut reader = BinaryReader::new(&bytes);
    assert_eq!(reader.get_var_u32().unwrap(), u32::MAX);
    assert_eq!(reader.get_var_i32().unwrap(), i32::MIN);
    assert_eq!(reader.get_var_u64().unwrap(), u64::MAX);
    assert_eq!(reader.get_var_i64().unwrap(), i64::MIN);
    assert!(reader.is_at_end());
}

// ============================================================================
// ENVELOPE EDGE CASES
// ============================================================================

#[test]
fn test_empty_frame_underruns() {
    assert!(matches!(
        GamePacket::decode(&[], ProtocolVersion::CURRENT),
        Err(ProtocolError::BufferUnderrun { .. })
    ));
}

#[test]
fn test_unknown_packet_id() {
    // 0x01 is a login packet this crate does not model
    assert!(matches!(
        GamePacket::decode(&[0x01], ProtocolVersion::CURRENT),
        Err(ProtocolError::UnknownPacketId(0x01))
    ));
}

#[test]
fn test_unknown_id_with_sub_client_bits() {
    // id 0x01 from sub-client 1
    let header = 0x01 | (1 << 10);
    let mut writer = BinaryWriter::new();
    writer.put_var_u32(header);
    assert!(matches!(
        GamePacket::decode(writer.as_slice(), ProtocolVersion::CURRENT),
        Err(ProtocolError::UnknownPacketId(0x01))
    ));
}

#[test]
fn test_truncated_payload_at_every_length() {
    let bytes = GamePacket::from(ActorFallPacket::new(300, 1.5, true))
        .encode(ProtocolVersion::CURRENT)
        .unwrap();
    for len in 1..bytes.len() {
        let err = GamePacket::decode(&bytes[..len], ProtocolVersion::CURRENT).unwrap_err();
        assert!(
            matches!(err, ProtocolError::BufferUnderrun { .. }),
            "length {len}: {err}"
        );
    }
}

#[test]
fn test_trailing_bytes_rejected() {
    let mut bytes = GamePacket::from(PlayerListPacket::remove(vec![Uuid::nil()]))
        .encode(ProtocolVersion::CURRENT)
        .unwrap()
        .to_vec();
    bytes.push(0);
    assert!(matches!(
        GamePacket::decode(&bytes, ProtocolVersion::CURRENT),
        Err(ProtocolError::TrailingBytes {
            packet: "PlayerListPacket",
            remaining: 1
        })
    ));
}

#[test]
fn test_errors_are_decode_errors() {
    let err = GamePacket::decode(&[0x01], ProtocolVersion::CURRENT).unwrap_err();
    assert!(err.is_decode_error());
}

// ============================================================================
// LIMITS
// ============================================================================

#[test]
fn test_list_length_checked_before_allocation() {
    // player list remove with a claimed four billion entries
    let mut writer = BinaryWriter::new();
    writer.put_var_u32(0x3F);
    writer.put_u8(1);
    writer.put_var_u32(u32::MAX);
    assert!(matches!(
        GamePacket::decode(writer.as_slice(), ProtocolVersion::CURRENT),
        Err(ProtocolError::OversizedValue { kind: "list", .. })
    ));
}

#[test]
fn test_custom_string_limit() {
    let mut writer = BinaryWriter::new();
    writer.put_string("hello world").unwrap();
    let limits = CodecLimits {
        max_string_length: 4,
        ..CodecLimits::default()
    };
    let mut reader = BinaryReader::with_limits(writer.as_slice(), limits);
    assert!(matches!(
        reader.get_string(),
        Err(ProtocolError::OversizedValue { len: 11, max: 4, .. })
    ));
}

#[test]
fn test_invalid_utf8_string() {
    let bytes = [2, 0xC3, 0x28];
    let mut reader = BinaryReader::new(&bytes);
    assert!(matches!(reader.get_string(), Err(ProtocolError::InvalidUtf8)));
}

#[test]
fn test_batch_with_bad_record_fails_whole_batch() {
    let version = ProtocolVersion::CURRENT;
    let mut bytes = PacketBatch::encode(&[ActorFallPacket::new(1, 1.0, false).into()], version)
        .unwrap()
        .to_vec();
    // a second record carrying an unknown id
    bytes.extend_from_slice(&[1, 0x01]);
    assert!(matches!(
        PacketBatch::decode(&bytes, version),
        Err(ProtocolError::UnknownPacketId(0x01))
    ));
}

#[test]
fn test_encoder_rejects_what_the_decoder_would() {
    let limits = CodecLimits {
        max_string_length: 8,
        ..CodecLimits::default()
    };
    let packet = GamePacket::from(PlayerSkinPacket::new(
        Uuid::from_u128(9),
        SkinData::new("a-very-long-skin-id", SkinImage::new(1, 1, vec![0; 4]).unwrap()),
    ));
    assert!(matches!(
        packet.encode_with_limits(ProtocolVersion::CURRENT, limits),
        Err(ProtocolError::OversizedValue { kind: "string", max: 8, .. })
    ));
    // the default limits accept it and the frame reads back
    let bytes = packet.encode(ProtocolVersion::CURRENT).unwrap();
    assert_eq!(GamePacket::decode(&bytes, ProtocolVersion::CURRENT).unwrap(), packet);
}
