//! Property-based tests using proptest
//!
//! These tests validate codec invariants across a wide range of randomly
//! generated inputs, ensuring robust behavior under all conditions.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use bedrock_protocol::core::binary::{
    zigzag_decode_32, zigzag_decode_64, zigzag_encode_32, zigzag_encode_64, BinaryReader,
    BinaryWriter,
};
use bedrock_protocol::core::bitset::BitSet;
use bedrock_protocol::core::version::ProtocolVersion;
use bedrock_protocol::protocol::packets::ActorFallPacket;
use bedrock_protocol::protocol::{GamePacket, PacketBatch, PacketHeader};
use proptest::prelude::*;

fn any_version() -> impl Strategy<Value = ProtocolVersion> {
    prop::sample::select(ProtocolVersion::all().collect::<Vec<_>>())
}

// Property: unsigned varints decode to what was written and never exceed their width
proptest! {
    #[test]
    fn prop_var_u32_roundtrip(value in any::<u32>()) {
        let mut writer = BinaryWriter::new();
        writer.put_var_u32(value);
        prop_assert!(writer.len() <= 5);
        let bytes = writer.into_vec();
        let mut reader = BinaryReader::new(&bytes);
        prop_assert_eq!(reader.get_var_u32().unwrap(), value);
        prop_assert!(reader.is_at_end());
    }

    #[test]
    fn prop_var_u64_roundtrip(value in any::<u64>()) {
        let mut writer = BinaryWriter::new();
        writer.put_var_u64(value);
        prop_assert!(writer.len() <= 10);
        let bytes = writer.into_vec();
        let mut reader = BinaryReader::new(&bytes);
        prop_assert_eq!(reader.get_var_u64().unwrap(), value);
    }
}

// Property: zig-zag keeps small magnitudes small
proptest! {
    #[test]
    fn prop_zigzag_32(value in any::<i32>()) {
        prop_assert_eq!(zigzag_decode_32(zigzag_encode_32(value)), value);
        prop_assert_eq!(zigzag_encode_32(value) as u64, (value as i64).unsigned_abs() * 2 - u64::from(value < 0));
    }

    #[test]
    fn prop_zigzag_64(value in any::<i64>()) {
        prop_assert_eq!(zigzag_decode_64(zigzag_encode_64(value)), value);
    }
}

// Property: a bit set occupies ceil(len / 8) bytes and keeps exactly the flags set
proptest! {
    #[test]
    fn prop_bitset_layout(len in 1usize..200, picks in prop::collection::vec(any::<prop::sample::Index>(), 0..32)) {
        let mut set = BitSet::new(len);
        let indices: Vec<usize> = picks.iter().map(|p| p.index(len)).collect();
        for &i in &indices {
            set.set(i, true).unwrap();
        }
        let mut writer = BinaryWriter::new();
        set.write(&mut writer);
        prop_assert_eq!(writer.len(), BitSet::byte_len(len));

        let bytes = writer.into_vec();
        let decoded = BitSet::read(&mut BinaryReader::new(&bytes), len).unwrap();
        for i in 0..len {
            prop_assert_eq!(decoded.get(i).unwrap(), indices.contains(&i));
        }
        prop_assert!(set.set(len, true).is_err());
    }
}

// Property: headers carry sub-client ids through the varint unchanged
proptest! {
    #[test]
    fn prop_header_roundtrip(id in 0u32..=0x3FF, sender in 0u8..4, recipient in 0u8..4) {
        let header = PacketHeader::new(id).with_sub_ids(sender, recipient);
        let mut writer = BinaryWriter::new();
        header.write(&mut writer).unwrap();
        let bytes = writer.into_vec();
        prop_assert_eq!(PacketHeader::read(&mut BinaryReader::new(&bytes)).unwrap(), header);
    }
}

// Property: a packet legal at a revision survives encode and decode at that revision
proptest! {
    #[test]
    fn prop_actor_fall_roundtrip(
        version in any_version(),
        runtime_id in any::<u64>(),
        distance in -1.0e6f32..1.0e6,
        in_void in any::<bool>(),
    ) {
        let packet = GamePacket::from(ActorFallPacket::new(runtime_id, distance, in_void));
        let bytes = packet.encode(version).unwrap();
        prop_assert_eq!(GamePacket::decode(&bytes, version).unwrap(), packet);
    }

    #[test]
    fn prop_batch_roundtrip(distances in prop::collection::vec(-100.0f32..100.0, 0..50)) {
        let packets: Vec<GamePacket> = distances
            .iter()
            .enumerate()
            .map(|(i, d)| ActorFallPacket::new(i as u64, *d, false).into())
            .collect();
        let bytes = PacketBatch::encode(&packets, ProtocolVersion::CURRENT).unwrap();
        prop_assert_eq!(PacketBatch::decode(&bytes, ProtocolVersion::CURRENT).unwrap(), packets);
    }
}

// Property: arbitrary bytes never panic the decoder
proptest! {
    #[test]
    fn prop_decode_arbitrary_bytes(version in any_version(), data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = GamePacket::decode(&data, version);
        let _ = PacketBatch::decode(&data, version);
    }

    #[test]
    fn prop_decode_registered_ids_with_noise(
        version in any_version(),
        id in prop::sample::select(vec![0x06u8, 0x07, 0x25, 0x32, 0x3F, 0x5D]),
        data in prop::collection::vec(any::<u8>(), 0..256),
    ) {
        let mut frame = vec![id];
        frame.extend_from_slice(&data);
        let _ = GamePacket::decode(&frame, version);
    }
}
