#![no_main]

use bedrock_protocol::core::version::ProtocolVersion;
use bedrock_protocol::protocol::GamePacket;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks the revision, the rest is one frame
    let Some((&pick, frame)) = data.split_first() else {
        return;
    };
    let (version, _) = ProtocolVersion::ALL[pick as usize % ProtocolVersion::ALL.len()];
    if let Ok(packet) = GamePacket::decode(frame, version) {
        // re-encoding a decoded packet must not panic either
        let _ = packet.encode(version);
    }
});
