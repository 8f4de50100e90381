#![no_main]

use bedrock_protocol::core::version::ProtocolVersion;
use bedrock_protocol::protocol::PacketBatch;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Test batch framing for panics, crashes, runaway allocation
    let _ = PacketBatch::decode(data, ProtocolVersion::CURRENT);
});
