#![no_main]

use bedrock_protocol::core::binary::BinaryReader;
use bedrock_protocol::nbt::{read_root, NbtFlavor};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Both tree encodings, deep nesting included
    for flavor in [NbtFlavor::Network, NbtFlavor::LittleEndian] {
        let _ = read_root(&mut BinaryReader::new(data), flavor);
    }
});
