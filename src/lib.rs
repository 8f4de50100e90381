//! # bedrock-protocol
//!
//! Multi-version codec for the Bedrock game protocol.
//!
//! One packet definition serves every supported revision from 1.12.0 to 1.21.50.
//! Fields that only exist on some revisions are gated by
//! [`VersionGate`](crate::core::version::VersionGate), so a packet decoded at one revision can
//! be re-encoded for another as long as its values are legal there.
//!
//! ## Layers
//! - [`core`]: primitive codec, bit sets, optional framing, version catalogue and the
//!   version-bound packet serializer
//! - [`nbt`]: named-tree values used by legacy payloads and item data
//! - [`types`]: value types carried inside packets
//! - [`protocol`]: packets, the envelope, registry, batches and dispatch
//! - [`config`] and [`utils`]: configuration, logging and metrics
//!
//! ## Example
//! ```rust
//! use bedrock_protocol::core::version::ProtocolVersion;
//! use bedrock_protocol::protocol::packets::ActorFallPacket;
//! use bedrock_protocol::protocol::GamePacket;
//!
//! let packet = GamePacket::from(ActorFallPacket::new(42, 3.5, false));
//! let bytes = packet.encode(ProtocolVersion::CURRENT)?;
//! assert_eq!(GamePacket::decode(&bytes, ProtocolVersion::CURRENT)?, packet);
//! # Ok::<(), bedrock_protocol::error::ProtocolError>(())
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod nbt;
pub mod protocol;
pub mod types;
pub mod utils;

pub use crate::core::version::ProtocolVersion;
pub use crate::error::{ProtocolError, Result};
pub use crate::protocol::{GamePacket, Packet, PacketHandler};
