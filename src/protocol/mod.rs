//! # Packet Layer
//!
//! Everything above the primitive codec: the per-packet payload definitions, the
//! envelope that frames them, the id registry, batches, and handler dispatch.
//!
//! ## Components
//! - **packet**: the [`Packet`] trait every payload implements
//! - **packets**: the concrete packet kinds
//! - **envelope**: [`GamePacket`] and the packet header
//! - **registry**: id to decoder lookup
//! - **batch**: length-prefixed packet records
//! - **handler** / **dispatcher**: routing decoded packets to application code
//!
//! ## Wire Format
//! ```text
//! frame  = [uvarint header][payload]
//! batch  = ([uvarint frame length][frame])*
//! ```

pub mod batch;
pub mod dispatcher;
pub mod envelope;
pub mod handler;
pub mod packet;
pub mod packets;
pub mod registry;

pub use batch::PacketBatch;
pub use dispatcher::{DispatchSummary, Dispatcher};
pub use envelope::{GamePacket, PacketHeader};
pub use handler::{NoopHandler, PacketHandler};
pub use packet::Packet;
pub use registry::PacketRegistry;
