//! # Core Codec Components
//!
//! The layers every packet codec is built on, leaves first.
//!
//! ## Components
//! - **binary**: byte cursors for fixed-width numbers, varints and strings
//! - **bitset**: fixed-width flag sets packed LSB-first
//! - **optional**: presence-flag framing for optional values
//! - **version**: the protocol revision catalogue and per-field gates
//! - **serializer**: version-bound cursors with the game's composite types
//!
//! ## Wire Conventions
//! ```text
//! numbers   little-endian unless stated
//! varint    base-128, continuation bit 0x80, u32 <= 5 bytes, u64 <= 10 bytes
//! signed    zig-zag over the unsigned varint
//! string    [uvarint byte length][UTF-8]
//! ```
//!
//! ## Limits
//! Every length read from the wire is checked against [`binary::CodecLimits`] before
//! anything is allocated.

pub mod binary;
pub mod bitset;
pub mod optional;
pub mod serializer;
pub mod version;
