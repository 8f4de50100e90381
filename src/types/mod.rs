//! # Protocol Value Types
//!
//! Plain data carried inside packets. Most types here know how to read and write
//! themselves through a version-bound
//! [`PacketReader`](crate::core::serializer::PacketReader) /
//! [`PacketWriter`](crate::core::serializer::PacketWriter); the few whose layout is
//! shared by many packets (item stacks, skins, vectors) are exposed as serializer
//! methods instead.

pub mod camera;
pub mod input;
pub mod inventory;
pub mod item;
pub mod login;
pub mod math;
pub mod resource_packs;
pub mod skin;
pub mod stack_request;

pub use item::{FullContainerName, ItemStack, ItemStackWrapper};
pub use math::{BlockPosition, Vec2, Vec3};
pub use skin::{SkinData, SkinImage};
