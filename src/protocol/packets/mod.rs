//! Packet payload definitions, one module per packet kind.

mod actor_fall;
mod camera_instruction;
mod inventory_slot;
mod player_auth_input;
mod player_list;
mod player_skin;
mod resource_pack_stack;
mod resource_packs_info;

pub use actor_fall::ActorFallPacket;
pub use camera_instruction::CameraInstructionPacket;
pub use inventory_slot::InventorySlotPacket;
pub use player_auth_input::{PlayerAuthInputBuilder, PlayerAuthInputPacket};
pub use player_list::{PlayerListAction, PlayerListAdditionEntry, PlayerListPacket};
pub use player_skin::PlayerSkinPacket;
pub use resource_pack_stack::{ResourcePackStackPacket, ANY_BASE_GAME_VERSION};
pub use resource_packs_info::ResourcePacksInfoPacket;
