use crate::protocol::packets::*;

/// Receiver for decoded packets.
///
/// Every method returns whether the packet was handled. The defaults return `false`,
/// so an implementation only overrides the packets it cares about and everything else
/// is reported as unhandled.
#[allow(unused_variables)]
pub trait PacketHandler {
    fn handle_resource_packs_info(&mut self, packet: &ResourcePacksInfoPacket) -> bool {
        false
    }

    fn handle_resource_pack_stack(&mut self, packet: &ResourcePackStackPacket) -> bool {
        false
    }

    fn handle_actor_fall(&mut self, packet: &ActorFallPacket) -> bool {
        false
    }

    fn handle_inventory_slot(&mut self, packet: &InventorySlotPacket) -> bool {
        false
    }

    fn handle_player_list(&mut self, packet: &PlayerListPacket) -> bool {
        false
    }

    fn handle_player_skin(&mut self, packet: &PlayerSkinPacket) -> bool {
        false
    }

    fn handle_player_auth_input(&mut self, packet: &PlayerAuthInputPacket) -> bool {
        false
    }

    fn handle_camera_instruction(&mut self, packet: &CameraInstructionPacket) -> bool {
        false
    }
}

/// Handler that accepts nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopHandler;

impl PacketHandler for NoopHandler {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::envelope::GamePacket;

    #[derive(Default)]
    struct FallCounter {
        falls: usize,
    }

    impl PacketHandler for FallCounter {
        fn handle_actor_fall(&mut self, _packet: &ActorFallPacket) -> bool {
            self.falls += 1;
            true
        }
    }

    #[test]
    fn test_only_overridden_method_handles() {
        let mut handler = FallCounter::default();
        let fall = GamePacket::from(ActorFallPacket::new(7, 3.5, false));
        let camera = GamePacket::from(CameraInstructionPacket::default());
        assert!(fall.handle(&mut handler));
        assert!(!camera.handle(&mut handler));
        assert_eq!(handler.falls, 1);
    }

    #[test]
    fn test_noop_handles_nothing() {
        let packet = GamePacket::from(ActorFallPacket::new(1, 0.0, true));
        assert!(!packet.handle(&mut NoopHandler));
    }
}
