//! Integration tests for handler dispatch over batches

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::sync::Arc;

use bedrock_protocol::core::version::ProtocolVersion;
use bedrock_protocol::error::ProtocolError;
use bedrock_protocol::protocol::packets::*;
use bedrock_protocol::protocol::{GamePacket, PacketBatch, PacketHandler};
use bedrock_protocol::protocol::{DispatchSummary, Dispatcher};
use bedrock_protocol::types::ItemStackWrapper;
use bedrock_protocol::utils::Metrics;
use uuid::Uuid;

#[derive(Default)]
struct Session {
    falls: u32,
    slots: Vec<u32>,
    removed: Vec<Uuid>,
}

impl PacketHandler for Session {
    fn handle_actor_fall(&mut self, _packet: &ActorFallPacket) -> bool {
        self.falls += 1;
        true
    }

    fn handle_inventory_slot(&mut self, packet: &InventorySlotPacket) -> bool {
        self.slots.push(packet.inventory_slot);
        true
    }

    fn handle_player_list(&mut self, packet: &PlayerListPacket) -> bool {
        match &packet.action {
            PlayerListAction::Remove(uuids) => {
                self.removed.extend(uuids);
                true
            }
            PlayerListAction::Add(_) => false,
        }
    }
}

fn batch(version: ProtocolVersion) -> Vec<u8> {
    let packets: Vec<GamePacket> = vec![
        ActorFallPacket::new(1, 3.0, false).into(),
        InventorySlotPacket::new(0, 4, ItemStackWrapper::default()).into(),
        PlayerListPacket::remove(vec![Uuid::from_u128(1), Uuid::from_u128(2)]).into(),
        CameraInstructionPacket::default().into(),
        InventorySlotPacket::new(0, 8, ItemStackWrapper::default()).into(),
    ];
    PacketBatch::encode(&packets, version).unwrap().to_vec()
}

#[test]
fn test_dispatch_routes_each_kind_once() {
    for version in [
        ProtocolVersion::PROTOCOL_1_20_30,
        ProtocolVersion::PROTOCOL_1_21_20,
        ProtocolVersion::CURRENT,
    ] {
        let mut dispatcher = Dispatcher::new(Session::default(), version);
        let summary = dispatcher.dispatch_batch(&batch(version)).unwrap();
        assert_eq!(summary, DispatchSummary { packets: 5, handled: 4 });

        let session = dispatcher.into_handler();
        assert_eq!(session.falls, 1);
        assert_eq!(session.slots, vec![4, 8]);
        assert_eq!(session.removed.len(), 2);
    }
}

#[test]
fn test_revision_mismatch_surfaces_an_error() {
    // container name fields appear at 1.21.20; reading newer bytes as older leaves data behind
    let bytes = GamePacket::from(InventorySlotPacket::new(0, 1, ItemStackWrapper::default()))
        .encode(ProtocolVersion::CURRENT)
        .unwrap();
    let mut dispatcher = Dispatcher::new(Session::default(), ProtocolVersion::PROTOCOL_1_21_2);
    assert!(matches!(
        dispatcher.dispatch_frame(&bytes),
        Err(ProtocolError::TrailingBytes { .. })
    ));
    assert!(dispatcher.handler().slots.is_empty());
}

#[test]
fn test_metrics_shared_across_dispatchers() {
    let metrics = Arc::new(Metrics::new());
    let version = ProtocolVersion::CURRENT;
    let bytes = batch(version);
    for _ in 0..3 {
        let mut dispatcher =
            Dispatcher::new(Session::default(), version).with_metrics(Arc::clone(&metrics));
        dispatcher.dispatch_batch(&bytes).unwrap();
    }
    let snapshot = metrics.snapshot();
    assert_eq!(snapshot.batches_decoded, 3);
    assert_eq!(snapshot.packets_decoded, 15);
    assert_eq!(snapshot.packets_unhandled, 3);
    assert_eq!(snapshot.decode_errors, 0);
}

#[test]
fn test_version_switch_mid_connection() {
    let mut dispatcher = Dispatcher::new(Session::default(), ProtocolVersion::OLDEST);
    dispatcher.set_version(ProtocolVersion::CURRENT);
    let summary = dispatcher
        .dispatch_batch(&batch(ProtocolVersion::CURRENT))
        .unwrap();
    assert_eq!(summary.packets, 5);
}
