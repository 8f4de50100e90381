use std::sync::Arc;

use bytes::Bytes;
use tracing::{debug, instrument, warn};

use crate::config::CodecSettings;
use crate::core::binary::CodecLimits;
use crate::core::version::ProtocolVersion;
use crate::error::Result;
use crate::protocol::batch::PacketBatch;
use crate::protocol::envelope::{GamePacket, PacketHeader};
use crate::protocol::handler::PacketHandler;
use crate::utils::metrics::Metrics;

/// Outcome of dispatching one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Packets decoded and passed to the handler
    pub packets: usize,
    /// Packets the handler reported as handled
    pub handled: usize,
}

impl DispatchSummary {
    pub fn unhandled(&self) -> usize {
        self.packets - self.handled
    }
}

/// Decodes frames for one connection and routes them to a [`PacketHandler`].
///
/// A decode error aborts the dispatch and is returned as is; the handler never sees
/// a partially decoded packet.
pub struct Dispatcher<H> {
    handler: H,
    version: ProtocolVersion,
    limits: CodecLimits,
    metrics: Arc<Metrics>,
}

impl<H: PacketHandler> Dispatcher<H> {
    pub fn new(handler: H, version: ProtocolVersion) -> Self {
        Self {
            handler,
            version,
            limits: CodecLimits::default(),
            metrics: Arc::new(Metrics::new()),
        }
    }

    /// Dispatcher using the configured limits and default revision.
    pub fn from_settings(handler: H, settings: &CodecSettings) -> Self {
        Self::new(handler, settings.default_version).with_limits(settings.limits())
    }

    pub fn with_limits(mut self, limits: CodecLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Share counters with other dispatchers or a reporter.
    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn version(&self) -> ProtocolVersion {
        self.version
    }

    pub fn set_version(&mut self, version: ProtocolVersion) {
        self.version = version;
    }

    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    pub fn into_handler(self) -> H {
        self.handler
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Decode one frame and hand it to the handler. Returns whether it was handled.
    #[instrument(skip(self, frame), level = "debug", fields(len = frame.len()))]
    pub fn dispatch_frame(&mut self, frame: &[u8]) -> Result<bool> {
        let (header, packet) = self.decode(frame)?;
        Ok(self.deliver(header, &packet))
    }

    /// Decode and dispatch every record of a batch, stopping at the first error.
    #[instrument(skip(self, batch), level = "debug", fields(len = batch.len()))]
    pub fn dispatch_batch(&mut self, batch: &[u8]) -> Result<DispatchSummary> {
        let mut summary = DispatchSummary::default();
        for frame in PacketBatch::frames_with_limits(batch, self.limits) {
            let frame = match frame {
                Ok(frame) => frame,
                Err(e) => {
                    self.metrics.decode_error();
                    return Err(e);
                }
            };
            let (header, packet) = self.decode(frame)?;
            summary.packets += 1;
            if self.deliver(header, &packet) {
                summary.handled += 1;
            }
        }
        self.metrics.batch_decoded();
        debug!(
            packets = summary.packets,
            handled = summary.handled,
            "Batch dispatched"
        );
        Ok(summary)
    }

    /// Encode a packet for this connection's revision.
    pub fn encode(&self, packet: &GamePacket) -> Result<Bytes> {
        let bytes = packet.encode_with_limits(self.version, self.limits)?;
        self.metrics.packet_encoded(bytes.len() as u64);
        Ok(bytes)
    }

    fn decode(&self, frame: &[u8]) -> Result<(PacketHeader, GamePacket)> {
        match GamePacket::decode_frame(frame, self.version, self.limits) {
            Ok(decoded) => {
                self.metrics.packet_decoded(frame.len() as u64);
                Ok(decoded)
            }
            Err(e) => {
                self.metrics.decode_error();
                warn!(error = %e, version = %self.version, "Packet decode failed");
                Err(e)
            }
        }
    }

    fn deliver(&mut self, header: PacketHeader, packet: &GamePacket) -> bool {
        let handled = packet.handle(&mut self.handler);
        if !handled {
            self.metrics.packet_unhandled();
            debug!(
                packet = packet.name(),
                sender_sub_id = header.sender_sub_id,
                "Packet unhandled"
            );
        }
        handled
    }
}
