//! Codec Metrics
//!
//! Counters for decode and dispatch activity on a connection.
//!
//! Uses atomic counters so one [`Metrics`] can be shared between a dispatcher and
//! whatever reports on it.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use tracing::info;

/// Counters for codec operations
#[derive(Debug)]
pub struct Metrics {
    /// Packets decoded successfully
    pub packets_decoded: AtomicU64,
    /// Packets encoded successfully
    pub packets_encoded: AtomicU64,
    /// Bytes consumed by successful decodes
    pub bytes_decoded: AtomicU64,
    /// Bytes produced by successful encodes
    pub bytes_encoded: AtomicU64,
    /// Frames that failed to decode
    pub decode_errors: AtomicU64,
    /// Packets the handler declined
    pub packets_unhandled: AtomicU64,
    /// Batches taken apart
    pub batches_decoded: AtomicU64,
    start_time: Instant,
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            packets_decoded: AtomicU64::new(0),
            packets_encoded: AtomicU64::new(0),
            bytes_decoded: AtomicU64::new(0),
            bytes_encoded: AtomicU64::new(0),
            decode_errors: AtomicU64::new(0),
            packets_unhandled: AtomicU64::new(0),
            batches_decoded: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record a decoded frame
    pub fn packet_decoded(&self, byte_count: u64) {
        self.packets_decoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_decoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    /// Record an encoded frame
    pub fn packet_encoded(&self, byte_count: u64) {
        self.packets_encoded.fetch_add(1, Ordering::Relaxed);
        self.bytes_encoded.fetch_add(byte_count, Ordering::Relaxed);
    }

    pub fn decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn packet_unhandled(&self) {
        self.packets_unhandled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn batch_decoded(&self) {
        self.batches_decoded.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            packets_decoded: self.packets_decoded.load(Ordering::Relaxed),
            packets_encoded: self.packets_encoded.load(Ordering::Relaxed),
            bytes_decoded: self.bytes_decoded.load(Ordering::Relaxed),
            bytes_encoded: self.bytes_encoded.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
            packets_unhandled: self.packets_unhandled.load(Ordering::Relaxed),
            batches_decoded: self.batches_decoded.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
        }
    }

    /// Log current metrics
    pub fn log_metrics(&self) {
        let snapshot = self.snapshot();
        info!(
            packets_decoded = snapshot.packets_decoded,
            packets_encoded = snapshot.packets_encoded,
            bytes_decoded = snapshot.bytes_decoded,
            bytes_encoded = snapshot.bytes_encoded,
            decode_errors = snapshot.decode_errors,
            packets_unhandled = snapshot.packets_unhandled,
            batches_decoded = snapshot.batches_decoded,
            uptime_seconds = snapshot.uptime_seconds,
            "Codec metrics snapshot"
        );
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of metrics at a point in time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub packets_decoded: u64,
    pub packets_encoded: u64,
    pub bytes_decoded: u64,
    pub bytes_encoded: u64,
    pub decode_errors: u64,
    pub packets_unhandled: u64,
    pub batches_decoded: u64,
    pub uptime_seconds: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let metrics = Metrics::new();
        metrics.packet_decoded(10);
        metrics.packet_decoded(5);
        metrics.packet_encoded(7);
        metrics.decode_error();
        metrics.packet_unhandled();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.packets_decoded, 2);
        assert_eq!(snapshot.bytes_decoded, 15);
        assert_eq!(snapshot.packets_encoded, 1);
        assert_eq!(snapshot.bytes_encoded, 7);
        assert_eq!(snapshot.decode_errors, 1);
        assert_eq!(snapshot.packets_unhandled, 1);
        assert_eq!(snapshot.batches_decoded, 0);
    }
}
