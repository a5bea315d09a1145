//! # Connection statistics
//!
//! Per-connection counters for observability, following the
//! `strata-transport::stats` shape (plain `Default`-derived structs,
//! `serde::Serialize` for JSON export, small ratio helpers alongside the
//! fields they summarize).

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ConnectionStats {
    /// Segments transmitted, including retransmissions.
    pub segments_sent: u64,
    /// Payload bytes transmitted, excluding retransmitted bytes.
    pub bytes_sent: u64,
    /// Segments accepted by `receive` (checksum valid, in order).
    pub segments_received: u64,
    /// Payload bytes delivered to the application.
    pub bytes_delivered: u64,
    /// Out-of-order segments that triggered a duplicate ACK.
    pub duplicate_acks_sent: u64,
    /// Segments dropped for a bad checksum or truncated wire length.
    pub segments_dropped: u64,
    /// Retransmissions triggered by the tick timeout.
    pub retransmissions: u64,
    /// Set once the connection is torn down after exhausting retries.
    pub retry_exhausted: bool,
}

impl ConnectionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Retransmitted segments as a fraction of all segments sent.
    pub fn retransmit_ratio(&self) -> f64 {
        if self.segments_sent == 0 {
            0.0
        } else {
            self.retransmissions as f64 / self.segments_sent as f64
        }
    }
}
