//! # Connection state machine
//!
//! One cTCP connection over an unreliable substrate: segment framing,
//! sliding send/receive windows, cumulative ACKs with a single-gap
//! duplicate-ACK hint, retransmission on timeout, and FIN-based shutdown in
//! both directions. Grounded on the five operations in §4.2, structurally
//! on `ctcp.c`'s `trySend`/`ctcp_receive`/`ctcp_output`/`ctcp_timer` shape.
//!
//! Per §7, a `Connection` never fails its caller — every operation returns
//! `()`; teardown is observable only by `is_torn_down()` returning `true` on
//! later calls.

use std::collections::VecDeque;
use std::time::Duration;

use bytes::Bytes;
use common::clock::Instant;

use crate::bbr::{AckSample, BbrController, SendLimit};
use crate::stats::ConnectionStats;
use crate::substrate::{AppConn, AppRead, Substrate};
use crate::wire::{Segment, FLAG_ACK, FLAG_FIN};

/// Matches `bbr::MSS` — the two crate-level "how big is one segment's
/// payload" constants must agree since try-send mins against both.
pub const MAX_SEG_DATA_SIZE: usize = crate::bbr::MSS as usize;
/// Chunk size `read_from_app` pulls from `conn.input` at a time.
pub const BUFFER_SIZE: usize = 4096;
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(40);
/// Retransmissions attempted before teardown (0..=4 is 5 attempts total).
const MAX_RETRY_COUNT: u32 = 4;
/// RTT_TIMEOUT before any real RTT sample exists.
const INITIAL_RTT_TIMEOUT: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinStatus {
    None,
    Pending,
    Sent,
}

/// A segment copied into the sent-unacked queue, awaiting cumulative ACK.
struct SentSegment {
    wire: Bytes,
    seq: u32,
    payload_len: u32,
    last_sent: Instant,
    retry_count: u32,
    app_limited: bool,
    /// `last_ack_received` at the moment this segment was sent — the
    /// baseline, in our own send-sequence space, against which a later
    /// ack's `acked_bytes_since_baseline` is measured (`seg.ack` lives in
    /// that same space, not in `expected_ack`'s peer-sequence space).
    baseline_ack_at_send: u32,
}

pub struct Connection {
    unsent: VecDeque<u8>,
    sent_unacked: VecDeque<SentSegment>,
    unsubmitted: VecDeque<u8>,

    send_window: u16,
    recv_window: u16,

    next_seq_to_send: u32,
    expected_ack: u32,
    last_ack_received: u32,

    fin_status: FinStatus,
    peer_fin_received: bool,
    single_ack_update: bool,

    bbr: BbrController,
    torn_down: bool,

    stats: ConnectionStats,
}

impl Connection {
    /// `initial_seq` is the connection's own first sequence number (the
    /// reference implementation starts counting from 1, not 0 — a lone FIN
    /// at seq 0 would be indistinguishable from "nothing sent yet").
    pub fn new(now: Instant, initial_seq: u32, recv_window: u16) -> Self {
        Connection {
            unsent: VecDeque::new(),
            sent_unacked: VecDeque::new(),
            unsubmitted: VecDeque::new(),

            send_window: u16::MAX,
            recv_window,

            next_seq_to_send: initial_seq,
            expected_ack: 0,
            last_ack_received: initial_seq,

            fin_status: FinStatus::None,
            peer_fin_received: false,
            single_ack_update: false,

            bbr: BbrController::new(now),
            torn_down: false,

            stats: ConnectionStats::new(),
        }
    }

    /// Sets `expected_ack` to the peer's first sequence number. Only
    /// meaningful before any segment has been received; a real handshake is
    /// out of scope (§1 Non-goals), so this is how a test or demo seeds the
    /// peer's initial sequence number.
    pub fn seed_expected_ack(&mut self, seq: u32) {
        self.expected_ack = seq;
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    pub fn fin_status(&self) -> FinStatus {
        self.fin_status
    }

    pub fn bbr(&self) -> &BbrController {
        &self.bbr
    }

    pub fn stats(&self) -> &ConnectionStats {
        &self.stats
    }

    fn rtt_timeout(&self) -> Duration {
        let min_rtt = self.bbr.min_rtt();
        if min_rtt == Duration::MAX {
            INITIAL_RTT_TIMEOUT
        } else {
            min_rtt.checked_mul(5).unwrap_or(Duration::MAX)
        }
    }

    /// Pulls bytes from the substrate in `BUFFER_SIZE` chunks until
    /// `conn.input` reports no more data or EOF. Never sends — a later
    /// *tick* or *receive* drains the unsent queue via *try-send*.
    pub fn read_from_app<A: AppConn>(&mut self, app: &mut A) {
        let mut buf = [0u8; BUFFER_SIZE];
        loop {
            match app.input(&mut buf) {
                AppRead::Data(0) => break,
                AppRead::Data(n) => self.unsent.extend(buf[..n].iter().copied()),
                AppRead::WouldBlock => break,
                AppRead::Eof => {
                    if self.fin_status == FinStatus::None {
                        self.fin_status = FinStatus::Pending;
                    }
                    break;
                }
            }
        }
    }

    /// `raw` is the full wire segment; `wire_len` is the number of bytes
    /// the substrate actually delivered (may exceed `raw.len()` truncation
    /// is not modeled here — callers pass the true datagram length).
    pub fn receive<S: Substrate, A: AppConn>(
        &mut self,
        raw: &[u8],
        wire_len: usize,
        now: Instant,
        substrate: &mut S,
        app: &mut A,
    ) {
        let Some(len_field) = Segment::peek_len_field(raw) else {
            self.stats.segments_dropped += 1;
            return;
        };
        let declared_len = len_field as usize;
        if declared_len < crate::wire::HEADER_LEN || declared_len > raw.len() || wire_len < declared_len {
            self.stats.segments_dropped += 1;
            return;
        }
        let framed = &raw[..declared_len];

        if !Segment::checksum_valid(framed) {
            self.stats.segments_dropped += 1;
            return;
        }
        let Some(seg) = Segment::parse(framed) else {
            self.stats.segments_dropped += 1;
            return;
        };

        if seg.seq != self.expected_ack {
            self.stats.duplicate_acks_sent += 1;
            self.single_ack_update = true;
            self.try_send(now, substrate);
            return;
        }

        self.stats.segments_received += 1;
        self.expected_ack = self.expected_ack.wrapping_add(seg.payload.len() as u32);
        self.send_window = seg.recv_window;

        if seg.has_ack() {
            self.process_cumulative_ack(&seg, now);
        }

        self.recv_window = self.recv_window.saturating_sub(seg.payload.len().min(u16::MAX as usize) as u16);

        if seg.has_fin() && seg.payload.is_empty() {
            self.expected_ack = self.expected_ack.wrapping_add(1);
            app.output(&[]);
            self.peer_fin_received = true;
            // A lone FIN carries no payload to piggyback an ACK onto, so
            // without this try-send's "nothing to report" guard would
            // swallow the ack of it.
            self.single_ack_update = true;
        }

        if !seg.payload.is_empty() {
            self.unsubmitted.extend(seg.payload.iter().copied());
            // Same reasoning: new in-order data is itself ACK-worthy even
            // when we have nothing of our own queued to send.
            self.single_ack_update = true;
        }

        self.try_send(now, substrate);
        self.drain_to_app(app, now, substrate);
    }

    fn process_cumulative_ack(&mut self, seg: &Segment, now: Instant) {
        let acked = seg.ack.wrapping_sub(self.last_ack_received);
        if acked == 0 {
            return;
        }

        self.bbr.on_bytes_acked(acked as u64);

        if let Some(s) = self.sent_unacked.iter().rev().find(|s| seq_lt(s.seq, seg.ack)) {
            if s.retry_count == 0 {
                let sample = AckSample {
                    estimated_rtt: now.saturating_duration_since(s.last_sent),
                    acked_bytes_since_baseline: seg.ack.wrapping_sub(s.baseline_ack_at_send) as u64,
                    acked_bytes_total: acked as u64,
                    app_limited: s.app_limited,
                    timestamp: now,
                    retried: s.retry_count > 0,
                    inflight: self.bbr.inflight(),
                };
                self.bbr.on_ack(sample);
            }
        }

        while let Some(front) = self.sent_unacked.front() {
            let covers_fin = front.payload_len == 0;
            let segment_end = front.seq.wrapping_add(front.payload_len).wrapping_add(if covers_fin { 1 } else { 0 });
            if seq_le(segment_end, seg.ack) {
                self.sent_unacked.pop_front();
            } else {
                break;
            }
        }

        self.last_ack_received = seg.ack;
    }

    /// While the application has room and bytes are waiting, delivers them.
    /// A window that had closed (`recv_window == 0`) triggers an immediate
    /// window-update ACK once it reopens.
    pub fn drain_to_app<A: AppConn, S: Substrate>(&mut self, app: &mut A, now: Instant, substrate: &mut S) {
        let window_was_zero = self.recv_window == 0;
        let mut has_output_count: usize = 0;

        while !self.unsubmitted.is_empty() {
            let space = app.bufspace();
            if space == 0 {
                break;
            }
            let take = space.min(self.unsubmitted.len());
            let chunk: Vec<u8> = self.unsubmitted.drain(..take).collect();
            has_output_count += chunk.len();
            app.output(&chunk);
        }

        self.stats.bytes_delivered += has_output_count as u64;
        self.recv_window = self.recv_window.saturating_add(has_output_count.min(u16::MAX as usize) as u16);

        if window_was_zero && has_output_count > 0 {
            self.single_ack_update = true;
            self.try_send(now, substrate);
        }
    }

    /// Periodic driver (40 ms default): drives pacing even when idle,
    /// retransmits timed-out segments, and tears the connection down once
    /// both directions have finished.
    pub fn tick<S: Substrate>(&mut self, now: Instant, substrate: &mut S) {
        if self.torn_down {
            return;
        }

        self.try_send(now, substrate);

        let timeout = self.rtt_timeout();
        let mut teardown = false;
        for seg in self.sent_unacked.iter_mut() {
            if now.saturating_duration_since(seg.last_sent) <= timeout {
                continue;
            }
            if seg.retry_count == MAX_RETRY_COUNT {
                teardown = true;
                break;
            }
            substrate.send(&seg.wire);
            seg.last_sent = now;
            seg.retry_count += 1;
            self.stats.segments_sent += 1;
            self.stats.retransmissions += 1;
            self.bbr.on_retransmit(now);
        }

        if teardown {
            self.torn_down = true;
            self.stats.retry_exhausted = true;
            return;
        }

        if self.sent_unacked.is_empty() && self.fin_status == FinStatus::Sent && self.peer_fin_received {
            self.torn_down = true;
        }
    }

    /// Sends as much as the unsent queue, the peer's advertised window, and
    /// BBR's pacing/cwnd budgets allow; emits a bare ACK if one is owed.
    pub fn try_send<S: Substrate>(&mut self, now: Instant, substrate: &mut S) {
        if self.torn_down {
            return;
        }

        let fin_pending = self.fin_status == FinStatus::Pending;
        if self.unsent.is_empty() && !fin_pending && !self.single_ack_update {
            return;
        }

        let pacing_budget = self.bbr.pacing_budget(now);
        let cwnd_remaining = self.bbr.cwnd_budget().saturating_sub(self.bbr.inflight());

        let payload_len = [
            MAX_SEG_DATA_SIZE as u64,
            self.unsent.len() as u64,
            self.send_window as u64,
            pacing_budget,
            cwnd_remaining,
        ]
        .into_iter()
        .min()
        .unwrap_or(0) as usize;

        let payload: Bytes = if payload_len > 0 {
            Bytes::from(self.unsent.drain(..payload_len).collect::<Vec<u8>>())
        } else {
            Bytes::new()
        };

        let fin_attached = fin_pending && self.unsent.is_empty();
        let mut flags = FLAG_ACK;
        if fin_attached {
            flags |= FLAG_FIN;
        }

        let seg = Segment {
            seq: self.next_seq_to_send,
            ack: self.expected_ack,
            flags,
            recv_window: self.recv_window,
            payload: payload.clone(),
        };
        let wire = seg.encode();
        substrate.send(&wire);
        self.stats.segments_sent += 1;

        let seq_advance = payload.len() as u32 + u32::from(fin_attached);

        if !payload.is_empty() || fin_attached {
            self.stats.bytes_sent += payload.len() as u64;
            self.sent_unacked.push_back(SentSegment {
                wire,
                seq: self.next_seq_to_send,
                payload_len: payload.len() as u32,
                last_sent: now,
                retry_count: 0,
                app_limited: (payload.len() as u64) < pacing_budget,
                baseline_ack_at_send: self.last_ack_received,
            });
        }

        let limit = if cwnd_remaining <= pacing_budget { SendLimit::Cwnd } else { SendLimit::Pacing };
        self.bbr.on_send(payload.len() as u64, limit, now);

        self.next_seq_to_send = self.next_seq_to_send.wrapping_add(seq_advance);
        self.single_ack_update = false;
        if fin_attached {
            self.fin_status = FinStatus::Sent;
        }
    }
}

fn seq_lt(a: u32, b: u32) -> bool {
    (a.wrapping_sub(b) as i32) < 0
}

fn seq_le(a: u32, b: u32) -> bool {
    a == b || seq_lt(a, b)
}
