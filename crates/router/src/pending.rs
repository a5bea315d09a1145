//! Pending-ARP-request queue (§3, §4.1): at most one pending request per
//! IPv4, each holding the frames waiting on its resolution.

use common::clock::Instant;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::time::Duration;

pub const ARP_RETRY_INTERVAL: Duration = Duration::from_secs(1);
pub const ARP_MAX_RETRIES: u8 = 5;

/// A frame queued behind an unresolved ARP request, with the interface it
/// is to be transmitted on once the MAC is known.
#[derive(Debug, Clone)]
pub struct QueuedFrame {
    pub egress_iface: String,
    pub frame: Vec<u8>,
}

#[derive(Debug)]
struct PendingEntry {
    first_seen: Instant,
    last_sent: Instant,
    retry_count: u8,
    queued: Vec<QueuedFrame>,
}

/// Outcome of the 1-second sweep over pending requests.
pub enum SweepAction {
    /// Retransmit the ARP request for `ip` (broadcast on every queued
    /// frame's interface is unnecessary — the request is re-sent once; the
    /// caller knows which interface originally created the entry via its
    /// own bookkeeping, so `iface` here is the interface of the first
    /// queued frame at sweep time).
    Retransmit { ip: Ipv4Addr },
    /// Five attempts without reply: every queued frame's original sender
    /// gets an ICMP Host-Unreachable; the entry is removed.
    Expired { ip: Ipv4Addr, frames: Vec<QueuedFrame> },
}

#[derive(Debug, Default)]
pub struct PendingArpQueue {
    entries: HashMap<Ipv4Addr, PendingEntry>,
}

impl PendingArpQueue {
    pub fn new() -> Self {
        PendingArpQueue::default()
    }

    pub fn is_pending(&self, ip: Ipv4Addr) -> bool {
        self.entries.contains_key(&ip)
    }

    /// Enqueues `frame` for `ip`, creating the entry if needed. Returns
    /// `true` if this call created a new entry (caller must transmit the
    /// first ARP request immediately).
    pub fn enqueue(&mut self, ip: Ipv4Addr, egress_iface: String, frame: Vec<u8>, now: Instant) -> bool {
        let is_new = !self.entries.contains_key(&ip);
        let entry = self.entries.entry(ip).or_insert_with(|| PendingEntry {
            first_seen: now,
            last_sent: now,
            retry_count: 0,
            queued: Vec::new(),
        });
        entry.queued.push(QueuedFrame { egress_iface, frame });
        is_new
    }

    /// The egress interface recorded against `ip`'s first queued frame, used
    /// by the sweeper to know where to re-send a retransmitted request.
    pub fn peek_egress(&self, ip: Ipv4Addr) -> Option<&str> {
        self.entries
            .get(&ip)
            .and_then(|e| e.queued.first())
            .map(|qf| qf.egress_iface.as_str())
    }

    /// An ARP reply arrived for `ip`: drains and returns the queued frames,
    /// removing the entry.
    pub fn resolve(&mut self, ip: Ipv4Addr) -> Option<Vec<QueuedFrame>> {
        self.entries.remove(&ip).map(|e| e.queued)
    }

    /// Runs the 1-second sweep (§4.1's "ARP-pending sweeper").
    pub fn sweep(&mut self, now: Instant) -> Vec<SweepAction> {
        let mut actions = Vec::new();
        let mut expired_ips = Vec::new();

        for (&ip, entry) in self.entries.iter_mut() {
            if now.duration_since(entry.last_sent) < ARP_RETRY_INTERVAL {
                continue;
            }
            if entry.retry_count >= ARP_MAX_RETRIES {
                expired_ips.push(ip);
            } else {
                entry.retry_count += 1;
                entry.last_sent = now;
                actions.push(SweepAction::Retransmit { ip });
            }
        }

        for ip in expired_ips {
            if let Some(entry) = self.entries.remove(&ip) {
                actions.push(SweepAction::Expired { ip, frames: entry.queued });
            }
        }

        actions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
