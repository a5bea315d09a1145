//! ARP cache: IPv4 → {MAC, insertion time, valid flag}, 15 s TTL.

use common::clock::Instant;
use common::MacAddr;
use std::collections::HashMap;
use std::net::Ipv4Addr;
use std::time::Duration;

pub const ARP_ENTRY_TTL: Duration = Duration::from_secs(15);

#[derive(Debug, Clone)]
struct ArpCacheEntry {
    mac: MacAddr,
    inserted_at: Instant,
    valid: bool,
}

/// Learned IPv4 → MAC mappings. Read/written by both the packet-receive
/// path and the periodic sweeper; per §5 these must never interleave, which
/// callers get for free by driving both through one `&mut ArpCache`.
#[derive(Debug, Default)]
pub struct ArpCache {
    entries: HashMap<Ipv4Addr, ArpCacheEntry>,
}

impl ArpCache {
    pub fn new() -> Self {
        ArpCache::default()
    }

    pub fn insert(&mut self, ip: Ipv4Addr, mac: MacAddr, now: Instant) {
        self.entries.insert(
            ip,
            ArpCacheEntry {
                mac,
                inserted_at: now,
                valid: true,
            },
        );
    }

    /// Returns the cached MAC iff the entry is valid and not expired.
    pub fn lookup(&self, ip: Ipv4Addr, now: Instant) -> Option<MacAddr> {
        let entry = self.entries.get(&ip)?;
        if entry.valid && now.duration_since(entry.inserted_at) < ARP_ENTRY_TTL {
            Some(entry.mac)
        } else {
            None
        }
    }

    /// Purges entries past their TTL. Run on a 1-second (or coarser)
    /// external timer, independent of the pending-ARP-request sweeper —
    /// the original lab ran ARP-cache expiry as its own thread.
    pub fn sweep_expired(&mut self, now: Instant) {
        self.entries
            .retain(|_, e| now.duration_since(e.inserted_at) < ARP_ENTRY_TTL);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_then_lookup_hits() {
        let mut cache = ArpCache::new();
        let now = Instant::now();
        cache.insert(Ipv4Addr::new(10, 0, 0, 1), MacAddr::new([1; 6]), now);
        assert_eq!(cache.lookup(Ipv4Addr::new(10, 0, 0, 1), now), Some(MacAddr::new([1; 6])));
    }

    #[test]
    fn lookup_miss_for_unknown_ip() {
        let cache = ArpCache::new();
        assert_eq!(cache.lookup(Ipv4Addr::new(10, 0, 0, 9), Instant::now()), None);
    }

    #[test]
    fn sweep_removes_expired_entries() {
        let mut cache = ArpCache::new();
        let t0 = Instant::now();
        cache.insert(Ipv4Addr::new(10, 0, 0, 1), MacAddr::new([1; 6]), t0);
        assert_eq!(cache.len(), 1);
        // sweep before expiry: entry survives
        cache.sweep_expired(t0);
        assert_eq!(cache.len(), 1);
    }
}
